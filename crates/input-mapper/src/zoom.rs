//! Zoom that keeps the point under the cursor fixed.
//!
//! With `factor = page_to_logical / scale`, the pre-scale image coordinate
//! under a cursor at host position `c` is `c * factor - offset`. The new
//! scale is applied first; the offset is then re-derived so the same image
//! coordinate stays under the cursor. Reversing that order drifts.

use coverforge_project_model::params::{clamp_image_scale, Offset};

/// Wheel units per e-fold of zoom divisor.
pub const WHEEL_DIVISOR: f64 = 1000.0;

/// Scale and offset after a zoom step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomStep {
    pub scale: f64,
    pub offset: Offset,
}

/// Pre-scale image coordinate under a host-space cursor.
pub fn image_point_under(
    cursor: (f64, f64),
    scale: f64,
    offset: Offset,
    page_to_logical: f64,
) -> (f64, f64) {
    let factor = page_to_logical / scale;
    (cursor.0 * factor - offset.x, cursor.1 * factor - offset.y)
}

/// Zoom by one wheel delta around `cursor`.
///
/// Returns `None` when the delta would make the scale non-positive
/// (`delta <= -1000`). The new scale is clamped to the positive minimum
/// and saturates instead of overflowing; the offset is derived from the clamped value so the cursor point holds.
pub fn zoom_at_cursor(
    scale: f64,
    offset: Offset,
    cursor: (f64, f64),
    delta: f64,
    page_to_logical: f64,
) -> Option<ZoomStep> {
    let divisor = 1.0 + delta / WHEEL_DIVISOR;
    if !(divisor.is_finite() && divisor > 0.0) {
        return None;
    }

    let center = image_point_under(cursor, scale, offset, page_to_logical);

    let new_scale = clamp_image_scale(scale / divisor);
    let new_factor = page_to_logical / new_scale;
    let new_offset = Offset {
        x: cursor.0 * new_factor - center.0,
        y: cursor.1 * new_factor - center.1,
    };

    Some(ZoomStep {
        scale: new_scale,
        offset: new_offset,
    })
}
