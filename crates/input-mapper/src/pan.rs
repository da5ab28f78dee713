//! Drag-to-pan.
//!
//! The offset lives in pre-scale image units, so a pointer delta in host
//! pixels is first converted to logical preview pixels and then divided by
//! the image scale. The image then tracks the pointer exactly, whatever the
//! display size or zoom level.

use coverforge_project_model::params::Offset;

/// Pointer drag state. Only meaningful while `active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragState {
    pub active: bool,
    pub last_pointer_position: (i32, i32),
}

impl DragState {
    pub fn begin(&mut self, x: i32, y: i32) {
        self.active = true;
        self.last_pointer_position = (x, y);
    }

    /// Advance to a new pointer position, returning the delta since the
    /// previous one. Returns `None` when no drag is in progress.
    pub fn advance(&mut self, x: i32, y: i32) -> Option<(i32, i32)> {
        if !self.active {
            return None;
        }
        let (lx, ly) = self.last_pointer_position;
        self.last_pointer_position = (x, y);
        Some((x - lx, y - ly))
    }

    pub fn end(&mut self) {
        self.active = false;
    }
}

/// Apply a pointer delta (host pixels) to an offset.
///
/// `page_to_logical` is `logical_preview_width / onscreen_width`.
pub fn pan_offset(offset: Offset, delta: (f64, f64), page_to_logical: f64, scale: f64) -> Offset {
    let factor = page_to_logical / scale;
    Offset {
        x: offset.x + delta.0 * factor,
        y: offset.y + delta.1 * factor,
    }
}
