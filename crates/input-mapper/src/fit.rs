//! Fit-to-canvas and reset defaults.

use coverforge_project_model::params::Offset;

pub const DEFAULT_SCALE: f64 = 1.0;

/// Scale and offset that make an image of `image` size fill the preview
/// width exactly and sit vertically centered.
///
/// Without an image (or with a degenerate one) this yields the defaults:
/// scale 1, offset 0.
pub fn fit_to_canvas(image: Option<(u32, u32)>, preview: (f64, f64)) -> (f64, Offset) {
    let Some((width, height)) = image.filter(|(w, h)| *w > 0 && *h > 0) else {
        return (DEFAULT_SCALE, Offset::ZERO);
    };

    let (preview_width, preview_height) = preview;
    let scale = preview_width / width as f64;
    let offset = Offset {
        x: 0.0,
        y: (preview_height / scale - height as f64) / 2.0,
    };
    (scale, offset)
}
