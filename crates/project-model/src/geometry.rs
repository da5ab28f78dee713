//! Target and preview surface dimensions.

use coverforge_common::config::ExportSettings;

/// Size of the exported image and of the high-resolution preview.
///
/// The preview is the target size multiplied by `preview_scale`, so every
/// export is a pure downscale of what the user sees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    pub target_width: u32,
    pub target_height: u32,
    pub preview_scale: f64,
}

impl SurfaceGeometry {
    pub const DEFAULT_TARGET_WIDTH: u32 = 1280;
    pub const DEFAULT_TARGET_HEIGHT: u32 = 720;
    pub const DEFAULT_PREVIEW_SCALE: f64 = 2.0;

    pub fn new(target_width: u32, target_height: u32, preview_scale: f64) -> Self {
        Self {
            target_width: target_width.max(1),
            target_height: target_height.max(1),
            preview_scale: if preview_scale.is_finite() && preview_scale > 0.0 {
                preview_scale
            } else {
                Self::DEFAULT_PREVIEW_SCALE
            },
        }
    }

    pub fn from_settings(settings: &ExportSettings) -> Self {
        Self::new(
            settings.target_width,
            settings.target_height,
            settings.preview_scale,
        )
    }

    /// Preview width in logical pixels.
    pub fn preview_width(&self) -> u32 {
        (self.target_width as f64 * self.preview_scale).round().max(1.0) as u32
    }

    /// Preview height in logical pixels.
    pub fn preview_height(&self) -> u32 {
        (self.target_height as f64 * self.preview_scale).round().max(1.0) as u32
    }

    pub fn preview_size(&self) -> (f64, f64) {
        (self.preview_width() as f64, self.preview_height() as f64)
    }
}

impl Default for SurfaceGeometry {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_TARGET_WIDTH,
            Self::DEFAULT_TARGET_HEIGHT,
            Self::DEFAULT_PREVIEW_SCALE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preview_is_double_target() {
        let geometry = SurfaceGeometry::default();
        assert_eq!(geometry.preview_width(), 2560);
        assert_eq!(geometry.preview_height(), 1440);
    }

    #[test]
    fn test_invalid_scale_falls_back() {
        let geometry = SurfaceGeometry::new(100, 50, -3.0);
        assert_eq!(geometry.preview_scale, 2.0);
        assert_eq!(geometry.preview_size(), (200.0, 100.0));
    }
}
