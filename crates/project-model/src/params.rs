//! Render parameters: everything the compositor reads.

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;

use crate::color::Color;

/// Smallest image scale the store accepts.
pub const MIN_IMAGE_SCALE: f64 = 0.001;

/// Background image offset in pre-scale image units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Shared handle to a decoded background bitmap.
///
/// Cloning is cheap; the pixels are never mutated after decoding.
#[derive(Clone)]
pub struct BackgroundImage(Arc<RgbaImage>);

impl BackgroundImage {
    pub fn new(image: RgbaImage) -> Self {
        Self(Arc::new(image))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.0
    }
}

impl fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BackgroundImage({}x{})", self.width(), self.height())
    }
}

impl PartialEq for BackgroundImage {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// The full set of user-adjustable inputs to a render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParameters {
    /// Large bold line near the bottom edge.
    pub title_text: String,

    /// Smaller line above the title, rendered upper-cased.
    pub super_text: String,

    /// Fill painted before everything else.
    pub clear_color: Color,

    pub background_image: Option<BackgroundImage>,

    /// Uniform scale applied to the background image. Always `> 0`.
    pub image_scale: f64,

    /// Position of the background image in pre-scale units.
    pub image_offset: Offset,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            title_text: String::new(),
            super_text: String::new(),
            clear_color: Color::BLACK,
            background_image: None,
            image_scale: 1.0,
            image_offset: Offset::ZERO,
        }
    }
}

/// Coerce a requested scale into the valid range. NaN and non-positive
/// values become [`MIN_IMAGE_SCALE`]; an overflowed zoom saturates at
/// `f64::MAX` instead of collapsing.
pub fn clamp_image_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        MIN_IMAGE_SCALE
    } else {
        scale.clamp(MIN_IMAGE_SCALE, f64::MAX)
    }
}
