//! The parameter store: single owner of [`RenderParameters`].
//!
//! Every setter raises a render request. Painting is decoupled: the owner
//! calls [`ParameterStore::take_render_request`] once per frame, so several
//! mutations in the same frame produce one paint.

use crate::color::Color;
use crate::params::{clamp_image_scale, BackgroundImage, Offset, RenderParameters};

#[derive(Debug, Clone)]
pub struct ParameterStore {
    params: RenderParameters,
    render_requested: bool,
}

impl ParameterStore {
    /// A store with default parameters and a pending first render.
    pub fn new() -> Self {
        Self::with_params(RenderParameters::default())
    }

    pub fn with_params(params: RenderParameters) -> Self {
        let image_scale = clamp_image_scale(params.image_scale);
        Self {
            params: RenderParameters {
                image_scale,
                ..params
            },
            render_requested: true,
        }
    }

    pub fn params(&self) -> &RenderParameters {
        &self.params
    }

    pub fn request_render(&mut self) {
        self.render_requested = true;
    }

    pub fn render_requested(&self) -> bool {
        self.render_requested
    }

    /// Return and clear the pending render request.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_requested)
    }

    pub fn title_text(&self) -> &str {
        &self.params.title_text
    }

    pub fn set_title_text(&mut self, text: impl Into<String>) {
        self.params.title_text = text.into();
        self.request_render();
    }

    pub fn super_text(&self) -> &str {
        &self.params.super_text
    }

    pub fn set_super_text(&mut self, text: impl Into<String>) {
        self.params.super_text = text.into();
        self.request_render();
    }

    pub fn clear_color(&self) -> Color {
        self.params.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.params.clear_color = color;
        self.request_render();
    }

    /// Parse and apply a color string. Invalid input keeps the current
    /// color; returns whether the value was accepted.
    pub fn set_clear_color_str(&mut self, value: &str) -> bool {
        match value.parse::<Color>() {
            Ok(color) => {
                self.set_clear_color(color);
                true
            }
            Err(e) => {
                tracing::warn!(value, error = %e, "Ignoring invalid clear color");
                false
            }
        }
    }

    pub fn background_image(&self) -> Option<&BackgroundImage> {
        self.params.background_image.as_ref()
    }

    pub fn set_background_image(&mut self, image: Option<BackgroundImage>) {
        tracing::debug!(image = ?image, "Background image changed");
        self.params.background_image = image;
        self.request_render();
    }

    pub fn image_scale(&self) -> f64 {
        self.params.image_scale
    }

    /// Set the image scale, clamping non-positive values.
    pub fn set_image_scale(&mut self, scale: f64) {
        let clamped = clamp_image_scale(scale);
        if clamped != scale {
            tracing::debug!(requested = scale, clamped, "Image scale clamped");
        }
        self.params.image_scale = clamped;
        self.request_render();
    }

    pub fn image_offset(&self) -> Offset {
        self.params.image_offset
    }

    /// Set the image offset. Non-finite offsets are ignored.
    pub fn set_image_offset(&mut self, offset: Offset) {
        if !offset.is_finite() {
            tracing::debug!(?offset, "Ignoring non-finite image offset");
            return;
        }
        self.params.image_offset = offset;
        self.request_render();
    }

    /// Set scale and offset as one update.
    pub fn set_transform(&mut self, scale: f64, offset: Offset) {
        self.set_image_scale(scale);
        self.set_image_offset(offset);
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::MIN_IMAGE_SCALE;
    use proptest::prelude::*;

    #[test]
    fn test_starts_with_render_request() {
        let mut store = ParameterStore::new();
        assert!(store.take_render_request());
        assert!(!store.take_render_request());
    }

    #[test]
    fn test_setters_coalesce_into_one_request() {
        let mut store = ParameterStore::new();
        store.take_render_request();

        store.set_title_text("Hello");
        store.set_super_text("world");
        store.set_image_scale(2.0);

        assert!(store.take_render_request());
        assert!(!store.render_requested());
        assert_eq!(store.title_text(), "Hello");
        assert_eq!(store.super_text(), "world");
    }

    #[test]
    fn test_scale_clamped_positive() {
        let mut store = ParameterStore::new();
        store.set_image_scale(-1.0);
        assert_eq!(store.image_scale(), MIN_IMAGE_SCALE);
        store.set_image_scale(0.0);
        assert!(store.image_scale() > 0.0);
    }

    #[test]
    fn test_invalid_color_keeps_previous() {
        let mut store = ParameterStore::new();
        assert!(store.set_clear_color_str("#112233"));
        store.take_render_request();

        assert!(!store.set_clear_color_str("not-a-color"));
        assert_eq!(store.clear_color(), Color::rgb(0x11, 0x22, 0x33));
        assert!(!store.render_requested());
    }

    #[test]
    fn test_non_finite_offset_ignored() {
        let mut store = ParameterStore::new();
        store.set_image_offset(Offset::new(5.0, -3.0));
        store.set_image_offset(Offset::new(f64::NAN, 1.0));
        assert_eq!(store.image_offset(), Offset::new(5.0, -3.0));
    }

    #[test]
    fn test_with_params_clamps_scale() {
        let store = ParameterStore::with_params(RenderParameters {
            image_scale: 0.0,
            ..RenderParameters::default()
        });
        assert_eq!(store.image_scale(), MIN_IMAGE_SCALE);
    }

    proptest! {
        #[test]
        fn prop_stored_scale_is_always_positive(scale in proptest::num::f64::ANY) {
            let mut store = ParameterStore::new();
            store.set_image_scale(scale);
            prop_assert!(store.image_scale() >= MIN_IMAGE_SCALE);
            prop_assert!(!store.image_scale().is_nan());
        }
    }
}
