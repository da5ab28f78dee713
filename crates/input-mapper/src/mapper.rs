//! Single dispatch point for host input.

use coverforge_project_model::event::{Field, FormAction, InputEvent};
use coverforge_project_model::geometry::SurfaceGeometry;
use coverforge_project_model::params::Offset;
use coverforge_project_model::store::ParameterStore;

use crate::fit::{fit_to_canvas, DEFAULT_SCALE};
use crate::pan::{pan_offset, DragState};
use crate::zoom::zoom_at_cursor;

/// On-screen size of the displayed preview, in host pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMetrics {
    pub width: f64,
    pub height: f64,
}

impl DisplayMetrics {
    fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (x as f64, y as f64);
        x >= 0.0 && y >= 0.0 && x < self.width && y < self.height
    }
}

/// Work the mapper cannot do itself and hands back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    /// Export the current preview.
    Export,
}

/// Converts [`InputEvent`]s into [`ParameterStore`] updates.
#[derive(Debug, Clone)]
pub struct InputMapper {
    preview_width: f64,
    preview_height: f64,
    display: DisplayMetrics,
    drag: DragState,
}

impl InputMapper {
    /// Create a mapper for the given surfaces. The preview is assumed to be
    /// displayed at its logical size until a resize event arrives.
    pub fn new(geometry: SurfaceGeometry) -> Self {
        let (preview_width, preview_height) = geometry.preview_size();
        Self {
            preview_width,
            preview_height,
            display: DisplayMetrics {
                width: preview_width,
                height: preview_height,
            },
            drag: DragState::default(),
        }
    }

    pub fn display(&self) -> DisplayMetrics {
        self.display
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Logical preview pixels per on-screen pixel.
    pub fn page_to_logical(&self) -> f64 {
        self.preview_width / self.display.width
    }

    /// Apply one event to the store.
    pub fn dispatch(
        &mut self,
        store: &mut ParameterStore,
        event: InputEvent,
    ) -> Option<HostRequest> {
        match event {
            InputEvent::PointerDown { x, y } => {
                if self.display.contains(x, y) {
                    self.drag.begin(x, y);
                    tracing::trace!(x, y, "Drag started");
                }
            }
            InputEvent::PointerMove { x, y } => {
                if let Some((dx, dy)) = self.drag.advance(x, y) {
                    let offset = pan_offset(
                        store.image_offset(),
                        (dx as f64, dy as f64),
                        self.page_to_logical(),
                        store.image_scale(),
                    );
                    store.set_image_offset(offset);
                }
            }
            InputEvent::PointerUp => {
                if self.drag.active {
                    tracing::trace!(offset = ?store.image_offset(), "Drag finished");
                }
                self.drag.end();
            }
            InputEvent::Wheel { x, y, delta } => {
                if !self.display.contains(x, y) {
                    return None;
                }
                match zoom_at_cursor(
                    store.image_scale(),
                    store.image_offset(),
                    (x as f64, y as f64),
                    delta,
                    self.page_to_logical(),
                ) {
                    Some(step) => store.set_transform(step.scale, step.offset),
                    None => tracing::debug!(delta, "Ignoring wheel delta that inverts scale"),
                }
            }
            InputEvent::FieldChanged(field, value) => self.apply_field(store, field, &value),
            InputEvent::Action(action) => return self.apply_action(store, action),
            InputEvent::BackgroundImageChanged(image) => store.set_background_image(image),
            InputEvent::SurfaceResized { width, height } => {
                if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
                    self.display = DisplayMetrics { width, height };
                } else {
                    tracing::debug!(width, height, "Ignoring degenerate display size");
                }
            }
        }
        None
    }

    /// Fill the preview width with the current background image.
    pub fn fit_to_canvas(&self, store: &mut ParameterStore) {
        let image = store.background_image().map(|img| (img.width(), img.height()));
        let (scale, offset) = fit_to_canvas(image, (self.preview_width, self.preview_height));
        tracing::debug!(scale, ?offset, "Fit background to canvas");
        store.set_transform(scale, offset);
    }

    fn apply_field(&self, store: &mut ParameterStore, field: Field, value: &str) {
        match field {
            Field::TitleText => store.set_title_text(value),
            Field::SuperText => store.set_super_text(value),
            Field::ClearColor => {
                store.set_clear_color_str(value);
            }
            Field::ImageScale => {
                if let Some(scale) = parse_number(field, value) {
                    store.set_image_scale(scale);
                }
            }
            Field::ImageOffsetX => {
                if let Some(x) = parse_number(field, value) {
                    let y = store.image_offset().y;
                    store.set_image_offset(Offset::new(x, y));
                }
            }
            Field::ImageOffsetY => {
                if let Some(y) = parse_number(field, value) {
                    let x = store.image_offset().x;
                    store.set_image_offset(Offset::new(x, y));
                }
            }
        }
    }

    fn apply_action(
        &self,
        store: &mut ParameterStore,
        action: FormAction,
    ) -> Option<HostRequest> {
        match action {
            FormAction::FitImage => self.fit_to_canvas(store),
            FormAction::ResetScale => store.set_image_scale(DEFAULT_SCALE),
            FormAction::ResetOffset => store.set_image_offset(Offset::ZERO),
            FormAction::Download => return Some(HostRequest::Export),
        }
        None
    }
}

fn parse_number(field: Field, value: &str) -> Option<f64> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            tracing::warn!(?field, value, "Ignoring non-numeric field value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coverforge_project_model::color::Color;
    use coverforge_project_model::params::{BackgroundImage, MIN_IMAGE_SCALE};

    fn setup() -> (InputMapper, ParameterStore) {
        let mut store = ParameterStore::new();
        store.take_render_request();
        (InputMapper::new(SurfaceGeometry::default()), store)
    }

    #[test]
    fn test_drag_pans_at_display_ratio() {
        let (mut mapper, mut store) = setup();
        mapper.dispatch(
            &mut store,
            InputEvent::SurfaceResized {
                width: 1280.0,
                height: 720.0,
            },
        );
        store.set_image_scale(4.0);

        mapper.dispatch(&mut store, InputEvent::PointerDown { x: 100, y: 100 });
        mapper.dispatch(&mut store, InputEvent::PointerMove { x: 110, y: 96 });
        mapper.dispatch(&mut store, InputEvent::PointerUp);
        mapper.dispatch(&mut store, InputEvent::PointerMove { x: 500, y: 500 });

        // 2 logical px per host px, divided by scale 4.
        assert_eq!(store.image_offset(), Offset::new(5.0, -2.0));
        assert!(!mapper.drag().active);
    }

    #[test]
    fn test_pointer_down_outside_preview_does_not_drag() {
        let (mut mapper, mut store) = setup();
        mapper.dispatch(&mut store, InputEvent::PointerDown { x: -1, y: 10 });
        mapper.dispatch(&mut store, InputEvent::PointerMove { x: 50, y: 50 });
        assert_eq!(store.image_offset(), Offset::ZERO);
        assert!(!store.render_requested());
    }

    #[test]
    fn test_wheel_outside_preview_ignored() {
        let (mut mapper, mut store) = setup();
        let event = InputEvent::Wheel {
            x: 5000,
            y: 10,
            delta: -100.0,
        };
        mapper.dispatch(&mut store, event);
        assert_eq!(store.image_scale(), 1.0);
    }

    #[test]
    fn test_wheel_zooms_and_requests_render() {
        let (mut mapper, mut store) = setup();
        let event = InputEvent::Wheel {
            x: 640,
            y: 360,
            delta: -100.0,
        };
        mapper.dispatch(&mut store, event);
        assert!((store.image_scale() - 1.0 / 0.9).abs() < 1e-12);
        assert!(store.take_render_request());
    }

    #[test]
    fn test_fields_update_store() {
        let (mut mapper, mut store) = setup();
        mapper.dispatch(&mut store, InputEvent::field(Field::TitleText, "Hello"));
        mapper.dispatch(&mut store, InputEvent::field(Field::SuperText, "world"));
        mapper.dispatch(&mut store, InputEvent::field(Field::ClearColor, "#112233"));
        mapper.dispatch(&mut store, InputEvent::field(Field::ImageScale, "1.5"));
        mapper.dispatch(&mut store, InputEvent::field(Field::ImageOffsetX, "-20"));
        mapper.dispatch(&mut store, InputEvent::field(Field::ImageOffsetY, " 7.5 "));

        let params = store.params();
        assert_eq!(params.title_text, "Hello");
        assert_eq!(params.super_text, "world");
        assert_eq!(params.clear_color, Color::rgb(0x11, 0x22, 0x33));
        assert_eq!(params.image_scale, 1.5);
        assert_eq!(params.image_offset, Offset::new(-20.0, 7.5));
    }

    #[test]
    fn test_bad_numeric_field_ignored() {
        let (mut mapper, mut store) = setup();
        mapper.dispatch(&mut store, InputEvent::field(Field::ImageScale, "big"));
        mapper.dispatch(&mut store, InputEvent::field(Field::ImageOffsetX, "inf"));
        assert_eq!(store.image_scale(), 1.0);
        assert_eq!(store.image_offset(), Offset::ZERO);
        assert!(!store.render_requested());

        mapper.dispatch(&mut store, InputEvent::field(Field::ImageScale, "-3"));
        assert_eq!(store.image_scale(), MIN_IMAGE_SCALE);
    }

    #[test]
    fn test_actions() {
        let (mut mapper, mut store) = setup();
        store.set_transform(3.0, Offset::new(9.0, 9.0));

        mapper.dispatch(&mut store, InputEvent::Action(FormAction::ResetScale));
        assert_eq!(store.image_scale(), 1.0);
        assert_eq!(store.image_offset(), Offset::new(9.0, 9.0));

        mapper.dispatch(&mut store, InputEvent::Action(FormAction::ResetOffset));
        assert_eq!(store.image_offset(), Offset::ZERO);

        let request = mapper.dispatch(&mut store, InputEvent::Action(FormAction::Download));
        assert_eq!(request, Some(HostRequest::Export));
    }

    #[test]
    fn test_fit_uses_background_dimensions() {
        let (mut mapper, mut store) = setup();
        let image = BackgroundImage::new(image::RgbaImage::new(1280, 2000));
        mapper.dispatch(&mut store, InputEvent::BackgroundImageChanged(Some(image)));
        mapper.dispatch(&mut store, InputEvent::Action(FormAction::FitImage));

        assert_eq!(store.image_scale(), 2.0);
        assert_eq!(store.image_offset(), Offset::new(0.0, -640.0));

        mapper.dispatch(&mut store, InputEvent::BackgroundImageChanged(None));
        mapper.dispatch(&mut store, InputEvent::Action(FormAction::FitImage));
        assert_eq!(store.image_scale(), 1.0);
        assert_eq!(store.image_offset(), Offset::ZERO);
    }

    #[test]
    fn test_degenerate_resize_ignored() {
        let (mut mapper, mut store) = setup();
        mapper.dispatch(
            &mut store,
            InputEvent::SurfaceResized {
                width: 0.0,
                height: 100.0,
            },
        );
        assert_eq!(mapper.page_to_logical(), 1.0);
    }
}
