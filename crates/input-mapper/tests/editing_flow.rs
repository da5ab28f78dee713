//! A typical edit: fit, drag, zoom, reset.

use coverforge_input_mapper::zoom::image_point_under;
use coverforge_input_mapper::{HostRequest, InputMapper};
use coverforge_project_model::event::{FormAction, InputEvent};
use coverforge_project_model::geometry::SurfaceGeometry;
use coverforge_project_model::params::{BackgroundImage, Offset};
use coverforge_project_model::store::ParameterStore;
use image::RgbaImage;

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn fit_drag_zoom_reset() {
    let mut mapper = InputMapper::new(SurfaceGeometry::default());
    let mut store = ParameterStore::new();

    // Preview 2560x1440 shown at 1280x720 on screen.
    mapper.dispatch(
        &mut store,
        InputEvent::SurfaceResized {
            width: 1280.0,
            height: 720.0,
        },
    );
    assert_close(mapper.page_to_logical(), 2.0);

    mapper.dispatch(
        &mut store,
        InputEvent::BackgroundImageChanged(Some(BackgroundImage::new(RgbaImage::new(1280, 720)))),
    );
    mapper.dispatch(&mut store, InputEvent::Action(FormAction::FitImage));
    assert_close(store.image_scale(), 2.0);
    assert_eq!(store.image_offset(), Offset::ZERO);

    // Drag 10px right on screen: 20 logical pixels, 10 image pixels.
    for event in [
        InputEvent::PointerDown { x: 100, y: 100 },
        InputEvent::PointerMove { x: 105, y: 100 },
        InputEvent::PointerMove { x: 110, y: 100 },
        InputEvent::PointerUp,
        InputEvent::PointerMove { x: 500, y: 500 },
    ] {
        mapper.dispatch(&mut store, event);
    }
    assert_close(store.image_offset().x, 10.0);
    assert_close(store.image_offset().y, 0.0);

    // Zoom in around the screen center.
    let cursor = (640.0, 360.0);
    let before = image_point_under(cursor, store.image_scale(), store.image_offset(), 2.0);
    mapper.dispatch(
        &mut store,
        InputEvent::Wheel {
            x: 640,
            y: 360,
            delta: -500.0,
        },
    );
    assert_close(store.image_scale(), 4.0);
    let after = image_point_under(cursor, store.image_scale(), store.image_offset(), 2.0);
    assert_close(before.0, after.0);
    assert_close(before.1, after.1);
    assert_close(store.image_offset().x, -310.0);

    mapper.dispatch(&mut store, InputEvent::Action(FormAction::ResetScale));
    mapper.dispatch(&mut store, InputEvent::Action(FormAction::ResetOffset));
    assert_close(store.image_scale(), 1.0);
    assert_eq!(store.image_offset(), Offset::ZERO);

    assert_eq!(
        mapper.dispatch(&mut store, InputEvent::Action(FormAction::Download)),
        Some(HostRequest::Export)
    );
    assert!(store.take_render_request());
}
