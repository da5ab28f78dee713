use std::sync::{Arc, Mutex};

use coverforge_common::config::AppConfig;
use coverforge_common::error::CoverResult;
use coverforge_project_model::event::{Field, FormAction, InputEvent};
use coverforge_project_model::geometry::SurfaceGeometry;
use coverforge_render_engine::{
    DecorationLayout, DownloadSink, Exporter, Session, TextRenderer, TextRun,
};
use image::{ImageFormat, Rgba};
use tiny_skia::Pixmap;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Monospace stand-in: every glyph is a solid box of 0.5em x 0.7em on a
/// 0.6em advance, sitting on the baseline.
struct BoxText {
    seen: Arc<Mutex<Vec<String>>>,
}

impl BoxText {
    const ADVANCE: f64 = 0.6;
    const WIDTH: f64 = 0.5;
    const HEIGHT: f64 = 0.7;
}

impl TextRenderer for BoxText {
    fn name(&self) -> &str {
        "box"
    }

    fn draw(&self, surface: &mut Pixmap, run: &TextRun<'_>) {
        self.seen.lock().unwrap().push(run.text.to_string());
        let mut caret = run.x;
        for _ in run.text.chars() {
            coverforge_render_engine::paint::fill_rect(
                surface,
                caret,
                run.baseline - Self::HEIGHT * run.size,
                Self::WIDTH * run.size,
                Self::HEIGHT * run.size,
                run.color,
            );
            caret += Self::ADVANCE * run.size + run.letter_spacing;
        }
    }
}

#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<(String, Vec<u8>)>>>);

impl DownloadSink for SharedSink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> CoverResult<()> {
        self.0
            .lock()
            .unwrap()
            .push((file_name.to_string(), bytes.to_vec()));
        Ok(())
    }

    fn name(&self) -> &str {
        "shared"
    }
}

fn default_session(sink: SharedSink) -> Session {
    let geometry = SurfaceGeometry::default();
    Session::new(geometry, Exporter::new(geometry), Box::new(sink))
}

fn hello_world(session: &mut Session) {
    for event in [
        InputEvent::field(Field::TitleText, "Hello"),
        InputEvent::field(Field::SuperText, "world"),
        InputEvent::field(Field::ClearColor, "#112233"),
    ] {
        session.handle(event).unwrap();
    }
}

#[test]
fn title_lands_in_bottom_left_glyph_box() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut session = default_session(SharedSink::default());
    session.set_text_renderer(Some(Box::new(BoxText { seen: seen.clone() })));
    hello_world(&mut session);
    assert!(session.frame());

    let layout = DecorationLayout::for_preview(2560.0, 1440.0);
    let preview = session.preview_image().unwrap();
    let size = layout.title_size;
    let baseline = layout.title_baseline();

    // Inside each of the five title glyph boxes.
    for i in 0..5 {
        let x = layout.padding + i as f64 * BoxText::ADVANCE * size + BoxText::WIDTH * size / 2.0;
        let y = baseline - BoxText::HEIGHT * size / 2.0;
        assert_eq!(*preview.get_pixel(x as u32, y as u32), WHITE, "glyph {i}");
    }

    // Left of the padding, below the baseline, and right of the last glyph
    // stay background.
    let mid_y = (baseline - BoxText::HEIGHT * size / 2.0) as u32;
    assert_ne!(*preview.get_pixel((layout.padding / 2.0) as u32, mid_y), WHITE);
    assert_ne!(
        *preview.get_pixel(layout.padding as u32 + 10, baseline as u32 + 10),
        WHITE
    );
    let past_end = layout.padding + 5.0 * BoxText::ADVANCE * size + 20.0;
    assert_ne!(*preview.get_pixel(past_end as u32, mid_y), WHITE);

    // The subtitle is upper-cased and sits above the title.
    let seen = seen.lock().unwrap();
    assert_eq!(seen.as_slice(), ["Hello", "WORLD"]);
    let sup_y = layout.super_baseline() - BoxText::HEIGHT * layout.super_size / 2.0;
    let sup_x = layout.padding + BoxText::WIDTH * layout.super_size / 2.0;
    assert_eq!(*preview.get_pixel(sup_x as u32, sup_y as u32), WHITE);
    assert!(layout.super_baseline() < baseline - size * BoxText::HEIGHT);
}

#[test]
fn empty_text_draws_nothing() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut session = default_session(SharedSink::default());
    session.set_text_renderer(Some(Box::new(BoxText { seen: seen.clone() })));
    session.frame();
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn export_is_always_target_size() {
    let sink = SharedSink::default();
    let mut session = default_session(sink.clone());
    hello_world(&mut session);
    session
        .handle(InputEvent::Action(FormAction::Download))
        .unwrap();

    assert_eq!(session.preview_image().unwrap().dimensions(), (2560, 1440));

    let files = sink.0.lock().unwrap();
    assert_eq!(files.len(), 1);
    let (name, bytes) = &files[0];
    assert_eq!(name, "image.webp");

    let decoded = image::load_from_memory_with_format(bytes, ImageFormat::WebP).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1280, 720));
}

#[test]
fn export_size_ignores_preview_scale() {
    let geometry = SurfaceGeometry::new(1280, 720, 3.0);
    let sink = SharedSink::default();
    let mut session = Session::new(geometry, Exporter::new(geometry), Box::new(sink.clone()));
    session.export().unwrap();

    assert_eq!(session.preview_image().unwrap().dimensions(), (3840, 2160));
    let files = sink.0.lock().unwrap();
    let decoded = image::load_from_memory_with_format(&files[0].1, ImageFormat::WebP).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1280, 720));
}

/// A session built from the default configuration renders text with the
/// embedded font; nothing has to be installed first.
#[test]
fn default_config_draws_title_with_embedded_font() {
    let render = |title: &str, subtitle: &str| {
        let mut session =
            Session::from_config(&AppConfig::default(), Box::new(SharedSink::default())).unwrap();
        for event in [
            InputEvent::field(Field::TitleText, title),
            InputEvent::field(Field::SuperText, subtitle),
            InputEvent::field(Field::ClearColor, "#112233"),
        ] {
            session.handle(event).unwrap();
        }
        assert!(session.frame());
        session.preview_image().unwrap()
    };
    let blank = render("", "");
    let preview = render("Hello", "world");
    assert_ne!(blank, preview);

    let layout = DecorationLayout::for_preview(2560.0, 1440.0);

    // Cap height of "H" spans roughly 0.7em above the baseline.
    let x0 = layout.padding as u32;
    let x1 = (layout.padding + 5.0 * 0.6 * layout.title_size) as u32;
    let y0 = (layout.title_baseline() - 0.7 * layout.title_size) as u32;
    let y1 = layout.title_baseline() as u32;
    let white = (y0..y1)
        .flat_map(|y| (x0..x1).map(move |x| (x, y)))
        .filter(|&(x, y)| *preview.get_pixel(x, y) == WHITE)
        .count();
    assert!(white > 1000, "only {white} text pixels");
    assert!((y0..y1).all(|y| (x0..x1).all(|x| *blank.get_pixel(x, y) != WHITE)));

    // Nothing is painted left of the padding on the title rows.
    for y in (y0..y1).step_by(8) {
        assert_ne!(*preview.get_pixel(x0 / 2, y), WHITE);
    }
}
