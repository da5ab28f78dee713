//! Preview compositor: paints the full cover from render parameters.
//!
//! Each pass repaints the whole preview from scratch, in order:
//! fill, background image, overlay gradient, title, subtitle, break line,
//! logo with drop shadow. Nothing is diffed; the output is a pure function
//! of the parameters and the loaded assets.

use coverforge_common::error::CoverResult;
use coverforge_project_model::color::Color;
use coverforge_project_model::geometry::SurfaceGeometry;
use coverforge_project_model::params::{BackgroundImage, RenderParameters};
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbaImage};
use tiny_skia::Pixmap;

use crate::layout::DecorationLayout;
use crate::paint::{self, GradientStop};
use crate::text::{GlyphTextRenderer, TextRenderer, TextRun};

/// Overlay running from the top-right corner to the bottom-left corner.
pub const OVERLAY_STOPS: [GradientStop; 2] = [
    GradientStop::new(0.0, Color::rgba(32, 79, 159, 0.1)),
    GradientStop::new(0.85, Color::rgba(14, 13, 30, 0.4)),
];

pub const TEXT_COLOR: Color = Color::WHITE;
pub const BREAKLINE_COLOR: Color = Color::WHITE;

pub const LOGO_SHADOW_BLUR: f64 = 140.0;
pub const LOGO_SHADOW_COLOR: Color = Color::rgba(0, 0, 0, 0.4);

/// Blur kernels this wide are computed on a downsampled mask.
const SHADOW_DOWNSAMPLE: u32 = 4;

/// Logo resized to its on-preview size, with its tinted shadow.
struct LogoLayer {
    source_size: (u32, u32),
    image: Pixmap,
    shadow: Pixmap,
    /// Margin of the shadow around the logo on every side.
    shadow_margin: u32,
}

impl LogoLayer {
    fn build(logo: &RgbaImage, width: f64, height: f64) -> Option<Self> {
        let (w, h) = (width.round() as u32, height.round() as u32);
        if w == 0 || h == 0 {
            return None;
        }
        let resized = if logo.dimensions() == (w, h) {
            logo.clone()
        } else {
            imageops::resize(logo, w, h, FilterType::CatmullRom)
        };
        let (mask, shadow_margin) = shadow_mask(&resized, LOGO_SHADOW_BLUR);
        Some(Self {
            source_size: logo.dimensions(),
            image: paint::pixmap_from_rgba(&resized)?,
            shadow: paint::coverage_pixmap(&mask, LOGO_SHADOW_COLOR)?,
            shadow_margin,
        })
    }
}

/// Gaussian-blurred alpha of `image`, padded by three standard deviations.
///
/// A canvas shadow blur `b` corresponds to a Gaussian with `sigma = b / 2`.
fn shadow_mask(image: &RgbaImage, blur: f64) -> (GrayImage, u32) {
    let sigma = (blur / 2.0) as f32;
    let margin = (3.0 * sigma).ceil() as u32;
    let (w, h) = (image.width() + 2 * margin, image.height() + 2 * margin);

    let mut alpha = GrayImage::new(w, h);
    for (x, y, pixel) in image.enumerate_pixels() {
        alpha.put_pixel(x + margin, y + margin, Luma([pixel.0[3]]));
    }
    if sigma <= 0.0 {
        return (alpha, margin);
    }

    let factor = if sigma >= 8.0 { SHADOW_DOWNSAMPLE } else { 1 };
    let (sw, sh) = ((w / factor).max(1), (h / factor).max(1));
    let small = imageops::resize(&alpha, sw, sh, FilterType::Triangle);
    let blurred = imageproc::filter::gaussian_blur_f32(&small, sigma / factor as f32);
    (imageops::resize(&blurred, w, h, FilterType::Triangle), margin)
}

/// Background converted for drawing, kept while the same image is shown.
struct BackgroundLayer {
    source: BackgroundImage,
    pixmap: Pixmap,
}

/// Owns the preview surface and the assets drawn onto it.
pub struct Compositor {
    geometry: SurfaceGeometry,
    surface: Option<Pixmap>,
    text: Option<Box<dyn TextRenderer>>,
    logo: Option<LogoLayer>,
    background: Option<BackgroundLayer>,
}

impl Compositor {
    /// Create a compositor that draws text with the embedded font.
    pub fn new(geometry: SurfaceGeometry) -> Self {
        let text: Option<Box<dyn TextRenderer>> = match GlyphTextRenderer::default_font() {
            Ok(font) => Some(Box::new(font)),
            Err(e) => {
                tracing::warn!(error = %e, "Embedded font unavailable, text layers disabled");
                None
            }
        };
        Self {
            geometry,
            surface: None,
            text,
            logo: None,
            background: None,
        }
    }

    pub fn geometry(&self) -> SurfaceGeometry {
        self.geometry
    }

    /// The last painted preview, or `None` before the first paint.
    pub fn surface(&self) -> Option<&Pixmap> {
        self.surface.as_ref()
    }

    pub fn layout(&self) -> DecorationLayout {
        let (w, h) = self.geometry.preview_size();
        DecorationLayout::for_preview(w, h)
    }

    /// Replace the text backend. `None` disables the text layers.
    pub fn set_text_renderer(&mut self, renderer: Option<Box<dyn TextRenderer>>) {
        if let Some(r) = &renderer {
            tracing::debug!(renderer = r.name(), "Text renderer installed");
        }
        self.text = renderer;
    }

    pub fn has_text_renderer(&self) -> bool {
        self.text.is_some()
    }

    /// Install the brand logo. The resized bitmap and its shadow are
    /// prepared once here rather than on every paint. Logos whose scaled
    /// height exceeds the preview are rejected.
    pub fn set_logo(&mut self, logo: Option<&RgbaImage>) {
        let preview_height = self.geometry.preview_height() as f64;
        self.logo = logo.and_then(|logo| {
            let rect = self.layout().logo_rect(logo.width(), logo.height());
            if rect.height > preview_height {
                tracing::warn!(
                    width = logo.width(),
                    height = logo.height(),
                    scaled_height = rect.height,
                    "Ignoring logo taller than the preview"
                );
                return None;
            }
            let layer = LogoLayer::build(logo, rect.width, rect.height);
            if layer.is_none() {
                tracing::warn!(
                    width = logo.width(),
                    height = logo.height(),
                    "Ignoring empty logo"
                );
            }
            layer
        });
    }

    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }

    fn refresh_background(&mut self, image: Option<&BackgroundImage>) {
        let Some(image) = image else {
            self.background = None;
            return;
        };
        if self.background.as_ref().is_some_and(|bg| bg.source == *image) {
            return;
        }
        self.background = paint::pixmap_from_rgba(image.pixels()).map(|pixmap| BackgroundLayer {
            source: image.clone(),
            pixmap,
        });
    }

    /// Repaint the preview.
    pub fn render(&mut self, params: &RenderParameters) -> CoverResult<&Pixmap> {
        let (width, height) = (self.geometry.preview_width(), self.geometry.preview_height());
        let layout = self.layout();
        self.refresh_background(params.background_image.as_ref());

        let surface = match self.surface.take() {
            Some(surface) => surface,
            None => paint::new_pixmap(width, height)?,
        };
        let surface = self.surface.insert(surface);

        surface.fill(tiny_skia::Color::TRANSPARENT);
        paint::fill_rect(
            surface,
            0.0,
            0.0,
            width as f64,
            height as f64,
            params.clear_color,
        );

        if let Some(background) = &self.background {
            paint::draw_scaled_image(
                surface,
                &background.pixmap,
                params.image_scale,
                params.image_offset,
            );
        }

        paint::linear_gradient(
            surface,
            (width as f64, 0.0),
            (0.0, height as f64),
            &OVERLAY_STOPS,
        );

        match &self.text {
            Some(text) => draw_text_layers(surface, text.as_ref(), &layout, params),
            None if !params.title_text.is_empty() || !params.super_text.is_empty() => {
                tracing::debug!("No text renderer loaded, skipping text layers");
            }
            None => {}
        }

        let bar = layout.breakline_rect();
        paint::fill_rect(surface, bar.x, bar.y, bar.width, bar.height, BREAKLINE_COLOR);

        if let Some(logo) = &self.logo {
            let rect = layout.logo_rect(logo.source_size.0, logo.source_size.1);
            let (x, y) = (rect.x.round() as i32, rect.y.round() as i32);
            let margin = logo.shadow_margin as i32;
            paint::draw_pixmap_at(surface, &logo.shadow, x - margin, y - margin);
            paint::draw_pixmap_at(surface, &logo.image, x, y);
        }

        tracing::trace!(
            title = %params.title_text,
            scale = params.image_scale,
            "Preview painted"
        );
        Ok(&*surface)
    }
}

fn draw_text_layers(
    surface: &mut Pixmap,
    text: &dyn TextRenderer,
    layout: &DecorationLayout,
    params: &RenderParameters,
) {
    if !params.title_text.is_empty() {
        text.draw(
            surface,
            &TextRun {
                text: &params.title_text,
                x: layout.padding,
                baseline: layout.title_baseline(),
                size: layout.title_size,
                letter_spacing: 0.0,
                color: TEXT_COLOR,
            },
        );
    }

    if !params.super_text.is_empty() {
        let upper = params.super_text.to_uppercase();
        text.draw(
            surface,
            &TextRun {
                text: &upper,
                x: layout.padding,
                baseline: layout.super_baseline(),
                size: layout.super_size,
                letter_spacing: layout.super_letter_spacing,
                color: TEXT_COLOR,
            },
        );
    }
}
