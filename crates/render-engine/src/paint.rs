//! Painting helpers over `tiny_skia` pixmaps.
//!
//! Pixmaps hold premultiplied RGBA and everything composites source-over.
//! Decoded assets arrive as straight-alpha `image` buffers; the conversions
//! in both directions live here.

use coverforge_common::error::{CoverError, CoverResult};
use coverforge_project_model::color::Color;
use coverforge_project_model::params::Offset;
use image::{GrayImage, Rgba, RgbaImage};
use tiny_skia::{
    FilterQuality, IntSize, LinearGradient, Paint, Pixmap, PixmapPaint, Point,
    PremultipliedColorU8, Rect, SpreadMode, Transform,
};

/// A color stop on a linear gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub position: f32,
    pub color: Color,
}

impl GradientStop {
    pub const fn new(position: f32, color: Color) -> Self {
        Self { position, color }
    }
}

pub fn skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, alpha_u8(color.a))
}

#[inline]
fn alpha_u8(a: f32) -> u8 {
    (a.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[inline]
fn premultiply(c: u8, a: u8) -> u8 {
    ((c as u16 * a as u16 + 127) / 255) as u8
}

#[inline]
fn demultiply(p: PremultipliedColorU8) -> Rgba<u8> {
    let c = p.demultiply();
    Rgba([c.red(), c.green(), c.blue(), c.alpha()])
}

/// Allocate a transparent surface.
pub fn new_pixmap(width: u32, height: u32) -> CoverResult<Pixmap> {
    Pixmap::new(width, height)
        .ok_or_else(|| CoverError::render(format!("cannot allocate a {width}x{height} surface")))
}

/// Copy a straight-alpha image into a premultiplied pixmap. `None` for
/// empty images.
pub fn pixmap_from_rgba(image: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height())?;
    let data = image
        .pixels()
        .flat_map(|p| {
            let [r, g, b, a] = p.0;
            [premultiply(r, a), premultiply(g, a), premultiply(b, a), a]
        })
        .collect();
    Pixmap::from_vec(data, size)
}

/// Tint a coverage mask with `color`, scaling the color's alpha by coverage.
pub fn coverage_pixmap(mask: &GrayImage, color: Color) -> Option<Pixmap> {
    let size = IntSize::from_wh(mask.width(), mask.height())?;
    let alpha = alpha_u8(color.a);
    let data = mask
        .pixels()
        .flat_map(|coverage| {
            let a = premultiply(alpha, coverage.0[0]);
            [
                premultiply(color.r, a),
                premultiply(color.g, a),
                premultiply(color.b, a),
                a,
            ]
        })
        .collect();
    Pixmap::from_vec(data, size)
}

/// Straight-alpha copy of a pixmap.
pub fn to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut out = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        *dst = demultiply(*src);
    }
    out
}

/// Straight-alpha pixel, or `None` outside the pixmap.
pub fn pixel_at(pixmap: &Pixmap, x: u32, y: u32) -> Option<Rgba<u8>> {
    pixmap.pixel(x, y).map(demultiply)
}

/// Fill an axis-aligned rectangle with anti-aliased edges.
pub fn fill_rect(surface: &mut Pixmap, x: f64, y: f64, width: f64, height: f64, color: Color) {
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    let Some(rect) = Rect::from_xywh(x as f32, y as f32, width as f32, height as f32) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(skia_color(color));
    paint.anti_alias = true;
    surface.fill_rect(rect, &paint, Transform::identity(), None);
}

/// Cover the whole surface with a linear gradient running from `start` to
/// `end`, padded beyond the end stops.
pub fn linear_gradient(
    surface: &mut Pixmap,
    start: (f64, f64),
    end: (f64, f64),
    stops: &[GradientStop],
) {
    let stops = stops
        .iter()
        .map(|s| tiny_skia::GradientStop::new(s.position, skia_color(s.color)))
        .collect();
    let Some(shader) = LinearGradient::new(
        Point::from_xy(start.0 as f32, start.1 as f32),
        Point::from_xy(end.0 as f32, end.1 as f32),
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    ) else {
        return;
    };
    let Some(rect) = Rect::from_xywh(0.0, 0.0, surface.width() as f32, surface.height() as f32)
    else {
        return;
    };

    let mut paint = Paint::default();
    paint.shader = shader;
    surface.fill_rect(rect, &paint, Transform::identity(), None);
}

/// Draw `image` under a uniform scale, positioned at `offset` in the
/// scaled coordinate space: texel `u` lands on surface `(u + offset) * scale`.
pub fn draw_scaled_image(surface: &mut Pixmap, image: &Pixmap, scale: f64, offset: Offset) {
    let s = scale as f32;
    if !(s.is_finite() && s > 0.0) {
        return;
    }
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    let transform = Transform::from_scale(s, s).pre_translate(offset.x as f32, offset.y as f32);
    surface.draw_pixmap(0, 0, image.as_ref(), &paint, transform, None);
}

/// Composite an unscaled pixmap with its top-left corner at `(x, y)`.
pub fn draw_pixmap_at(surface: &mut Pixmap, image: &Pixmap, x: i32, y: i32) {
    surface.draw_pixmap(
        x,
        y,
        image.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}
