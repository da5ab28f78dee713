//! Text rasterization.
//!
//! The compositor only knows the [`TextRenderer`] trait. The bundled
//! implementation rasterizes TrueType/OpenType outlines with `ab_glyph`;
//! without a configured font it uses the embedded DejaVu Sans Mono Bold.

use std::path::Path;

use ab_glyph::{point, Font, FontVec, GlyphId, OutlinedGlyph, PxScale, ScaleFont};
use coverforge_common::error::{CoverError, CoverResult};
use coverforge_project_model::color::Color;
use image::GrayImage;
use tiny_skia::Pixmap;

use crate::paint::{coverage_pixmap, draw_pixmap_at};

const DEFAULT_FONT_BYTES: &[u8] = include_bytes!("../fonts/DejaVuSansMono-Bold.ttf");
const DEFAULT_FONT_NAME: &str = "DejaVu Sans Mono Bold";

/// A single line of text to draw, left-aligned on an alphabetic baseline.
#[derive(Debug, Clone, Copy)]
pub struct TextRun<'a> {
    pub text: &'a str,
    /// Left edge of the first glyph's advance box.
    pub x: f64,
    pub baseline: f64,
    /// Font size in pixels per em.
    pub size: f64,
    /// Extra space added after every character.
    pub letter_spacing: f64,
    pub color: Color,
}

/// Trait for text backends.
pub trait TextRenderer: Send {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Composite the run onto the surface.
    fn draw(&self, surface: &mut Pixmap, run: &TextRun<'_>);
}

/// Outline-font renderer backed by `ab_glyph`.
pub struct GlyphTextRenderer {
    font: FontVec,
    name: String,
}

impl GlyphTextRenderer {
    pub fn from_bytes(bytes: Vec<u8>, name: impl Into<String>) -> CoverResult<Self> {
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| CoverError::asset(format!("invalid font data: {e}")))?;
        Ok(Self {
            font,
            name: name.into(),
        })
    }

    pub fn from_file(path: &Path) -> CoverResult<Self> {
        if !path.exists() {
            return Err(CoverError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = std::fs::read(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "font".to_string());
        Self::from_bytes(bytes, name)
    }

    /// The embedded bold monospace font.
    pub fn default_font() -> CoverResult<Self> {
        Self::from_bytes(DEFAULT_FONT_BYTES.to_vec(), DEFAULT_FONT_NAME)
    }

    /// `ab_glyph` scales by ascent-to-descent height; convert from an
    /// em size so sizes match CSS pixel font sizes.
    fn px_scale(&self, size: f64) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        PxScale::from(size as f32 * self.font.height_unscaled() / units_per_em)
    }

    /// Outline every glyph of the run at its caret position, applying
    /// kerning and letter spacing.
    fn outline(&self, run: &TextRun<'_>) -> Vec<OutlinedGlyph> {
        let scale = self.px_scale(run.size);
        let scaled = self.font.as_scaled(scale);
        let spacing = run.letter_spacing as f32;
        let baseline = run.baseline as f32;

        let mut glyphs = Vec::new();
        let mut caret = run.x as f32;
        let mut previous: Option<GlyphId> = None;
        for ch in run.text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                glyphs.push(outlined);
            }
            caret += scaled.h_advance(id) + spacing;
            previous = Some(id);
        }
        glyphs
    }
}

impl TextRenderer for GlyphTextRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    fn draw(&self, surface: &mut Pixmap, run: &TextRun<'_>) {
        if run.text.is_empty() || run.size <= 0.0 {
            return;
        }
        let glyphs = self.outline(run);
        let Some(first) = glyphs.first() else {
            return;
        };

        // Rasterize the whole run into one coverage mask.
        let mut bounds = first.px_bounds();
        for glyph in &glyphs[1..] {
            let b = glyph.px_bounds();
            bounds.min.x = bounds.min.x.min(b.min.x);
            bounds.min.y = bounds.min.y.min(b.min.y);
            bounds.max.x = bounds.max.x.max(b.max.x);
            bounds.max.y = bounds.max.y.max(b.max.y);
        }
        let (left, top) = (bounds.min.x.floor() as i32, bounds.min.y.floor() as i32);
        let width = (bounds.max.x.ceil() as i32 - left).max(0) as u32;
        let height = (bounds.max.y.ceil() as i32 - top).max(0) as u32;

        let mut mask = GrayImage::new(width, height);
        for glyph in &glyphs {
            let b = glyph.px_bounds();
            let (gx0, gy0) = (b.min.x as i32 - left, b.min.y as i32 - top);
            glyph.draw(|gx, gy, coverage| {
                let (x, y) = (gx0 + gx as i32, gy0 + gy as i32);
                if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
                    return;
                }
                let pixel = mask.get_pixel_mut(x as u32, y as u32);
                let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                pixel.0[0] = pixel.0[0].saturating_add(value);
            });
        }

        if let Some(layer) = coverage_pixmap(&mask, run.color) {
            draw_pixmap_at(surface, &layer, left, top);
        }
    }
}
