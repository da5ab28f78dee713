//! Decoration layout.
//!
//! Every size and offset derives from a single relative unit,
//! `(preview_width - 6) / 100`, so decorations scale with the preview.
//! Offsets are measured upward from the bottom edge of the preview.

/// Axis-aligned rectangle in preview pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Positions of the title, subtitle, break line, and logo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorationLayout {
    pub preview_width: f64,
    pub preview_height: f64,

    pub unit: f64,
    /// Left inset of all text, and inset of the logo from the top/right.
    pub padding: f64,

    pub title_size: f64,
    pub title_offset: f64,

    pub super_size: f64,
    pub super_offset: f64,
    pub super_letter_spacing: f64,

    pub breakline_width: f64,
    pub breakline_height: f64,
    pub breakline_offset: f64,

    pub logo_width: f64,
}

impl DecorationLayout {
    /// Layout for a preview of the given size.
    pub fn for_preview(preview_width: f64, preview_height: f64) -> Self {
        let unit = (preview_width - 6.0) / 100.0;
        Self::with_unit(unit, preview_width, preview_height)
    }

    /// Layout for an explicit relative unit.
    pub fn with_unit(unit: f64, preview_width: f64, preview_height: f64) -> Self {
        let padding = 4.0 * unit;

        let title_size = 8.0 * unit;
        let title_offset = 2.0 * unit + padding + 0.2 * title_size;

        let super_size = 3.5 * unit;
        let super_offset = 3.0 * unit + title_size + title_offset + 0.06 * super_size;

        let breakline_width = 8.0 * unit;
        let breakline_height = 0.6 * unit;
        let breakline_offset = 3.0 * unit + super_size + super_offset + 0.2 * breakline_height;

        Self {
            preview_width,
            preview_height,
            unit,
            padding,
            title_size,
            title_offset,
            super_size,
            super_offset,
            super_letter_spacing: 1.4 * unit,
            breakline_width,
            breakline_height,
            breakline_offset,
            logo_width: 0.36 * preview_width,
        }
    }

    /// Baseline of the title text.
    pub fn title_baseline(&self) -> f64 {
        self.preview_height - self.title_offset
    }

    /// Baseline of the subtitle text.
    pub fn super_baseline(&self) -> f64 {
        self.preview_height - self.super_offset
    }

    pub fn breakline_rect(&self) -> RectF {
        RectF {
            x: self.padding,
            y: self.preview_height - self.breakline_offset - self.breakline_height,
            width: self.breakline_width,
            height: self.breakline_height,
        }
    }

    /// Logo rectangle for a bitmap of `width` x `height`, anchored top-right.
    pub fn logo_rect(&self, width: u32, height: u32) -> RectF {
        let logo_height = if width == 0 {
            0.0
        } else {
            height as f64 * (self.logo_width / width as f64)
        };
        RectF {
            x: self.preview_width - self.padding - self.logo_width,
            y: self.padding,
            width: self.logo_width,
            height: logo_height,
        }
    }
}
