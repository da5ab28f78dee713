//! Asset loading: background images, the logo, and the font.
//!
//! Decoding runs on tokio's blocking pool so a large background never stalls
//! the event loop. Vector logos are rasterized once, at the width they are
//! drawn at.

use std::path::Path;

use coverforge_common::config::AssetConfig;
use coverforge_common::error::{CoverError, CoverResult};
use coverforge_project_model::geometry::SurfaceGeometry;
use coverforge_project_model::params::BackgroundImage;
use image::RgbaImage;
use resvg::usvg;
use tiny_skia::Transform;

use crate::layout::DecorationLayout;
use crate::paint;
use crate::text::GlyphTextRenderer;

/// Decode any supported raster format into RGBA.
pub fn decode_image(bytes: &[u8]) -> CoverResult<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

async fn read_asset(path: &Path) -> CoverResult<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CoverError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => CoverError::Io(e),
    })
}

/// Read and decode an image file.
pub async fn load_image(path: &Path) -> CoverResult<RgbaImage> {
    let bytes = read_asset(path).await?;
    tokio::task::spawn_blocking(move || decode_image(&bytes))
        .await
        .map_err(|e| CoverError::asset(format!("decode task failed: {e}")))?
}

/// Rasterize an SVG document `width` pixels wide, keeping its aspect ratio.
/// Documents that would come out taller than `max_height` are rejected.
pub fn rasterize_svg(bytes: &[u8], width: f64, max_height: f64) -> CoverResult<RgbaImage> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map_err(|e| CoverError::asset(format!("invalid SVG: {e}")))?;
    let size = tree.size();
    let width = width.round();
    let scale = width as f32 / size.width();
    if !(scale.is_finite() && scale > 0.0) {
        return Err(CoverError::asset("SVG has no drawable width"));
    }

    let height = (size.height() * scale).round() as f64;
    if height > max_height {
        return Err(CoverError::asset(format!(
            "SVG would be {height}px tall, more than the {max_height}px preview"
        )));
    }
    let mut pixmap = paint::new_pixmap(width as u32, height as u32)?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    Ok(paint::to_rgba_image(&pixmap))
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

/// Load the brand logo. SVG files are rasterized at `width`, the width the
/// logo occupies on the preview.
pub async fn load_logo(path: &Path, width: f64, max_height: f64) -> CoverResult<RgbaImage> {
    if !is_svg(path) {
        return load_image(path).await;
    }
    let bytes = read_asset(path).await?;
    tokio::task::spawn_blocking(move || rasterize_svg(&bytes, width, max_height))
        .await
        .map_err(|e| CoverError::asset(format!("rasterize task failed: {e}")))?
}

/// Load a background image. Any failure yields `None`, which the store
/// treats as "no background".
pub async fn load_background(path: &Path) -> Option<BackgroundImage> {
    match load_image(path).await {
        Ok(image) => {
            tracing::info!(
                path = %path.display(),
                width = image.width(),
                height = image.height(),
                "Background image loaded"
            );
            Some(BackgroundImage::new(image))
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Background image failed to load");
            None
        }
    }
}

/// Optional assets named in the configuration.
#[derive(Default)]
pub struct LoadedAssets {
    pub font: Option<GlyphTextRenderer>,
    pub logo: Option<RgbaImage>,
}

impl LoadedAssets {
    /// Load whatever the configuration names for a preview of `geometry`.
    /// Missing or broken assets are logged and left out; without a font the
    /// compositor keeps its embedded one.
    pub async fn load(config: &AssetConfig, geometry: SurfaceGeometry) -> Self {
        let font = match &config.font_path {
            Some(path) => {
                let path = path.clone();
                let loaded = tokio::task::spawn_blocking(move || GlyphTextRenderer::from_file(&path))
                    .await
                    .map_err(|e| CoverError::asset(format!("font task failed: {e}")))
                    .and_then(|r| r);
                match loaded {
                    Ok(font) => Some(font),
                    Err(e) => {
                        tracing::warn!(error = %e, "Font unavailable, keeping the built-in font");
                        None
                    }
                }
            }
            None => None,
        };

        let (preview_width, preview_height) = geometry.preview_size();
        let logo_width = DecorationLayout::for_preview(preview_width, preview_height).logo_width;
        let logo = match &config.logo_path {
            Some(path) => match load_logo(path, logo_width, preview_height).await {
                Ok(logo) => Some(logo),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Logo unavailable");
                    None
                }
            },
            None => None,
        };

        Self { font, logo }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([1, 2, 3, 255]));
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let decoded = decode_image(&png_bytes(3, 2)).unwrap();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(*decoded.get_pixel(0, 0), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(CoverError::Image(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_background_is_none() {
        let result = load_background(Path::new("/nonexistent/background.png")).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_load_image_from_disk() {
        let path = std::env::temp_dir().join(format!("coverforge-assets-{}.png", std::process::id()));
        std::fs::write(&path, png_bytes(5, 4)).unwrap();

        let background = load_background(&path).await.unwrap();
        assert_eq!((background.width(), background.height()), (5, 4));
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_empty_asset_config_loads_nothing() {
        let assets = LoadedAssets::load(&AssetConfig::default(), SurfaceGeometry::default()).await;
        assert!(assets.font.is_none());
        assert!(assets.logo.is_none());
    }

    const WIDE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50">
<rect width="100" height="50" fill="#ff0000"/>
</svg>"##;

    #[test]
    fn test_rasterize_svg_at_requested_width() {
        let logo = rasterize_svg(WIDE_SVG.as_bytes(), 200.0, 1000.0).unwrap();
        assert_eq!(logo.dimensions(), (200, 100));
        assert_eq!(*logo.get_pixel(100, 50), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_rasterize_svg_rejects_bad_input() {
        assert!(rasterize_svg(b"<not svg", 200.0, 1000.0).is_err());
        // 200 wide means 100 tall, which exceeds a 50px preview.
        assert!(rasterize_svg(WIDE_SVG.as_bytes(), 200.0, 50.0).is_err());
    }

    #[tokio::test]
    async fn test_svg_logo_loaded_from_config() {
        let path = std::env::temp_dir().join(format!("coverforge-logo-{}.SVG", std::process::id()));
        std::fs::write(&path, WIDE_SVG).unwrap();

        let config = AssetConfig {
            font_path: None,
            logo_path: Some(path.clone()),
        };
        let geometry = SurfaceGeometry::default();
        let assets = LoadedAssets::load(&config, geometry).await;
        let logo = assets.logo.unwrap();

        // Rasterized straight at the drawn width: 0.36 of a 2560px preview.
        assert_eq!(logo.width(), 922);
        assert_eq!(logo.height(), 461);
        std::fs::remove_file(&path).ok();
    }
}
