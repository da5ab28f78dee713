//! Check configured assets and the output directory.

use std::path::Path;

use coverforge_common::config::AppConfig;
use coverforge_project_model::geometry::SurfaceGeometry;
use coverforge_render_engine::assets::load_logo;
use coverforge_render_engine::{DecorationLayout, GlyphTextRenderer};

fn config_status(config_path: &Path) -> String {
    if config_path.exists() {
        format!("[OK] Config: {}", config_path.display())
    } else {
        format!("[--] Config: {} (not found, using defaults)", config_path.display())
    }
}

/// `config_path` is the file the configuration was read from.
pub async fn run(config: AppConfig, config_path: &Path) -> anyhow::Result<()> {
    println!("Coverforge Check");
    println!("{}", "=".repeat(50));

    println!("{}", config_status(config_path));

    let mut ready = true;

    match config.export.validate() {
        Ok(()) => println!(
            "[OK] Export: {}x{} at quality {:.2} ({}x preview)",
            config.export.target_width,
            config.export.target_height,
            config.export.quality,
            config.export.preview_scale
        ),
        Err(e) => {
            println!("[FAIL] Export settings: {e}");
            ready = false;
        }
    }

    match &config.assets.font_path {
        Some(path) => match GlyphTextRenderer::from_file(path) {
            Ok(_) => println!("[OK] Font: {}", path.display()),
            Err(e) => println!("[WARN] Font: {e} (using the built-in font)"),
        },
        None => println!("[OK] Font: built-in"),
    }

    let geometry = SurfaceGeometry::from_settings(&config.export);
    let (preview_width, preview_height) = geometry.preview_size();
    let logo_width = DecorationLayout::for_preview(preview_width, preview_height).logo_width;
    match &config.assets.logo_path {
        Some(path) => match load_logo(path, logo_width, preview_height).await {
            Ok(logo) => println!(
                "[OK] Logo: {} ({}x{})",
                path.display(),
                logo.width(),
                logo.height()
            ),
            Err(e) => println!("[WARN] Logo: {e} (logo layer disabled)"),
        },
        None => println!("[--] Logo: not configured"),
    }

    let output_dir = &config.export.output_dir;
    match std::fs::metadata(output_dir) {
        Ok(meta) if meta.is_dir() && !meta.permissions().readonly() => {
            println!("[OK] Output directory: {}", output_dir.display())
        }
        Ok(meta) if meta.is_dir() => {
            println!("[FAIL] Output directory is read-only: {}", output_dir.display());
            ready = false;
        }
        Ok(_) => {
            println!("[FAIL] Output path is not a directory: {}", output_dir.display());
            ready = false;
        }
        Err(_) => println!(
            "[--] Output directory: {} (created on first export)",
            output_dir.display()
        ),
    }

    println!();
    if ready {
        println!("Coverforge is ready.");
    } else {
        println!("Some checks failed. See above for fixes.");
    }

    Ok(())
}
