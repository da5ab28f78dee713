//! Export: downscale the preview to the target size, encode, deliver.

use std::path::{Path, PathBuf};

use coverforge_common::config::ExportSettings;
use coverforge_common::error::{CoverError, CoverResult};
use coverforge_project_model::geometry::SurfaceGeometry;
use image::RgbaImage;
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::paint;

/// Trait for export destinations.
pub trait DownloadSink: Send {
    /// Hand over the encoded file.
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> CoverResult<()>;

    /// Sink name for logging.
    fn name(&self) -> &str;
}

/// Writes exports into a directory, replacing any previous file.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> CoverResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "Export written");
        Ok(())
    }

    fn name(&self) -> &str {
        "directory"
    }
}

/// Keeps every delivered file in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub files: Vec<(String, Vec<u8>)>,
}

impl DownloadSink for MemorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> CoverResult<()> {
        self.files.push((file_name.to_string(), bytes.to_vec()));
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Encode as lossy WebP. `quality` is in `(0.0, 1.0]`.
pub fn encode_webp(image: &RgbaImage, quality: f32) -> CoverResult<Vec<u8>> {
    let encoder = webp::Encoder::from_rgba(image.as_raw(), image.width(), image.height());
    let memory = encoder
        .encode_simple(false, (quality * 100.0).clamp(0.0, 100.0))
        .map_err(|e| CoverError::export(format!("WebP encoding failed: {e:?}")))?;
    Ok(memory.to_vec())
}

/// Owns the target surface and the encoding settings.
pub struct Exporter {
    target_size: (u32, u32),
    target: Option<Pixmap>,
    quality: f32,
    file_name: String,
}

impl Exporter {
    pub const DEFAULT_QUALITY: f32 = 0.95;
    pub const DEFAULT_FILE_NAME: &'static str = "image.webp";

    pub fn new(geometry: SurfaceGeometry) -> Self {
        Self {
            target_size: (geometry.target_width, geometry.target_height),
            target: None,
            quality: Self::DEFAULT_QUALITY,
            file_name: Self::DEFAULT_FILE_NAME.to_string(),
        }
    }

    pub fn from_settings(settings: &ExportSettings) -> Self {
        Self {
            quality: settings.quality,
            file_name: settings.file_name.clone(),
            ..Self::new(SurfaceGeometry::from_settings(settings))
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn target_size(&self) -> (u32, u32) {
        self.target_size
    }

    /// The target surface as of the last export.
    pub fn target(&self) -> Option<&Pixmap> {
        self.target.as_ref()
    }

    /// Draw the whole preview onto the target surface in one bilinear pass.
    pub fn resample(&mut self, preview: &Pixmap) -> CoverResult<&Pixmap> {
        let (w, h) = self.target_size;
        let target = match self.target.take() {
            Some(target) => target,
            None => paint::new_pixmap(w, h)?,
        };
        let target = self.target.insert(target);

        target.fill(tiny_skia::Color::TRANSPARENT);
        let filter = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        let transform = Transform::from_scale(
            w as f32 / preview.width() as f32,
            h as f32 / preview.height() as f32,
        );
        target.draw_pixmap(0, 0, preview.as_ref(), &filter, transform, None);
        Ok(&*target)
    }

    /// Resample, encode, and deliver. A missing preview is a no-op.
    pub fn export(
        &mut self,
        preview: Option<&Pixmap>,
        sink: &mut dyn DownloadSink,
    ) -> CoverResult<()> {
        let Some(preview) = preview else {
            tracing::debug!("Nothing painted yet, skipping export");
            return Ok(());
        };

        let target = paint::to_rgba_image(self.resample(preview)?);
        let bytes = encode_webp(&target, self.quality)?;
        tracing::debug!(
            width = target.width(),
            height = target.height(),
            bytes = bytes.len(),
            sink = sink.name(),
            "Encoded export"
        );
        sink.deliver(&self.file_name, &bytes)
    }
}
