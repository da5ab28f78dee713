//! The session controller.
//!
//! A session owns exactly one parameter store, input mapper, compositor,
//! and exporter. Hosts feed it events and call [`Session::frame`] once per
//! display frame; any number of mutations between frames produce a single
//! paint.

use std::path::Path;

use coverforge_common::config::AppConfig;
use coverforge_common::error::CoverResult;
use coverforge_input_mapper::{HostRequest, InputMapper};
use coverforge_project_model::event::InputEvent;
use coverforge_project_model::geometry::SurfaceGeometry;
use coverforge_project_model::params::RenderParameters;
use coverforge_project_model::store::ParameterStore;
use image::RgbaImage;
use tiny_skia::Pixmap;

use crate::assets::{self, LoadedAssets};
use crate::compositor::Compositor;
use crate::export::{DownloadSink, Exporter};
use crate::paint;
use crate::text::TextRenderer;

pub struct Session {
    store: ParameterStore,
    mapper: InputMapper,
    compositor: Compositor,
    exporter: Exporter,
    sink: Box<dyn DownloadSink>,
    frames_painted: u64,
}

impl Session {
    pub fn new(geometry: SurfaceGeometry, exporter: Exporter, sink: Box<dyn DownloadSink>) -> Self {
        Self {
            store: ParameterStore::new(),
            mapper: InputMapper::new(geometry),
            compositor: Compositor::new(geometry),
            exporter,
            sink,
            frames_painted: 0,
        }
    }

    /// Build a session from configuration. Assets are installed separately
    /// with [`Session::install_assets`].
    pub fn from_config(config: &AppConfig, sink: Box<dyn DownloadSink>) -> CoverResult<Self> {
        config.export.validate()?;
        let geometry = SurfaceGeometry::from_settings(&config.export);
        Ok(Self::new(
            geometry,
            Exporter::from_settings(&config.export),
            sink,
        ))
    }

    pub fn params(&self) -> &RenderParameters {
        self.store.params()
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    pub fn mapper(&self) -> &InputMapper {
        &self.mapper
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// The last painted preview.
    pub fn preview(&self) -> Option<&Pixmap> {
        self.compositor.surface()
    }

    /// Straight-alpha copy of the last painted preview.
    pub fn preview_image(&self) -> Option<RgbaImage> {
        self.preview().map(paint::to_rgba_image)
    }

    pub fn frames_painted(&self) -> u64 {
        self.frames_painted
    }

    /// Apply one input event. Download requests export immediately.
    pub fn handle(&mut self, event: InputEvent) -> CoverResult<()> {
        match self.mapper.dispatch(&mut self.store, event) {
            Some(HostRequest::Export) => self.export(),
            None => Ok(()),
        }
    }

    /// Paint if anything changed since the last frame. Returns whether a
    /// paint happened.
    pub fn frame(&mut self) -> bool {
        if !self.store.take_render_request() {
            return false;
        }
        if let Err(e) = self.compositor.render(self.store.params()) {
            tracing::error!(error = %e, "Paint failed");
            return false;
        }
        self.frames_painted += 1;
        true
    }

    /// Flush any pending paint, then export the preview.
    pub fn export(&mut self) -> CoverResult<()> {
        self.frame();
        let result = self
            .exporter
            .export(self.compositor.surface(), self.sink.as_mut());
        if let Err(e) = &result {
            tracing::error!(error = %e, "Export failed");
        }
        result
    }

    pub fn set_text_renderer(&mut self, renderer: Option<Box<dyn TextRenderer>>) {
        self.compositor.set_text_renderer(renderer);
        self.store.request_render();
    }

    pub fn set_logo(&mut self, logo: Option<&RgbaImage>) {
        self.compositor.set_logo(logo);
        self.store.request_render();
    }

    pub fn install_assets(&mut self, assets: LoadedAssets) {
        if let Some(font) = assets.font {
            self.set_text_renderer(Some(Box::new(font)));
        }
        if let Some(logo) = assets.logo {
            self.set_logo(Some(&logo));
        }
    }

    /// Load a background image and apply it. A failed load clears the
    /// background and still requests a render.
    pub async fn load_background(&mut self, path: Option<&Path>) -> CoverResult<()> {
        let image = match path {
            Some(path) => assets::load_background(path).await,
            None => None,
        };
        self.handle(InputEvent::BackgroundImageChanged(image))
    }
}
