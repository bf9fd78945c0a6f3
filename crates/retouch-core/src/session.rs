use std::path::Path;

use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::error::{EditError, Result};
use crate::histogram::Histogram;
use crate::io;
use crate::ops::{ChannelOrder, Crop, Invert, Resize, Rotate, SwapChannels, Transform};
use crate::raster::Raster;
use crate::view;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Loaded,
}

/// Holds at most one image and edits it in place.
///
/// Every operation either succeeds and replaces the image, or fails and
/// leaves the session exactly as it was. Only `load` works on an empty
/// session.
#[derive(Debug, Default)]
pub struct Session {
    image: Option<Raster>,
    source_name: Option<String>,
    config: SessionConfig,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        match self.image {
            Some(_) => SessionState::Loaded,
            None => SessionState::Empty,
        }
    }

    pub fn image(&self) -> Option<&Raster> {
        self.image.as_ref()
    }

    /// File name of the most recently loaded image.
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// Replace the current image with the one at `path`.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let raster = io::load_raster(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        info!(
            name = %name,
            width = raster.width(),
            height = raster.height(),
            layout = ?raster.layout(),
            "image loaded"
        );
        self.image = Some(raster);
        self.source_name = Some(name);
        Ok(())
    }

    pub fn save(&self, destination: impl AsRef<Path>) -> Result<()> {
        let raster = self.current()?;
        io::save_raster(raster, destination.as_ref(), &self.config)
    }

    pub fn invert_colors(&mut self) -> Result<()> {
        self.apply(&Invert)
    }

    pub fn crop(&mut self, left: u32, top: u32, right: u32, bottom: u32) -> Result<()> {
        self.apply(&Crop {
            left,
            top,
            right,
            bottom,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.apply(&Resize {
            width,
            height,
            filter: self.config.resample,
        })
    }

    pub fn rotate(&mut self, degrees: f64) -> Result<()> {
        self.apply(&Rotate { degrees })
    }

    pub fn swap_channels(&mut self, order: ChannelOrder) -> Result<()> {
        self.apply(&SwapChannels { order })
    }

    pub fn histogram(&self) -> Result<Histogram> {
        Ok(Histogram::from_raster(self.current()?))
    }

    /// The current image as a viewer should draw it.
    pub fn display_view(&self) -> Result<Raster> {
        Ok(view::display_view(self.current()?))
    }

    /// Run `transform` against the current image, swapping in its output
    /// only when it succeeds.
    pub fn apply(&mut self, transform: &dyn Transform) -> Result<()> {
        let current = self.current()?;
        let next = transform.apply(current)?;
        debug!(
            transform = transform.name(),
            width = next.width(),
            height = next.height(),
            "applied"
        );
        self.image = Some(next);
        Ok(())
    }

    fn current(&self) -> Result<&Raster> {
        self.image.as_ref().ok_or(EditError::NoImageLoaded)
    }
}
