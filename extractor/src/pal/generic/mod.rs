use crate::buffer::PixelBuffer;
use crate::pal::PlatformAbstractionError;
use std::path::{Path, PathBuf};

// Nothing native runs here, so nothing native can fail
pub type PlatformError = std::convert::Infallible;

/// Native icons cannot be obtained on this platform.
#[derive(Debug)]
pub enum NativeIcon {}

impl NativeIcon {
    pub fn to_pixel_buffer(&self) -> Result<PixelBuffer, PlatformAbstractionError> {
        match *self {}
    }
}

#[derive(Debug)]
pub struct PlatformAbstractionImpl;

impl PlatformAbstractionImpl {
    pub fn new() -> Result<Self, PlatformAbstractionError> {
        tracing::debug!("No native shell integration available on this platform");
        Ok(Self)
    }

    pub fn resolve_link(&self, link: &Path) -> Result<Option<PathBuf>, PlatformAbstractionError> {
        tracing::warn!("Cannot resolve shortcut {}, not supported", link.display());
        Err(PlatformAbstractionError::Unsupported)
    }

    pub fn associated_icon(
        &self,
        file: &Path,
    ) -> Result<Option<NativeIcon>, PlatformAbstractionError> {
        tracing::warn!("Cannot query associated icon of {}, not supported", file.display());
        Err(PlatformAbstractionError::Unsupported)
    }
}
