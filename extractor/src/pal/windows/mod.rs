mod com;
mod icon;
mod link;
mod util;

use crate::pal::PlatformAbstractionError;
use std::path::{Path, PathBuf};
use thiserror::Error;
use windows::core::Error as Win32Error;

pub use icon::NativeIcon;

#[derive(Debug)]
pub struct PlatformAbstractionImpl;

impl PlatformAbstractionImpl {
    pub fn new() -> Result<Self, PlatformAbstractionError> {
        Ok(Self)
    }

    pub fn resolve_link(&self, link: &Path) -> Result<Option<PathBuf>, PlatformAbstractionError> {
        link::resolve_on_worker(link)
    }

    pub fn associated_icon(
        &self,
        file: &Path,
    ) -> Result<Option<NativeIcon>, PlatformAbstractionError> {
        Ok(NativeIcon::associated_with(file))
    }
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error(transparent)]
    Win32(#[from] Win32Error),

    #[error("the shortcut resolver thread panicked")]
    LinkWorkerPanicked,
}
