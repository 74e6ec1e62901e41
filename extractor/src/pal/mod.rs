use crate::buffer::PixelBuffer;
use crate::container::{self, ContainerError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(windows)]
#[path = "windows/mod.rs"]
mod platform;

#[cfg(not(windows))]
#[path = "generic/mod.rs"]
mod platform;

pub use platform::NativeIcon;

/// Resolves shell shortcuts to the file they point at.
#[cfg_attr(test, mockall::automock)]
pub trait LinkResolver {
    /// Resolves the shortcut at `link`.
    ///
    /// Returns `Ok(None)` if the shortcut is broken or has no target.
    fn resolve_link(&self, link: &Path) -> Result<Option<PathBuf>, PlatformAbstractionError>;
}

/// Source of raw icons, either from the system or from icon containers.
#[cfg_attr(test, mockall::automock)]
pub trait IconProvider {
    /// Retrieves the icon the system associates with `file`.
    ///
    /// Returns `Ok(None)` if the system has no icon for the file.
    fn associated_icon(&self, file: &Path) -> Result<Option<RawIcon>, PlatformAbstractionError>;

    /// Decodes the entry of an icon container closest to `requested_size`.
    fn decode_icon_container(
        &self,
        bytes: &[u8],
        requested_size: u32,
    ) -> Result<RawIcon, ContainerError> {
        container::decode_best_entry(bytes, requested_size).map(RawIcon::Container)
    }
}

/// An icon as handed out by an [`IconProvider`], not yet converted to pixels.
pub enum RawIcon {
    /// An image decoded from an icon container
    Container(ico::IconImage),

    /// A handle owned by the operating system
    Native(NativeIcon),
}

impl RawIcon {
    /// Renders the icon into an owned pixel buffer.
    pub fn to_pixel_buffer(&self) -> Result<PixelBuffer, PlatformAbstractionError> {
        match self {
            Self::Container(image) => {
                PixelBuffer::from_rgba(image.width(), image.height(), image.rgba_data().to_vec())
                    .ok_or(PlatformAbstractionError::InvalidPixelData {
                        width: image.width(),
                        height: image.height(),
                    })
            }
            Self::Native(icon) => icon.to_pixel_buffer(),
        }
    }
}

impl std::fmt::Debug for RawIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Container(image) => f
                .debug_struct("Container")
                .field("width", &image.width())
                .field("height", &image.height())
                .finish(),
            Self::Native(icon) => f.debug_tuple("Native").field(icon).finish(),
        }
    }
}

#[derive(Debug)]
pub struct PlatformAbstraction {
    platform: platform::PlatformAbstractionImpl,
}

impl PlatformAbstraction {
    /// Creates a new platform abstraction layer.
    pub fn new() -> Result<Self, PlatformAbstractionError> {
        let platform = platform::PlatformAbstractionImpl::new()?;
        Ok(Self { platform })
    }
}

impl LinkResolver for PlatformAbstraction {
    fn resolve_link(&self, link: &Path) -> Result<Option<PathBuf>, PlatformAbstractionError> {
        self.platform.resolve_link(link)
    }
}

impl IconProvider for PlatformAbstraction {
    fn associated_icon(&self, file: &Path) -> Result<Option<RawIcon>, PlatformAbstractionError> {
        Ok(self.platform.associated_icon(file)?.map(RawIcon::Native))
    }
}

#[derive(Debug, Error)]
pub enum PlatformAbstractionError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Platform(#[from] platform::PlatformError),

    #[error("icon pixel data does not match its {width}x{height} dimensions")]
    InvalidPixelData { width: u32, height: u32 },

    #[error("operation not supported")]
    Unsupported,
}
