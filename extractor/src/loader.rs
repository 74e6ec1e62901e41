use crate::buffer::PixelBuffer;
use crate::error::ExtractorError;
use crate::pal::IconProvider;
use crate::source::IconSource;

/// Produces pixel buffers from resolved icon sources.
#[derive(Debug)]
pub struct IconLoader<'a, P: ?Sized> {
    icons: &'a P,
}

impl<'a, P: IconProvider + ?Sized> IconLoader<'a, P> {
    pub fn new(icons: &'a P) -> Self {
        Self { icons }
    }

    pub fn load(&self, source: &IconSource) -> Result<PixelBuffer, ExtractorError> {
        let path = source.path();
        if path.as_os_str().is_empty() {
            return Err(ExtractorError::SourceUnresolved);
        }

        if !path.exists() {
            return Err(ExtractorError::FileNotFound(path.to_path_buf()));
        }

        let icon = match source {
            IconSource::IconContainerFile {
                path,
                requested_size,
            } => {
                let bytes = std::fs::read(path)?;
                self.icons
                    .decode_icon_container(&bytes, *requested_size)
                    .map_err(|source| ExtractorError::IconDecode {
                        path: path.clone(),
                        source,
                    })?
            }
            IconSource::ExecutableAssociation(path) => self
                .icons
                .associated_icon(path)?
                .ok_or_else(|| ExtractorError::NoAssociatedIcon(path.clone()))?,
        };

        let buffer = icon.to_pixel_buffer()?;
        tracing::debug!(
            "Loaded {}x{} icon from {}",
            buffer.width(),
            buffer.height(),
            path.display()
        );

        Ok(buffer)
    }
}
