use crate::buffer::PixelBuffer;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Persists final images.
pub trait OutputWriter {
    fn write_png(&self, buffer: &PixelBuffer, path: &Path) -> Result<(), OutputError>;
}

/// Writes PNG files, replacing the destination only once the image is complete.
#[derive(Debug, Default, Copy, Clone)]
pub struct PngFileWriter;

impl PngFileWriter {
    /// Encodes the buffer as an 8-bit RGBA PNG.
    pub fn encode(buffer: &PixelBuffer) -> Result<Vec<u8>, OutputError> {
        let mut encoded = Vec::new();

        let mut encoder = png::Encoder::new(&mut encoded, buffer.width(), buffer.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(buffer.as_rgba())?;
        writer.finish()?;

        Ok(encoded)
    }
}

impl OutputWriter for PngFileWriter {
    fn write_png(&self, buffer: &PixelBuffer, path: &Path) -> Result<(), OutputError> {
        let encoded = Self::encode(buffer)?;

        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        // Stage next to the destination so the final rename stays on one filesystem
        let mut staged = tempfile::NamedTempFile::new_in(dir)?;
        staged.write_all(&encoded)?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|err| err.error)?;

        tracing::debug!("Wrote {} bytes to {}", encoded.len(), path.display());
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("an I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("an error occurred while encoding the PNG: {0}")]
    PngEncoding(#[from] png::EncodingError),
}
