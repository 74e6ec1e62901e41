use crate::buffer::PixelBuffer;
use crate::error::ExtractorError;
use crate::loader::IconLoader;
use crate::output::OutputWriter;
use crate::pal::{IconProvider, LinkResolver};
use crate::resize::ImageResizer;
use crate::source::{IconSourceRequest, PathResolver};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Name used when the input path has no file stem to derive one from.
const FALLBACK_OUTPUT_NAME: &str = "icon";

/// Computes `{output_dir}/{name}.png`, where `name` defaults to the stem of `input`.
pub fn output_path(output_dir: &Path, input: &Path, name: Option<&str>) -> PathBuf {
    let name = match name.filter(|n| !n.is_empty()) {
        Some(name) => Cow::Borrowed(name),
        None => input
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .unwrap_or(Cow::Borrowed(FALLBACK_OUTPUT_NAME)),
    };

    output_dir.join(format!("{name}.png"))
}

/// Runs resolution, loading, normalization and output for a single request.
#[derive(Debug)]
pub struct Pipeline<'a, L: ?Sized, P: ?Sized, W: ?Sized> {
    links: &'a L,
    icons: &'a P,
    writer: &'a W,
}

impl<'a, L, P, W> Pipeline<'a, L, P, W>
where
    L: LinkResolver + ?Sized,
    P: IconProvider + ?Sized,
    W: OutputWriter + ?Sized,
{
    pub fn new(links: &'a L, icons: &'a P, writer: &'a W) -> Self {
        Self {
            links,
            icons,
            writer,
        }
    }

    /// Produces the final image without writing it anywhere.
    pub fn render(&self, request: &IconSourceRequest) -> Result<PixelBuffer, ExtractorError> {
        let source = PathResolver::new(self.links).resolve(request)?;
        tracing::debug!("Path resolved: {:?}", source);

        let buffer = IconLoader::new(self.icons).load(&source)?;
        tracing::debug!("Source loaded");

        let buffer = ImageResizer.normalize(buffer, request.resize);
        match request.resize {
            Some(_) => tracing::debug!("Resized to {}x{}", buffer.width(), buffer.height()),
            None => tracing::debug!("Normalized transparency"),
        }

        Ok(buffer)
    }

    /// Renders the image and writes it to `output`.
    ///
    /// Nothing is written unless every earlier stage succeeded.
    pub fn run(&self, request: &IconSourceRequest, output: &Path) -> Result<(), ExtractorError> {
        let buffer = self.render(request)?;

        self.writer
            .write_png(&buffer, output)
            .map_err(|source| ExtractorError::Output {
                path: output.to_path_buf(),
                source,
            })?;

        tracing::info!("Emitted {}", output.display());
        Ok(())
    }
}
