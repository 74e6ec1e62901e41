//! Extraction of a single representative icon from executables, shortcuts and
//! icon containers.
//!
//! A request flows through [`PathResolver`], [`IconLoader`] and
//! [`ImageResizer`] before [`PngFileWriter`] writes the result. The
//! [`Pipeline`] ties those stages together.

pub mod buffer;
pub mod container;
pub mod error;
pub mod loader;
pub mod output;
pub mod pal;
pub mod pipeline;
pub mod resize;
pub mod source;

pub use buffer::PixelBuffer;
pub use error::ExtractorError;
pub use loader::IconLoader;
pub use output::{OutputError, OutputWriter, PngFileWriter};
pub use pal::{IconProvider, LinkResolver, PlatformAbstraction, PlatformAbstractionError, RawIcon};
pub use pipeline::{output_path, Pipeline};
pub use resize::{ImageResizer, ResizeSpec};
pub use source::{IconSource, IconSourceRequest, PathResolver};
