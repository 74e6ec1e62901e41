use crate::container::ContainerError;
use crate::output::OutputError;
use crate::pal::PlatformAbstractionError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("file {} does not exist", .0.display())]
    FileNotFound(PathBuf),

    #[error("shortcut could not be resolved to a target")]
    SourceUnresolved,

    #[error("failed to decode icon container {}: {source}", path.display())]
    IconDecode {
        path: PathBuf,
        #[source]
        source: ContainerError,
    },

    #[error("the system has no icon associated with {}", .0.display())]
    NoAssociatedIcon(PathBuf),

    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: OutputError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("platform error: {0}")]
    Platform(#[from] PlatformAbstractionError),
}
