//! Classification of input paths into concrete icon sources.

use crate::error::ExtractorError;
use crate::pal::LinkResolver;
use crate::resize::ResizeSpec;
use std::path::{Path, PathBuf};

pub const ICON_CONTAINER_EXTENSION: &str = "ico";
pub const SHORTCUT_EXTENSION: &str = "lnk";

/// Container resolution requested when none is given.
pub const DEFAULT_ICON_SIZE: u32 = 16;

/// Everything needed to run a single extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSourceRequest {
    /// The file to extract the icon from
    pub file_path: PathBuf,

    /// Resolution to pick from icon containers
    pub desired_size: u32,

    /// Final size of the emitted image, `None` keeps the source size
    pub resize: Option<ResizeSpec>,

    /// Whether an `.ico` next to the (resolved) file takes precedence
    pub search_sibling_icon: bool,
}

impl IconSourceRequest {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            desired_size: DEFAULT_ICON_SIZE,
            resize: None,
            search_sibling_icon: false,
        }
    }
}

/// Where the icon pixels will come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    /// The icon the system associates with the file
    ExecutableAssociation(PathBuf),

    /// An entry of an icon container file
    IconContainerFile { path: PathBuf, requested_size: u32 },
}

impl IconSource {
    pub fn path(&self) -> &Path {
        match self {
            Self::ExecutableAssociation(path) => path,
            Self::IconContainerFile { path, .. } => path,
        }
    }
}

/// Turns an [`IconSourceRequest`] into an [`IconSource`].
#[derive(Debug)]
pub struct PathResolver<'a, L: ?Sized> {
    links: &'a L,
}

impl<'a, L: LinkResolver + ?Sized> PathResolver<'a, L> {
    pub fn new(links: &'a L) -> Self {
        Self { links }
    }

    pub fn resolve(&self, request: &IconSourceRequest) -> Result<IconSource, ExtractorError> {
        let input = &request.file_path;
        if !input.exists() {
            return Err(ExtractorError::FileNotFound(input.clone()));
        }

        let is_icon_container = has_extension(input, ICON_CONTAINER_EXTENSION);

        let path = if has_extension(input, SHORTCUT_EXTENSION) {
            match self.links.resolve_link(input)? {
                Some(target) => {
                    tracing::debug!("Resolved {} to {}", input.display(), target.display());
                    target
                }
                None => {
                    // Loading reports this as an unresolved source
                    tracing::warn!("Shortcut {} has no target", input.display());
                    PathBuf::new()
                }
            }
        } else {
            input.clone()
        };

        if request.search_sibling_icon && !path.as_os_str().is_empty() {
            if let Some(sibling) = find_sibling_icon(&path) {
                tracing::debug!("Using sibling icon {}", sibling.display());
                return Ok(IconSource::IconContainerFile {
                    path: sibling,
                    requested_size: request.desired_size,
                });
            }
        }

        if is_icon_container {
            Ok(IconSource::IconContainerFile {
                path,
                requested_size: request.desired_size,
            })
        } else {
            Ok(IconSource::ExecutableAssociation(path))
        }
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Looks for an icon container in the directory containing `path`.
///
/// If several exist the first one in directory enumeration order is taken,
/// which is arbitrary and not guaranteed to be stable.
fn find_sibling_icon(path: &Path) -> Option<PathBuf> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let entries = match std::fs::read_dir(dir) {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!(
                "Failed to list {}, not searching for sibling icons: {}",
                dir.display(),
                err
            );
            return None;
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|candidate| {
            candidate.is_file() && has_extension(candidate, ICON_CONTAINER_EXTENSION)
        })
}
