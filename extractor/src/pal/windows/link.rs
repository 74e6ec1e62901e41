use crate::pal::platform::com::ComApartment;
use crate::pal::platform::util::{path_from_wide, to_wide};
use crate::pal::platform::PlatformError;
use crate::pal::PlatformAbstractionError;
use std::path::{Path, PathBuf};
use windows::core::{ComInterface, Error as Win32Error, PCWSTR};
use windows::Win32::Foundation::MAX_PATH;
use windows::Win32::System::Com::{CoCreateInstance, IPersistFile, CLSCTX_INPROC_SERVER, STGM_READ};
use windows::Win32::UI::Shell::{IShellLinkW, ShellLink};

/// Resolves a shortcut on a dedicated worker thread.
///
/// The shell link object lives in a single-threaded apartment, so the worker
/// enters one before touching it. The caller blocks until the worker is done.
pub fn resolve_on_worker(link: &Path) -> Result<Option<PathBuf>, PlatformAbstractionError> {
    let link = link.to_path_buf();

    let worker = std::thread::Builder::new()
        .name("link-resolver".into())
        .spawn(move || -> Result<Option<PathBuf>, Win32Error> {
            let _apartment = ComApartment::enter_single_threaded()?;
            resolve_in_apartment(&link)
        })?;

    match worker.join() {
        Ok(res) => Ok(res.map_err(PlatformError::from)?),
        Err(_) => {
            tracing::error!("Shortcut resolver thread panicked");
            Err(PlatformError::LinkWorkerPanicked.into())
        }
    }
}

fn resolve_in_apartment(link: &Path) -> Result<Option<PathBuf>, Win32Error> {
    tracing::trace!("Loading shell link {}", link.display());

    // Interfaces are released before the apartment guard in the caller drops
    let shell_link: IShellLinkW =
        unsafe { CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER)? };
    let persist_file: IPersistFile = shell_link.cast()?;

    let wide_link = to_wide(link);
    if let Err(err) = unsafe { persist_file.Load(PCWSTR(wide_link.as_ptr()), STGM_READ) } {
        // Unreadable links count as broken, not as a platform failure
        tracing::warn!("Failed to load shortcut {}: {}", link.display(), err);
        return Ok(None);
    }

    let mut buffer = [0u16; MAX_PATH as usize];
    unsafe { shell_link.GetPath(&mut buffer, std::ptr::null_mut(), 0)? };

    let target = path_from_wide(&buffer);
    match &target {
        Some(target) => {
            tracing::debug!("Shortcut {} points to {}", link.display(), target.display())
        }
        None => tracing::debug!("Shortcut {} has no target path", link.display()),
    }

    Ok(target)
}
