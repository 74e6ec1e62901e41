//! Decoding of `.ico` icon containers.
//!
//! An icon container stores the same picture at several resolutions. The
//! entry closest to the requested size is picked as follows:
//!
//! 1. an entry whose width equals the requested size wins outright,
//! 2. otherwise the entry with the smallest absolute width difference wins,
//! 3. if two widths are equally far away, the larger one wins,
//! 4. among entries of equal width the higher bit depth wins, then the one
//!    listed first.

use std::io::Cursor;
use thiserror::Error;

/// Geometry of a single entry as stored in the container directory.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct EntryInfo {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u16,
}

/// Returns the index of the entry best matching `requested_size`.
pub fn select_entry(entries: &[EntryInfo], requested_size: u32) -> Option<usize> {
    entries
        .iter()
        .enumerate()
        .min_by(|(a_idx, a), (b_idx, b)| {
            let a_distance = a.width.abs_diff(requested_size);
            let b_distance = b.width.abs_diff(requested_size);

            a_distance
                .cmp(&b_distance)
                .then_with(|| b.width.cmp(&a.width))
                .then_with(|| b.bits_per_pixel.cmp(&a.bits_per_pixel))
                .then_with(|| a_idx.cmp(b_idx))
        })
        .map(|(idx, _)| idx)
}

/// Decodes the entry of an icon container best matching `requested_size`.
pub fn decode_best_entry(
    bytes: &[u8],
    requested_size: u32,
) -> Result<ico::IconImage, ContainerError> {
    let directory = ico::IconDir::read(Cursor::new(bytes))?;

    let infos = directory
        .entries()
        .iter()
        .map(|entry| EntryInfo {
            width: entry.width(),
            height: entry.height(),
            bits_per_pixel: entry.bits_per_pixel(),
        })
        .collect::<Vec<_>>();

    let index = select_entry(&infos, requested_size).ok_or(ContainerError::Empty)?;
    tracing::trace!(
        "Selected container entry {} ({}x{}, {} bpp) for requested size {}",
        index,
        infos[index].width,
        infos[index].height,
        infos[index].bits_per_pixel,
        requested_size
    );

    let image = directory.entries()[index].decode()?;
    Ok(image)
}

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("malformed icon container: {0}")]
    Io(#[from] std::io::Error),

    #[error("icon container holds no images")]
    Empty,
}
