use std::ffi::{OsStr, OsString};
use std::os::windows::ffi::{OsStrExt, OsStringExt};
use std::path::PathBuf;

/// Encodes a string as a null terminated UTF-16 buffer suitable for a PCWSTR.
pub fn to_wide(s: impl AsRef<OsStr>) -> Vec<u16> {
    s.as_ref().encode_wide().chain([0u16]).collect()
}

/// Decodes a null terminated UTF-16 buffer into a path, `None` if it is empty.
pub fn path_from_wide(buffer: &[u16]) -> Option<PathBuf> {
    let len = buffer.iter().position(|c| *c == 0).unwrap_or(buffer.len());
    if len == 0 {
        return None;
    }

    Some(PathBuf::from(OsString::from_wide(&buffer[..len])))
}
