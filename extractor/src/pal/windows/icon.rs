use crate::buffer::PixelBuffer;
use crate::pal::platform::util::to_wide;
use crate::pal::platform::PlatformError;
use crate::pal::PlatformAbstractionError;
use std::path::Path;
use windows::core::{Error as Win32Error, PCWSTR};
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::{
    CreateCompatibleDC, CreateDIBSection, DeleteDC, DeleteObject, GdiFlush, GetDC, ReleaseDC,
    SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, HBITMAP, HDC, HGDIOBJ,
};
use windows::Win32::Storage::FileSystem::FILE_FLAGS_AND_ATTRIBUTES;
use windows::Win32::UI::Shell::{SHGetFileInfoW, SHFILEINFOW, SHGFI_ICON, SHGFI_LARGEICON};
use windows::Win32::UI::WindowsAndMessaging::{
    DestroyIcon, DrawIconEx, GetSystemMetrics, DI_NORMAL, HICON, SM_CXICON, SM_CYICON,
};

/// An icon handle owned by this process, destroyed on drop.
#[derive(Debug)]
pub struct NativeIcon {
    hicon: HICON,
    width: u32,
    height: u32,
}

impl NativeIcon {
    /// Asks the shell for the large icon associated with `file`.
    pub fn associated_with(file: &Path) -> Option<Self> {
        let wide_path = to_wide(file);
        let mut info = SHFILEINFOW::default();

        let res = unsafe {
            SHGetFileInfoW(
                PCWSTR(wide_path.as_ptr()),
                FILE_FLAGS_AND_ATTRIBUTES(0),
                Some(&mut info),
                std::mem::size_of::<SHFILEINFOW>() as u32,
                SHGFI_ICON | SHGFI_LARGEICON,
            )
        };

        if res == 0 || info.hIcon.is_invalid() {
            tracing::debug!("Shell reported no icon for {}", file.display());
            return None;
        }

        let (width, height) = unsafe { (GetSystemMetrics(SM_CXICON), GetSystemMetrics(SM_CYICON)) };
        tracing::trace!("Shell icon for {} is {}x{}", file.display(), width, height);

        Some(Self {
            hicon: info.hIcon,
            width: width.max(1) as u32,
            height: height.max(1) as u32,
        })
    }

    /// Renders the icon into a 32-bit DIB and reads back straight RGBA pixels.
    pub fn to_pixel_buffer(&self) -> Result<PixelBuffer, PlatformAbstractionError> {
        let screen = ScreenDc::acquire()?;
        let memory = MemoryDc::compatible_with(&screen)?;
        let dib = DibSection::create(&memory, self.width, self.height)?;
        let _selection = Selection::select(&memory, dib.bitmap);

        unsafe {
            DrawIconEx(
                memory.0,
                0,
                0,
                self.hicon,
                self.width as i32,
                self.height as i32,
                0,
                None,
                DI_NORMAL,
            )
            .map_err(PlatformError::from)?;
            GdiFlush();
        }

        let len = (self.width * self.height * 4) as usize;
        // SAFETY: the section holds width * height 32-bit pixels and outlives this borrow
        let bgra = unsafe { std::slice::from_raw_parts(dib.bits as *const u8, len) };

        let rgba = bgra_to_straight_rgba(bgra);
        PixelBuffer::from_rgba(self.width, self.height, rgba).ok_or(
            PlatformAbstractionError::InvalidPixelData {
                width: self.width,
                height: self.height,
            },
        )
    }
}

impl Drop for NativeIcon {
    fn drop(&mut self) {
        if !self.hicon.is_invalid() {
            if let Err(err) = unsafe { DestroyIcon(self.hicon) } {
                tracing::warn!("Failed to destroy icon handle: {}", err);
            }
        }
    }
}

/// Converts premultiplied BGRA as drawn by GDI into straight RGBA.
///
/// Icons without any alpha information come out with a zero alpha plane, those
/// are treated as fully opaque.
fn bgra_to_straight_rgba(bgra: &[u8]) -> Vec<u8> {
    let has_alpha = bgra.chunks_exact(4).any(|p| p[3] != 0);

    bgra.chunks_exact(4)
        .flat_map(|p| {
            let (b, g, r, a) = (p[0], p[1], p[2], p[3]);
            if !has_alpha {
                return [r, g, b, u8::MAX];
            }

            match a {
                0 => [0, 0, 0, 0],
                u8::MAX => [r, g, b, a],
                _ => {
                    let unmultiply =
                        |c: u8| ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8;
                    [unmultiply(r), unmultiply(g), unmultiply(b), a]
                }
            }
        })
        .collect()
}

struct ScreenDc(HDC);

impl ScreenDc {
    fn acquire() -> Result<Self, PlatformError> {
        let dc = unsafe { GetDC(HWND::default()) };
        if dc.is_invalid() {
            return Err(Win32Error::from_win32().into());
        }

        Ok(Self(dc))
    }
}

impl Drop for ScreenDc {
    fn drop(&mut self) {
        unsafe { ReleaseDC(HWND::default(), self.0) };
    }
}

struct MemoryDc(HDC);

impl MemoryDc {
    fn compatible_with(screen: &ScreenDc) -> Result<Self, PlatformError> {
        let dc = unsafe { CreateCompatibleDC(screen.0) };
        if dc.is_invalid() {
            return Err(Win32Error::from_win32().into());
        }

        Ok(Self(dc))
    }
}

impl Drop for MemoryDc {
    fn drop(&mut self) {
        unsafe { DeleteDC(self.0) };
    }
}

struct DibSection {
    bitmap: HBITMAP,
    bits: *mut std::ffi::c_void,
}

impl DibSection {
    fn create(dc: &MemoryDc, width: u32, height: u32) -> Result<Self, PlatformError> {
        let info = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width as i32,
                biHeight: -(height as i32), // Top-down DIB
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut bits = std::ptr::null_mut();
        let bitmap = unsafe { CreateDIBSection(dc.0, &info, DIB_RGB_COLORS, &mut bits, None, 0)? };

        Ok(Self { bitmap, bits })
    }
}

impl Drop for DibSection {
    fn drop(&mut self) {
        unsafe { DeleteObject(self.bitmap) };
    }
}

struct Selection {
    dc: HDC,
    previous: HGDIOBJ,
}

impl Selection {
    fn select(dc: &MemoryDc, bitmap: HBITMAP) -> Self {
        let previous = unsafe { SelectObject(dc.0, bitmap) };
        Self { dc: dc.0, previous }
    }
}

impl Drop for Selection {
    fn drop(&mut self) {
        unsafe { SelectObject(self.dc, self.previous) };
    }
}
