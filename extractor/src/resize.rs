use crate::buffer::PixelBuffer;
use image::imageops::{self, FilterType};
use std::num::NonZeroU32;

/// The square size an image is resampled to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ResizeSpec {
    target_size: NonZeroU32,
}

impl ResizeSpec {
    /// Returns `None` for a zero size.
    pub fn new(target_size: u32) -> Option<Self> {
        NonZeroU32::new(target_size).map(|target_size| Self { target_size })
    }

    pub fn target_size(&self) -> u32 {
        self.target_size.get()
    }
}

/// Brings a loaded icon into the form that is written out.
#[derive(Debug, Default, Copy, Clone)]
pub struct ImageResizer;

impl ImageResizer {
    /// Resizes the buffer if a size is given, otherwise makes its background
    /// transparent.
    pub fn normalize(&self, buffer: PixelBuffer, resize: Option<ResizeSpec>) -> PixelBuffer {
        match resize {
            Some(spec) => self.resize(&buffer, spec),
            None => {
                let mut buffer = buffer;
                self.make_background_transparent(&mut buffer);
                buffer
            }
        }
    }

    /// Resamples `buffer` into a new square image of the requested size.
    ///
    /// Uses Catmull-Rom bicubic interpolation. Samples past the border are
    /// clamped to the edge rather than mirrored. The alpha channel is filtered
    /// exactly like the color channels and the result replaces the destination
    /// outright.
    pub fn resize(&self, buffer: &PixelBuffer, spec: ResizeSpec) -> PixelBuffer {
        let size = spec.target_size();
        if buffer.width() == 0 || buffer.height() == 0 {
            return PixelBuffer::transparent(size, size);
        }

        tracing::debug!(
            "Resizing {}x{} to {}x{}",
            buffer.width(),
            buffer.height(),
            size,
            size
        );

        imageops::resize(buffer.as_image(), size, size, FilterType::CatmullRom).into()
    }

    /// Makes every pixel matching the background color fully transparent.
    ///
    /// The background color is the one of the bottom-left pixel. If that pixel
    /// is not fully opaque nothing changes, so icons with a real alpha channel
    /// pass through untouched.
    pub fn make_background_transparent(&self, buffer: &mut PixelBuffer) {
        if buffer.width() == 0 || buffer.height() == 0 {
            return;
        }

        let key = buffer.pixel(0, buffer.height() - 1);
        if key[3] < u8::MAX {
            return;
        }

        tracing::trace!("Making background color {:?} transparent", key);
        for pixel in buffer.as_image_mut().pixels_mut() {
            if pixel.0 == key {
                pixel.0 = [0, 0, 0, 0];
            }
        }
    }
}
