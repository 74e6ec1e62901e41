use image::RgbaImage;

/// A decoded image with straight (non-premultiplied) RGBA8 pixels, row major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// Creates a buffer from raw RGBA8 data.
    ///
    /// Returns `None` if `data` does not hold exactly `width * height` pixels.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, data).map(|image| Self { image })
    }

    /// Creates a fully transparent buffer.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Returns the pixel at the given coordinates, panics if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        self.image.put_pixel(x, y, image::Rgba(rgba));
    }

    /// Iterates over all pixels in row major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.image.pixels().map(|p| p.0)
    }

    /// The raw RGBA8 bytes, four per pixel.
    pub fn as_rgba(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub(crate) fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub(crate) fn as_image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        Self { image }
    }
}
