use {
    crate::{ImageError, PixelFormat, rgb},
    base::Vec2,
};

/// One packed frame: `size.y` rows of `size.x` pixels in `format`.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl Image {
    pub fn new(size: Vec2<usize>, data: Vec<u8>, format: PixelFormat) -> Self {
        Self { size, data, format }
    }

    pub fn width(&self) -> usize {
        self.size.x
    }

    pub fn height(&self) -> usize {
        self.size.y
    }

    /// Check that the buffer length matches size and format.
    pub fn validate(&self) -> Result<(), ImageError> {
        let expected = self.format.bytes_for(self.size);
        if self.data.len() != expected {
            return Err(ImageError::Size(format!(
                "{:?} image of {} needs {} bytes, got {}",
                self.format,
                self.size,
                expected,
                self.data.len()
            )));
        }
        Ok(())
    }

    /// Convert from the native pixel format to packed `Rgb8`.
    pub fn into_rgb(self) -> Result<Image, ImageError> {
        self.validate()?;
        let data = match self.format {
            PixelFormat::Rgb8 => return Ok(self),
            PixelFormat::Bgr8 => rgb::bgr8_to_rgb(&self.data),
            PixelFormat::Rgba8 => rgb::rgba8_to_rgb(&self.data),
            PixelFormat::Yu12 => rgb::yu12_to_rgb(self.size, &self.data),
        };
        Ok(Image::new(self.size, data, PixelFormat::Rgb8))
    }
}
