use {crate::ImageError, base::Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
    Bgr8,
    Yu12,
}

impl PixelFormat {
    /// Exact number of bytes a frame of `size` occupies in this format.
    pub fn bytes_for(&self, size: Vec2<usize>) -> usize {
        match self {
            PixelFormat::Rgb8 | PixelFormat::Bgr8 => size.area() * 3,
            PixelFormat::Rgba8 => size.area() * 4,
            PixelFormat::Yu12 => {
                let chroma = size.x.div_ceil(2) * size.y.div_ceil(2);
                size.area() + 2 * chroma
            }
        }
    }

    pub fn ensure_format(&self, expected: PixelFormat) -> Result<(), ImageError> {
        if *self != expected {
            return Err(ImageError::Format(format!(
                "expected {:?} format, got {:?}",
                expected, self
            )));
        }
        Ok(())
    }
}

// BT.601 YUV-to-RGB conversion for a single pixel (fixed-point, shift 8)
pub(crate) fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as i32;
    let u = u as i32 - 128;
    let v = v as i32 - 128;
    let r = (y + ((359 * v) >> 8)).clamp(0, 255) as u8;
    let g = (y - ((88 * u + 183 * v) >> 8)).clamp(0, 255) as u8;
    let b = (y + ((454 * u) >> 8)).clamp(0, 255) as u8;
    (r, g, b)
}

// limited (studio) range to full range: luma 16..=235, chroma 16..=240
pub(crate) fn expand_luma(y: u8) -> u8 {
    ((y as f32 - 16.0) * 255.0 / 219.0).round().clamp(0.0, 255.0) as u8
}

pub(crate) fn expand_chroma(c: u8) -> u8 {
    ((c as f32 - 128.0) * 255.0 / 224.0 + 128.0).round().clamp(0.0, 255.0) as u8
}
