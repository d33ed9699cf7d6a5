use {
    crate::{Image, ImageError, PixelFormat},
    base::Vec2,
    crates_image::{RgbImage, imageops},
};

impl Image {
    /// Bilinear resample of an `Rgb8` image.
    pub fn resize(&self, size: Vec2<usize>) -> Result<Image, ImageError> {
        self.format.ensure_format(PixelFormat::Rgb8)?;
        if size.is_empty() {
            return Err(ImageError::Size(format!("cannot resize to {size}")));
        }
        if size == self.size {
            return Ok(self.clone());
        }

        let buffer = RgbImage::from_raw(self.size.x as u32, self.size.y as u32, self.data.clone())
            .ok_or_else(|| {
                ImageError::Size(format!(
                    "{} bytes do not fill a {} RGB image",
                    self.data.len(),
                    self.size
                ))
            })?;
        let resized = imageops::resize(
            &buffer,
            size.x as u32,
            size.y as u32,
            imageops::FilterType::Triangle,
        );
        Ok(Image::new(size, resized.into_raw(), PixelFormat::Rgb8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_uniform_color_is_preserved() {
        let image = Image::new(Vec2::new(8, 4), [10u8, 20, 30].repeat(32), PixelFormat::Rgb8);
        let resized = image.resize(Vec2::new(4, 2)).unwrap();
        assert_eq!(resized.size, Vec2::new(4, 2));
        assert_eq!(resized.data, [10u8, 20, 30].repeat(8));
    }

    #[test]
    fn test_resize_same_size_is_identity() {
        let data: Vec<u8> = (0..12).collect();
        let image = Image::new(Vec2::new(2, 2), data.clone(), PixelFormat::Rgb8);
        assert_eq!(image.resize(Vec2::new(2, 2)).unwrap().data, data);
    }

    #[test]
    fn test_resize_rejects_non_rgb() {
        let image = Image::new(Vec2::new(2, 2), vec![0; 16], PixelFormat::Rgba8);
        assert!(matches!(
            image.resize(Vec2::new(1, 1)),
            Err(ImageError::Format(_))
        ));
    }

    #[test]
    fn test_resize_rejects_empty_target() {
        let image = Image::new(Vec2::new(2, 2), vec![0; 12], PixelFormat::Rgb8);
        assert!(matches!(
            image.resize(Vec2::new(0, 2)),
            Err(ImageError::Size(_))
        ));
    }
}
