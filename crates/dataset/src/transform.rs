use {
    crate::DatasetError,
    base::Vec2,
    candle_core::{DType, Device, Tensor},
    image::{Image, PixelFormat},
};

/// Turns one RGB frame into a (3, H', W') tensor.
///
/// Implemented for any `Fn(Image) -> Result<Tensor, DatasetError>`, errors
/// are propagated to the caller of `FrameDataset::get` untouched.
pub trait Transform: Send + Sync {
    fn apply(&self, image: Image) -> Result<Tensor, DatasetError>;
}

impl<F> Transform for F
where
    F: Fn(Image) -> Result<Tensor, DatasetError> + Send + Sync,
{
    fn apply(&self, image: Image) -> Result<Tensor, DatasetError> {
        self(image)
    }
}

/// Standard frame preprocessing: optional bilinear resize, HWC u8 to
/// CHW f32 in [0, 1], then optional per-channel `(x - mean) / std`.
#[derive(Debug, Clone)]
pub struct FrameTransform {
    device: Device,
    size: Option<Vec2<usize>>,
    normalize: Option<([f32; 3], [f32; 3])>,
}

impl FrameTransform {
    pub fn new(device: Device) -> Self {
        Self {
            device,
            size: None,
            normalize: None,
        }
    }

    /// Resize every frame to `size` (width x height) first.
    pub fn with_resize(mut self, size: Vec2<usize>) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_normalize(mut self, mean: [f32; 3], std: [f32; 3]) -> Self {
        self.normalize = Some((mean, std));
        self
    }
}

impl Transform for FrameTransform {
    fn apply(&self, image: Image) -> Result<Tensor, DatasetError> {
        image.format.ensure_format(PixelFormat::Rgb8)?;
        image.validate()?;
        let image = match self.size {
            Some(size) => image.resize(size)?,
            None => image,
        };

        let (h, w) = (image.height(), image.width());
        let tensor = Tensor::from_vec(image.data, (h, w, 3), &self.device)?
            .to_dtype(DType::F32)?
            .permute((2, 0, 1))?
            .contiguous()?;
        let tensor = (tensor / 255.0)?;

        match &self.normalize {
            Some((mean, std)) => {
                let mean = Tensor::new(&mean[..], &self.device)?.reshape((3, 1, 1))?;
                let std = Tensor::new(&std[..], &self.device)?.reshape((3, 1, 1))?;
                Ok(tensor.broadcast_sub(&mean)?.broadcast_div(&std)?)
            }
            None => Ok(tensor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(width: usize, height: usize, pixel: [u8; 3]) -> Image {
        Image::new(
            Vec2::new(width, height),
            pixel.repeat(width * height),
            PixelFormat::Rgb8,
        )
    }

    #[test]
    fn test_to_tensor_is_chw_in_unit_range() {
        let transform = FrameTransform::new(Device::Cpu);
        let tensor = transform.apply(rgb(4, 2, [255, 0, 51])).unwrap();

        assert_eq!(tensor.dims(), &[3, 2, 4]);
        let planes: Vec<Vec<Vec<f32>>> = tensor.to_vec3().unwrap();
        assert!(planes[0].iter().flatten().all(|&v| (v - 1.0).abs() < 1e-6));
        assert!(planes[1].iter().flatten().all(|&v| v == 0.0));
        assert!(planes[2].iter().flatten().all(|&v| (v - 0.2).abs() < 1e-6));
    }

    #[test]
    fn test_to_tensor_keeps_pixel_positions() {
        // 2x1 image: left pixel red, right pixel blue
        let image = Image::new(Vec2::new(2, 1), vec![255, 0, 0, 0, 0, 255], PixelFormat::Rgb8);
        let tensor = FrameTransform::new(Device::Cpu).apply(image).unwrap();
        let planes: Vec<Vec<Vec<f32>>> = tensor.to_vec3().unwrap();
        assert_eq!(planes[0], vec![vec![1.0, 0.0]]);
        assert_eq!(planes[2], vec![vec![0.0, 1.0]]);
    }

    #[test]
    fn test_resize_changes_spatial_dims() {
        let transform = FrameTransform::new(Device::Cpu).with_resize(Vec2::new(8, 4));
        let tensor = transform.apply(rgb(16, 16, [10, 20, 30])).unwrap();
        assert_eq!(tensor.dims(), &[3, 4, 8]);
    }

    #[test]
    fn test_normalize_per_channel() {
        let transform = FrameTransform::new(Device::Cpu)
            .with_normalize([0.5, 0.5, 0.5], [0.5, 0.5, 0.5]);
        let tensor = transform.apply(rgb(2, 2, [255, 0, 255])).unwrap();
        let planes: Vec<Vec<Vec<f32>>> = tensor.to_vec3().unwrap();
        assert!(planes[0].iter().flatten().all(|&v| (v - 1.0).abs() < 1e-6));
        assert!(planes[1].iter().flatten().all(|&v| (v + 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_rejects_non_rgb_input() {
        let image = Image::new(Vec2::new(1, 1), vec![0, 0, 0, 0], PixelFormat::Rgba8);
        let result = FrameTransform::new(Device::Cpu).apply(image);
        assert!(matches!(result, Err(DatasetError::Transform(_))));
    }

    #[test]
    fn test_closure_is_a_transform() {
        let transform = |image: Image| -> Result<Tensor, DatasetError> {
            Ok(Tensor::zeros((3, image.height(), image.width()), DType::F32, &Device::Cpu)?)
        };
        let tensor = transform.apply(rgb(5, 3, [0, 0, 0])).unwrap();
        assert_eq!(tensor.dims(), &[3, 3, 5]);
    }
}
