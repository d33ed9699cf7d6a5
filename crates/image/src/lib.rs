//! Raw frame images for the stylization workspace.
//!
//! An `Image` is a packed pixel buffer in one of the `PixelFormat`s that
//! video decoders hand out. Everything downstream (transforms, the network)
//! consumes `Rgb8`, so the main job of this crate is `Image::into_rgb`.

pub mod error;
pub use error::ImageError;

pub mod image;
pub use image::Image;

pub mod pixelformat;
pub use pixelformat::PixelFormat;

pub mod rgb;
pub use rgb::*;

mod resize;
