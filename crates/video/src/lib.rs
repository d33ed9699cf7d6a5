//! Video file decoding for the stylization workspace.
//!
//! A `VideoFile` is a scoped decoder handle: frames are pulled one at a time
//! with `read_frame` in their native pixel format, and the decoder is released
//! when the handle is dropped. Backends are picked by sniffing the file header.

pub mod error;
pub use error::VideoError;

pub mod reader;
pub use reader::{VideoFile, VideoReader, open_handles};

pub mod gif;
pub use gif::GifReader;

#[cfg(feature = "ffmpeg")]
pub mod ffmpeg;

#[cfg(feature = "ffmpeg")]
pub use ffmpeg::FfmpegReader;
