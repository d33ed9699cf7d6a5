use std::fmt;

#[derive(Debug)]
pub enum VideoError {
    Io(String),
    Open(String),
    Decode(String),
    Unsupported(String),
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::Io(msg) => write!(f, "io error: {msg}"),
            VideoError::Open(msg) => write!(f, "open error: {msg}"),
            VideoError::Decode(msg) => write!(f, "decode error: {msg}"),
            VideoError::Unsupported(msg) => write!(f, "unsupported video: {msg}"),
        }
    }
}

impl std::error::Error for VideoError {}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        VideoError::Io(err.to_string())
    }
}

impl From<image::ImageError> for VideoError {
    fn from(err: image::ImageError) -> Self {
        VideoError::Decode(err.to_string())
    }
}

#[cfg(feature = "ffmpeg")]
impl From<ffmpeg_next::Error> for VideoError {
    fn from(err: ffmpeg_next::Error) -> Self {
        VideoError::Decode(err.to_string())
    }
}
