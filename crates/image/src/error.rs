use std::fmt;

#[derive(Debug)]
pub enum ImageError {
    Size(String),
    Format(String),
    Decode(String),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Size(msg) => write!(f, "size error: {msg}"),
            ImageError::Format(msg) => write!(f, "format error: {msg}"),
            ImageError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for ImageError {}

impl From<crates_image::ImageError> for ImageError {
    fn from(err: crates_image::ImageError) -> Self {
        ImageError::Decode(err.to_string())
    }
}
