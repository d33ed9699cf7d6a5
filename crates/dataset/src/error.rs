use std::fmt;

#[derive(Debug)]
pub enum DatasetError {
    Filesystem(String),
    Decode(String),
    Index { index: usize, len: usize },
    Shape(String),
    Transform(String),
    Config(String),
    Channel(String),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Filesystem(msg) => write!(f, "filesystem error: {msg}"),
            DatasetError::Decode(msg) => write!(f, "decode error: {msg}"),
            DatasetError::Index { index, len } => {
                write!(f, "index error: index {index} out of range for {len} videos")
            }
            DatasetError::Shape(msg) => write!(f, "shape error: {msg}"),
            DatasetError::Transform(msg) => write!(f, "transform error: {msg}"),
            DatasetError::Config(msg) => write!(f, "config error: {msg}"),
            DatasetError::Channel(msg) => write!(f, "channel error: {msg}"),
        }
    }
}

impl std::error::Error for DatasetError {}

impl From<video::VideoError> for DatasetError {
    fn from(err: video::VideoError) -> Self {
        DatasetError::Decode(err.to_string())
    }
}

impl From<image::ImageError> for DatasetError {
    fn from(err: image::ImageError) -> Self {
        DatasetError::Transform(err.to_string())
    }
}

impl From<candle_core::Error> for DatasetError {
    fn from(err: candle_core::Error) -> Self {
        DatasetError::Transform(err.to_string())
    }
}
