use {
    crate::*,
    base::Vec2,
    image::{Image, PixelFormat},
    std::{
        fmt,
        fs::File,
        io::Read,
        path::{Path, PathBuf},
        sync::atomic::{AtomicUsize, Ordering},
    },
};

// number of VideoFile handles currently alive in this process
static OPEN_HANDLES: AtomicUsize = AtomicUsize::new(0);

/// A decoder producing the frames of one video in temporal order.
pub trait VideoReader {
    fn size(&self) -> Vec2<usize>;
    fn format(&self) -> PixelFormat;
    /// Next frame in native format, `Ok(None)` once the stream is exhausted.
    fn read_frame(&mut self) -> Result<Option<Image>, VideoError>;
}

/// Scoped handle around a backend reader, released on drop.
pub struct VideoFile {
    path: PathBuf,
    reader: Box<dyn VideoReader>,
}

impl fmt::Debug for VideoFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoFile")
            .field("path", &self.path)
            .field("size", &self.reader.size())
            .field("format", &self.reader.format())
            .finish()
    }
}

impl VideoFile {
    /// Open `path` with the backend matching its container.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, VideoError> {
        let path = path.as_ref();
        let reader: Box<dyn VideoReader> = match sniff(path)? {
            Container::Gif => Box::new(GifReader::open(path)?),
            Container::Other => open_other(path)?,
        };
        Ok(Self::from_reader(path, reader))
    }

    /// Wrap an already constructed reader.
    pub fn from_reader(path: impl Into<PathBuf>, reader: Box<dyn VideoReader>) -> Self {
        let path = path.into();
        OPEN_HANDLES.fetch_add(1, Ordering::SeqCst);
        log::debug!(
            "opened video {} ({}, {:?})",
            path.display(),
            reader.size(),
            reader.format()
        );
        Self { path, reader }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> Vec2<usize> {
        self.reader.size()
    }

    pub fn format(&self) -> PixelFormat {
        self.reader.format()
    }

    pub fn read_frame(&mut self) -> Result<Option<Image>, VideoError> {
        self.reader.read_frame()
    }
}

impl Drop for VideoFile {
    fn drop(&mut self) {
        OPEN_HANDLES.fetch_sub(1, Ordering::SeqCst);
        log::debug!("released video {}", self.path.display());
    }
}

/// Number of `VideoFile` handles currently alive.
pub fn open_handles() -> usize {
    OPEN_HANDLES.load(Ordering::SeqCst)
}

enum Container {
    Gif,
    Other,
}

fn sniff(path: &Path) -> Result<Container, VideoError> {
    let mut header = Vec::with_capacity(6);
    File::open(path)?.take(6).read_to_end(&mut header)?;
    if header.is_empty() {
        return Err(VideoError::Open(format!("{} is empty", path.display())));
    }
    if header == b"GIF87a" || header == b"GIF89a" {
        Ok(Container::Gif)
    } else {
        Ok(Container::Other)
    }
}

#[cfg(feature = "ffmpeg")]
fn open_other(path: &Path) -> Result<Box<dyn VideoReader>, VideoError> {
    Ok(Box::new(FfmpegReader::open(path)?))
}

#[cfg(not(feature = "ffmpeg"))]
fn open_other(path: &Path) -> Result<Box<dyn VideoReader>, VideoError> {
    Err(VideoError::Unsupported(format!(
        "no decoder for {} (enable the ffmpeg feature)",
        path.display()
    )))
}
