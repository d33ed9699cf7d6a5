use {
    crate::{DatasetError, Transform},
    candle_core::Tensor,
    std::{
        fs,
        path::{Path, PathBuf},
    },
    video::{VideoError, VideoFile},
};

/// All transformed frames of one video, in decode order.
pub type FrameSequence = Vec<Tensor>;

/// Opens a video file for decoding. Swappable for tests or custom containers.
pub type Opener = fn(&Path) -> Result<VideoFile, VideoError>;

fn open_video(path: &Path) -> Result<VideoFile, VideoError> {
    VideoFile::open(path)
}

/// A directory of videos, one sample per directory entry.
///
/// The entry list is fixed at construction in directory listing order. Frames
/// are decoded on every `get`, nothing is cached.
pub struct FrameDataset<T> {
    root: PathBuf,
    videos: Vec<PathBuf>,
    transform: T,
    opener: Opener,
}

impl<T: Transform> FrameDataset<T> {
    pub fn new(root: impl AsRef<Path>, transform: T) -> Result<Self, DatasetError> {
        Self::with_opener(root, transform, open_video)
    }

    pub fn with_opener(
        root: impl AsRef<Path>,
        transform: T,
        opener: Opener,
    ) -> Result<Self, DatasetError> {
        let root = root.as_ref().to_path_buf();
        let filesystem = |err: std::io::Error| {
            DatasetError::Filesystem(format!("cannot list {}: {err}", root.display()))
        };
        let mut videos = Vec::new();
        for entry in fs::read_dir(&root).map_err(filesystem)? {
            videos.push(entry.map_err(filesystem)?.path());
        }
        log::info!("found {} videos in {}", videos.len(), root.display());
        Ok(Self {
            root,
            videos,
            transform,
            opener,
        })
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, index: usize) -> Option<&Path> {
        self.videos.get(index).map(PathBuf::as_path)
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Decode video `index` front to back and transform every frame.
    ///
    /// A video without a single decodable frame is a `Decode` error. The
    /// decoder handle is released before returning on every path.
    pub fn get(&self, index: usize) -> Result<FrameSequence, DatasetError> {
        let path = self.videos.get(index).ok_or(DatasetError::Index {
            index,
            len: self.videos.len(),
        })?;
        let decode = |err: String| DatasetError::Decode(format!("{}: {err}", path.display()));

        let mut video = (self.opener)(path).map_err(|err| decode(err.to_string()))?;
        let mut frames = FrameSequence::new();
        while let Some(frame) = video.read_frame().map_err(|err| decode(err.to_string()))? {
            let frame = frame.into_rgb().map_err(|err| decode(err.to_string()))?;
            frames.push(self.transform.apply(frame)?);
        }
        if frames.is_empty() {
            return Err(decode("no frames could be read".to_string()));
        }

        log::debug!("decoded {} frames from {}", frames.len(), path.display());
        Ok(frames)
    }
}
