use {
    crate::*,
    base::Vec2,
    crates_image::{AnimationDecoder, Frames, ImageDecoder, codecs::gif::GifDecoder},
    image::{Image, PixelFormat},
    std::{fs::File, io::BufReader, path::Path},
};

/// Animated GIF backend. Frames come out composited on the logical screen as `Rgba8`.
pub struct GifReader {
    size: Vec2<usize>,
    frames: Frames<'static>,
}

impl GifReader {
    pub fn open(path: &Path) -> Result<Self, VideoError> {
        let file = BufReader::new(File::open(path)?);
        let decoder = GifDecoder::new(file)
            .map_err(|e| VideoError::Open(format!("{}: {e}", path.display())))?;
        let (width, height) = decoder.dimensions();
        Ok(Self {
            size: Vec2::new(width as usize, height as usize),
            frames: decoder.into_frames(),
        })
    }
}

impl VideoReader for GifReader {
    fn size(&self) -> Vec2<usize> {
        self.size
    }

    fn format(&self) -> PixelFormat {
        PixelFormat::Rgba8
    }

    fn read_frame(&mut self) -> Result<Option<Image>, VideoError> {
        match self.frames.next() {
            None => Ok(None),
            Some(Err(error)) => Err(VideoError::Decode(error.to_string())),
            Some(Ok(frame)) => {
                let buffer = frame.into_buffer();
                let size = Vec2::new(buffer.width() as usize, buffer.height() as usize);
                Ok(Some(Image::new(size, buffer.into_raw(), PixelFormat::Rgba8)))
            }
        }
    }
}
