use {
    crate::*,
    base::Vec2,
    ffmpeg_next::{
        self as ffmpeg, Packet, codec, decoder,
        format::{self, Pixel},
        frame, media,
        software::scaling,
        util::{color, error::EAGAIN},
    },
    image::{Image, PixelFormat, yu12_expand_limited_range},
    std::path::Path,
};

/// FFmpeg backend for every container libavformat understands.
///
/// YUV420P frames with even dimensions are handed out as full-range `Yu12`
/// (limited-range streams are expanded first) so the RGB conversion happens
/// in `Image::into_rgb`; any other decoder output goes through the software
/// scaler straight to `Rgb8`.
pub struct FfmpegReader {
    input: format::context::Input,
    decoder: decoder::Video,
    stream_index: usize,
    scaler: Option<scaling::Context>,
    size: Vec2<usize>,
    flushed: bool,
}

impl FfmpegReader {
    pub fn open(path: &Path) -> Result<Self, VideoError> {
        ffmpeg::init().map_err(|e| VideoError::Open(format!("ffmpeg init failed: {e}")))?;

        let input = format::input(path)
            .map_err(|e| VideoError::Open(format!("{}: {e}", path.display())))?;
        let stream = input.streams().best(media::Type::Video).ok_or_else(|| {
            VideoError::Open(format!("{} has no video stream", path.display()))
        })?;
        let stream_index = stream.index();
        let decoder = codec::context::Context::from_parameters(stream.parameters())
            .and_then(|context| context.decoder().video())
            .map_err(|e| VideoError::Open(format!("{}: {e}", path.display())))?;
        let size = Vec2::new(decoder.width() as usize, decoder.height() as usize);

        Ok(Self {
            input,
            decoder,
            stream_index,
            scaler: None,
            size,
            flushed: false,
        })
    }

    // push the next packet of our stream into the decoder, or flush at EOF
    fn feed(&mut self) -> Result<(), VideoError> {
        let mut packet = Packet::empty();
        loop {
            match packet.read(&mut self.input) {
                Ok(()) if packet.stream() == self.stream_index => {
                    self.decoder.send_packet(&packet)?;
                    return Ok(());
                }
                Ok(()) => continue,
                Err(ffmpeg::Error::Eof) => {
                    self.decoder.send_eof()?;
                    self.flushed = true;
                    return Ok(());
                }
                Err(error) => return Err(error.into()),
            }
        }
    }

    fn convert(&mut self, decoded: &frame::Video) -> Result<Image, VideoError> {
        let size = Vec2::new(decoded.width() as usize, decoded.height() as usize);

        if decoded.format() == Pixel::YUV420P && size.x % 2 == 0 && size.y % 2 == 0 {
            let mut data = Vec::with_capacity(PixelFormat::Yu12.bytes_for(size));
            copy_plane(decoded, 0, size.x, size.y, &mut data);
            copy_plane(decoded, 1, size.x / 2, size.y / 2, &mut data);
            copy_plane(decoded, 2, size.x / 2, size.y / 2, &mut data);
            // unspecified range is treated as limited, like most H.264 output
            if decoded.color_range() != color::Range::JPEG {
                yu12_expand_limited_range(size, &mut data);
            }
            return Ok(Image::new(size, data, PixelFormat::Yu12));
        }

        let stale = match &self.scaler {
            Some(scaler) => {
                let input = scaler.input();
                input.format != decoded.format()
                    || input.width != decoded.width()
                    || input.height != decoded.height()
            }
            None => true,
        };
        if stale {
            self.scaler = Some(scaling::Context::get(
                decoded.format(),
                decoded.width(),
                decoded.height(),
                Pixel::RGB24,
                decoded.width(),
                decoded.height(),
                scaling::flag::Flags::BILINEAR,
            )?);
        }

        let mut rgb = frame::Video::empty();
        if let Some(scaler) = self.scaler.as_mut() {
            scaler.run(decoded, &mut rgb)?;
        }
        let mut data = Vec::with_capacity(size.area() * 3);
        copy_plane(&rgb, 0, size.x * 3, size.y, &mut data);
        Ok(Image::new(size, data, PixelFormat::Rgb8))
    }
}

// copy `rows` rows of `row_bytes` bytes each, dropping the line padding
fn copy_plane(frame: &frame::Video, plane: usize, row_bytes: usize, rows: usize, out: &mut Vec<u8>) {
    let stride = frame.stride(plane);
    let data = frame.data(plane);
    for row in 0..rows {
        let start = row * stride;
        out.extend_from_slice(&data[start..start + row_bytes]);
    }
}

impl VideoReader for FfmpegReader {
    fn size(&self) -> Vec2<usize> {
        self.size
    }

    fn format(&self) -> PixelFormat {
        if self.decoder.format() == Pixel::YUV420P {
            PixelFormat::Yu12
        } else {
            PixelFormat::Rgb8
        }
    }

    fn read_frame(&mut self) -> Result<Option<Image>, VideoError> {
        let mut decoded = frame::Video::empty();
        loop {
            match self.decoder.receive_frame(&mut decoded) {
                Ok(()) => return self.convert(&decoded).map(Some),
                Err(ffmpeg::Error::Eof) => return Ok(None),
                Err(ffmpeg::Error::Other { errno }) if errno == EAGAIN => {
                    if self.flushed {
                        return Ok(None);
                    }
                }
                Err(error) => return Err(error.into()),
            }
            self.feed()?;
        }
    }
}
