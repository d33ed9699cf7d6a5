use {
    base::Vec2,
    crates_image::{Delay, Frame, Rgba, RgbaImage, codecs::gif::GifEncoder},
    image::PixelFormat,
    std::{
        fs,
        path::{Path, PathBuf},
    },
    video::{VideoError, VideoFile},
};

fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("video-test-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("Failed to create test dir");
    dir
}

fn frame_color(index: usize) -> [u8; 4] {
    [(index * 20) as u8, 100, 200, 255]
}

fn write_gif(path: &Path, width: u32, height: u32, frames: usize) {
    let file = fs::File::create(path).expect("Failed to create gif");
    let mut encoder = GifEncoder::new(file);
    for i in 0..frames {
        let buffer = RgbaImage::from_pixel(width, height, Rgba(frame_color(i)));
        let frame = Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(40, 1));
        encoder.encode_frame(frame).expect("Failed to encode frame");
    }
}

#[test]
fn test_gif_reports_size_and_native_format() {
    let dir = test_dir("size");
    let path = dir.join("clip.gif");
    write_gif(&path, 16, 8, 3);

    let video = VideoFile::open(&path).unwrap();
    assert_eq!(video.size(), Vec2::new(16, 8));
    assert_eq!(video.format(), PixelFormat::Rgba8);
    assert_eq!(video.path(), path.as_path());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_gif_frames_in_order_then_end_of_stream() {
    let dir = test_dir("frames");
    let path = dir.join("clip.gif");
    write_gif(&path, 8, 8, 10);

    let mut video = VideoFile::open(&path).unwrap();
    for i in 0..10 {
        let frame = video
            .read_frame()
            .unwrap()
            .unwrap_or_else(|| panic!("Stream ended early at frame {i}"));
        assert_eq!(frame.size, Vec2::new(8, 8));
        assert_eq!(frame.format, PixelFormat::Rgba8);
        assert_eq!(&frame.data[..4], &frame_color(i));
    }
    assert!(video.read_frame().unwrap().is_none());
    assert!(video.read_frame().unwrap().is_none());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_gif_frames_convert_to_rgb() {
    let dir = test_dir("rgb");
    let path = dir.join("clip.gif");
    write_gif(&path, 4, 2, 1);

    let mut video = VideoFile::open(&path).unwrap();
    let rgb = video.read_frame().unwrap().unwrap().into_rgb().unwrap();
    assert_eq!(rgb.format, PixelFormat::Rgb8);
    assert_eq!(rgb.data, [0u8, 100, 200].repeat(8));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = test_dir("missing");
    let result = VideoFile::open(dir.join("nope.mp4"));
    assert!(matches!(result, Err(VideoError::Io(_))));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_empty_file_fails_to_open() {
    let dir = test_dir("empty");
    let path = dir.join("empty.mp4");
    fs::write(&path, b"").unwrap();
    assert!(matches!(VideoFile::open(&path), Err(VideoError::Open(_))));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_truncated_gif_fails_to_open() {
    let dir = test_dir("truncated");
    let path = dir.join("broken.gif");
    fs::write(&path, b"GIF89a\x01").unwrap();
    assert!(VideoFile::open(&path).is_err());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_garbage_file_is_rejected() {
    let dir = test_dir("garbage");
    let path = dir.join("notes.txt");
    fs::write(&path, b"this is not a video file").unwrap();

    let result = VideoFile::open(&path);
    #[cfg(not(feature = "ffmpeg"))]
    assert!(matches!(result, Err(VideoError::Unsupported(_))));
    #[cfg(feature = "ffmpeg")]
    assert!(result.is_err());

    fs::remove_dir_all(&dir).ok();
}
