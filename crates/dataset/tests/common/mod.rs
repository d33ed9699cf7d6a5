#![allow(dead_code)]

use {
    crates_image::{Delay, Frame, Rgba, RgbaImage, codecs::gif::GifEncoder},
    std::{
        fs,
        path::{Path, PathBuf},
    },
};

pub fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("dataset-test-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("Failed to create test dir");
    dir
}

pub fn frame_color(index: usize) -> [u8; 4] {
    [(index * 20) as u8, 100, 200, 255]
}

pub fn write_gif(path: &Path, width: u32, height: u32, frames: usize) {
    let file = fs::File::create(path).expect("Failed to create gif");
    let mut encoder = GifEncoder::new(file);
    for i in 0..frames {
        let buffer = RgbaImage::from_pixel(width, height, Rgba(frame_color(i)));
        let frame = Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(40, 1));
        encoder.encode_frame(frame).expect("Failed to encode frame");
    }
}

/// Directory with `count` ten-frame 16x16 GIFs named `clip-N.gif`.
pub fn clip_dir(name: &str, count: usize) -> PathBuf {
    let dir = test_dir(name);
    for i in 0..count {
        write_gif(&dir.join(format!("clip-{i}.gif")), 16, 16, 10);
    }
    dir
}

pub fn values(sequence: &[candle_core::Tensor]) -> Vec<Vec<Vec<Vec<f32>>>> {
    sequence
        .iter()
        .map(|frame| frame.to_vec3::<f32>().expect("Failed to read frame"))
        .collect()
}
