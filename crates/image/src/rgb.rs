use crate::pixelformat::{expand_chroma, expand_luma, yuv_to_rgb};
use base::Vec2;

pub fn bgr8_to_rgb(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(3)
        .flat_map(|px| [px[2], px[1], px[0]])
        .collect()
}

pub fn rgba8_to_rgb(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}

/// Rescale a limited-range YU12 buffer to full range in place, so that
/// `yu12_to_rgb` maps studio black and white to 0 and 255.
pub fn yu12_expand_limited_range(size: Vec2<usize>, data: &mut [u8]) {
    let y_len = size.area().min(data.len());
    let (luma, chroma) = data.split_at_mut(y_len);
    for y in luma {
        *y = expand_luma(*y);
    }
    for c in chroma {
        *c = expand_chroma(*c);
    }
}

/// Planar 4:2:0 (Y plane, then U, then V) to packed RGB.
pub fn yu12_to_rgb(size: Vec2<usize>, data: &[u8]) -> Vec<u8> {
    let width = size.x;
    let height = size.y;
    let y_len = width * height;
    let uv_w = width.div_ceil(2);
    let uv_len = uv_w * height.div_ceil(2);

    let y_plane = &data[..y_len];
    let u_plane = &data[y_len..y_len + uv_len];
    let v_plane = &data[y_len + uv_len..];

    let mut rgb = Vec::with_capacity(y_len * 3);

    for row in 0..height {
        for col in 0..width {
            let y = y_plane[row * width + col];
            let uv = (row / 2) * uv_w + col / 2;
            let (r, g, b) = yuv_to_rgb(y, u_plane[uv], v_plane[uv]);
            rgb.extend_from_slice(&[r, g, b]);
        }
    }

    rgb
}
