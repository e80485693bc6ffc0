//! Conversions between `image` buffers and `tiny_skia` pixmaps.
//!
//! `tiny_skia` stores premultiplied alpha while `image` stores straight
//! alpha, so every crossing goes through (un)premultiplication.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{IntSize, Pixmap};

use crate::error::{EditorError, Result};

/// Allocates a transparent pixmap.
pub fn new_pixmap(width: u32, height: u32) -> Result<Pixmap> {
    Pixmap::new(width, height).ok_or(EditorError::Canvas { width, height })
}

/// Converts an RGBA image into a premultiplied pixmap.
pub fn rgba_to_pixmap(img: &RgbaImage) -> Result<Pixmap> {
    let (width, height) = img.dimensions();
    let size = IntSize::from_wh(width, height).ok_or(EditorError::Canvas { width, height })?;

    let mut data = img.as_raw().clone();
    for px in data.chunks_exact_mut(4) {
        let [r, g, b] = premultiply(px[0], px[1], px[2], px[3]);
        px[0] = r;
        px[1] = g;
        px[2] = b;
    }

    Pixmap::from_vec(data, size).ok_or(EditorError::Canvas { width, height })
}

/// Converts a premultiplied pixmap into a straight-alpha RGBA image.
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());

    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let (r, g, b, a) = unpremultiply(src.red(), src.green(), src.blue(), src.alpha());
        *dst = Rgba([r, g, b, a]);
    }

    img
}

fn premultiply(r: u8, g: u8, b: u8, a: u8) -> [u8; 3] {
    let mul = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
    [mul(r), mul(g), mul(b)]
}

/// Unpremultiplies a premultiplied alpha pixel.
fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_pixels_survive_conversion() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([200, 100, 50, 255]));
        let pixmap = rgba_to_pixmap(&img).unwrap();
        assert_eq!(pixmap.width(), 3);
        assert_eq!(pixmap.height(), 2);
        assert_eq!(pixmap_to_rgba(&pixmap), img);
    }

    #[test]
    fn transparent_pixels_are_zeroed() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 0]));
        let back = pixmap_to_rgba(&rgba_to_pixmap(&img).unwrap());
        assert_eq!(back.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn half_alpha_is_close() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 128]));
        let back = pixmap_to_rgba(&rgba_to_pixmap(&img).unwrap());
        let px = back.get_pixel(0, 0).0;
        assert_eq!(px[3], 128);
        for (got, want) in px.iter().zip([200u8, 100, 50]) {
            assert!((*got as i32 - want as i32).abs() <= 2);
        }
    }

    #[test]
    fn empty_pixmap_rejected() {
        assert!(matches!(
            new_pixmap(0, 10),
            Err(EditorError::Canvas { width: 0, height: 10 })
        ));
    }
}
