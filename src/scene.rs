//! Scene geometry and the decoded background photo.

use image::RgbaImage;
use tracing::debug;

use crate::error::{EditorError, Result};
use crate::upload::SelectedFile;

/// A point in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointPx {
    pub x: f32,
    pub y: f32,
}

impl PointPx {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the vector from `origin` to this point.
    pub fn offset_from(&self, origin: PointPx) -> (f32, f32) {
        (self.x - origin.x, self.y - origin.y)
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Placement of the photo on the canvas: a uniform scale and the top-left
/// corner of the scaled photo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitPlacement {
    pub scale: f32,
    pub left: f32,
    pub top: f32,
}

impl FitPlacement {
    /// Scales `image` by `min(canvas.w / image.w, canvas.h / image.h)` and
    /// centers it. Small photos are scaled up.
    pub fn fit(image: SizePx, canvas: SizePx) -> Self {
        if image.is_empty() {
            return Self {
                scale: 1.0,
                left: canvas.width as f32 / 2.0,
                top: canvas.height as f32 / 2.0,
            };
        }

        let scale = (canvas.width as f32 / image.width as f32)
            .min(canvas.height as f32 / image.height as f32);
        let scaled_w = image.width as f32 * scale;
        let scaled_h = image.height as f32 * scale;

        Self {
            scale,
            left: (canvas.width as f32 - scaled_w) / 2.0,
            top: (canvas.height as f32 - scaled_h) / 2.0,
        }
    }
}

/// The uploaded photo, decoded to RGBA.
///
/// The photo sits behind the hat. It is never selectable and never
/// receives pointer events.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    /// Name of the file the photo came from.
    pub name: String,

    /// Decoded pixels.
    pub data: RgbaImage,
}

impl Photo {
    pub fn new(name: impl Into<String>, data: RgbaImage) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Decodes an uploaded file. The format is guessed from the content.
    pub fn decode(file: &SelectedFile) -> Result<Self> {
        let data = image::load_from_memory(&file.bytes)
            .map_err(|source| EditorError::Decode {
                name: file.name.clone(),
                source,
            })?
            .to_rgba8();
        debug!(
            name = %file.name,
            width = data.width(),
            height = data.height(),
            "decoded photo"
        );
        Ok(Self::new(file.name.clone(), data))
    }

    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn fit_landscape_photo() {
        // 1600x800 into 800x600: width-bound, scale 0.5, letterboxed vertically
        let fit = FitPlacement::fit(SizePx::new(1600, 800), SizePx::new(800, 600));
        assert_eq!(fit.scale, 0.5);
        assert_eq!(fit.left, 0.0);
        assert_eq!(fit.top, 100.0);
    }

    #[test]
    fn fit_portrait_photo() {
        let fit = FitPlacement::fit(SizePx::new(300, 600), SizePx::new(800, 600));
        assert_eq!(fit.scale, 1.0);
        assert_eq!(fit.left, 250.0);
        assert_eq!(fit.top, 0.0);
    }

    #[test]
    fn fit_upscales_small_photo() {
        let fit = FitPlacement::fit(SizePx::new(100, 75), SizePx::new(800, 600));
        assert_eq!(fit.scale, 8.0);
        assert_eq!(fit.left, 0.0);
        assert_eq!(fit.top, 0.0);
    }

    #[test]
    fn point_offsets() {
        let a = PointPx::new(10.0, 20.0);
        let b = PointPx::new(4.0, 25.0);
        assert_eq!(a.offset_from(b), (6.0, -5.0));
        assert_eq!(b.translated(6.0, -5.0), a);
    }

    #[test]
    fn decode_png_photo() {
        let file = SelectedFile::new("me.png", "image/png", png_bytes(4, 3));
        let photo = Photo::decode(&file).unwrap();
        assert_eq!(photo.dimensions(), SizePx::new(4, 3));
        assert_eq!(photo.name, "me.png");
        assert_eq!(photo.data.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn decode_garbage_fails() {
        let file = SelectedFile::new("notes.txt", "text/plain", b"not an image".to_vec());
        let err = Photo::decode(&file).unwrap_err();
        assert!(matches!(err, EditorError::Decode { ref name, .. } if name == "notes.txt"));
    }
}
