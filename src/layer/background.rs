//! Background layer: canvas fill plus the fitted, centered photo.

use std::sync::Arc;

use palette::Srgb;
use resvg::tiny_skia::{Color, FilterQuality, PixmapPaint, Transform};

use super::raster::rgba_to_pixmap;
use super::{DependencyVersion, LayerConfig, LayerEffect, LayerVersions, RenderContext};
use crate::error::Result;
use crate::scene::{FitPlacement, Photo, SizePx};

/// Configuration for the background layer.
#[derive(Debug, Clone)]
pub struct BackgroundConfig {
    /// Fill drawn behind the photo.
    pub color: Srgb<u8>,

    /// The uploaded photo, if decoded.
    pub photo: Option<Arc<Photo>>,
}

impl BackgroundConfig {
    pub fn new(color: Srgb<u8>, photo: Option<Arc<Photo>>) -> Self {
        Self { color, photo }
    }

    /// Where the photo lands on a canvas of the given size.
    pub fn placement(&self, canvas: SizePx) -> Option<FitPlacement> {
        self.photo
            .as_ref()
            .map(|photo| FitPlacement::fit(photo.dimensions(), canvas))
    }
}

impl LayerConfig for BackgroundConfig {
    fn differs_from(&self, other: &Self) -> bool {
        let same_photo = match (&self.photo, &other.photo) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.color != other.color || !same_photo
    }
}

impl LayerEffect for BackgroundConfig {
    fn dependencies(_versions: &LayerVersions) -> DependencyVersion {
        DependencyVersion::NONE
    }

    fn draw(&self, ctx: &mut RenderContext) -> Result<()> {
        ctx.canvas.fill(Color::from_rgba8(
            self.color.red,
            self.color.green,
            self.color.blue,
            255,
        ));

        let Some(photo) = self.photo.as_ref() else {
            return Ok(());
        };
        if photo.dimensions().is_empty() {
            return Ok(());
        }

        let canvas = SizePx::new(ctx.canvas.width(), ctx.canvas.height());
        let fit = FitPlacement::fit(photo.dimensions(), canvas);
        let source = rgba_to_pixmap(&photo.data)?;
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        let transform = Transform::from_translate(fit.left, fit.top).pre_scale(fit.scale, fit.scale);
        ctx.canvas
            .draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    const WHITE: Srgb<u8> = Srgb::new(255, 255, 255);

    fn photo(width: u32, height: u32) -> Arc<Photo> {
        Arc::new(Photo::new(
            "red.png",
            RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255])),
        ))
    }

    fn draw(config: &BackgroundConfig, size: SizePx) -> RenderContext {
        let mut ctx = RenderContext::new(size).unwrap();
        config.draw(&mut ctx).unwrap();
        ctx
    }

    #[test]
    fn fill_without_photo() {
        let ctx = draw(&BackgroundConfig::new(WHITE, None), SizePx::new(8, 6));
        let px = ctx.canvas.pixel(3, 3).unwrap();
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (255, 255, 255, 255));
    }

    #[test]
    fn wide_photo_is_letterboxed() {
        // 40x10 into 80x60 -> scale 2, 80x20 at top 20
        let config = BackgroundConfig::new(WHITE, Some(photo(40, 10)));
        let ctx = draw(&config, SizePx::new(80, 60));

        let top_band = ctx.canvas.pixel(40, 5).unwrap();
        assert_eq!((top_band.red(), top_band.green()), (255, 255));

        let middle = ctx.canvas.pixel(40, 30).unwrap();
        assert_eq!((middle.red(), middle.green(), middle.blue()), (255, 0, 0));

        let bottom_band = ctx.canvas.pixel(40, 55).unwrap();
        assert_eq!((bottom_band.red(), bottom_band.green()), (255, 255));
    }

    #[test]
    fn placement_matches_fit() {
        let config = BackgroundConfig::new(WHITE, Some(photo(300, 600)));
        let fit = config.placement(SizePx::new(800, 600)).unwrap();
        assert_eq!((fit.scale, fit.left, fit.top), (1.0, 250.0, 0.0));
        assert!(BackgroundConfig::new(WHITE, None)
            .placement(SizePx::new(800, 600))
            .is_none());
    }

    #[test]
    fn differs_by_photo_identity() {
        let shared = photo(2, 2);
        let a = BackgroundConfig::new(WHITE, Some(shared.clone()));
        let b = BackgroundConfig::new(WHITE, Some(shared));
        assert!(!a.differs_from(&b));

        let c = BackgroundConfig::new(WHITE, Some(photo(2, 2)));
        assert!(a.differs_from(&c));

        let d = BackgroundConfig::new(Srgb::new(0, 0, 0), a.photo.clone());
        assert!(a.differs_from(&d));
    }
}
