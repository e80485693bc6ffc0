//! Hat sprite sources and their prepared, drawable form.

use resvg::tiny_skia::{FilterQuality, Pixmap, PixmapMut, PixmapPaint, Transform};
use resvg::usvg::{Options, Tree};

use super::raster::rgba_to_pixmap;
use crate::error::{EditorError, Result};

/// The hat artwork bundled with the editor.
pub const BUILTIN_HAT_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="300" viewBox="0 0 400 300">
  <ellipse cx="200" cy="255" rx="190" ry="38" fill="#1c1c1c"/>
  <path d="M95 250 L115 40 Q200 10 285 40 L305 250 Z" fill="#262626"/>
  <path d="M103 200 L297 200 L302 240 L98 240 Z" fill="#b3202a"/>
  <ellipse cx="200" cy="40" rx="85" ry="20" fill="#333333"/>
</svg>"##;

// ============================================================================
// HatSource
// ============================================================================

/// Where the hat artwork comes from.
///
/// ```
/// use hat_editor::HatSource;
///
/// let stock = HatSource::default();
/// assert_eq!(stock, HatSource::Builtin);
///
/// let custom: HatSource = "<svg>...</svg>".into();
/// assert!(matches!(custom, HatSource::Svg(_)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HatSource {
    /// The bundled top hat.
    #[default]
    Builtin,

    /// Raw SVG markup.
    Svg(String),

    /// Encoded raster image bytes (PNG, JPEG, ...).
    Raster(Vec<u8>),

    /// An emoji resolved through `twemoji_assets`.
    ///
    /// Only renders when the `twemoji` feature is enabled.
    Emoji(String),
}

impl HatSource {
    /// Creates a source from an emoji character.
    ///
    /// Returns `None` if the emoji is not supported by twemoji_assets.
    #[cfg(feature = "twemoji")]
    pub fn from_emoji(emoji: &str) -> Option<Self> {
        use twemoji_assets::svg::SvgTwemojiAsset;

        SvgTwemojiAsset::from_emoji(emoji)?;
        Some(Self::Emoji(emoji.to_string()))
    }

    /// Parses or decodes the source into a drawable sprite.
    pub fn prepare(&self) -> Result<Sprite> {
        let sprite = match self {
            Self::Builtin => Sprite::from_svg(BUILTIN_HAT_SVG)?,
            Self::Svg(svg) => Sprite::from_svg(svg)?,
            Self::Raster(bytes) => {
                let img = image::load_from_memory(bytes)
                    .map_err(|source| EditorError::Decode {
                        name: "hat".into(),
                        source,
                    })?
                    .to_rgba8();
                if img.width() == 0 || img.height() == 0 {
                    return Err(EditorError::EmptySprite {
                        width: img.width(),
                        height: img.height(),
                    });
                }
                Sprite::Raster(rgba_to_pixmap(&img)?)
            }
            Self::Emoji(emoji) => Sprite::from_svg(resolve_emoji(emoji)?)?,
        };
        Ok(sprite)
    }
}

impl From<&str> for HatSource {
    fn from(svg: &str) -> Self {
        Self::Svg(svg.to_string())
    }
}

impl From<String> for HatSource {
    fn from(svg: String) -> Self {
        Self::Svg(svg)
    }
}

#[cfg(feature = "twemoji")]
fn resolve_emoji(emoji: &str) -> Result<&'static str> {
    use twemoji_assets::svg::SvgTwemojiAsset;

    SvgTwemojiAsset::from_emoji(emoji)
        .map(<SvgTwemojiAsset as AsRef<str>>::as_ref)
        .ok_or_else(|| EditorError::UnsupportedEmoji(emoji.to_string()))
}

#[cfg(not(feature = "twemoji"))]
fn resolve_emoji(emoji: &str) -> Result<&'static str> {
    Err(EditorError::UnsupportedEmoji(emoji.to_string()))
}

// ============================================================================
// Sprite
// ============================================================================

/// A hat ready to draw at any transform.
///
/// Vector sprites are rasterized directly at the final transform so they
/// stay crisp at any size; raster sprites are resampled bilinearly.
pub enum Sprite {
    Vector(Tree),
    Raster(Pixmap),
}

impl std::fmt::Debug for Sprite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (width, height) = self.size();
        let kind = match self {
            Self::Vector(_) => "Vector",
            Self::Raster(_) => "Raster",
        };
        f.debug_struct("Sprite")
            .field("kind", &kind)
            .field("width", &width)
            .field("height", &height)
            .finish()
    }
}

impl Sprite {
    fn from_svg(svg: &str) -> Result<Self> {
        let tree = Tree::from_str(svg, &Options::default())?;
        let size = tree.size();
        if size.width() <= 0.0 || size.height() <= 0.0 {
            return Err(EditorError::EmptySprite {
                width: size.width() as u32,
                height: size.height() as u32,
            });
        }
        Ok(Self::Vector(tree))
    }

    /// Natural size of the sprite before any scaling.
    pub fn size(&self) -> (f32, f32) {
        match self {
            Self::Vector(tree) => (tree.size().width(), tree.size().height()),
            Self::Raster(pixmap) => (pixmap.width() as f32, pixmap.height() as f32),
        }
    }

    /// Draws the sprite with its top-left corner mapped through `transform`.
    pub fn draw(&self, target: &mut PixmapMut<'_>, transform: Transform) {
        match self {
            Self::Vector(tree) => resvg::render(tree, transform, target),
            Self::Raster(pixmap) => {
                let paint = PixmapPaint {
                    quality: FilterQuality::Bilinear,
                    ..PixmapPaint::default()
                };
                target.draw_pixmap(0, 0, pixmap.as_ref(), &paint, transform, None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#ff0000"/></svg>"##;

    #[test]
    fn builtin_hat_parses() {
        let sprite = HatSource::Builtin.prepare().unwrap();
        assert_eq!(sprite.size(), (400.0, 300.0));
    }

    #[test]
    fn svg_source_parses() {
        let sprite = HatSource::from(SQUARE_SVG).prepare().unwrap();
        assert_eq!(sprite.size(), (10.0, 10.0));
    }

    #[test]
    fn invalid_svg_fails() {
        let err = HatSource::Svg("definitely not svg".into())
            .prepare()
            .unwrap_err();
        assert!(matches!(err, EditorError::Svg(_)));
    }

    #[test]
    fn raster_source_decodes() {
        let img = RgbaImage::from_pixel(6, 4, Rgba([0, 0, 255, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let sprite = HatSource::Raster(bytes).prepare().unwrap();
        assert_eq!(sprite.size(), (6.0, 4.0));
    }

    #[test]
    fn raster_garbage_fails() {
        let err = HatSource::Raster(vec![0, 1, 2]).prepare().unwrap_err();
        assert!(matches!(err, EditorError::Decode { .. }));
    }

    #[test]
    fn vector_sprite_draws_at_transform() {
        let sprite = HatSource::from(SQUARE_SVG).prepare().unwrap();
        let mut pixmap = Pixmap::new(40, 40).unwrap();
        sprite.draw(
            &mut pixmap.as_mut(),
            Transform::from_translate(20.0, 20.0).pre_scale(2.0, 2.0),
        );

        let inside = pixmap.pixel(25, 25).unwrap();
        assert_eq!((inside.red(), inside.alpha()), (255, 255));
        let outside = pixmap.pixel(5, 5).unwrap();
        assert_eq!(outside.alpha(), 0);
    }

    #[cfg(not(feature = "twemoji"))]
    #[test]
    fn emoji_unsupported_without_feature() {
        let err = HatSource::Emoji("🎩".into()).prepare().unwrap_err();
        assert!(matches!(err, EditorError::UnsupportedEmoji(_)));
    }

    #[cfg(feature = "twemoji")]
    #[test]
    fn emoji_hat_renders() {
        let source = HatSource::from_emoji("🎩").expect("top hat emoji should be supported");
        let sprite = source.prepare().unwrap();
        let (w, h) = sprite.size();
        assert!(w > 0.0 && h > 0.0);
    }
}
