//! Layer infrastructure for the editor scene.
//!
//! The scene is a fixed stack of two layers: the fitted photo and the hat.
//! Each layer holds an optional configuration, a version number that bumps
//! on every change, and a cached rasterization of the canvas after the layer
//! was drawn. A composite cache on top returns the finished scene without
//! redrawing when nothing changed.
//!
//! Selection chrome is not part of the stack; it is drawn over the composite
//! for previews only (see [`selection`]).

pub mod background;
pub mod hat;
pub mod raster;
pub mod selection;
pub mod source;

pub use background::BackgroundConfig;
pub use hat::{HatConfig, HatTransform};
pub use source::{HatSource, Sprite};

use resvg::tiny_skia::Pixmap;

use crate::error::Result;
use crate::scene::SizePx;

// ============================================================================
// Render Context
// ============================================================================

/// Context that flows through the rendering pipeline.
pub struct RenderContext {
    /// The canvas being drawn, premultiplied.
    pub canvas: Pixmap,
}

impl RenderContext {
    /// Creates a context with a transparent canvas.
    pub fn new(size: SizePx) -> Result<Self> {
        Ok(Self {
            canvas: raster::new_pixmap(size.width, size.height)?,
        })
    }
}

// ============================================================================
// Layer Traits
// ============================================================================

/// Trait for layer configuration types.
///
/// Implementations must detect when a configuration meaningfully differs
/// from another, which drives cache invalidation.
pub trait LayerConfig: Clone {
    /// Returns true if this config differs from another in a way that
    /// would produce different rendering output.
    fn differs_from(&self, other: &Self) -> bool;
}

/// Trait for layer configurations that know how to draw themselves.
pub trait LayerEffect: LayerConfig {
    /// Returns the dependency version for cache invalidation.
    ///
    /// Root layers return `DependencyVersion::NONE`.
    fn dependencies(versions: &LayerVersions) -> DependencyVersion;

    /// Draws onto the canvas in the render context.
    fn draw(&self, ctx: &mut RenderContext) -> Result<()>;
}

// ============================================================================
// Layer Dependencies
// ============================================================================

/// Combined version of upstream layer dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DependencyVersion(u64);

impl DependencyVersion {
    /// No dependencies (root layer).
    pub const NONE: Self = Self(0);

    pub fn from_version(version: u64) -> Self {
        Self(version)
    }

    /// Combines multiple upstream layer versions into one.
    pub fn combine(versions: &[u64]) -> Self {
        Self(
            versions
                .iter()
                .fold(0u64, |acc, v| acc.wrapping_mul(1_000_003).wrapping_add(*v)),
        )
    }
}

/// Snapshot of all layer versions in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerVersions {
    pub background: u64,
    pub hat: u64,
}

// ============================================================================
// Generic Layer
// ============================================================================

/// A layer with configuration, version tracking, and a cached result.
pub struct Layer<C: LayerConfig> {
    config: Option<C>,
    version: u64,
    cache: Option<(Pixmap, DependencyVersion)>,
}

impl<C: LayerConfig> Default for Layer<C> {
    fn default() -> Self {
        Self {
            config: None,
            version: 0,
            cache: None,
        }
    }
}

impl<C: LayerConfig> Layer<C> {
    /// Returns the current configuration, if any.
    pub fn config(&self) -> Option<&C> {
        self.config.as_ref()
    }

    /// Returns true if the layer has a configuration set.
    pub fn has_config(&self) -> bool {
        self.config.is_some()
    }

    /// Returns the current version number.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Sets the configuration. Returns true if it changed.
    ///
    /// Clears the cache and increments version if the config differs.
    pub fn set_config(&mut self, config: Option<C>) -> bool {
        let differs = match (&self.config, &config) {
            (None, None) => false,
            (Some(_), None) | (None, Some(_)) => true,
            (Some(old), Some(new)) => old.differs_from(new),
        };

        if differs {
            self.config = config;
            self.invalidate();
        }
        differs
    }

    /// Edits the configuration in place, if one is set.
    ///
    /// Returns true if the edit changed the rendering.
    pub fn update(&mut self, edit: impl FnOnce(&mut C)) -> bool {
        let Some(current) = self.config.as_ref() else {
            return false;
        };
        let mut next = current.clone();
        edit(&mut next);
        self.set_config(Some(next))
    }

    /// Invalidates the cache and increments version.
    pub fn invalidate(&mut self) {
        self.version = self.version.wrapping_add(1);
        self.cache = None;
    }

    fn cached(&self, deps: DependencyVersion) -> Option<&Pixmap> {
        match &self.cache {
            Some((pixmap, stored)) if *stored == deps => Some(pixmap),
            _ => None,
        }
    }
}

impl<C: LayerEffect> Layer<C> {
    /// Draws this layer into the context, using the cache if valid.
    ///
    /// A layer without configuration leaves the context unchanged.
    pub fn apply(&mut self, ctx: &mut RenderContext, versions: &LayerVersions) -> Result<()> {
        let Some(config) = self.config.as_ref() else {
            return Ok(());
        };

        let deps = C::dependencies(versions);
        if let Some(cached) = self.cached(deps) {
            ctx.canvas = cached.clone();
            return Ok(());
        }

        config.draw(ctx)?;
        self.cache = Some((ctx.canvas.clone(), deps));
        Ok(())
    }
}

// ============================================================================
// Composite Layer
// ============================================================================

/// A cache-only layer holding the finished scene.
#[derive(Default)]
pub struct CompositeLayer {
    cache: Option<(Pixmap, DependencyVersion)>,
}

impl CompositeLayer {
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    fn cached(&self, deps: DependencyVersion) -> Option<&Pixmap> {
        match &self.cache {
            Some((pixmap, stored)) if *stored == deps => Some(pixmap),
            _ => None,
        }
    }
}

// ============================================================================
// Layer Pipeline
// ============================================================================

/// The editor scene as a layer stack.
///
/// ```text
/// Canvas (transparent)
///     │
///     ▼
/// ┌────────────┐
/// │ Background │ ◄── No dependencies (fill + fitted photo)
/// └─────┬──────┘
///       ▼
/// ┌────────────┐
/// │    Hat     │ ◄── Depends on: Background
/// └─────┬──────┘
///       ▼
/// ┌────────────┐
/// │ Composite  │ ◄── Depends on: Background + Hat
/// └────────────┘
/// ```
pub struct LayerPipeline {
    size: SizePx,

    /// Background fill and photo.
    pub background: Layer<BackgroundConfig>,

    /// The hat. No configuration means no hat in the scene.
    pub hat: Layer<HatConfig>,

    composite: CompositeLayer,
}

impl LayerPipeline {
    /// Creates an empty pipeline for a canvas of the given size.
    pub fn new(size: SizePx) -> Self {
        Self {
            size,
            background: Layer::default(),
            hat: Layer::default(),
            composite: CompositeLayer::default(),
        }
    }

    pub fn size(&self) -> SizePx {
        self.size
    }

    /// Returns a snapshot of all layer versions.
    pub fn layer_versions(&self) -> LayerVersions {
        LayerVersions {
            background: self.background.version(),
            hat: self.hat.version(),
        }
    }

    /// Invalidates all caches.
    pub fn invalidate_all(&mut self) {
        self.background.invalidate();
        self.hat.invalidate();
        self.composite.invalidate();
    }

    fn composite_dependencies(&self) -> DependencyVersion {
        DependencyVersion::combine(&[self.background.version(), self.hat.version()])
    }

    /// Renders the scene through every layer.
    ///
    /// Returns the cached composite when no layer changed since the last call.
    pub fn render(&mut self) -> Result<Pixmap> {
        let composite_deps = self.composite_dependencies();
        if let Some(cached) = self.composite.cached(composite_deps) {
            return Ok(cached.clone());
        }

        let mut ctx = RenderContext::new(self.size)?;
        let versions = self.layer_versions();
        self.background.apply(&mut ctx, &versions)?;
        self.hat.apply(&mut ctx, &versions)?;

        self.composite.cache = Some((ctx.canvas.clone(), composite_deps));
        Ok(ctx.canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resvg::tiny_skia::Color;

    /// Paints the whole canvas one color and counts its draws.
    #[derive(Clone)]
    struct Flood {
        rgba: [u8; 4],
        draws: std::rc::Rc<std::cell::Cell<u32>>,
    }

    impl LayerConfig for Flood {
        fn differs_from(&self, other: &Self) -> bool {
            self.rgba != other.rgba
        }
    }

    impl LayerEffect for Flood {
        fn dependencies(_versions: &LayerVersions) -> DependencyVersion {
            DependencyVersion::NONE
        }

        fn draw(&self, ctx: &mut RenderContext) -> Result<()> {
            let [r, g, b, a] = self.rgba;
            ctx.canvas.fill(Color::from_rgba8(r, g, b, a));
            self.draws.set(self.draws.get() + 1);
            Ok(())
        }
    }

    fn flood(rgba: [u8; 4]) -> Flood {
        Flood {
            rgba,
            draws: Default::default(),
        }
    }

    fn versions() -> LayerVersions {
        LayerVersions {
            background: 0,
            hat: 0,
        }
    }

    #[test]
    fn set_config_tracks_versions() {
        let mut layer: Layer<Flood> = Layer::default();
        assert!(!layer.has_config());
        assert_eq!(layer.version(), 0);

        assert!(layer.set_config(Some(flood([1, 2, 3, 255]))));
        assert_eq!(layer.version(), 1);

        // Same config is not a change
        assert!(!layer.set_config(Some(flood([1, 2, 3, 255]))));
        assert_eq!(layer.version(), 1);

        assert!(layer.set_config(None));
        assert_eq!(layer.version(), 2);
        assert!(!layer.set_config(None));
    }

    #[test]
    fn update_edits_in_place() {
        let mut layer: Layer<Flood> = Layer::default();
        assert!(!layer.update(|f| f.rgba = [9, 9, 9, 255]));

        layer.set_config(Some(flood([0, 0, 0, 255])));
        assert!(layer.update(|f| f.rgba = [9, 9, 9, 255]));
        assert_eq!(layer.config().unwrap().rgba, [9, 9, 9, 255]);
        assert!(!layer.update(|f| f.rgba = [9, 9, 9, 255]));
    }

    #[test]
    fn apply_uses_cache() {
        let mut layer: Layer<Flood> = Layer::default();
        let config = flood([255, 0, 0, 255]);
        let draws = config.draws.clone();
        layer.set_config(Some(config));

        let size = SizePx::new(4, 4);
        let mut ctx = RenderContext::new(size).unwrap();
        layer.apply(&mut ctx, &versions()).unwrap();
        let mut ctx = RenderContext::new(size).unwrap();
        layer.apply(&mut ctx, &versions()).unwrap();

        assert_eq!(draws.get(), 1);
        assert_eq!(ctx.canvas.pixel(0, 0).unwrap().red(), 255);
    }

    #[test]
    fn apply_without_config_is_noop() {
        let mut layer: Layer<Flood> = Layer::default();
        let mut ctx = RenderContext::new(SizePx::new(2, 2)).unwrap();
        layer.apply(&mut ctx, &versions()).unwrap();
        assert_eq!(ctx.canvas.pixel(0, 0).unwrap().alpha(), 0);
    }

    #[test]
    fn combine_is_order_sensitive() {
        assert_ne!(
            DependencyVersion::combine(&[1, 2]),
            DependencyVersion::combine(&[2, 1])
        );
    }
}
