//! Hat layer: a sprite centered on a point, scaled and rotated about its center.

use std::sync::Arc;

use resvg::tiny_skia::{Point, Transform};

use super::source::Sprite;
use super::{DependencyVersion, LayerConfig, LayerEffect, LayerVersions, RenderContext};
use crate::error::Result;
use crate::scene::PointPx;

// ============================================================================
// HatTransform
// ============================================================================

/// Placement of the hat on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HatTransform {
    /// Canvas position of the hat's center.
    pub center: PointPx,

    /// Size relative to the base scale, in percent.
    pub size_percent: i32,

    /// Clockwise rotation about the center, in degrees.
    pub rotation_degrees: i32,
}

impl HatTransform {
    /// Effective scale factor for a given base scale.
    pub fn scale(&self, base_scale: f32) -> f32 {
        self.size_percent as f32 / 100.0 * base_scale
    }
}

// ============================================================================
// HatConfig
// ============================================================================

/// Configuration for the hat layer.
#[derive(Debug, Clone)]
pub struct HatConfig {
    /// The prepared artwork, shared between configs.
    pub sprite: Arc<Sprite>,

    /// Scale applied at 100% size.
    pub base_scale: f32,

    pub transform: HatTransform,
}

impl HatConfig {
    pub fn new(sprite: Arc<Sprite>, base_scale: f32, transform: HatTransform) -> Self {
        Self {
            sprite,
            base_scale,
            transform,
        }
    }

    /// Maps sprite-local coordinates to canvas coordinates.
    pub fn canvas_transform(&self) -> Transform {
        let (w, h) = self.sprite.size();
        let scale = self.transform.scale(self.base_scale);
        Transform::from_translate(self.transform.center.x, self.transform.center.y)
            .pre_concat(Transform::from_rotate(self.transform.rotation_degrees as f32))
            .pre_scale(scale, scale)
            .pre_translate(-w / 2.0, -h / 2.0)
    }

    /// The four sprite corners on the canvas, clockwise from top-left.
    pub fn corners(&self) -> [PointPx; 4] {
        let (w, h) = self.sprite.size();
        let mut points = [
            Point::from_xy(0.0, 0.0),
            Point::from_xy(w, 0.0),
            Point::from_xy(w, h),
            Point::from_xy(0.0, h),
        ];
        self.canvas_transform().map_points(&mut points);
        points.map(|p| PointPx::new(p.x, p.y))
    }

    /// Returns true if a canvas point lies on the hat's (rotated) bounds.
    pub fn contains(&self, point: PointPx) -> bool {
        let Some(inverse) = self.canvas_transform().invert() else {
            return false;
        };
        let mut local = [Point::from_xy(point.x, point.y)];
        inverse.map_points(&mut local);

        let (w, h) = self.sprite.size();
        let p = local[0];
        p.x >= 0.0 && p.y >= 0.0 && p.x <= w && p.y <= h
    }
}

impl LayerConfig for HatConfig {
    fn differs_from(&self, other: &Self) -> bool {
        !Arc::ptr_eq(&self.sprite, &other.sprite)
            || (self.base_scale - other.base_scale).abs() > 0.0001
            || self.transform != other.transform
    }
}

impl LayerEffect for HatConfig {
    /// The hat is drawn over the background and must be redrawn when it changes.
    fn dependencies(versions: &LayerVersions) -> DependencyVersion {
        DependencyVersion::from_version(versions.background)
    }

    fn draw(&self, ctx: &mut RenderContext) -> Result<()> {
        if self.transform.scale(self.base_scale) <= 0.0 {
            return Ok(());
        }
        self.sprite
            .draw(&mut ctx.canvas.as_mut(), self.canvas_transform());
        Ok(())
    }
}
