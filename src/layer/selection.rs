//! Selection chrome for the active hat: a border along its rotated bounds
//! and a square handle on each corner. Dragging a handle resizes the hat.

use palette::Srgb;
use resvg::tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use super::hat::HatConfig;
use crate::scene::PointPx;

/// Side length of a corner handle, in pixels.
pub const HANDLE_SIZE: f32 = 13.0;

/// Draws the selection border and handles for `hat` onto `canvas`.
pub fn draw_selection(canvas: &mut Pixmap, hat: &HatConfig, color: Srgb<u8>) {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.red, color.green, color.blue, 255);
    paint.anti_alias = true;

    let corners = hat.corners();
    let mut pb = PathBuilder::new();
    pb.move_to(corners[0].x, corners[0].y);
    for corner in &corners[1..] {
        pb.line_to(corner.x, corner.y);
    }
    pb.close();
    if let Some(border) = pb.finish() {
        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };
        canvas.stroke_path(&border, &paint, &stroke, Transform::identity(), None);
    }

    let half = HANDLE_SIZE / 2.0;
    for corner in corners {
        if let Some(handle) = Rect::from_xywh(corner.x - half, corner.y - half, HANDLE_SIZE, HANDLE_SIZE) {
            canvas.fill_rect(handle, &paint, Transform::identity(), None);
        }
    }
}

/// Returns the index of the corner handle under `point`, clockwise from
/// top-left, as drawn by [`draw_selection`].
pub fn handle_at(hat: &HatConfig, point: PointPx) -> Option<usize> {
    let half = HANDLE_SIZE / 2.0;
    hat.corners()
        .iter()
        .position(|c| (point.x - c.x).abs() <= half && (point.y - c.y).abs() <= half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{HatSource, HatTransform};
    use std::sync::Arc;

    fn frame() -> HatConfig {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="none"/></svg>"##;
        let sprite = Arc::new(HatSource::from(svg).prepare().unwrap());
        HatConfig::new(
            sprite,
            1.0,
            HatTransform {
                center: PointPx::new(50.0, 50.0),
                size_percent: 100,
                rotation_degrees: 0,
            },
        )
    }

    #[test]
    fn handle_hit_test() {
        let hat = frame();
        assert_eq!(handle_at(&hat, PointPx::new(30.0, 40.0)), Some(0));
        assert_eq!(handle_at(&hat, PointPx::new(75.0, 65.0)), Some(2));
        assert_eq!(handle_at(&hat, PointPx::new(50.0, 50.0)), None);
        assert_eq!(handle_at(&hat, PointPx::new(30.0, 48.0)), None);
    }

    #[test]
    fn handles_drawn_on_corners() {
        let hat = frame();

        let mut canvas = Pixmap::new(100, 100).unwrap();
        draw_selection(&mut canvas, &hat, Srgb::new(178, 204, 255));

        // Top-left corner at (30, 40)
        let handle = canvas.pixel(30, 40).unwrap();
        assert_eq!(handle.alpha(), 255);
        assert_eq!(handle.blue(), 255);

        // Interior of the hat stays untouched
        assert_eq!(canvas.pixel(50, 50).unwrap().alpha(), 0);
    }
}
