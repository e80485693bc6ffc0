//! The image editor: a fitted photo with an optional hat on top.

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;
use palette::Srgb;
use resvg::tiny_skia::Pixmap;
use tracing::{debug, info};

use crate::config::EditorConfig;
use crate::controls::ControlsState;
use crate::error::Result;
use crate::export::Export;
use crate::layer::raster::pixmap_to_rgba;
use crate::layer::selection::{draw_selection, handle_at};
use crate::layer::{
    BackgroundConfig, HatConfig, HatSource, HatTransform, LayerPipeline, Sprite,
};
use crate::scene::{Photo, PointPx, SizePx};
use crate::upload::SelectedFile;

// ============================================================================
// Notice
// ============================================================================

/// A short confirmation the UI may show after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    HatAdded,
    HatRemoved,
    Downloaded,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::HatAdded => "Hat added! Drag to position it perfectly.",
            Self::HatRemoved => "Hat removed!",
            Self::Downloaded => "Image downloaded successfully!",
        };
        f.write_str(message)
    }
}

// ============================================================================
// ImageEditor
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Drag {
    /// Moving the hat with the pointer.
    Move { last: PointPx },
    /// Resizing the hat from a corner handle, relative to where the
    /// gesture started.
    Scale { start_distance: f32, start_size: i32 },
}

/// Editor for a single uploaded photo.
///
/// The photo is fitted to the canvas and centered. At most one hat can be
/// placed over it; while the hat exists it can be dragged, resized (with
/// the slider or a corner handle) and rotated. Resize and rotate calls without a hat are ignored.
///
/// # Example
///
/// ```
/// use hat_editor::{EditorConfig, ImageEditor, SelectedFile};
/// # use image::{ImageFormat, Rgba, RgbaImage};
/// # let mut bytes = Vec::new();
/// # RgbaImage::from_pixel(16, 12, Rgba([90, 120, 200, 255]))
/// #     .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
/// #     .unwrap();
///
/// let file = SelectedFile::new("me.png", "image/png", bytes);
/// let mut editor = ImageEditor::open(&file, EditorConfig::default()).unwrap();
///
/// editor.add_hat().unwrap();
/// editor.set_hat_size(150.0);
/// editor.set_hat_rotation(-15.0);
///
/// let (export, _notice) = editor.download().unwrap();
/// assert_eq!(export.file_name, "photo-with-hat.png");
/// ```
pub struct ImageEditor {
    config: EditorConfig,
    photo: Arc<Photo>,
    selection_color: Srgb<u8>,

    hat_source: HatSource,
    /// Prepared artwork for `hat_source`, kept across remove/add.
    sprite: Option<Arc<Sprite>>,

    hat_size: i32,
    hat_rotation: i32,
    active: bool,
    drag: Option<Drag>,

    pipeline: LayerPipeline,
}

impl ImageEditor {
    /// Decodes `file` and places it on a fresh canvas.
    pub fn open(file: &SelectedFile, config: EditorConfig) -> Result<Self> {
        config.validate()?;
        let photo = Arc::new(Photo::decode(file)?);
        Self::with_photo(photo, config)
    }

    /// Places an already decoded photo on a fresh canvas.
    pub fn with_photo(photo: Arc<Photo>, config: EditorConfig) -> Result<Self> {
        config.validate()?;
        let background = config.background_rgb()?;
        let selection_color = config.selection_rgb()?;

        let size = SizePx::new(config.canvas_width, config.canvas_height);
        let mut pipeline = LayerPipeline::new(size);
        pipeline
            .background
            .set_config(Some(BackgroundConfig::new(background, Some(photo.clone()))));

        if let Some(fit) = pipeline
            .background
            .config()
            .and_then(|bg| bg.placement(size))
        {
            debug!(
                photo = %photo.name,
                scale = fit.scale,
                left = fit.left,
                top = fit.top,
                "photo placed"
            );
        }

        Ok(Self {
            hat_size: config.size_slider.initial,
            hat_rotation: config.rotation_slider.initial,
            config,
            photo,
            selection_color,
            hat_source: HatSource::default(),
            sprite: None,
            active: false,
            drag: None,
            pipeline,
        })
    }

    // ---- Accessors ----

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn photo(&self) -> &Photo {
        &self.photo
    }

    pub fn canvas_size(&self) -> SizePx {
        self.pipeline.size()
    }

    pub fn has_hat(&self) -> bool {
        self.pipeline.hat.has_config()
    }

    /// Current size slider value, in percent.
    pub fn hat_size(&self) -> i32 {
        self.hat_size
    }

    /// Current rotation slider value, in degrees.
    pub fn hat_rotation(&self) -> i32 {
        self.hat_rotation
    }

    pub fn hat_center(&self) -> Option<PointPx> {
        self.pipeline.hat.config().map(|hat| hat.transform.center)
    }

    /// Returns true if the hat is the selected object.
    pub fn is_hat_active(&self) -> bool {
        self.active && self.has_hat()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn hat_source(&self) -> &HatSource {
        &self.hat_source
    }

    // ---- Hat ----

    /// Replaces the hat artwork.
    ///
    /// A hat already on the canvas keeps its position, size and rotation.
    pub fn set_hat_source(&mut self, source: HatSource) -> Result<()> {
        let sprite = Arc::new(source.prepare()?);
        self.hat_source = source;
        self.sprite = Some(sprite.clone());
        self.pipeline.hat.update(|hat| hat.sprite = sprite);
        Ok(())
    }

    fn sprite(&mut self) -> Result<Arc<Sprite>> {
        if let Some(sprite) = &self.sprite {
            return Ok(sprite.clone());
        }
        let sprite = Arc::new(self.hat_source.prepare()?);
        self.sprite = Some(sprite.clone());
        Ok(sprite)
    }

    /// Puts the hat on the canvas and selects it.
    ///
    /// Returns `None` without changes if there already is a hat.
    pub fn add_hat(&mut self) -> Result<Option<Notice>> {
        if self.has_hat() {
            return Ok(None);
        }

        let sprite = self.sprite()?;
        let size = self.canvas_size();
        let anchor = self.config.hat_anchor;
        let center = PointPx::new(
            size.width as f32 * anchor.x,
            size.height as f32 * anchor.y,
        );
        let transform = HatTransform {
            center,
            size_percent: self.hat_size,
            rotation_degrees: self.hat_rotation,
        };
        self.pipeline.hat.set_config(Some(HatConfig::new(
            sprite,
            self.config.hat_base_scale,
            transform,
        )));
        self.active = true;

        info!(x = center.x, y = center.y, "hat added");
        Ok(Some(Notice::HatAdded))
    }

    /// Takes the hat off the canvas and resets size and rotation.
    ///
    /// Returns `None` if there is no hat.
    pub fn remove_hat(&mut self) -> Option<Notice> {
        if !self.has_hat() {
            return None;
        }

        self.pipeline.hat.set_config(None);
        self.hat_size = self.config.size_slider.initial;
        self.hat_rotation = self.config.rotation_slider.initial;
        self.active = false;
        self.drag = None;

        info!("hat removed");
        Some(Notice::HatRemoved)
    }

    /// Sets the hat size in percent, snapped to the size slider.
    ///
    /// Returns the applied value, or `None` if there is no hat.
    pub fn set_hat_size(&mut self, percent: f32) -> Option<i32> {
        if !self.has_hat() {
            return None;
        }

        let size = self.config.size_slider.snap(percent);
        self.hat_size = size;
        self.pipeline
            .hat
            .update(|hat| hat.transform.size_percent = size);
        debug!(size, "hat size");
        Some(size)
    }

    /// Sets the hat rotation in degrees, snapped to the rotation slider.
    ///
    /// Returns the applied value, or `None` if there is no hat.
    pub fn set_hat_rotation(&mut self, degrees: f32) -> Option<i32> {
        if !self.has_hat() {
            return None;
        }

        let rotation = self.config.rotation_slider.snap(degrees);
        self.hat_rotation = rotation;
        self.pipeline
            .hat
            .update(|hat| hat.transform.rotation_degrees = rotation);
        debug!(rotation, "hat rotation");
        Some(rotation)
    }

    /// Moves the hat's center to `point`. Returns false if there is no hat.
    pub fn move_hat_to(&mut self, point: PointPx) -> bool {
        if !self.has_hat() {
            return false;
        }
        self.pipeline.hat.update(|hat| hat.transform.center = point);
        true
    }

    // ---- Selection & pointer ----

    /// Makes the hat the active object. Returns false if there is no hat.
    pub fn select_hat(&mut self) -> bool {
        self.active = self.has_hat();
        self.active
    }

    /// Clears the active object.
    pub fn discard_selection(&mut self) {
        self.active = false;
        self.drag = None;
    }

    /// Starts a gesture at `point`.
    ///
    /// Pressing a corner handle of the selected hat starts a resize;
    /// pressing on the hat selects it and starts a drag; pressing anywhere
    /// else clears the selection. The photo never reacts to the pointer.
    pub fn pointer_down(&mut self, point: PointPx) -> bool {
        let Some(hat) = self.pipeline.hat.config() else {
            self.discard_selection();
            return false;
        };
        let center = hat.transform.center;

        if self.active && handle_at(hat, point).is_some() {
            let (dx, dy) = point.offset_from(center);
            let start_distance = dx.hypot(dy);
            if start_distance > f32::EPSILON {
                self.drag = Some(Drag::Scale {
                    start_distance,
                    start_size: self.hat_size,
                });
                debug!(x = point.x, y = point.y, "resize started");
                return true;
            }
        }

        let hit = hat.contains(point);
        if hit {
            self.active = true;
            self.drag = Some(Drag::Move { last: point });
        } else {
            self.discard_selection();
        }
        debug!(x = point.x, y = point.y, hit, "pointer down");
        hit
    }

    /// Continues a gesture. Returns true if the hat changed.
    pub fn pointer_move(&mut self, point: PointPx) -> bool {
        match self.drag {
            Some(Drag::Move { last }) => {
                let (dx, dy) = point.offset_from(last);
                self.drag = Some(Drag::Move { last: point });
                self.pipeline
                    .hat
                    .update(|hat| hat.transform.center = hat.transform.center.translated(dx, dy))
            }
            Some(Drag::Scale {
                start_distance,
                start_size,
            }) => {
                let Some(center) = self.hat_center() else {
                    return false;
                };
                let (dx, dy) = point.offset_from(center);
                let percent = start_size as f32 * dx.hypot(dy) / start_distance;
                let previous = self.hat_size;
                self.set_hat_size(percent) != Some(previous)
            }
            None => false,
        }
    }

    /// Ends the current gesture. The selection stays.
    pub fn pointer_up(&mut self) {
        if self.drag.take().is_some()
            && let Some(center) = self.hat_center()
        {
            debug!(x = center.x, y = center.y, size = self.hat_size, "gesture ended");
        }
    }

    // ---- Rendering ----

    fn render_scene(&mut self) -> Result<Pixmap> {
        self.pipeline.render()
    }

    /// Renders the scene as shown on screen, with selection chrome when
    /// the hat is active.
    pub fn render_preview(&mut self) -> Result<RgbaImage> {
        let mut pixmap = self.render_scene()?;
        if self.active
            && let Some(hat) = self.pipeline.hat.config()
        {
            draw_selection(&mut pixmap, hat, self.selection_color);
        }
        Ok(pixmap_to_rgba(&pixmap))
    }

    /// Renders the scene without any selection chrome.
    pub fn render_export(&mut self) -> Result<RgbaImage> {
        Ok(pixmap_to_rgba(&self.render_scene()?))
    }

    /// Clears the selection and encodes the scene as PNG.
    pub fn download(&mut self) -> Result<(Export, Notice)> {
        self.discard_selection();
        let image = self.render_export()?;
        let export = Export::encode(self.config.export_file_name.clone(), &image)?;

        info!(
            file = %export.file_name,
            bytes = export.png.len(),
            has_hat = self.has_hat(),
            "image exported"
        );
        Ok((export, Notice::Downloaded))
    }

    /// Snapshot for the toolbar and hat panel.
    pub fn controls(&self) -> ControlsState {
        ControlsState::new(
            self.has_hat(),
            self.hat_size,
            self.hat_rotation,
            self.config.size_slider,
            self.config.rotation_slider,
        )
    }

    /// Drops cached renders. Useful for freeing memory.
    pub fn clear_cache(&mut self) {
        self.pipeline.invalidate_all();
    }
}

// ============================================================================
// Tests
// ============================================================================
