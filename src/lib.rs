//! hat-editor: Put a hat on a photo.
//!
//! This crate implements a small photo editor: the user uploads a photo,
//! places a hat on it, drags it into position, resizes and rotates it with
//! sliders, and downloads the result as a PNG.
//!
//! # Example
//!
//! ```
//! use hat_editor::{App, EditorConfig, PointPx, SelectedFile, UploadEvent};
//! # use image::{ImageFormat, Rgba, RgbaImage};
//! # let mut bytes = Vec::new();
//! # RgbaImage::from_pixel(64, 48, Rgba([180, 140, 120, 255]))
//! #     .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
//! #     .unwrap();
//!
//! let mut app = App::new(EditorConfig::default());
//! app.handle_upload(UploadEvent::Drop(vec![SelectedFile::new("me.png", "image/png", bytes)]))
//!     .unwrap();
//!
//! let editor = app.editor_mut().unwrap();
//! editor.add_hat().unwrap();
//!
//! // Drag the hat from its starting point to the left
//! editor.pointer_down(PointPx::new(400.0, 200.0));
//! editor.pointer_move(PointPx::new(300.0, 180.0));
//! editor.pointer_up();
//!
//! editor.set_hat_size(120.0);
//! editor.set_hat_rotation(-10.0);
//!
//! let (export, notice) = editor.download().unwrap();
//! assert!(export.to_data_url().starts_with("data:image/png;base64,"));
//! println!("{notice}");
//!
//! // "New Photo"
//! app.reset();
//! ```
//!
//! # Browser
//!
//! With the `canvas` feature, [`HatEditorWidget`] exposes the editor to
//! JavaScript and renders into an HTML canvas element.

mod app;
mod config;
mod controls;
mod editor;
mod error;
mod export;
mod layer;
mod scene;
mod upload;

#[cfg(feature = "canvas")]
mod canvas;

pub use app::{App, View};
pub use config::{EditorConfig, HatAnchor, SliderRange};
pub use controls::ControlsState;
pub use editor::{ImageEditor, Notice};
pub use error::{EditorError, Result};
pub use export::Export;
pub use layer::source::BUILTIN_HAT_SVG;
pub use layer::{
    BackgroundConfig, DependencyVersion, HatConfig, HatSource, HatTransform, Layer, LayerConfig,
    LayerEffect, LayerPipeline, LayerVersions, RenderContext, Sprite,
};
pub use scene::{FitPlacement, Photo, PointPx, SizePx};
pub use upload::{FileUpload, SelectedFile, UploadEvent};

#[cfg(feature = "canvas")]
pub use canvas::HatEditorWidget;
