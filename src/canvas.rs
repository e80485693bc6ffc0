//! HTML Canvas binding for WASM environments.
//!
//! This module provides [`HatEditorWidget`], a wrapper around [`ImageEditor`]
//! that renders straight into an HTML canvas element and triggers the PNG
//! download in the browser.
//!
//! # Feature Flag
//!
//! This module is only available with the `canvas` feature enabled:
//!
//! ```toml
//! [dependencies]
//! hat-editor = { version = "0.1", features = ["canvas"] }
//! ```
//!
//! # Example (JavaScript/TypeScript)
//!
//! ```javascript
//! import init, { HatEditorWidget } from 'hat-editor';
//!
//! await init();
//!
//! const canvas = document.getElementById('editor-canvas');
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const editor = HatEditorWidget.open(file.name, file.type, bytes);
//!
//! editor.addHat();
//! editor.setHatSize(120);
//! editor.renderToCanvas(canvas);
//!
//! canvas.onpointerdown = (e) => editor.pointerDown(e.offsetX, e.offsetY);
//! canvas.onpointermove = (e) => {
//!   if (editor.pointerMove(e.offsetX, e.offsetY)) editor.renderToCanvas(canvas);
//! };
//! canvas.onpointerup = () => editor.pointerUp();
//!
//! editor.download();
//! ```

use wasm_bindgen::Clamped;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement, ImageData};

use crate::config::EditorConfig;
use crate::editor::ImageEditor;
use crate::layer::HatSource;
use crate::scene::PointPx;
use crate::upload::SelectedFile;

fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

// ============================================================================
// HatEditorWidget
// ============================================================================

/// An [`ImageEditor`] exposed to JavaScript.
///
/// Methods that change the scene return the notice text (or `undefined`)
/// so the page can show a toast.
#[wasm_bindgen]
pub struct HatEditorWidget {
    editor: ImageEditor,
}

#[wasm_bindgen]
impl HatEditorWidget {
    /// Opens an editor on the bytes of an uploaded file with the default config.
    pub fn open(name: &str, mime: &str, bytes: &[u8]) -> Result<HatEditorWidget, JsError> {
        Self::open_with_config(name, mime, bytes, "{}")
    }

    /// Opens an editor with a JSON [`EditorConfig`].
    #[wasm_bindgen(js_name = "openWithConfig")]
    pub fn open_with_config(
        name: &str,
        mime: &str,
        bytes: &[u8],
        config_json: &str,
    ) -> Result<HatEditorWidget, JsError> {
        let config = EditorConfig::from_json(config_json).map_err(js_error)?;
        let file = SelectedFile::new(name, mime, bytes.to_vec());
        let editor = ImageEditor::open(&file, config).map_err(js_error)?;
        Ok(Self { editor })
    }

    // ---- Hat ----

    /// Uses custom SVG markup as the hat.
    #[wasm_bindgen(js_name = "setHatSvg")]
    pub fn set_hat_svg(&mut self, svg: String) -> Result<(), JsError> {
        self.editor
            .set_hat_source(HatSource::Svg(svg))
            .map_err(js_error)
    }

    /// Uses an encoded raster image (PNG, JPEG, ...) as the hat.
    #[wasm_bindgen(js_name = "setHatImage")]
    pub fn set_hat_image(&mut self, bytes: &[u8]) -> Result<(), JsError> {
        self.editor
            .set_hat_source(HatSource::Raster(bytes.to_vec()))
            .map_err(js_error)
    }

    /// Uses an emoji as the hat. Requires the `twemoji` feature.
    #[cfg(feature = "twemoji")]
    #[wasm_bindgen(js_name = "setHatEmoji")]
    pub fn set_hat_emoji(&mut self, emoji: &str) -> Result<(), JsError> {
        let source = HatSource::from_emoji(emoji)
            .ok_or_else(|| JsError::new(&format!("Unsupported emoji: {}", emoji)))?;
        self.editor.set_hat_source(source).map_err(js_error)
    }

    #[wasm_bindgen(js_name = "addHat")]
    pub fn add_hat(&mut self) -> Result<Option<String>, JsError> {
        let notice = self.editor.add_hat().map_err(js_error)?;
        Ok(notice.map(|n| n.to_string()))
    }

    #[wasm_bindgen(js_name = "removeHat")]
    pub fn remove_hat(&mut self) -> Option<String> {
        self.editor.remove_hat().map(|n| n.to_string())
    }

    /// Applies the size slider. Returns the snapped value, or `undefined`
    /// when there is no hat.
    #[wasm_bindgen(js_name = "setHatSize")]
    pub fn set_hat_size(&mut self, percent: f32) -> Option<i32> {
        self.editor.set_hat_size(percent)
    }

    /// Applies the rotation slider. Returns the snapped value, or
    /// `undefined` when there is no hat.
    #[wasm_bindgen(js_name = "setHatRotation")]
    pub fn set_hat_rotation(&mut self, degrees: f32) -> Option<i32> {
        self.editor.set_hat_rotation(degrees)
    }

    // ---- Pointer ----

    #[wasm_bindgen(js_name = "pointerDown")]
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.editor.pointer_down(PointPx::new(x, y))
    }

    #[wasm_bindgen(js_name = "pointerMove")]
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.editor.pointer_move(PointPx::new(x, y))
    }

    #[wasm_bindgen(js_name = "pointerUp")]
    pub fn pointer_up(&mut self) {
        self.editor.pointer_up();
    }

    // ---- Rendering ----

    /// Draws the preview (with selection chrome) into `canvas`.
    ///
    /// The canvas is resized to the editor's canvas size.
    #[wasm_bindgen(js_name = "renderToCanvas")]
    pub fn render_to_canvas(&mut self, canvas: &HtmlCanvasElement) -> Result<(), JsError> {
        let rendered = self.editor.render_preview().map_err(js_error)?;
        let width = rendered.width();
        let height = rendered.height();

        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(|_| JsError::new("Failed to get 2d context"))?
            .ok_or_else(|| JsError::new("Canvas 2d context is null"))?
            .dyn_into()
            .map_err(|_| JsError::new("Failed to cast to CanvasRenderingContext2d"))?;

        let raw_pixels: Vec<u8> = rendered.into_raw();
        let image_data =
            ImageData::new_with_u8_clamped_array_and_sh(Clamped(&raw_pixels), width, height)
                .map_err(|_| JsError::new("Failed to create ImageData"))?;

        ctx.put_image_data(&image_data, 0.0, 0.0)
            .map_err(|_| JsError::new("Failed to put image data"))?;

        Ok(())
    }

    /// Renders the final PNG and returns it as a data URL.
    #[wasm_bindgen(js_name = "exportDataUrl")]
    pub fn export_data_url(&mut self) -> Result<String, JsError> {
        let (export, _) = self.editor.download().map_err(js_error)?;
        Ok(export.to_data_url())
    }

    /// Renders the final PNG and saves it through a temporary link.
    ///
    /// Returns the notice text.
    pub fn download(&mut self) -> Result<String, JsError> {
        let (export, notice) = self.editor.download().map_err(js_error)?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsError::new("No document available"))?;
        let link: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| JsError::new("Failed to create link"))?
            .dyn_into()
            .map_err(|_| JsError::new("Failed to cast to HtmlAnchorElement"))?;
        link.set_download(&export.file_name);
        link.set_href(&export.to_data_url());
        link.click();

        Ok(notice.to_string())
    }

    /// Returns the toolbar and hat panel state.
    pub fn controls(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.editor.controls()).map_err(js_error)
    }

    /// Clears the render cache to free memory.
    #[wasm_bindgen(js_name = "clearCache")]
    pub fn clear_cache(&mut self) {
        self.editor.clear_cache();
    }
}
