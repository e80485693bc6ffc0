//! Serializable view model for the editor's buttons, sliders and labels.
//!
//! The browser front end renders its controls from a [`ControlsState`]
//! snapshot instead of mirroring editor state on its own.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "canAddHat": false,
//!   "canRemoveHat": true,
//!   "showHatControls": true,
//!   "hatSize": 100,
//!   "hatRotation": 0,
//!   "sizeLabel": "Size: 100%",
//!   "rotationLabel": "Rotation: 0°",
//!   "sizeRange": { "min": 20, "max": 200, "step": 5, "initial": 100 },
//!   "rotationRange": { "min": -180, "max": 180, "step": 5, "initial": 0 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::config::SliderRange;

/// Snapshot of everything the editor toolbar and hat panel display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
#[cfg_attr(feature = "tsify", tsify(into_wasm_abi))]
pub struct ControlsState {
    /// "Add Hat" is enabled only while there is no hat.
    pub can_add_hat: bool,

    /// "Remove Hat" is enabled only while there is a hat.
    pub can_remove_hat: bool,

    /// The "Hat Controls" panel is shown only while there is a hat.
    pub show_hat_controls: bool,

    pub hat_size: i32,
    pub hat_rotation: i32,
    pub size_label: String,
    pub rotation_label: String,
    pub size_range: SliderRange,
    pub rotation_range: SliderRange,
}

impl ControlsState {
    pub fn new(
        has_hat: bool,
        hat_size: i32,
        hat_rotation: i32,
        size_range: SliderRange,
        rotation_range: SliderRange,
    ) -> Self {
        Self {
            can_add_hat: !has_hat,
            can_remove_hat: has_hat,
            show_hat_controls: has_hat,
            hat_size,
            hat_rotation,
            size_label: format!("Size: {hat_size}%"),
            rotation_label: format!("Rotation: {hat_rotation}°"),
            size_range,
            rotation_range,
        }
    }

    /// Serializes the snapshot to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
