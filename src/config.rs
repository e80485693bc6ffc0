//! Editor configuration.
//!
//! Every field has a default matching the stock widget, so an empty JSON
//! object is a valid configuration:
//!
//! ```
//! use hat_editor::EditorConfig;
//!
//! let config = EditorConfig::from_json(r#"{ "canvasWidth": 1024 }"#).unwrap();
//! assert_eq!(config.canvas_width, 1024);
//! assert_eq!(config.canvas_height, 600);
//! ```

use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};

// ============================================================================
// SliderRange
// ============================================================================

/// Numeric range of a slider control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
pub struct SliderRange {
    pub min: i32,
    pub max: i32,
    pub step: i32,
    /// Value the slider starts at and returns to when the hat is removed.
    pub initial: i32,
}

impl SliderRange {
    pub const fn new(min: i32, max: i32, step: i32, initial: i32) -> Self {
        Self {
            min,
            max,
            step,
            initial,
        }
    }

    /// Clamps `value` into the range and snaps it to the nearest step.
    pub fn snap(&self, value: f32) -> i32 {
        if !value.is_finite() || self.step <= 0 {
            return self.initial;
        }
        let (min, max, step) = (self.min as i64, self.max as i64, self.step as i64);
        let clamped = (value as f64).clamp(min as f64, max as f64);
        let steps = ((clamped - min as f64) / step as f64).round() as i64;
        // Every term fits in i64, and the result lies in min..=max
        (min + steps * step).clamp(min, max) as i32
    }

    /// Returns true if `value` is a value the slider can produce.
    pub fn contains(&self, value: i32) -> bool {
        if self.step <= 0 || value < self.min || value > self.max {
            return false;
        }
        (value as i64 - self.min as i64) % self.step as i64 == 0
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.max.checked_sub(self.min).is_none() {
            return Err(EditorError::InvalidConfig(format!(
                "{name} slider {}..={} is too wide",
                self.min, self.max
            )));
        }
        if self.step <= 0 || self.min > self.max || !self.contains(self.initial) {
            return Err(EditorError::InvalidConfig(format!(
                "{name} slider {}..={} step {} cannot start at {}",
                self.min, self.max, self.step, self.initial
            )));
        }
        Ok(())
    }
}

// ============================================================================
// HatAnchor
// ============================================================================

/// Where a freshly added hat is centered, as fractions of the canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
pub struct HatAnchor {
    pub x: f32,
    pub y: f32,
}

impl Default for HatAnchor {
    fn default() -> Self {
        Self { x: 0.5, y: 1.0 / 3.0 }
    }
}

// ============================================================================
// EditorConfig
// ============================================================================

/// Configuration for an [`ImageEditor`](crate::ImageEditor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
#[cfg_attr(feature = "tsify", tsify(from_wasm_abi))]
pub struct EditorConfig {
    /// Canvas width in pixels.
    pub canvas_width: u32,

    /// Canvas height in pixels.
    pub canvas_height: u32,

    /// Fill behind the photo, as `#rrggbb`.
    pub background_color: String,

    /// Hat scale at 100% size.
    pub hat_base_scale: f32,

    /// Initial hat position.
    pub hat_anchor: HatAnchor,

    /// Hat size slider, in percent.
    pub size_slider: SliderRange,

    /// Hat rotation slider, in degrees.
    pub rotation_slider: SliderRange,

    /// File name offered for the downloaded PNG.
    pub export_file_name: String,

    /// Color of the selection border and handles, as `#rrggbb`.
    pub selection_color: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            background_color: "#ffffff".into(),
            hat_base_scale: 0.3,
            hat_anchor: HatAnchor::default(),
            size_slider: SliderRange::new(20, 200, 5, 100),
            rotation_slider: SliderRange::new(-180, 180, 5, 0),
            export_file_name: "photo-with-hat.png".into(),
            selection_color: "#b2ccff".into(),
        }
    }
}

impl EditorConfig {
    /// Parses and validates a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value can be used to build a scene.
    pub fn validate(&self) -> Result<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(EditorError::InvalidConfig(format!(
                "canvas must not be empty ({}x{})",
                self.canvas_width, self.canvas_height
            )));
        }
        if !(self.hat_base_scale.is_finite() && self.hat_base_scale > 0.0) {
            return Err(EditorError::InvalidConfig(format!(
                "hat base scale must be positive, got {}",
                self.hat_base_scale
            )));
        }
        if self.size_slider.min <= 0 {
            return Err(EditorError::InvalidConfig(
                "size slider must stay above 0%".into(),
            ));
        }
        self.size_slider.validate("size")?;
        self.rotation_slider.validate("rotation")?;
        self.background_rgb()?;
        self.selection_rgb()?;
        Ok(())
    }

    /// The background fill color.
    pub fn background_rgb(&self) -> Result<Srgb<u8>> {
        parse_hex_color(&self.background_color)
    }

    /// The selection chrome color.
    pub fn selection_rgb(&self) -> Result<Srgb<u8>> {
        parse_hex_color(&self.selection_color)
    }
}

fn parse_hex_color(value: &str) -> Result<Srgb<u8>> {
    Srgb::<u8>::from_str(value.trim()).map_err(|_| EditorError::InvalidColor(value.to_string()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_widget() {
        let config = EditorConfig::default();
        assert_eq!((config.canvas_width, config.canvas_height), (800, 600));
        assert_eq!(config.hat_base_scale, 0.3);
        assert_eq!(config.size_slider, SliderRange::new(20, 200, 5, 100));
        assert_eq!(config.rotation_slider, SliderRange::new(-180, 180, 5, 0));
        assert_eq!(config.export_file_name, "photo-with-hat.png");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_json_is_default() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn background_color_parses() {
        let config = EditorConfig::default();
        let rgb = config.background_rgb().unwrap();
        assert_eq!((rgb.red, rgb.green, rgb.blue), (255, 255, 255));
    }

    #[test]
    fn invalid_color_rejected() {
        let json = r#"{ "backgroundColor": "white-ish" }"#;
        assert!(matches!(
            EditorConfig::from_json(json),
            Err(EditorError::InvalidColor(_))
        ));
    }

    #[test]
    fn zero_canvas_rejected() {
        let json = r#"{ "canvasWidth": 0 }"#;
        assert!(matches!(
            EditorConfig::from_json(json),
            Err(EditorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn slider_initial_must_be_on_step() {
        let json = r#"{ "sizeSlider": { "min": 20, "max": 200, "step": 5, "initial": 101 } }"#;
        assert!(matches!(
            EditorConfig::from_json(json),
            Err(EditorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn slider_snaps_and_clamps() {
        let size = SliderRange::new(20, 200, 5, 100);
        assert_eq!(size.snap(100.0), 100);
        assert_eq!(size.snap(102.0), 100);
        assert_eq!(size.snap(103.0), 105);
        assert_eq!(size.snap(5.0), 20);
        assert_eq!(size.snap(900.0), 200);
        assert_eq!(size.snap(f32::NAN), 100);

        let rotation = SliderRange::new(-180, 180, 5, 0);
        assert_eq!(rotation.snap(-181.0), -180);
        assert_eq!(rotation.snap(-12.0), -10);
        assert_eq!(rotation.snap(44.0), 45);
    }

    #[test]
    fn wide_slider_snaps_without_overflow() {
        let wide = SliderRange::new(-2_000_000_000, 2_000_000_000, 2_000_000_000, 0);
        assert_eq!(wide.snap(1.5e9), 2_000_000_000);
        assert_eq!(wide.snap(-1.5e9), -2_000_000_000);
        assert!(wide.contains(2_000_000_000));
        assert!(!wide.contains(1));

        let full = SliderRange::new(i32::MIN, i32::MAX, 1, i32::MAX);
        assert!(full.contains(i32::MAX));
        assert_eq!(full.snap(f32::MAX), i32::MAX);
        assert_eq!(full.snap(f32::MIN), i32::MIN);
    }

    #[test]
    fn too_wide_slider_rejected() {
        let json = r#"{ "rotationSlider": { "min": -2000000000, "max": 2000000000, "step": 2000000000, "initial": 0 } }"#;
        assert!(matches!(
            EditorConfig::from_json(json),
            Err(EditorError::InvalidConfig(_))
        ));

        let json = format!(
            r#"{{ "rotationSlider": {{ "min": {}, "max": {}, "step": 1, "initial": {} }} }}"#,
            i32::MIN,
            i32::MAX,
            i32::MAX
        );
        assert!(matches!(
            EditorConfig::from_json(&json),
            Err(EditorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn wide_slider_within_i32_accepted() {
        let json = r#"{ "rotationSlider": { "min": -1000000000, "max": 1000000000, "step": 1000000000, "initial": 0 } }"#;
        let config = EditorConfig::from_json(json).unwrap();
        assert_eq!(config.rotation_slider.snap(6e8), 1_000_000_000);
    }

    #[cfg(feature = "tsify")]
    #[test]
    fn typescript_declarations_cover_config() {
        use tsify_next::Tsify;

        assert!(EditorConfig::DECL.contains("canvasWidth"));
        assert!(EditorConfig::DECL.contains("hatAnchor"));
        assert!(HatAnchor::DECL.contains("HatAnchor"));
    }

    #[test]
    fn slider_contains() {
        let rotation = SliderRange::new(-180, 180, 5, 0);
        assert!(rotation.contains(-180));
        assert!(rotation.contains(45));
        assert!(!rotation.contains(46));
        assert!(!rotation.contains(185));
    }
}
