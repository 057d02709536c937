//! Controller configuration.
//!
//! Hosts describe a controller with [`ControlsOptions`], a loosely typed
//! record where every field is optional (and typically deserialized from
//! JSON). [`ControlsConfig::from_options`] merges it over the immutable
//! [`ControlsConfig::default`] and validates the result:
//!
//! ```text
//! ControlsOptions { scale: [2, 2], wheelEnabled: true }
//!   + ControlsConfig::default()
//!   → ControlsConfig { scale: [2.0, 2.0], wheel_enabled: true, .. }
//! ```

use std::time::Duration;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ControlsError, ControlsResult};
use crate::math::clamp;

/// Default minimum movement (device pixels) that counts as a drag/pinch step.
pub const DEFAULT_TOUCH_SENSITIVITY: f64 = 0.35;

/// Default maximum tap duration.
pub const DEFAULT_CLICK_SENSITIVITY: Duration = Duration::from_millis(800);

/// Enum field as a host may send it: the bitmask number or the name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum BitsOrName {
    Bits(u8),
    Name(String),
}

/// Which mouse button(s) drag the view.
///
/// Deserializes from `1`/`2`/`3` or `"left"`/`"right"`/`"both"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UseButton {
    /// Left button only.
    #[default]
    Left,
    /// Right button only.
    Right,
    /// Either button.
    Both,
}

impl UseButton {
    const LEFT_BIT: u8 = 1;
    const RIGHT_BIT: u8 = 2;
    const BOTH_BITS: u8 = 3;

    /// Bitmask form: left = 1, right = 2, both = 3.
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Left => Self::LEFT_BIT,
            Self::Right => Self::RIGHT_BIT,
            Self::Both => Self::BOTH_BITS,
        }
    }

    /// Parse the bitmask form.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            Self::LEFT_BIT => Some(Self::Left),
            Self::RIGHT_BIT => Some(Self::Right),
            Self::BOTH_BITS => Some(Self::Both),
            _ => None,
        }
    }

    /// Whether the left button drags.
    #[must_use]
    pub const fn uses_left_button(self) -> bool {
        self.bits() & Self::LEFT_BIT == Self::LEFT_BIT
    }

    /// Whether the right button drags.
    #[must_use]
    pub const fn uses_right_button(self) -> bool {
        self.bits() & Self::RIGHT_BIT == Self::RIGHT_BIT
    }

    /// Whether both buttons drag.
    #[must_use]
    pub const fn uses_both_buttons(self) -> bool {
        self.bits() & Self::BOTH_BITS == Self::BOTH_BITS
    }

    fn from_name(name: &str) -> Option<Self> {
        [Self::Left, Self::Right, Self::Both]
            .into_iter()
            .find(|button| button.name().eq_ignore_ascii_case(name))
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Both => "both",
        }
    }
}

impl<'de> Deserialize<'de> for UseButton {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match BitsOrName::deserialize(deserializer)? {
            BitsOrName::Bits(bits) => Self::from_bits(bits)
                .ok_or_else(|| D::Error::custom(format!("unknown useButton value {bits}"))),
            BitsOrName::Name(name) => Self::from_name(&name)
                .ok_or_else(|| D::Error::custom(format!("unknown useButton name {name:?}"))),
        }
    }
}

/// How a two-finger pinch maps onto the scale vector.
///
/// Deserializes from `1`/`2` or `"normal"`/`"freescale"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// One uniform factor derived from the distance between the touches.
    #[default]
    Normal,
    /// Independent X/Y factors derived from each axis' span.
    Freescale,
}

impl ScaleMode {
    /// Whether pinches scale each axis independently.
    #[must_use]
    pub const fn is_freescale(self) -> bool {
        matches!(self, Self::Freescale)
    }

    /// Numeric form: normal = 1, freescale = 2.
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Normal => 1,
            Self::Freescale => 2,
        }
    }

    /// Parse the numeric form.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            1 => Some(Self::Normal),
            2 => Some(Self::Freescale),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for ScaleMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match BitsOrName::deserialize(deserializer)? {
            BitsOrName::Bits(bits) => Self::from_bits(bits)
                .ok_or_else(|| D::Error::custom(format!("unknown scaleMode value {bits}"))),
            BitsOrName::Name(name) if name.eq_ignore_ascii_case("normal") => Ok(Self::Normal),
            BitsOrName::Name(name) if name.eq_ignore_ascii_case("freescale") => {
                Ok(Self::Freescale)
            }
            BitsOrName::Name(name) => Err(D::Error::custom(format!(
                "unknown scaleMode name {name:?}"
            ))),
        }
    }
}

/// Componentwise closed range for a 2-vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Lower bound per axis.
    pub min: [f64; 2],
    /// Upper bound per axis.
    pub max: [f64; 2],
}

impl Bounds {
    /// No bounds at all.
    pub const UNBOUNDED: Self = Self::new(
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
        f64::INFINITY,
        f64::INFINITY,
    );

    /// Non-negative, otherwise unbounded. Default for scaling.
    pub const NON_NEGATIVE: Self = Self::new(0.0, 0.0, f64::INFINITY, f64::INFINITY);

    /// Create bounds from the `(minX, minY, maxX, maxY)` tuple.
    #[must_use]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min: [min_x, min_y],
            max: [max_x, max_y],
        }
    }

    /// Clamp one axis value into range.
    #[must_use]
    pub fn clamp_axis(&self, axis: usize, value: f64) -> f64 {
        clamp(value, self.min[axis], self.max[axis])
    }

    /// Clamp both components into range.
    #[must_use]
    pub fn clamp(&self, value: [f64; 2]) -> [f64; 2] {
        [self.clamp_axis(0, value[0]), self.clamp_axis(1, value[1])]
    }

    /// Whether both components are within range.
    #[must_use]
    pub fn contains(&self, value: [f64; 2]) -> bool {
        (0..2).all(|i| value[i] >= self.min[i] && value[i] <= self.max[i])
    }
}

/// Raw, partially specified controller options.
///
/// Every field is optional; missing ones fall back to
/// [`ControlsConfig::default`]. Vector fields are kept as plain sequences so
/// malformed input can be reported instead of silently truncated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlsOptions {
    /// Initial pan `[x, y]`.
    pub translation: Option<Vec<f64>>,
    /// Initial zoom `[x, y]`.
    pub scale: Option<Vec<f64>>,
    /// Pan clamp `[minX, minY, maxX, maxY]`.
    pub translation_bounds: Option<Vec<f64>>,
    /// Zoom clamp `[minX, minY, maxX, maxY]`.
    pub scale_bounds: Option<Vec<f64>>,
    /// Enable translation on drag.
    pub drag_enabled: Option<bool>,
    /// Enable scaling on two-finger pinch.
    pub pinch_enabled: Option<bool>,
    /// Enable scaling on mouse wheel.
    pub wheel_enabled: Option<bool>,
    /// Which mouse button drags.
    pub use_button: Option<UseButton>,
    /// Uniform or per-axis pinch.
    pub scale_mode: Option<ScaleMode>,
    /// Multiplier on raw translation deltas.
    pub translate_speed: Option<f64>,
    /// Multiplier on raw scale deltas.
    pub scale_speed: Option<f64>,
    /// Minimum movement that registers as a drag/pinch step.
    pub touch_sensitivity: Option<f64>,
    /// Maximum tap duration in milliseconds.
    pub click_sensitivity: Option<f64>,
    /// Invert drag direction.
    pub events_reversed: Option<bool>,
}

/// Validated, immutable controller configuration.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ControlsConfig {
    /// Initial pan.
    pub translation: [f64; 2],
    /// Initial zoom.
    pub scale: [f64; 2],
    /// Pan clamp.
    pub translation_bounds: Bounds,
    /// Zoom clamp.
    pub scale_bounds: Bounds,
    /// Enable translation on drag.
    pub drag_enabled: bool,
    /// Enable scaling on two-finger pinch.
    pub pinch_enabled: bool,
    /// Enable scaling on mouse wheel.
    pub wheel_enabled: bool,
    /// Which mouse button drags.
    pub use_button: UseButton,
    /// Uniform or per-axis pinch.
    pub scale_mode: ScaleMode,
    /// Multiplier on raw translation deltas.
    pub translate_speed: f64,
    /// Multiplier on raw scale deltas.
    pub scale_speed: f64,
    /// Minimum movement that registers as a drag/pinch step.
    pub touch_sensitivity: f64,
    /// Maximum tap duration.
    pub click_sensitivity: Duration,
    /// Invert drag direction.
    pub events_reversed: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            translation: [0.0, 0.0],
            scale: [1.0, 1.0],
            translation_bounds: Bounds::UNBOUNDED,
            scale_bounds: Bounds::NON_NEGATIVE,
            drag_enabled: false,
            pinch_enabled: false,
            wheel_enabled: false,
            use_button: UseButton::Left,
            scale_mode: ScaleMode::Normal,
            translate_speed: 1.0,
            scale_speed: 1.0,
            touch_sensitivity: DEFAULT_TOUCH_SENSITIVITY,
            click_sensitivity: DEFAULT_CLICK_SENSITIVITY,
            events_reversed: false,
        }
    }
}

impl ControlsConfig {
    /// Merge `options` over the defaults, producing a new configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ControlsError::NotANumberArray`] for vector options that are
    /// too short or contain NaN, and [`ControlsError::NotANumber`] for NaN
    /// scalar options.
    pub fn from_options(options: &ControlsOptions) -> ControlsResult<Self> {
        let defaults = Self::default();

        let translation_bounds = match &options.translation_bounds {
            Some(values) => bounds("translationBounds", values)?,
            None => defaults.translation_bounds,
        };
        let scale_bounds = match &options.scale_bounds {
            Some(values) => bounds("scaleBounds", values)?,
            None => defaults.scale_bounds,
        };

        let translation = match &options.translation {
            Some(values) => pair("translation", values)?,
            None => defaults.translation,
        };
        let scale = match &options.scale {
            Some(values) => pair("scale", values)?,
            None => defaults.scale,
        };

        let click_sensitivity = match options.click_sensitivity {
            Some(ms) => duration_from_millis("clickSensitivity", ms)?,
            None => defaults.click_sensitivity,
        };

        let config = Self {
            translation: translation_bounds.clamp(translation),
            scale: scale_bounds.clamp(scale),
            translation_bounds,
            scale_bounds,
            drag_enabled: options.drag_enabled.unwrap_or(defaults.drag_enabled),
            pinch_enabled: options.pinch_enabled.unwrap_or(defaults.pinch_enabled),
            wheel_enabled: options.wheel_enabled.unwrap_or(defaults.wheel_enabled),
            use_button: options.use_button.unwrap_or(defaults.use_button),
            scale_mode: options.scale_mode.unwrap_or(defaults.scale_mode),
            translate_speed: options.translate_speed.unwrap_or(defaults.translate_speed),
            scale_speed: options.scale_speed.unwrap_or(defaults.scale_speed),
            touch_sensitivity: options
                .touch_sensitivity
                .unwrap_or(defaults.touch_sensitivity),
            click_sensitivity,
            events_reversed: options.events_reversed.unwrap_or(defaults.events_reversed),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse options from JSON and merge them over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> ControlsResult<Self> {
        let options: ControlsOptions = serde_json::from_str(json)?;
        Self::from_options(&options)
    }

    /// Check a hand-built configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any numeric field is NaN, or if initial vectors
    /// are infinite.
    pub fn validate(&self) -> ControlsResult<()> {
        finite_array("translation", &self.translation, 2)?;
        finite_array("scale", &self.scale, 2)?;
        numeric_array(
            "translationBounds",
            &bounds_tuple(&self.translation_bounds),
            4,
        )?;
        numeric_array("scaleBounds", &bounds_tuple(&self.scale_bounds), 4)?;
        for (field, value) in [
            ("translateSpeed", self.translate_speed),
            ("scaleSpeed", self.scale_speed),
            ("touchSensitivity", self.touch_sensitivity),
        ] {
            if !value.is_finite() {
                return Err(ControlsError::NotANumber { field });
            }
        }
        Ok(())
    }
}

/// Geometry of the drawing surface the controller is bound to.
///
/// `left`/`top` is the surface's offset inside the host's client space;
/// incoming event coordinates are shifted by it. `viewport_height` is the
/// height of the host window, used for page-unit wheel deltas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surface {
    /// Horizontal offset in client space.
    pub left: f64,
    /// Vertical offset in client space.
    pub top: f64,
    /// Surface width in device pixels.
    pub width: f64,
    /// Surface height in device pixels.
    pub height: f64,
    /// Host viewport height in device pixels.
    pub viewport_height: f64,
}

impl Surface {
    /// Create a surface at the client origin whose viewport matches its height.
    ///
    /// # Errors
    ///
    /// Returns [`ControlsError::InvalidSurface`] if the size is not finite
    /// and positive.
    pub fn new(width: f64, height: f64) -> ControlsResult<Self> {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
            viewport_height: height,
        }
        .validated()
    }

    /// Move the surface inside client space.
    #[must_use]
    pub fn with_offset(mut self, left: f64, top: f64) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    /// Set the host viewport height.
    #[must_use]
    pub fn with_viewport_height(mut self, viewport_height: f64) -> Self {
        self.viewport_height = viewport_height;
        self
    }

    /// Check the geometry, returning the surface unchanged if usable.
    ///
    /// # Errors
    ///
    /// Returns [`ControlsError::InvalidSurface`] on non-finite offsets or
    /// non-positive sizes.
    pub fn validated(self) -> ControlsResult<Self> {
        if !(self.left.is_finite() && self.top.is_finite()) {
            return Err(ControlsError::InvalidSurface(format!(
                "offset ({}, {}) is not finite",
                self.left, self.top
            )));
        }
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("viewport height", self.viewport_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ControlsError::InvalidSurface(format!(
                    "{name} {value} must be finite and positive"
                )));
            }
        }
        Ok(self)
    }

    /// Width-to-height ratio.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Shorter side.
    #[must_use]
    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Longer side.
    #[must_use]
    pub fn max_side(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Convert a client-space point into surface device space.
    #[must_use]
    pub fn to_device(&self, client_x: f64, client_y: f64) -> [f64; 2] {
        [client_x - self.left, client_y - self.top]
    }
}

fn numeric_array(field: &'static str, values: &[f64], min_len: usize) -> ControlsResult<()> {
    if values.len() < min_len {
        return Err(ControlsError::NotANumberArray {
            field,
            min_len,
            reason: format!("got {} entries", values.len()),
        });
    }
    if let Some(index) = values.iter().position(|v| v.is_nan()) {
        return Err(ControlsError::NotANumberArray {
            field,
            min_len,
            reason: format!("entry {index} is NaN"),
        });
    }
    Ok(())
}

fn finite_array(field: &'static str, values: &[f64], min_len: usize) -> ControlsResult<()> {
    numeric_array(field, values, min_len)?;
    if let Some(index) = values.iter().position(|v| v.is_infinite()) {
        return Err(ControlsError::NotANumberArray {
            field,
            min_len,
            reason: format!("entry {index} is infinite"),
        });
    }
    Ok(())
}

fn pair(field: &'static str, values: &[f64]) -> ControlsResult<[f64; 2]> {
    finite_array(field, values, 2)?;
    Ok([values[0], values[1]])
}

fn bounds(field: &'static str, values: &[f64]) -> ControlsResult<Bounds> {
    numeric_array(field, values, 4)?;
    Ok(Bounds::new(values[0], values[1], values[2], values[3]))
}

fn bounds_tuple(bounds: &Bounds) -> [f64; 4] {
    [bounds.min[0], bounds.min[1], bounds.max[0], bounds.max[1]]
}

fn duration_from_millis(field: &'static str, ms: f64) -> ControlsResult<Duration> {
    Duration::try_from_secs_f64(ms / 1000.0).map_err(|_| ControlsError::NotANumber { field })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ControlsConfig::default();
        assert_eq!(config.translation, [0.0, 0.0]);
        assert_eq!(config.scale, [1.0, 1.0]);
        assert_eq!(config.translation_bounds, Bounds::UNBOUNDED);
        assert_eq!(config.scale_bounds, Bounds::NON_NEGATIVE);
        assert!(!config.drag_enabled && !config.pinch_enabled && !config.wheel_enabled);
        assert_eq!(config.use_button, UseButton::Left);
        assert_eq!(config.scale_mode, ScaleMode::Normal);
        assert_eq!(config.click_sensitivity, Duration::from_millis(800));
        assert!((config.touch_sensitivity - DEFAULT_TOUCH_SENSITIVITY).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_options_produce_defaults() {
        let config = ControlsConfig::from_options(&ControlsOptions::default()).expect("valid");
        assert_eq!(config, ControlsConfig::default());
    }

    #[test]
    fn options_are_merged_over_defaults() {
        let options = ControlsOptions {
            scale: Some(vec![2.0, 3.0]),
            wheel_enabled: Some(true),
            click_sensitivity: Some(250.0),
            ..ControlsOptions::default()
        };
        let config = ControlsConfig::from_options(&options).expect("valid");
        assert_eq!(config.scale, [2.0, 3.0]);
        assert!(config.wheel_enabled);
        assert!(!config.drag_enabled);
        assert_eq!(config.click_sensitivity, Duration::from_millis(250));
    }

    #[test]
    fn merging_does_not_touch_the_defaults() {
        let options = ControlsOptions {
            drag_enabled: Some(true),
            ..ControlsOptions::default()
        };
        let _ = ControlsConfig::from_options(&options).expect("valid");
        assert!(!ControlsConfig::default().drag_enabled);
    }

    #[test]
    fn short_vectors_are_rejected() {
        let options = ControlsOptions {
            translation: Some(vec![1.0]),
            ..ControlsOptions::default()
        };
        let err = ControlsConfig::from_options(&options).expect_err("too short");
        assert!(matches!(
            err,
            ControlsError::NotANumberArray {
                field: "translation",
                ..
            }
        ));

        let options = ControlsOptions {
            scale_bounds: Some(vec![0.0, 0.0, 4.0]),
            ..ControlsOptions::default()
        };
        assert!(matches!(
            ControlsConfig::from_options(&options),
            Err(ControlsError::NotANumberArray {
                field: "scaleBounds",
                min_len: 4,
                ..
            })
        ));
    }

    #[test]
    fn nan_entries_are_rejected() {
        let options = ControlsOptions {
            scale: Some(vec![1.0, f64::NAN]),
            ..ControlsOptions::default()
        };
        assert!(matches!(
            ControlsConfig::from_options(&options),
            Err(ControlsError::NotANumberArray { field: "scale", .. })
        ));

        let options = ControlsOptions {
            scale_speed: Some(f64::NAN),
            ..ControlsOptions::default()
        };
        assert!(matches!(
            ControlsConfig::from_options(&options),
            Err(ControlsError::NotANumber {
                field: "scaleSpeed"
            })
        ));
    }

    #[test]
    fn negative_click_window_is_rejected() {
        let options = ControlsOptions {
            click_sensitivity: Some(-1.0),
            ..ControlsOptions::default()
        };
        assert!(matches!(
            ControlsConfig::from_options(&options),
            Err(ControlsError::NotANumber {
                field: "clickSensitivity"
            })
        ));
    }

    #[test]
    fn initial_vectors_are_clamped_into_bounds() {
        let options = ControlsOptions {
            scale: Some(vec![10.0, 0.1]),
            scale_bounds: Some(vec![0.5, 0.5, 4.0, 4.0]),
            ..ControlsOptions::default()
        };
        let config = ControlsConfig::from_options(&options).expect("valid");
        assert_eq!(config.scale, [4.0, 0.5]);
    }

    #[test]
    fn from_json_reads_camel_case_fields() {
        let config = ControlsConfig::from_json(
            r#"{"dragEnabled":true,"useButton":"both","scaleMode":"freescale","translationBounds":[-100,-100,100,100]}"#,
        )
        .expect("valid");
        assert!(config.drag_enabled);
        assert_eq!(config.use_button, UseButton::Both);
        assert!(config.scale_mode.is_freescale());
        assert_eq!(config.translation_bounds, Bounds::new(-100.0, -100.0, 100.0, 100.0));
    }

    #[test]
    fn from_json_accepts_numeric_enums() {
        let config =
            ControlsConfig::from_json(r#"{"useButton":3,"scaleMode":2}"#).expect("valid");
        assert_eq!(config.use_button, UseButton::Both);
        assert_eq!(config.scale_mode, ScaleMode::Freescale);

        let config =
            ControlsConfig::from_json(r#"{"useButton":"RIGHT","scaleMode":1}"#).expect("valid");
        assert_eq!(config.use_button, UseButton::Right);
        assert_eq!(config.scale_mode, ScaleMode::Normal);
    }

    #[test]
    fn from_json_rejects_unknown_enum_values() {
        for json in [r#"{"useButton":4}"#, r#"{"useButton":"middle"}"#, r#"{"scaleMode":0}"#] {
            assert!(
                matches!(
                    ControlsConfig::from_json(json),
                    Err(ControlsError::Serialization(_))
                ),
                "{json}"
            );
        }
    }

    #[test]
    fn from_json_reports_malformed_input() {
        assert!(matches!(
            ControlsConfig::from_json("{\"scale\": \"big\"}"),
            Err(ControlsError::Serialization(_))
        ));
    }

    #[test]
    fn use_button_predicates_follow_the_bitmask() {
        assert!(UseButton::Left.uses_left_button());
        assert!(!UseButton::Left.uses_right_button());
        assert!(UseButton::Right.uses_right_button());
        assert!(!UseButton::Right.uses_both_buttons());
        assert!(UseButton::Both.uses_left_button() && UseButton::Both.uses_right_button());
        assert!(UseButton::Both.uses_both_buttons());
        assert_eq!(UseButton::from_bits(3), Some(UseButton::Both));
        assert_eq!(UseButton::from_bits(0), None);
    }

    #[test]
    fn surface_rejects_degenerate_geometry() {
        assert!(Surface::new(800.0, 600.0).is_ok());
        assert!(matches!(
            Surface::new(0.0, 600.0),
            Err(ControlsError::InvalidSurface(_))
        ));
        assert!(Surface::new(f64::NAN, 600.0).is_err());
        assert!(Surface::new(800.0, 600.0)
            .expect("valid")
            .with_offset(f64::INFINITY, 0.0)
            .validated()
            .is_err());
    }

    #[test]
    fn surface_geometry_helpers() {
        let surface = Surface::new(800.0, 400.0)
            .expect("valid")
            .with_offset(10.0, 20.0);
        assert!((surface.ratio() - 2.0).abs() < f64::EPSILON);
        assert!((surface.min_side() - 400.0).abs() < f64::EPSILON);
        assert!((surface.max_side() - 800.0).abs() < f64::EPSILON);
        assert_eq!(surface.to_device(110.0, 220.0), [100.0, 200.0]);
    }
}
