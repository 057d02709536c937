//! Interactive rectangular regions on a controlled surface.

use bitflags::bitflags;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::BitsOrName;
use crate::error::{ControlsError, ControlsResult};
use crate::math::point_in_rect;
use crate::view::ViewState;

/// Extra boundary around a widget's hit-box, in local units.
pub const WIDGET_HIT_MARGIN: f64 = 0.3;

/// Stable identifier of a widget, assigned by its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WidgetId(u64);

impl WidgetId {
    /// The raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "widget#{}", self.0)
    }
}

bitflags! {
    /// How a widget's rectangle relates to the view transform.
    ///
    /// Serialized as flag names, e.g. `"FIXED | UNSCALABLE"`. Deserializes
    /// from names or from the bitmask number, e.g. `5`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Position: u8 {
        /// Origin is given in device space and stays glued to the viewport.
        const FIXED = 1;
        /// Origin is given in local (content) space.
        const ABSOLUTE = 2;
        /// Size is given in device pixels and does not follow the zoom.
        const UNSCALABLE = 4;
    }
}

impl Position {
    /// Whether the origin ignores the current translation.
    #[must_use]
    pub const fn is_fixed(self) -> bool {
        self.contains(Self::FIXED)
    }

    /// Whether the size ignores the current scale.
    #[must_use]
    pub const fn is_unscalable(self) -> bool {
        self.contains(Self::UNSCALABLE)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ABSOLUTE
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bitflags::serde::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match BitsOrName::deserialize(deserializer)? {
            BitsOrName::Bits(bits) => Self::from_bits(bits)
                .ok_or_else(|| D::Error::custom(format!("unknown position bits {bits}"))),
            BitsOrName::Name(names) => bitflags::parser::from_str(&names).map_err(D::Error::custom),
        }
    }
}

/// Callbacks a widget owner implements.
///
/// Each callback returns `true` to stop the event from reaching
/// lower-priority widgets.
pub trait WidgetHandler {
    /// The pointer entered the widget.
    fn on_focus(&mut self, _point: [f64; 2]) -> bool {
        false
    }

    /// The pointer left the widget.
    fn on_blur(&mut self, _point: [f64; 2]) -> bool {
        true
    }

    /// The widget was clicked or tapped.
    fn on_click(&mut self, _point: [f64; 2]) -> bool {
        true
    }
}

/// Handler with the default behaviour for every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHandler;

impl WidgetHandler for DefaultHandler {}

type Callback = Box<dyn FnMut([f64; 2]) -> bool>;

/// Handler assembled from optional closures.
///
/// Missing closures fall back to the [`WidgetHandler`] defaults.
#[derive(Default)]
pub struct CallbackHandler {
    focus: Option<Callback>,
    blur: Option<Callback>,
    click: Option<Callback>,
}

impl CallbackHandler {
    /// Create a handler with no closures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the focus closure.
    #[must_use]
    pub fn with_focus(mut self, f: impl FnMut([f64; 2]) -> bool + 'static) -> Self {
        self.focus = Some(Box::new(f));
        self
    }

    /// Set the blur closure.
    #[must_use]
    pub fn with_blur(mut self, f: impl FnMut([f64; 2]) -> bool + 'static) -> Self {
        self.blur = Some(Box::new(f));
        self
    }

    /// Set the click closure.
    #[must_use]
    pub fn with_click(mut self, f: impl FnMut([f64; 2]) -> bool + 'static) -> Self {
        self.click = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for CallbackHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackHandler")
            .field("focus", &self.focus.is_some())
            .field("blur", &self.blur.is_some())
            .field("click", &self.click.is_some())
            .finish()
    }
}

impl WidgetHandler for CallbackHandler {
    fn on_focus(&mut self, point: [f64; 2]) -> bool {
        self.focus.as_mut().is_some_and(|f| f(point))
    }

    fn on_blur(&mut self, point: [f64; 2]) -> bool {
        self.blur.as_mut().is_none_or(|f| f(point))
    }

    fn on_click(&mut self, point: [f64; 2]) -> bool {
        self.click.as_mut().is_none_or(|f| f(point))
    }
}

/// Raw widget options; missing fields take [`WidgetConfig::default`] values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetOptions {
    /// Left edge.
    pub x: Option<f64>,
    /// Top edge.
    pub y: Option<f64>,
    /// Width.
    pub dx: Option<f64>,
    /// Height.
    pub dy: Option<f64>,
    /// Event priority; higher receives events first.
    pub index: Option<i32>,
    /// Whether the widget takes part in hit-testing.
    pub enabled: Option<bool>,
    /// Position mode flags.
    pub position: Option<Position>,
}

/// Validated widget geometry and flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetConfig {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub dx: f64,
    /// Height.
    pub dy: f64,
    /// Event priority; higher receives events first.
    pub priority: i32,
    /// Whether the widget takes part in hit-testing.
    pub enabled: bool,
    /// Position mode flags.
    pub position: Position,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            dx: 0.0,
            dy: 0.0,
            priority: -1,
            enabled: true,
            position: Position::ABSOLUTE,
        }
    }
}

impl WidgetConfig {
    /// A widget covering `[x, y, dx, dy]` with default flags.
    #[must_use]
    pub fn rect(x: f64, y: f64, dx: f64, dy: f64) -> Self {
        Self {
            x,
            y,
            dx,
            dy,
            ..Self::default()
        }
    }

    /// Set the position mode.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Set the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Merge options over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ControlsError::NotANumber`] if any geometry field is NaN.
    pub fn from_options(options: &WidgetOptions) -> ControlsResult<Self> {
        let defaults = Self::default();
        let config = Self {
            x: options.x.unwrap_or(defaults.x),
            y: options.y.unwrap_or(defaults.y),
            dx: options.dx.unwrap_or(defaults.dx),
            dy: options.dy.unwrap_or(defaults.dy),
            priority: options.index.unwrap_or(defaults.priority),
            enabled: options.enabled.unwrap_or(defaults.enabled),
            position: options.position.unwrap_or(defaults.position),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the geometry.
    ///
    /// # Errors
    ///
    /// Returns [`ControlsError::NotANumber`] for NaN fields.
    pub fn validate(&self) -> ControlsResult<()> {
        for (field, value) in [("x", self.x), ("y", self.y), ("dx", self.dx), ("dy", self.dy)] {
            if value.is_nan() {
                return Err(ControlsError::NotANumber { field });
            }
        }
        Ok(())
    }
}

/// A registered interactive region.
pub struct Widget {
    id: WidgetId,
    config: WidgetConfig,
    pointer_inside: bool,
    handler: Box<dyn WidgetHandler>,
}

impl Widget {
    pub(crate) fn new(id: WidgetId, config: WidgetConfig, handler: Box<dyn WidgetHandler>) -> Self {
        Self {
            id,
            config,
            pointer_inside: false,
            handler,
        }
    }

    /// Identifier assigned at construction.
    #[must_use]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Geometry and flags.
    #[must_use]
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Move or resize the widget.
    pub fn set_rect(&mut self, x: f64, y: f64, dx: f64, dy: f64) {
        self.config.x = x;
        self.config.y = y;
        self.config.dx = dx;
        self.config.dy = dy;
    }

    /// Event priority.
    #[must_use]
    pub fn priority(&self) -> i32 {
        self.config.priority
    }

    /// Whether the widget takes part in hit-testing.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Enable or disable the widget.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// Whether the last known pointer position was inside the widget.
    #[must_use]
    pub fn is_pointer_inside(&self) -> bool {
        self.pointer_inside
    }

    /// Effective `[x, y, dx, dy]` hit-box in local space under `view`.
    #[must_use]
    pub fn hit_rect(&self, view: &ViewState) -> [f64; 4] {
        let WidgetConfig {
            x, y, dx, dy, position, ..
        } = self.config;
        let translation = view.translation();
        let scale = view.scale();

        let (x, y) = if position.is_fixed() {
            (
                (x - translation[0]) / scale[0],
                (y - translation[1]) / scale[1],
            )
        } else {
            (x, y)
        };
        let (dx, dy) = if position.is_unscalable() {
            (dx / scale[0], dy / scale[1])
        } else {
            (dx, dy)
        };
        [x, y, dx, dy]
    }

    /// Whether `local` is inside the hit-box. Disabled widgets never hit.
    #[must_use]
    pub fn contains(&self, view: &ViewState, local: [f64; 2]) -> bool {
        self.config.enabled && point_in_rect(self.hit_rect(view), local, WIDGET_HIT_MARGIN)
    }

    pub(crate) fn set_pointer_inside(&mut self, inside: bool) {
        self.pointer_inside = inside;
    }

    pub(crate) fn handler_mut(&mut self) -> &mut dyn WidgetHandler {
        self.handler.as_mut()
    }
}

impl std::fmt::Debug for Widget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widget")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("pointer_inside", &self.pointer_inside)
            .finish_non_exhaustive()
    }
}
