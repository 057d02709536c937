//! Raw input events a controlled surface can receive.
//!
//! Coordinates are in host client space; the dispatcher subtracts the
//! surface offset itself.

use serde::{Deserialize, Serialize};

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled (e.g., palm rejection).
    Cancel,
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (stable for the lifetime of the touch).
    pub id: u32,
    /// X position in client coordinates.
    pub x: f64,
    /// Y position in client coordinates.
    pub y: f64,
}

impl TouchPoint {
    /// Create a touch point.
    #[must_use]
    pub const fn new(id: u32, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    /// Position as a vector.
    #[must_use]
    pub const fn position(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// A touch event carrying the touches that changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// Touch points that changed in this event.
    pub touches: Vec<TouchPoint>,
    /// Timestamp in milliseconds.
    pub timestamp_ms: u64,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>, timestamp_ms: u64) -> Self {
        Self {
            phase,
            touches,
            timestamp_ms,
        }
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    /// Check if this is a multi-touch event.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.touches.len() > 1
    }
}

/// Pressed-button mask bit for the primary (left) button.
pub const PRIMARY_BUTTON: u16 = 1;
/// Pressed-button mask bit for the secondary (right) button.
pub const SECONDARY_BUTTON: u16 = 2;

/// A mouse or pen event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerEvent {
    /// X position in client coordinates.
    pub x: f64,
    /// Y position in client coordinates.
    pub y: f64,
    /// Horizontal movement since the previous pointer event.
    pub movement_x: f64,
    /// Vertical movement since the previous pointer event.
    pub movement_y: f64,
    /// Bitmask of pressed buttons (1 = primary, 2 = secondary).
    pub buttons: u16,
    /// Timestamp in milliseconds.
    pub timestamp_ms: u64,
}

impl PointerEvent {
    /// A pointer event at `(x, y)` with no movement and no buttons.
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Set the movement since the previous event.
    #[must_use]
    pub fn with_movement(mut self, movement_x: f64, movement_y: f64) -> Self {
        self.movement_x = movement_x;
        self.movement_y = movement_y;
        self
    }

    /// Set the pressed-button mask.
    #[must_use]
    pub fn with_buttons(mut self, buttons: u16) -> Self {
        self.buttons = buttons;
        self
    }

    /// Position as a vector.
    #[must_use]
    pub const fn position(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Whether the secondary button is held.
    #[must_use]
    pub const fn right_pressed(&self) -> bool {
        self.buttons & SECONDARY_BUTTON != 0
    }
}

/// Unit of a wheel delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaMode {
    /// Delta in pixels.
    #[default]
    Pixel,
    /// Delta in lines of text.
    Line,
    /// Delta in pages.
    Page,
}

/// A wheel (scroll) event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    /// Cursor X position in client coordinates.
    pub x: f64,
    /// Cursor Y position in client coordinates.
    pub y: f64,
    /// Vertical scroll amount in `delta_mode` units.
    pub delta_y: f64,
    /// Unit of `delta_y`.
    #[serde(default)]
    pub delta_mode: DeltaMode,
}

impl WheelEvent {
    /// A pixel-unit wheel event.
    #[must_use]
    pub const fn pixels(x: f64, y: f64, delta_y: f64) -> Self {
        Self {
            x,
            y,
            delta_y,
            delta_mode: DeltaMode::Pixel,
        }
    }
}

/// All input events the controller can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InputEvent {
    /// A button was pressed over the surface.
    PointerDown(PointerEvent),
    /// The pointer moved over the surface.
    PointerMove(PointerEvent),
    /// A button was released.
    PointerUp(PointerEvent),
    /// The pointer left the surface.
    PointerLeave(PointerEvent),
    /// The host is about to show a context menu.
    ContextMenu(PointerEvent),
    /// Scroll wheel.
    Wheel(WheelEvent),
    /// Raw touch event.
    Touch(TouchEvent),
    /// Native click.
    Click(PointerEvent),
}

impl InputEvent {
    /// The host event type this event corresponds to.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PointerDown(_) => EventKind::PointerDown,
            Self::PointerMove(_) => EventKind::PointerMove,
            Self::PointerUp(_) => EventKind::PointerUp,
            Self::PointerLeave(_) => EventKind::PointerLeave,
            Self::ContextMenu(_) => EventKind::ContextMenu,
            Self::Wheel(_) => EventKind::Wheel,
            Self::Click(_) => EventKind::Click,
            Self::Touch(touch) => match touch.phase {
                TouchPhase::Start => EventKind::TouchStart,
                TouchPhase::Move => EventKind::TouchMove,
                TouchPhase::End => EventKind::TouchEnd,
                TouchPhase::Cancel => EventKind::TouchCancel,
            },
        }
    }
}

/// Host event types a device adapter can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerLeave,
    ContextMenu,
    Wheel,
    TouchStart,
    TouchMove,
    TouchEnd,
    TouchCancel,
    Click,
}

impl EventKind {
    /// The DOM event name for this kind.
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::PointerDown => "mousedown",
            Self::PointerMove => "mousemove",
            Self::PointerUp => "mouseup",
            Self::PointerLeave => "mouseout",
            Self::ContextMenu => "contextmenu",
            Self::Wheel => "wheel",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
            Self::TouchCancel => "touchcancel",
            Self::Click => "click",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_kind_follows_phase() {
        let event = InputEvent::Touch(TouchEvent::new(
            TouchPhase::Cancel,
            vec![TouchPoint::new(3, 1.0, 2.0)],
            0,
        ));
        assert_eq!(event.kind(), EventKind::TouchCancel);
        assert_eq!(event.kind().dom_name(), "touchcancel");
    }

    #[test]
    fn pointer_events_parse_with_defaults() {
        let event: InputEvent =
            serde_json::from_str(r#"{"type":"PointerMove","data":{"x":4,"y":5,"buttons":2}}"#)
                .expect("json");
        let InputEvent::PointerMove(pointer) = event else {
            panic!("wrong variant");
        };
        assert_eq!(pointer.position(), [4.0, 5.0]);
        assert!(pointer.right_pressed());
        assert!(pointer.movement_x.abs() < f64::EPSILON);
    }

    #[test]
    fn wheel_delta_mode_defaults_to_pixels() {
        let event: WheelEvent =
            serde_json::from_str(r#"{"x":0,"y":0,"delta_y":-3}"#).expect("json");
        assert_eq!(event.delta_mode, DeltaMode::Pixel);
    }

    #[test]
    fn multi_touch_detection() {
        let event = TouchEvent::new(
            TouchPhase::Start,
            vec![TouchPoint::new(0, 0.0, 0.0), TouchPoint::new(1, 1.0, 1.0)],
            10,
        );
        assert!(event.is_multi_touch());
        assert_eq!(event.primary_touch().map(|t| t.id), Some(0));
    }
}
