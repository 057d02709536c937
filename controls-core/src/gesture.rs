//! Gesture dispatcher: turns raw pointer, touch and wheel events into view
//! transform changes and widget callbacks.
//!
//! Touches are tracked by identifier in surface device space. A single
//! active touch drags, two active touches pinch, and a short stationary
//! single touch is a tap that clicks widgets.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ControlsConfig, Surface, UseButton};
use crate::event::{InputEvent, PointerEvent, TouchEvent, TouchPhase, WheelEvent};
use crate::math::distance;
use crate::registry::WidgetRegistry;
use crate::view::ViewState;
use crate::wheel::{line_height, normalize_delta, zoom_factor};

/// Coarse state of the gesture machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePhase {
    /// Nothing held.
    Idle,
    /// A pointer button is held.
    Pressed,
    /// One touch is down.
    Dragging,
    /// Two or more touches are down.
    Pinching,
}

/// What the host should do with the event it just delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOutcome {
    /// Suppress the host's default action (scrolling, context menu, ...).
    pub prevent_default: bool,
    /// A widget callback asked to stop propagation.
    pub propagation_stopped: bool,
}

impl EventOutcome {
    /// Outcome that suppresses the default action.
    #[must_use]
    pub const fn prevented() -> Self {
        Self {
            prevent_default: true,
            propagation_stopped: false,
        }
    }

    /// Record whether a widget stopped propagation.
    #[must_use]
    pub const fn with_stopped(mut self, stopped: bool) -> Self {
        self.propagation_stopped = stopped;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TapCandidate {
    id: u32,
    start: [f64; 2],
    started_ms: u64,
}

/// Ephemeral per-dispatcher gesture bookkeeping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureState {
    touches: BTreeMap<u32, [f64; 2]>,
    pinch_reference: Option<[[f64; 2]; 2]>,
    last_pointer: Option<[f64; 2]>,
    pressed: bool,
    tap: Option<TapCandidate>,
}

impl GestureState {
    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        match self.touches.len() {
            0 if self.pressed => GesturePhase::Pressed,
            0 => GesturePhase::Idle,
            1 => GesturePhase::Dragging,
            _ => GesturePhase::Pinching,
        }
    }

    /// Whether a pointer button is held.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Number of touches currently down.
    #[must_use]
    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }

    /// Last known device position of a touch.
    #[must_use]
    pub fn touch_position(&self, id: u32) -> Option<[f64; 2]> {
        self.touches.get(&id).copied()
    }

    /// Last device position seen from the pointer.
    #[must_use]
    pub fn last_pointer(&self) -> Option<[f64; 2]> {
        self.last_pointer
    }

    /// Whether the current single touch still qualifies as a tap.
    #[must_use]
    pub fn tap_pending(&self) -> bool {
        self.tap.is_some()
    }

    /// The two active touches ordered by identifier, if exactly two are down.
    fn pair(&self) -> Option<[[f64; 2]; 2]> {
        let mut positions = self.touches.values();
        match (positions.next(), positions.next(), positions.next()) {
            (Some(&a), Some(&b), None) => Some([a, b]),
            _ => None,
        }
    }
}

/// Applies input events to a [`ViewState`] and a [`WidgetRegistry`].
#[derive(Debug)]
pub struct GestureDispatcher {
    config: ControlsConfig,
    surface: Surface,
    view: ViewState,
    registry: WidgetRegistry,
    state: GestureState,
    line_height: Option<f64>,
}

impl GestureDispatcher {
    /// Create a dispatcher for `surface` with a fresh view and no widgets.
    #[must_use]
    pub fn new(config: ControlsConfig, surface: Surface) -> Self {
        Self {
            view: ViewState::new(&config),
            config,
            surface,
            registry: WidgetRegistry::new(),
            state: GestureState::default(),
            line_height: None,
        }
    }

    /// Use a fixed line height instead of the process-wide one.
    #[must_use]
    pub fn with_line_height(mut self, px: f64) -> Self {
        self.line_height = Some(px);
        self
    }

    /// Line height used for line-unit wheel deltas.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.line_height.unwrap_or_else(line_height)
    }

    /// Configuration snapshot.
    #[must_use]
    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    /// Surface geometry.
    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Replace the surface geometry, e.g. after a resize.
    pub fn set_surface(&mut self, surface: Surface) {
        self.surface = surface;
    }

    /// View transform.
    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Mutable view transform.
    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    /// Registered widgets.
    #[must_use]
    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    /// Mutable widget registry.
    pub fn registry_mut(&mut self) -> &mut WidgetRegistry {
        &mut self.registry
    }

    /// Gesture bookkeeping.
    #[must_use]
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Route an event to its handler.
    pub fn dispatch(&mut self, event: &InputEvent) -> EventOutcome {
        match event {
            InputEvent::PointerDown(e) => self.pointer_down(e),
            InputEvent::PointerMove(e) => self.pointer_move(e),
            InputEvent::PointerUp(e) => self.pointer_up(e),
            InputEvent::PointerLeave(e) => self.pointer_leave(e),
            InputEvent::ContextMenu(e) => self.context_menu(e),
            InputEvent::Click(e) => self.click(e),
            InputEvent::Wheel(e) => self.wheel(e),
            InputEvent::Touch(e) => match e.phase {
                TouchPhase::Start => self.touch_start(e),
                TouchPhase::Move => self.touch_move(e),
                TouchPhase::End => self.touch_end(e),
                TouchPhase::Cancel => self.touch_cancel(e),
            },
        }
    }

    /// Latch the pressed state.
    pub fn pointer_down(&mut self, event: &PointerEvent) -> EventOutcome {
        self.state.pressed = true;
        self.state.last_pointer = Some(self.surface.to_device(event.x, event.y));
        EventOutcome::default()
    }

    /// Release the pressed state.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> EventOutcome {
        self.state.pressed = false;
        self.state.last_pointer = Some(self.surface.to_device(event.x, event.y));
        EventOutcome::default()
    }

    /// Release the pressed state and blur every focused widget.
    pub fn pointer_leave(&mut self, event: &PointerEvent) -> EventOutcome {
        self.state.pressed = false;
        let device = self.surface.to_device(event.x, event.y);
        self.registry.blur_all(self.view.to_local(device));
        EventOutcome::default()
    }

    /// Drag while pressed, and hover-focus widgets either way.
    ///
    /// Moves made with a button outside the configured policy are ignored.
    pub fn pointer_move(&mut self, event: &PointerEvent) -> EventOutcome {
        if !button_allowed(self.config.use_button, event) {
            return EventOutcome::default();
        }

        if self.state.pressed && self.config.drag_enabled {
            let translation = self
                .view
                .translate_by(event.movement_x, event.movement_y, false);
            tracing::trace!(
                "Pointer drag by ({}, {}) -> {translation:?}",
                event.movement_x,
                event.movement_y
            );
        }

        let device = self.surface.to_device(event.x, event.y);
        self.state.last_pointer = Some(device);
        let stopped = self
            .registry
            .dispatch_focus(&self.view, self.view.to_local(device));
        EventOutcome::prevented().with_stopped(stopped)
    }

    /// Suppress the context menu when the right button drives drags.
    pub fn context_menu(&mut self, _event: &PointerEvent) -> EventOutcome {
        if self.config.use_button.uses_right_button() {
            EventOutcome::prevented()
        } else {
            EventOutcome::default()
        }
    }

    /// Native click: click widgets under the pointer.
    pub fn click(&mut self, event: &PointerEvent) -> EventOutcome {
        let device = self.surface.to_device(event.x, event.y);
        let stopped = self
            .registry
            .dispatch_click(&self.view, self.view.to_local(device));
        EventOutcome::default().with_stopped(stopped)
    }

    /// Zoom around the cursor.
    pub fn wheel(&mut self, event: &WheelEvent) -> EventOutcome {
        if !self.config.wheel_enabled {
            return EventOutcome::default();
        }

        let pixels = normalize_delta(event, self.line_height(), &self.surface);
        let factor = zoom_factor(pixels, self.view.scale_speed(), &self.surface);
        if !(factor.is_finite() && factor > 0.0) {
            tracing::warn!("Ignoring wheel delta {pixels}px: zoom factor {factor}");
            return EventOutcome::prevented();
        }

        let pivot = self.surface.to_device(event.x, event.y);
        self.zoom_around(pivot, [factor, factor]);
        tracing::trace!("Wheel zoom x{factor} at {pivot:?}");
        EventOutcome::prevented()
    }

    /// Record new touches, focus widgets under them and start a tap if
    /// exactly one touch is down.
    pub fn touch_start(&mut self, event: &TouchEvent) -> EventOutcome {
        let mut stopped = false;
        for touch in &event.touches {
            let device = self.surface.to_device(touch.x, touch.y);
            self.state.touches.insert(touch.id, device);
            stopped |= self
                .registry
                .dispatch_focus(&self.view, self.view.to_local(device));
        }

        self.state.tap = match (self.state.touches.len(), event.primary_touch()) {
            (1, Some(touch)) => Some(TapCandidate {
                id: touch.id,
                start: self.surface.to_device(touch.x, touch.y),
                started_ms: event.timestamp_ms,
            }),
            _ => None,
        };

        self.state.pinch_reference = self.state.pair();
        if self.state.pinch_reference.is_some() {
            tracing::debug!("Pinch started");
        }
        EventOutcome::prevented().with_stopped(stopped)
    }

    /// Drag with one touch or pinch with two.
    pub fn touch_move(&mut self, event: &TouchEvent) -> EventOutcome {
        match self.state.touches.len() {
            1 => self.touch_drag(event),
            2 => self.touch_pinch(event),
            _ => self.track(event),
        }
        EventOutcome::prevented()
    }

    /// Finish touches, clicking widgets if the gesture was a tap.
    pub fn touch_end(&mut self, event: &TouchEvent) -> EventOutcome {
        self.release(event, true)
    }

    /// Abort touches. Never clicks.
    pub fn touch_cancel(&mut self, event: &TouchEvent) -> EventOutcome {
        self.release(event, false)
    }

    /// Scale by `factor` while keeping the device point `pivot` fixed on
    /// screen. Returns which axes actually zoomed.
    pub fn zoom_around(&mut self, pivot: [f64; 2], factor: [f64; 2]) -> [bool; 2] {
        let before = self.view.translation();
        self.view.scale_by(factor[0], factor[1], false);

        let changed = self.view.zoom_changed();
        let applied = self.view.last_scale_factor();
        let offset: [f64; 2] = std::array::from_fn(|axis| {
            if changed[axis] {
                (pivot[axis] - before[axis]) * (1.0 - applied[axis])
            } else {
                0.0
            }
        });
        if changed.contains(&true) {
            self.view.offset_by(offset[0], offset[1]);
        }
        changed
    }

    fn track(&mut self, event: &TouchEvent) {
        for touch in &event.touches {
            let device = self.surface.to_device(touch.x, touch.y);
            if let Some(position) = self.state.touches.get_mut(&touch.id) {
                *position = device;
            }
            self.check_tap(touch.id, device);
        }
    }

    fn check_tap(&mut self, id: u32, device: [f64; 2]) {
        let Some(tap) = self.state.tap else {
            return;
        };
        if tap.id == id && moved(tap.start, device) > self.config.touch_sensitivity {
            tracing::trace!("Tap cancelled by movement");
            self.state.tap = None;
        }
    }

    fn touch_drag(&mut self, event: &TouchEvent) {
        for touch in &event.touches {
            let device = self.surface.to_device(touch.x, touch.y);
            let Some(slot) = self.state.touches.get_mut(&touch.id) else {
                continue;
            };
            let previous = std::mem::replace(slot, device);
            if self.config.drag_enabled {
                let (dx, dy) = (device[0] - previous[0], device[1] - previous[1]);
                let translation = self.view.translate_by(dx, dy, false);
                tracing::trace!("Touch drag by ({dx}, {dy}) -> {translation:?}");
            }
            self.check_tap(touch.id, device);
        }
    }

    /// Scales by `1 + (current / reference - 1) * scale_speed` per axis, so a
    /// pinch that keeps its span never zooms.
    fn touch_pinch(&mut self, event: &TouchEvent) {
        self.track(event);
        if !self.config.pinch_enabled {
            return;
        }
        let (Some(reference), Some(current)) = (self.state.pinch_reference, self.state.pair())
        else {
            self.state.pinch_reference = self.state.pair();
            return;
        };

        let sensitivity = self.config.touch_sensitivity;
        if (0..2).any(|i| moved(reference[i], current[i]) < sensitivity) {
            return;
        }

        let ratio = if self.config.scale_mode.is_freescale() {
            [0, 1].map(|axis| {
                let before = (reference[1][axis] - reference[0][axis]).abs();
                let after = (current[1][axis] - current[0][axis]).abs();
                if before < sensitivity {
                    1.0
                } else {
                    after / before
                }
            })
        } else {
            let before = span(reference);
            if before < sensitivity {
                return;
            }
            let uniform = span(current) / before;
            [uniform, uniform]
        };

        let speed = self.view.scale_speed();
        let factor = ratio.map(|r| 1.0 + (r - 1.0) * speed);
        if factor.iter().any(|f| !(f.is_finite() && *f > 0.0)) {
            tracing::warn!("Ignoring degenerate pinch factor {factor:?}");
            return;
        }

        let pivot = midpoint(reference);
        let changed = self.zoom_around(pivot, factor);
        tracing::trace!("Pinch x{factor:?} at {pivot:?}, zoomed {changed:?}");
        self.state.pinch_reference = Some(current);
    }

    fn release(&mut self, event: &TouchEvent, may_click: bool) -> EventOutcome {
        let mut stopped = false;
        for touch in &event.touches {
            let device = self.surface.to_device(touch.x, touch.y);
            let local = self.view.to_local(device);
            self.registry.hit_test(&self.view, local);

            if may_click && self.is_tap(touch.id, device, event.timestamp_ms) {
                tracing::debug!("Tap recognised at {local:?}");
                stopped |= self.registry.dispatch_click(&self.view, local);
            }
        }

        for touch in &event.touches {
            self.state.touches.remove(&touch.id);
        }
        self.state.tap = None;
        self.state.pinch_reference = self.state.pair();
        if self.state.touches.len() == 1 {
            tracing::trace!("Back to single-touch drag");
        }
        EventOutcome::prevented().with_stopped(stopped)
    }

    fn is_tap(&self, id: u32, device: [f64; 2], now_ms: u64) -> bool {
        let Some(tap) = self.state.tap else {
            return false;
        };
        let elapsed = Duration::from_millis(now_ms.saturating_sub(tap.started_ms));
        tap.id == id
            && self.state.touches.len() == 1
            && elapsed <= self.config.click_sensitivity
            && moved(tap.start, device) <= self.config.touch_sensitivity
    }
}

/// Whether a pointer event's buttons match the drag policy.
///
/// A held right button is rejected unless the policy includes it, and a
/// right-only policy rejects moves without it.
fn button_allowed(policy: UseButton, event: &PointerEvent) -> bool {
    let right = event.right_pressed();
    if right && !policy.uses_right_button() {
        return false;
    }
    !(policy == UseButton::Right && !right)
}

fn moved(from: [f64; 2], to: [f64; 2]) -> f64 {
    distance([from[0], to[0]], [from[1], to[1]])
}

fn span(pair: [[f64; 2]; 2]) -> f64 {
    moved(pair[0], pair[1])
}

fn midpoint(pair: [[f64; 2]; 2]) -> [f64; 2] {
    [
        (pair[0][0] + pair[1][0]) / 2.0,
        (pair[0][1] + pair[1][1]) / 2.0,
    ]
}
