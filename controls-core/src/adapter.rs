//! Device adapters select which host events reach the dispatcher.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::ControlsConfig;
use crate::event::{EventKind, InputEvent};
use crate::gesture::{EventOutcome, GestureDispatcher};

/// Input device family of the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceProfile {
    /// Mouse, pen or trackpad.
    #[default]
    Pointer,
    /// Touch screen.
    Touch,
}

impl DeviceProfile {
    /// Pick the profile from the host's touch capability.
    #[must_use]
    pub const fn detect(touch_capable: bool) -> Self {
        if touch_capable {
            Self::Touch
        } else {
            Self::Pointer
        }
    }
}

/// Binds a [`GestureDispatcher`] to the events of one device profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceAdapter {
    profile: DeviceProfile,
    bindings: BTreeSet<EventKind>,
    bound: bool,
}

impl DeviceAdapter {
    /// Create an unbound adapter.
    #[must_use]
    pub fn new(profile: DeviceProfile) -> Self {
        Self {
            profile,
            bindings: BTreeSet::new(),
            bound: false,
        }
    }

    /// Device profile.
    #[must_use]
    pub fn profile(&self) -> DeviceProfile {
        self.profile
    }

    /// Bind the event set for `config`.
    ///
    /// Binding happens once; later calls return `false` and change
    /// nothing unless `force` is set.
    pub fn handle(&mut self, config: &ControlsConfig, force: bool) -> bool {
        if self.bound && !force {
            return false;
        }
        self.bindings = Self::bindings_for(self.profile, config);
        self.bound = true;
        tracing::debug!(
            "Bound {:?} adapter to {:?}",
            self.profile,
            self.bindings
                .iter()
                .map(|kind| kind.dom_name())
                .collect::<Vec<_>>()
        );
        true
    }

    /// The events a profile listens to under `config`.
    #[must_use]
    pub fn bindings_for(profile: DeviceProfile, config: &ControlsConfig) -> BTreeSet<EventKind> {
        let mut kinds = BTreeSet::new();
        match profile {
            DeviceProfile::Pointer => {
                kinds.extend([EventKind::PointerMove, EventKind::PointerLeave, EventKind::Click]);
                if config.drag_enabled {
                    kinds.extend([EventKind::PointerDown, EventKind::PointerUp]);
                }
                if config.use_button.uses_right_button() {
                    kinds.insert(EventKind::ContextMenu);
                }
                if config.wheel_enabled {
                    kinds.insert(EventKind::Wheel);
                }
            }
            DeviceProfile::Touch => {
                kinds.extend([
                    EventKind::TouchStart,
                    EventKind::TouchMove,
                    EventKind::TouchEnd,
                    EventKind::TouchCancel,
                ]);
            }
        }
        kinds
    }

    /// Currently bound events.
    #[must_use]
    pub fn bindings(&self) -> &BTreeSet<EventKind> {
        &self.bindings
    }

    /// Whether [`Self::handle`] has run.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Whether events of `kind` are routed.
    #[must_use]
    pub fn listens_to(&self, kind: EventKind) -> bool {
        self.bindings.contains(&kind)
    }

    /// Forward `event` to the dispatcher if it is bound, otherwise drop it.
    pub fn route(
        &self,
        dispatcher: &mut GestureDispatcher,
        event: &InputEvent,
    ) -> Option<EventOutcome> {
        let kind = event.kind();
        if self.listens_to(kind) {
            Some(dispatcher.dispatch(event))
        } else {
            tracing::trace!("Dropping unbound {} event", kind.dom_name());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Surface, UseButton};
    use crate::event::{PointerEvent, WheelEvent};

    #[test]
    fn pointer_bindings_follow_gates() {
        let config = ControlsConfig::default();
        let kinds = DeviceAdapter::bindings_for(DeviceProfile::Pointer, &config);
        assert!(kinds.contains(&EventKind::PointerMove));
        assert!(kinds.contains(&EventKind::Click));
        assert!(!kinds.contains(&EventKind::PointerDown));
        assert!(!kinds.contains(&EventKind::Wheel));
        assert!(!kinds.contains(&EventKind::ContextMenu));

        let config = ControlsConfig {
            drag_enabled: true,
            wheel_enabled: true,
            use_button: UseButton::Both,
            ..ControlsConfig::default()
        };
        let kinds = DeviceAdapter::bindings_for(DeviceProfile::Pointer, &config);
        for kind in [
            EventKind::PointerDown,
            EventKind::PointerUp,
            EventKind::ContextMenu,
            EventKind::Wheel,
        ] {
            assert!(kinds.contains(&kind), "missing {kind:?}");
        }
    }

    #[test]
    fn touch_profile_never_binds_pointer_events() {
        let kinds = DeviceAdapter::bindings_for(DeviceProfile::Touch, &ControlsConfig::default());
        assert_eq!(kinds.len(), 4);
        assert!(!kinds.contains(&EventKind::Click));
    }

    #[test]
    fn handle_binds_once_unless_forced() {
        let mut adapter = DeviceAdapter::new(DeviceProfile::Pointer);
        assert!(!adapter.is_bound());
        assert!(adapter.handle(&ControlsConfig::default(), false));
        assert!(!adapter.handle(&ControlsConfig::default(), false));

        let wheel = ControlsConfig {
            wheel_enabled: true,
            ..ControlsConfig::default()
        };
        assert!(!adapter.listens_to(EventKind::Wheel));
        assert!(adapter.handle(&wheel, true));
        assert!(adapter.listens_to(EventKind::Wheel));
    }

    #[test]
    fn unbound_events_are_dropped() {
        let config = ControlsConfig {
            wheel_enabled: true,
            ..ControlsConfig::default()
        };
        let mut dispatcher =
            GestureDispatcher::new(config.clone(), Surface::new(100.0, 100.0).expect("surface"));
        let mut adapter = DeviceAdapter::new(DeviceProfile::Touch);
        adapter.handle(&config, false);

        let wheel = InputEvent::Wheel(WheelEvent::pixels(50.0, 50.0, -10.0));
        assert_eq!(adapter.route(&mut dispatcher, &wheel), None);
        assert!((dispatcher.view().scale()[0] - 1.0).abs() < f64::EPSILON);

        let click = InputEvent::Click(PointerEvent::at(1.0, 1.0));
        assert_eq!(adapter.route(&mut dispatcher, &click), None);
    }

    #[test]
    fn detect_picks_touch_when_available() {
        assert_eq!(DeviceProfile::detect(true), DeviceProfile::Touch);
        assert_eq!(DeviceProfile::detect(false), DeviceProfile::Pointer);
    }
}
