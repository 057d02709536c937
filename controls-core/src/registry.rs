//! Ordered widget collection with hit-testing and callback dispatch.
//!
//! Dispatch walks widgets in priority order (`priority` descending, then
//! most recently created first) and stops at the first callback that
//! returns `true`.

use crate::error::{ControlsError, ControlsResult};
use crate::view::ViewState;
use crate::widget::{Widget, WidgetConfig, WidgetHandler, WidgetId, WidgetOptions};

/// Insertion-ordered set of widgets belonging to one controlled surface.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    widgets: Vec<Widget>,
    next_id: u64,
}

impl WidgetRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a widget with the next id, without registering it.
    pub fn create_widget(
        &mut self,
        config: WidgetConfig,
        handler: impl WidgetHandler + 'static,
    ) -> Widget {
        let id = WidgetId::from_raw(self.next_id);
        self.next_id += 1;
        Widget::new(id, config, Box::new(handler))
    }

    /// Add a pre-built widget.
    ///
    /// # Errors
    ///
    /// Returns [`ControlsError::AlreadyRegistered`] if a widget with the
    /// same id is already present.
    pub fn register(&mut self, widget: Widget) -> ControlsResult<WidgetId> {
        let id = widget.id();
        if self.contains(id) {
            return Err(ControlsError::AlreadyRegistered(id));
        }
        tracing::debug!("Registered {id}");
        self.widgets.push(widget);
        Ok(id)
    }

    /// Build a widget from raw options and register it.
    ///
    /// # Errors
    ///
    /// Returns an error if the options fail validation.
    pub fn register_options(
        &mut self,
        options: &WidgetOptions,
        handler: impl WidgetHandler + 'static,
    ) -> ControlsResult<WidgetId> {
        let config = WidgetConfig::from_options(options)?;
        let widget = self.create_widget(config, handler);
        self.register(widget)
    }

    /// Remove a widget, handing it back to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ControlsError::WidgetNotFound`] if no such widget exists.
    pub fn remove(&mut self, id: WidgetId) -> ControlsResult<Widget> {
        let index = self
            .widgets
            .iter()
            .position(|w| w.id() == id)
            .ok_or(ControlsError::WidgetNotFound(id))?;
        Ok(self.widgets.remove(index))
    }

    /// Whether a widget with this id is registered.
    #[must_use]
    pub fn contains(&self, id: WidgetId) -> bool {
        self.widgets.iter().any(|w| w.id() == id)
    }

    /// Get a widget by id.
    #[must_use]
    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id() == id)
    }

    /// Get a mutable reference to a widget by id.
    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| w.id() == id)
    }

    /// Enable or disable a widget.
    ///
    /// # Errors
    ///
    /// Returns [`ControlsError::WidgetNotFound`] if no such widget exists.
    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) -> ControlsResult<()> {
        let widget = self.get_mut(id).ok_or(ControlsError::WidgetNotFound(id))?;
        widget.set_enabled(enabled);
        Ok(())
    }

    /// Widgets in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.iter()
    }

    /// Number of registered widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Widget ids in dispatch order.
    #[must_use]
    pub fn priority_order(&self) -> Vec<WidgetId> {
        self.sorted_indices()
            .into_iter()
            .map(|i| self.widgets[i].id())
            .collect()
    }

    /// Return the first widget under `local`, in dispatch order.
    ///
    /// Widgets that were inside but no longer contain the point receive
    /// their blur callback.
    pub fn hit_test(&mut self, view: &ViewState, local: [f64; 2]) -> Option<WidgetId> {
        let mut first = None;
        for index in self.sorted_indices() {
            let widget = &mut self.widgets[index];
            if settle(widget, view, local) && first.is_none() {
                first = Some(widget.id());
            }
        }
        first
    }

    /// Focus widgets under `local` that were not already inside.
    ///
    /// Returns `true` if a focus callback stopped propagation. Blur
    /// transitions are still applied to every widget.
    pub fn dispatch_focus(&mut self, view: &ViewState, local: [f64; 2]) -> bool {
        let mut stopped = false;
        for index in self.sorted_indices() {
            let widget = &mut self.widgets[index];
            let hit = settle(widget, view, local);
            if stopped || !hit || widget.is_pointer_inside() {
                continue;
            }
            widget.set_pointer_inside(true);
            tracing::trace!("Focus {} at {local:?}", widget.id());
            stopped = widget.handler_mut().on_focus(local);
        }
        stopped
    }

    /// Click every widget under `local` until one stops propagation.
    pub fn dispatch_click(&mut self, view: &ViewState, local: [f64; 2]) -> bool {
        for index in self.sorted_indices() {
            let widget = &mut self.widgets[index];
            if widget.contains(view, local) {
                tracing::trace!("Click {} at {local:?}", widget.id());
                if widget.handler_mut().on_click(local) {
                    return true;
                }
            }
        }
        false
    }

    /// Blur every widget the pointer is inside, e.g. when it leaves the
    /// surface.
    pub fn blur_all(&mut self, local: [f64; 2]) {
        for index in self.sorted_indices() {
            let widget = &mut self.widgets[index];
            if widget.is_pointer_inside() {
                widget.set_pointer_inside(false);
                widget.handler_mut().on_blur(local);
            }
        }
    }

    fn sorted_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.widgets.len()).collect();
        indices.sort_by(|&a, &b| {
            let (a, b) = (&self.widgets[a], &self.widgets[b]);
            b.priority()
                .cmp(&a.priority())
                .then_with(|| b.id().cmp(&a.id()))
        });
        indices
    }
}

/// Hit-test one widget, blurring it if the pointer just left.
fn settle(widget: &mut Widget, view: &ViewState, local: [f64; 2]) -> bool {
    let hit = widget.contains(view, local);
    if !hit && widget.is_pointer_inside() {
        widget.set_pointer_inside(false);
        tracing::trace!("Blur {} at {local:?}", widget.id());
        widget.handler_mut().on_blur(local);
    }
    hit
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::widget::{CallbackHandler, DefaultHandler};

    type Log = Rc<RefCell<Vec<String>>>;

    fn logging(log: &Log, name: &'static str, stop_click: bool) -> CallbackHandler {
        let (focus, blur, click) = (log.clone(), log.clone(), log.clone());
        CallbackHandler::new()
            .with_focus(move |_| {
                focus.borrow_mut().push(format!("{name}:focus"));
                false
            })
            .with_blur(move |_| {
                blur.borrow_mut().push(format!("{name}:blur"));
                true
            })
            .with_click(move |_| {
                click.borrow_mut().push(format!("{name}:click"));
                stop_click
            })
    }

    fn square(registry: &mut WidgetRegistry, handler: CallbackHandler) -> WidgetId {
        let widget = registry.create_widget(WidgetConfig::rect(0.0, 0.0, 10.0, 10.0), handler);
        registry.register(widget).expect("register")
    }

    #[test]
    fn most_recent_widget_clicks_first_and_can_stop() {
        let log = Log::default();
        let mut registry = WidgetRegistry::new();
        square(&mut registry, logging(&log, "a", true));
        square(&mut registry, logging(&log, "b", true));

        assert!(registry.dispatch_click(&ViewState::default(), [5.0, 5.0]));
        assert_eq!(*log.borrow(), vec!["b:click"]);
    }

    #[test]
    fn propagating_click_reaches_lower_widgets() {
        let log = Log::default();
        let mut registry = WidgetRegistry::new();
        square(&mut registry, logging(&log, "a", false));
        square(&mut registry, logging(&log, "b", false));

        assert!(!registry.dispatch_click(&ViewState::default(), [5.0, 5.0]));
        assert_eq!(*log.borrow(), vec!["b:click", "a:click"]);
    }

    #[test]
    fn explicit_priority_beats_recency() {
        let mut registry = WidgetRegistry::new();
        let high = registry.create_widget(
            WidgetConfig::rect(0.0, 0.0, 1.0, 1.0).with_priority(5),
            DefaultHandler,
        );
        let high = registry.register(high).expect("register");
        let low = registry.create_widget(WidgetConfig::rect(0.0, 0.0, 1.0, 1.0), DefaultHandler);
        let low = registry.register(low).expect("register");

        assert_eq!(registry.priority_order(), vec![high, low]);
    }

    #[test]
    fn focus_and_blur_fire_once_per_transition() {
        let log = Log::default();
        let mut registry = WidgetRegistry::new();
        let id = square(&mut registry, logging(&log, "a", true));
        let view = ViewState::default();

        registry.dispatch_focus(&view, [20.0, 20.0]);
        registry.dispatch_focus(&view, [5.0, 5.0]);
        registry.dispatch_focus(&view, [6.0, 6.0]);
        assert_eq!(registry.hit_test(&view, [6.0, 6.0]), Some(id));
        assert!(registry.get(id).expect("widget").is_pointer_inside());

        assert_eq!(registry.hit_test(&view, [50.0, 50.0]), None);
        registry.dispatch_focus(&view, [60.0, 60.0]);

        assert_eq!(*log.borrow(), vec!["a:focus", "a:blur"]);
        assert!(!registry.get(id).expect("widget").is_pointer_inside());
    }

    #[test]
    fn stopping_focus_still_blurs_lower_widgets() {
        let log = Log::default();
        let mut registry = WidgetRegistry::new();
        let low = registry.create_widget(
            WidgetConfig::rect(20.0, 20.0, 10.0, 10.0),
            logging(&log, "low", true),
        );
        registry.register(low).expect("register");
        let top = registry.create_widget(
            WidgetConfig::rect(0.0, 0.0, 10.0, 10.0),
            CallbackHandler::new().with_focus(|_| true),
        );
        registry.register(top).expect("register");
        let view = ViewState::default();

        registry.dispatch_focus(&view, [25.0, 25.0]);
        assert!(registry.dispatch_focus(&view, [5.0, 5.0]));
        assert_eq!(*log.borrow(), vec!["low:focus", "low:blur"]);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = WidgetRegistry::new();
        let id = registry
            .register_options(&WidgetOptions::default(), DefaultHandler)
            .expect("register");
        let widget = registry.remove(id).expect("remove");
        registry.register(widget).expect("re-register after removal");

        let clone_id = WidgetId::from_raw(id.get());
        let duplicate = Widget::new(clone_id, WidgetConfig::default(), Box::new(DefaultHandler));
        assert!(matches!(
            registry.register(duplicate),
            Err(ControlsError::AlreadyRegistered(dup)) if dup == id
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn ids_increase_monotonically() {
        let mut registry = WidgetRegistry::new();
        let a = registry.create_widget(WidgetConfig::default(), DefaultHandler);
        let b = registry.create_widget(WidgetConfig::default(), DefaultHandler);
        assert!(b.id() > a.id());
    }

    #[test]
    fn disabled_widgets_are_skipped() {
        let log = Log::default();
        let mut registry = WidgetRegistry::new();
        let id = square(&mut registry, logging(&log, "a", true));
        registry.set_enabled(id, false).expect("exists");

        let view = ViewState::default();
        assert!(!registry.dispatch_click(&view, [5.0, 5.0]));
        assert!(!registry.dispatch_focus(&view, [5.0, 5.0]));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut registry = WidgetRegistry::new();
        let missing = WidgetId::from_raw(42);
        assert!(matches!(
            registry.set_enabled(missing, true),
            Err(ControlsError::WidgetNotFound(_))
        ));
        assert!(registry.remove(missing).is_err());
    }

    #[test]
    fn blur_all_releases_every_focused_widget() {
        let log = Log::default();
        let mut registry = WidgetRegistry::new();
        square(&mut registry, logging(&log, "a", false));
        square(&mut registry, logging(&log, "b", false));
        let view = ViewState::default();

        registry.dispatch_focus(&view, [5.0, 5.0]);
        registry.blur_all([5.0, 5.0]);
        assert_eq!(
            *log.borrow(),
            vec!["b:focus", "a:focus", "b:blur", "a:blur"]
        );
    }
}
