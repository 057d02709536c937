//! The surface controller: one drawing surface, its view and its widgets.

use crate::adapter::{DeviceAdapter, DeviceProfile};
use crate::config::{ControlsConfig, ControlsOptions, Surface};
use crate::error::ControlsResult;
use crate::event::InputEvent;
use crate::gesture::{EventOutcome, GestureDispatcher, GesturePhase};
use crate::registry::WidgetRegistry;
use crate::render::RenderContext;
use crate::view::ViewState;
use crate::widget::{Widget, WidgetConfig, WidgetHandler, WidgetId, WidgetOptions};

/// Owns the gesture dispatcher and device adapter of one surface.
///
/// The host forwards raw events to [`Self::on_event`] and calls
/// [`Self::retransform`] before drawing each frame.
#[derive(Debug)]
pub struct SurfaceController {
    dispatcher: GestureDispatcher,
    adapter: DeviceAdapter,
}

impl SurfaceController {
    /// Create a controller and bind the adapter for `profile`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ControlsError::InvalidSurface`] for unusable
    /// surface geometry and a configuration error if `config` is invalid.
    pub fn new(
        surface: Surface,
        config: ControlsConfig,
        profile: DeviceProfile,
    ) -> ControlsResult<Self> {
        let surface = surface.validated()?;
        config.validate()?;

        let mut adapter = DeviceAdapter::new(profile);
        adapter.handle(&config, false);
        tracing::debug!(
            "Controller ready for {}x{} surface",
            surface.width,
            surface.height
        );
        Ok(Self {
            dispatcher: GestureDispatcher::new(config, surface),
            adapter,
        })
    }

    /// Create a controller from raw options.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface or any option is invalid.
    pub fn from_options(
        surface: Surface,
        options: &ControlsOptions,
        profile: DeviceProfile,
    ) -> ControlsResult<Self> {
        Self::new(surface, ControlsConfig::from_options(options)?, profile)
    }

    /// Re-bind the adapter. Returns `false` if already bound and not forced.
    pub fn handle(&mut self, force: bool) -> bool {
        self.adapter.handle(self.dispatcher.config(), force)
    }

    /// Feed one host event. Returns `None` if the adapter is not bound to
    /// this event type.
    pub fn on_event(&mut self, event: &InputEvent) -> Option<EventOutcome> {
        self.adapter.route(&mut self.dispatcher, event)
    }

    /// Apply the view transform to a drawing context.
    pub fn retransform<C: RenderContext + ?Sized>(&self, ctx: &mut C) -> &ViewState {
        self.dispatcher.view().apply_to_context(ctx)
    }

    /// Relative or absolute translation.
    pub fn translate(&mut self, dx: f64, dy: f64, absolute: bool) -> [f64; 2] {
        self.dispatcher.view_mut().translate_by(dx, dy, absolute)
    }

    /// Relative or absolute scale.
    pub fn scale(&mut self, sx: f64, sy: f64, absolute: bool) -> [f64; 2] {
        self.dispatcher.view_mut().scale_by(sx, sy, absolute)
    }

    /// Replace the surface geometry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ControlsError::InvalidSurface`] for unusable geometry.
    pub fn resize(&mut self, surface: Surface) -> ControlsResult<()> {
        self.dispatcher.set_surface(surface.validated()?);
        Ok(())
    }

    /// Create and register a widget.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ControlsError::NotANumber`] for NaN geometry.
    pub fn add_widget(
        &mut self,
        config: WidgetConfig,
        handler: impl WidgetHandler + 'static,
    ) -> ControlsResult<WidgetId> {
        config.validate()?;
        let registry = self.dispatcher.registry_mut();
        let widget = registry.create_widget(config, handler);
        registry.register(widget)
    }

    /// Create and register a widget from raw options.
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid.
    pub fn add_widget_options(
        &mut self,
        options: &WidgetOptions,
        handler: impl WidgetHandler + 'static,
    ) -> ControlsResult<WidgetId> {
        self.dispatcher
            .registry_mut()
            .register_options(options, handler)
    }

    /// Build a widget without registering it.
    pub fn create_widget(
        &mut self,
        config: WidgetConfig,
        handler: impl WidgetHandler + 'static,
    ) -> Widget {
        self.dispatcher.registry_mut().create_widget(config, handler)
    }

    /// Register a pre-built widget.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ControlsError::AlreadyRegistered`] on duplicates.
    pub fn register_widget(&mut self, widget: Widget) -> ControlsResult<WidgetId> {
        self.dispatcher.registry_mut().register(widget)
    }

    /// Remove a widget.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ControlsError::WidgetNotFound`] for unknown ids.
    pub fn remove_widget(&mut self, id: WidgetId) -> ControlsResult<Widget> {
        self.dispatcher.registry_mut().remove(id)
    }

    /// Enable or disable a widget.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ControlsError::WidgetNotFound`] for unknown ids.
    pub fn set_widget_enabled(&mut self, id: WidgetId, enabled: bool) -> ControlsResult<()> {
        self.dispatcher.registry_mut().set_enabled(id, enabled)
    }

    /// Map a client-space point into local space.
    #[must_use]
    pub fn to_local(&self, client_x: f64, client_y: f64) -> [f64; 2] {
        let device = self.dispatcher.surface().to_device(client_x, client_y);
        self.dispatcher.view().to_local(device)
    }

    /// View transform.
    #[must_use]
    pub fn view(&self) -> &ViewState {
        self.dispatcher.view()
    }

    /// Registered widgets.
    #[must_use]
    pub fn widgets(&self) -> &WidgetRegistry {
        self.dispatcher.registry()
    }

    /// Current gesture phase.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.dispatcher.state().phase()
    }

    /// Configuration snapshot.
    #[must_use]
    pub fn config(&self) -> &ControlsConfig {
        self.dispatcher.config()
    }

    /// Surface geometry.
    #[must_use]
    pub fn surface(&self) -> &Surface {
        self.dispatcher.surface()
    }

    /// Device adapter.
    #[must_use]
    pub fn adapter(&self) -> &DeviceAdapter {
        &self.adapter
    }

    /// Gesture dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &GestureDispatcher {
        &self.dispatcher
    }

    /// Mutable gesture dispatcher, for driving handlers directly.
    pub fn dispatcher_mut(&mut self) -> &mut GestureDispatcher {
        &mut self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{PointerEvent, WheelEvent};
    use crate::render::{ContextCall, RecordingContext};
    use crate::widget::DefaultHandler;
    use crate::ControlsError;

    fn controller(options: &ControlsOptions) -> SurfaceController {
        SurfaceController::from_options(
            Surface::new(640.0, 480.0).expect("surface"),
            options,
            DeviceProfile::Pointer,
        )
        .expect("controller")
    }

    #[test]
    fn construction_binds_the_adapter() {
        let mut c = controller(&ControlsOptions::default());
        assert!(c.adapter().is_bound());
        assert!(!c.handle(false));
        assert!(c.handle(true));
    }

    #[test]
    fn invalid_surface_is_rejected() {
        let surface = Surface {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 10.0,
            viewport_height: 10.0,
        };
        let err = SurfaceController::new(surface, ControlsConfig::default(), DeviceProfile::Touch)
            .expect_err("zero width");
        assert!(matches!(err, ControlsError::InvalidSurface(_)));
    }

    #[test]
    fn retransform_resets_then_translates_then_scales() {
        let mut c = controller(&ControlsOptions::default());
        c.translate(10.0, 20.0, true);
        c.scale(2.0, 2.0, true);

        let mut ctx = RecordingContext::new();
        ctx.scale(9.0, 9.0);
        ctx.clear_calls();
        c.retransform(&mut ctx);

        assert_eq!(
            ctx.calls(),
            &[
                ContextCall::SetTransform {
                    a: 1.0,
                    b: 0.0,
                    c: 0.0,
                    d: 1.0,
                    e: 0.0,
                    f: 0.0
                },
                ContextCall::Translate { x: 10.0, y: 20.0 },
                ContextCall::Scale { x: 2.0, y: 2.0 },
            ]
        );
        assert_eq!(ctx.matrix().apply([1.0, 1.0]), [12.0, 22.0]);
    }

    #[test]
    fn events_outside_bindings_are_ignored() {
        let mut c = controller(&ControlsOptions::default());
        assert_eq!(
            c.on_event(&InputEvent::Wheel(WheelEvent::pixels(0.0, 0.0, -50.0))),
            None
        );
        assert!(c
            .on_event(&InputEvent::PointerMove(PointerEvent::at(1.0, 1.0)))
            .is_some());
    }

    #[test]
    fn widgets_can_be_added_and_removed() {
        let mut c = controller(&ControlsOptions::default());
        let id = c
            .add_widget(WidgetConfig::rect(0.0, 0.0, 5.0, 5.0), DefaultHandler)
            .expect("add");
        assert_eq!(c.widgets().len(), 1);
        c.set_widget_enabled(id, false).expect("toggle");
        assert!(!c.widgets().get(id).expect("widget").is_enabled());

        let widget = c.remove_widget(id).expect("remove");
        assert!(c.widgets().is_empty());
        assert_eq!(c.register_widget(widget).expect("re-add"), id);

        let bad = WidgetConfig::rect(f64::NAN, 0.0, 1.0, 1.0);
        assert!(c.add_widget(bad, DefaultHandler).is_err());
    }

    #[test]
    fn resize_moves_the_client_origin() {
        let mut c = controller(&ControlsOptions::default());
        c.resize(
            Surface::new(640.0, 480.0)
                .expect("surface")
                .with_offset(20.0, 10.0),
        )
        .expect("resize");
        assert_eq!(c.to_local(20.0, 10.0), [0.0, 0.0]);
        assert!(c.resize(Surface { width: -1.0, ..*c.surface() }).is_err());
    }
}
