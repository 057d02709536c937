//! WebAssembly bindings for controls-core.
//!
//! The host keeps owning the DOM listeners; it forwards each event as JSON
//! to [`WasmControls::handle_event`] and calls
//! [`WasmControls::retransform`] before drawing.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlElement};

use crate::render::RenderContext;
use crate::widget::{WidgetConfig, WidgetHandler, WidgetId};
use crate::{ControlsOptions, DeviceProfile, InputEvent, Surface, SurfaceController};

/// Initialize the controls WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();
}

/// Measure the pixel height of one text line in `document` by rendering a
/// throwaway element.
fn measure_line_height(document: &Document) -> Option<f64> {
    let body = document.body()?;
    let probe: HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
    probe.set_text_content(Some("M"));
    probe
        .set_attribute(
            "style",
            "position:absolute;visibility:hidden;font-size:initial;line-height:normal;padding:0;border:0",
        )
        .ok()?;

    body.append_child(&probe).ok()?;
    let height = f64::from(probe.offset_height());
    body.remove_child(&probe).ok()?;
    Some(height)
}

/// Measure the line height once and store it for line-unit wheel deltas.
///
/// Returns the line height in effect afterwards.
#[wasm_bindgen(js_name = initLineHeight)]
#[must_use]
pub fn init_line_height() -> f64 {
    let measured = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| measure_line_height(&document));
    if let Some(px) = measured {
        crate::wheel::init_line_height(px);
    }
    crate::wheel::line_height()
}

impl RenderContext for CanvasRenderingContext2d {
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        if let Err(err) = CanvasRenderingContext2d::set_transform(self, a, b, c, d, e, f) {
            tracing::warn!("setTransform failed: {err:?}");
        }
    }

    fn translate(&mut self, x: f64, y: f64) {
        if let Err(err) = CanvasRenderingContext2d::translate(self, x, y) {
            tracing::warn!("translate failed: {err:?}");
        }
    }

    fn scale(&mut self, x: f64, y: f64) {
        if let Err(err) = CanvasRenderingContext2d::scale(self, x, y) {
            tracing::warn!("scale failed: {err:?}");
        }
    }
}

/// Widget callbacks backed by JavaScript functions `(x, y) => boolean`.
struct JsWidgetHandler {
    focus: Option<js_sys::Function>,
    blur: Option<js_sys::Function>,
    click: Option<js_sys::Function>,
}

fn call_js(callback: Option<&js_sys::Function>, point: [f64; 2], fallback: bool) -> bool {
    let Some(callback) = callback else {
        return fallback;
    };
    match callback.call2(&JsValue::NULL, &point[0].into(), &point[1].into()) {
        Ok(result) => result.as_bool().unwrap_or(fallback),
        Err(err) => {
            tracing::warn!("Widget callback threw: {err:?}");
            fallback
        }
    }
}

impl WidgetHandler for JsWidgetHandler {
    fn on_focus(&mut self, point: [f64; 2]) -> bool {
        call_js(self.focus.as_ref(), point, false)
    }

    fn on_blur(&mut self, point: [f64; 2]) -> bool {
        call_js(self.blur.as_ref(), point, true)
    }

    fn on_click(&mut self, point: [f64; 2]) -> bool {
        call_js(self.click.as_ref(), point, true)
    }
}

/// Controlled surface instance for WASM.
#[wasm_bindgen]
pub struct WasmControls {
    controller: SurfaceController,
}

#[wasm_bindgen]
impl WasmControls {
    /// Create a controller for a `width` x `height` surface.
    ///
    /// `options_json` holds the camelCase controller options; an empty
    /// string uses the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error string for invalid geometry or options.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: f64,
        height: f64,
        options_json: &str,
        touch: bool,
    ) -> Result<WasmControls, String> {
        let options: ControlsOptions = if options_json.trim().is_empty() {
            ControlsOptions::default()
        } else {
            serde_json::from_str(options_json).map_err(|e| e.to_string())?
        };
        let surface = Surface::new(width, height).map_err(|e| e.to_string())?;
        let controller =
            SurfaceController::from_options(surface, &options, DeviceProfile::detect(touch))
                .map_err(|e| e.to_string())?;
        Ok(Self { controller })
    }

    /// Feed one event serialized as JSON.
    ///
    /// Returns the outcome as JSON, or `null` if the event type is not
    /// bound.
    ///
    /// # Errors
    ///
    /// Returns an error string if the event JSON is malformed.
    #[wasm_bindgen(js_name = handleEvent)]
    pub fn handle_event(&mut self, json: &str) -> Result<String, String> {
        let event: InputEvent = serde_json::from_str(json).map_err(|e| e.to_string())?;
        let outcome = self.controller.on_event(&event);
        serde_json::to_string(&outcome).map_err(|e| e.to_string())
    }

    /// Re-bind the device adapter.
    #[wasm_bindgen(js_name = handle)]
    pub fn rebind(&mut self, force: bool) -> bool {
        self.controller.handle(force)
    }

    /// Apply the view transform to a 2D context.
    pub fn retransform(&self, ctx: &CanvasRenderingContext2d) {
        let mut ctx = ctx.clone();
        self.controller.retransform(&mut ctx);
    }

    /// Translate the view; returns the new translation.
    pub fn translate(&mut self, x: f64, y: f64, absolute: bool) -> Vec<f64> {
        self.controller.translate(x, y, absolute).to_vec()
    }

    /// Scale the view; returns the new scale.
    pub fn scale(&mut self, x: f64, y: f64, absolute: bool) -> Vec<f64> {
        self.controller.scale(x, y, absolute).to_vec()
    }

    /// Update the surface position and size.
    ///
    /// # Errors
    ///
    /// Returns an error string for unusable geometry.
    pub fn resize(
        &mut self,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        viewport_height: f64,
    ) -> Result<(), String> {
        let surface = Surface {
            left,
            top,
            width,
            height,
            viewport_height,
        };
        self.controller.resize(surface).map_err(|e| e.to_string())
    }

    /// Register a widget with optional JS callbacks. Returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error string for NaN geometry.
    #[wasm_bindgen(js_name = addWidget)]
    #[allow(clippy::too_many_arguments)]
    pub fn add_widget(
        &mut self,
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        focus: Option<js_sys::Function>,
        blur: Option<js_sys::Function>,
        click: Option<js_sys::Function>,
    ) -> Result<u64, String> {
        let handler = JsWidgetHandler { focus, blur, click };
        self.controller
            .add_widget(WidgetConfig::rect(x, y, dx, dy), handler)
            .map(WidgetId::get)
            .map_err(|e| e.to_string())
    }

    /// Remove a widget.
    ///
    /// # Errors
    ///
    /// Returns an error string for unknown ids.
    #[wasm_bindgen(js_name = removeWidget)]
    pub fn remove_widget(&mut self, id: u64) -> Result<(), String> {
        self.controller
            .remove_widget(WidgetId::from_raw(id))
            .map(drop)
            .map_err(|e| e.to_string())
    }

    /// Enable or disable a widget.
    ///
    /// # Errors
    ///
    /// Returns an error string for unknown ids.
    #[wasm_bindgen(js_name = setWidgetEnabled)]
    pub fn set_widget_enabled(&mut self, id: u64, enabled: bool) -> Result<(), String> {
        self.controller
            .set_widget_enabled(WidgetId::from_raw(id), enabled)
            .map_err(|e| e.to_string())
    }

    /// Current translation.
    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn translation(&self) -> Vec<f64> {
        self.controller.view().translation().to_vec()
    }

    /// Current scale.
    #[wasm_bindgen(getter, js_name = scaleFactors)]
    #[must_use]
    pub fn scale_factors(&self) -> Vec<f64> {
        self.controller.view().scale().to_vec()
    }

    /// Current gesture phase name.
    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn phase(&self) -> String {
        format!("{:?}", self.controller.phase()).to_lowercase()
    }
}
