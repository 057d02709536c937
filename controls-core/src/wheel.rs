//! Wheel delta normalization.
//!
//! Line-unit deltas need the pixel height of one text line. The host
//! measures it once (see the `wasm` module) and stores it with
//! [`init_line_height`]; until then [`DEFAULT_LINE_HEIGHT`] is used.

use once_cell::sync::OnceCell;

use crate::config::Surface;
use crate::event::{DeltaMode, WheelEvent};

/// Line height assumed before the host has measured one.
pub const DEFAULT_LINE_HEIGHT: f64 = 10.0;

/// A line height that can be set exactly once.
#[derive(Debug, Default)]
pub struct LineHeight(OnceCell<f64>);

impl LineHeight {
    /// An unset line height.
    #[must_use]
    pub const fn new() -> Self {
        Self(OnceCell::new())
    }

    /// Store the measured height.
    ///
    /// Returns `false` if a value was already stored or `px` is not a
    /// positive finite number.
    pub fn init(&self, px: f64) -> bool {
        if !(px.is_finite() && px > 0.0) {
            tracing::warn!("Ignoring invalid line height {px}");
            return false;
        }
        self.0.set(px).is_ok()
    }

    /// The stored height, or [`DEFAULT_LINE_HEIGHT`].
    #[must_use]
    pub fn get(&self) -> f64 {
        self.0.get().copied().unwrap_or(DEFAULT_LINE_HEIGHT)
    }

    /// Whether a measured value has been stored.
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.0.get().is_some()
    }
}

static LINE_HEIGHT: LineHeight = LineHeight::new();

/// Store the process-wide line height. Only the first valid call wins.
pub fn init_line_height(px: f64) -> bool {
    let stored = LINE_HEIGHT.init(px);
    if stored {
        tracing::debug!("Line height set to {px}px");
    }
    stored
}

/// The process-wide line height in pixels.
#[must_use]
pub fn line_height() -> f64 {
    LINE_HEIGHT.get()
}

/// Convert a wheel delta into pixels.
#[must_use]
pub fn normalize_delta(event: &WheelEvent, line_height: f64, surface: &Surface) -> f64 {
    match event.delta_mode {
        DeltaMode::Pixel => event.delta_y,
        DeltaMode::Line => event.delta_y * line_height,
        DeltaMode::Page => event.delta_y * surface.viewport_height,
    }
}

/// Scale factor for a normalized wheel delta.
///
/// Scrolling down (positive delta) zooms out.
#[must_use]
pub fn zoom_factor(pixels: f64, scale_speed: f64, surface: &Surface) -> f64 {
    1.0 - scale_speed * pixels / surface.min_side()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> Surface {
        Surface::new(400.0, 200.0)
            .expect("surface")
            .with_viewport_height(600.0)
    }

    #[test]
    fn line_height_is_set_once() {
        let cell = LineHeight::new();
        assert!((cell.get() - DEFAULT_LINE_HEIGHT).abs() < f64::EPSILON);
        assert!(!cell.init(-3.0));
        assert!(!cell.is_measured());
        assert!(cell.init(18.0));
        assert!(!cell.init(20.0));
        assert!((cell.get() - 18.0).abs() < f64::EPSILON);
    }

    #[test]
    fn deltas_normalize_by_mode() {
        let surface = surface();
        let mut event = WheelEvent::pixels(0.0, 0.0, 3.0);
        assert!((normalize_delta(&event, 16.0, &surface) - 3.0).abs() < 1e-12);

        event.delta_mode = DeltaMode::Line;
        assert!((normalize_delta(&event, 16.0, &surface) - 48.0).abs() < 1e-12);

        event.delta_mode = DeltaMode::Page;
        event.delta_y = -1.0;
        assert!((normalize_delta(&event, 16.0, &surface) + 600.0).abs() < 1e-12);
    }

    #[test]
    fn zoom_factor_uses_smaller_side() {
        let surface = surface();
        assert!((zoom_factor(20.0, 1.0, &surface) - 0.9).abs() < 1e-12);
        assert!((zoom_factor(-20.0, 2.0, &surface) - 1.2).abs() < 1e-12);
    }
}
