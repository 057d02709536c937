//! Persistent pan/zoom state of a controlled surface.

use crate::config::{Bounds, ControlsConfig};
use crate::math::{clamp, rate_limited_clamp};
use crate::render::RenderContext;

/// Translation and scale of the view, with their bounds.
///
/// Device coordinates map to local coordinates as
/// `local = (device - translation) / scale`. Both vectors stay within their
/// bounds after every mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    translation: [f64; 2],
    scale: [f64; 2],
    translation_bounds: Bounds,
    scale_bounds: Bounds,
    translate_speed: f64,
    scale_speed: f64,
    reversed: bool,
    zoom_changed: [bool; 2],
    last_scale_factor: [f64; 2],
}

impl ViewState {
    /// Create the view state from a configuration snapshot.
    #[must_use]
    pub fn new(config: &ControlsConfig) -> Self {
        Self {
            translation: config.translation_bounds.clamp(config.translation),
            scale: config.scale_bounds.clamp(config.scale),
            translation_bounds: config.translation_bounds,
            scale_bounds: config.scale_bounds,
            translate_speed: config.translate_speed,
            scale_speed: config.scale_speed,
            reversed: config.events_reversed,
            zoom_changed: [false, false],
            last_scale_factor: [1.0, 1.0],
        }
    }

    /// Current pan offset.
    #[must_use]
    pub fn translation(&self) -> [f64; 2] {
        self.translation
    }

    /// Current zoom factors.
    #[must_use]
    pub fn scale(&self) -> [f64; 2] {
        self.scale
    }

    /// Pan clamp.
    #[must_use]
    pub fn translation_bounds(&self) -> Bounds {
        self.translation_bounds
    }

    /// Zoom clamp.
    #[must_use]
    pub fn scale_bounds(&self) -> Bounds {
        self.scale_bounds
    }

    /// Multiplier applied to relative translations.
    #[must_use]
    pub fn translate_speed(&self) -> f64 {
        self.translate_speed
    }

    /// Multiplier gesture handlers apply to raw scale deltas.
    #[must_use]
    pub fn scale_speed(&self) -> f64 {
        self.scale_speed
    }

    /// Per axis, whether the last scale operation actually moved the scale.
    #[must_use]
    pub fn zoom_changed(&self) -> [bool; 2] {
        self.zoom_changed
    }

    /// Per axis, `new / old` scale of the last scale operation.
    ///
    /// Differs from the requested factor when a bound absorbed part of it.
    #[must_use]
    pub fn last_scale_factor(&self) -> [f64; 2] {
        self.last_scale_factor
    }

    /// Replace the pan clamp.
    ///
    /// The current translation is left as is; if it now lies outside, later
    /// relative moves may only bring it back toward the range.
    pub fn set_translation_bounds(&mut self, bounds: Bounds) {
        self.translation_bounds = bounds;
    }

    /// Replace the zoom clamp. Same out-of-range rule as
    /// [`Self::set_translation_bounds`].
    pub fn set_scale_bounds(&mut self, bounds: Bounds) {
        self.scale_bounds = bounds;
    }

    /// Translate the view.
    ///
    /// Relative moves are multiplied by the translate speed and negated
    /// when events are reversed. Absolute moves set each axis directly.
    /// Either way the result is clamped to the translation bounds.
    pub fn translate_by(&mut self, dx: f64, dy: f64, absolute: bool) -> [f64; 2] {
        if absolute {
            self.translation = self.translation_bounds.clamp([dx, dy]);
        } else {
            let direction = if self.reversed { -1.0 } else { 1.0 };
            let factor = self.translate_speed * direction;
            self.shift(dx * factor, dy * factor);
        }
        self.translation
    }

    /// Move the translation by an exact amount, bypassing speed and
    /// reversal. Used to keep a zoom pivot fixed on screen.
    pub fn offset_by(&mut self, dx: f64, dy: f64) -> [f64; 2] {
        self.shift(dx, dy);
        self.translation
    }

    /// Scale the view.
    ///
    /// Relative calls multiply the current scale by `(sx, sy)`, absolute
    /// calls set it. The result is clamped to the scale bounds and the
    /// per-axis [`Self::zoom_changed`] flags are updated.
    pub fn scale_by(&mut self, sx: f64, sy: f64, absolute: bool) -> [f64; 2] {
        let previous = self.scale;
        let by = [sx, sy];
        for axis in 0..2 {
            let current = previous[axis];
            self.scale[axis] = if absolute {
                self.scale_bounds.clamp_axis(axis, by[axis])
            } else {
                let delta = current * by[axis] - current;
                bounded_step(
                    current,
                    self.scale_bounds.min[axis],
                    self.scale_bounds.max[axis],
                    delta,
                )
            };

            let next = self.scale[axis];
            self.zoom_changed[axis] = (next - current).abs() > f64::EPSILON * current.abs().max(1.0);
            self.last_scale_factor[axis] = if current == 0.0 { 1.0 } else { next / current };
        }
        self.scale
    }

    /// Set translation and scale at once, each clamped to its bounds.
    pub fn set_absolute(&mut self, translation: [f64; 2], scale: [f64; 2]) {
        self.translate_by(translation[0], translation[1], true);
        self.scale_by(scale[0], scale[1], true);
    }

    /// Map a surface device point into local (content) space.
    #[must_use]
    pub fn to_local(&self, device: [f64; 2]) -> [f64; 2] {
        [
            (device[0] - self.translation[0]) / self.scale[0],
            (device[1] - self.translation[1]) / self.scale[1],
        ]
    }

    /// Map a local point back into surface device space.
    #[must_use]
    pub fn to_device(&self, local: [f64; 2]) -> [f64; 2] {
        [
            local[0] * self.scale[0] + self.translation[0],
            local[1] * self.scale[1] + self.translation[1],
        ]
    }

    /// Reset `ctx` to identity and apply translate, then scale.
    pub fn apply_to_context<C: RenderContext + ?Sized>(&self, ctx: &mut C) -> &Self {
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        ctx.translate(self.translation[0], self.translation[1]);
        ctx.scale(self.scale[0], self.scale[1]);
        self
    }

    fn shift(&mut self, dx: f64, dy: f64) {
        let by = [dx, dy];
        for (axis, delta) in by.into_iter().enumerate() {
            self.translation[axis] = bounded_step(
                self.translation[axis],
                self.translation_bounds.min[axis],
                self.translation_bounds.max[axis],
                delta,
            );
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(&ControlsConfig::default())
    }
}

/// In-range values are clamped after the step; values already outside the
/// range (after a bounds change) are only allowed to move back.
fn bounded_step(n: f64, min: f64, max: f64, delta: f64) -> f64 {
    if n > max || n < min {
        rate_limited_clamp(n, min, max, delta)
    } else {
        clamp(n + delta, min, max)
    }
}
