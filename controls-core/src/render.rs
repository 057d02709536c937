//! The drawing-context capability the view state drives.
//!
//! The controller never draws. It only needs a context that can reset its
//! transform and accept translate/scale calls, the subset of a 2D canvas
//! API that [`crate::ViewState::apply_to_context`] uses.

use serde::{Deserialize, Serialize};

/// Trait for 2D drawing contexts that accept affine transform calls.
pub trait RenderContext {
    /// Replace the current transform with `[a c e; b d f; 0 0 1]`.
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64);

    /// Post-multiply the current transform by a translation.
    fn translate(&mut self, x: f64, y: f64);

    /// Post-multiply the current transform by a scale.
    fn scale(&mut self, x: f64, y: f64);
}

/// A 2D affine matrix in canvas `(a, b, c, d, e, f)` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformMatrix {
    /// Horizontal scaling.
    pub a: f64,
    /// Vertical skewing.
    pub b: f64,
    /// Horizontal skewing.
    pub c: f64,
    /// Vertical scaling.
    pub d: f64,
    /// Horizontal translation.
    pub e: f64,
    /// Vertical translation.
    pub f: f64,
}

impl TransformMatrix {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Map a local point into device space.
    #[must_use]
    pub fn apply(&self, point: [f64; 2]) -> [f64; 2] {
        [
            self.a * point[0] + self.c * point[1] + self.e,
            self.b * point[0] + self.d * point[1] + self.f,
        ]
    }
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A call received by a [`RecordingContext`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum ContextCall {
    SetTransform {
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    },
    Translate {
        x: f64,
        y: f64,
    },
    Scale {
        x: f64,
        y: f64,
    },
}

/// Headless context that composes the transform it is given and keeps a
/// log of the calls.
#[derive(Debug, Clone, Default)]
pub struct RecordingContext {
    matrix: TransformMatrix,
    calls: Vec<ContextCall>,
}

impl RecordingContext {
    /// Create a context with the identity transform.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The composed transform.
    #[must_use]
    pub fn matrix(&self) -> TransformMatrix {
        self.matrix
    }

    /// Every call received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[ContextCall] {
        &self.calls
    }

    /// Forget the recorded calls, keeping the transform.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl RenderContext for RecordingContext {
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.matrix = TransformMatrix { a, b, c, d, e, f };
        self.calls.push(ContextCall::SetTransform { a, b, c, d, e, f });
    }

    fn translate(&mut self, x: f64, y: f64) {
        let m = &mut self.matrix;
        m.e += m.a * x + m.c * y;
        m.f += m.b * x + m.d * y;
        self.calls.push(ContextCall::Translate { x, y });
    }

    fn scale(&mut self, x: f64, y: f64) {
        let m = &mut self.matrix;
        m.a *= x;
        m.b *= x;
        m.c *= y;
        m.d *= y;
        self.calls.push(ContextCall::Scale { x, y });
    }
}
