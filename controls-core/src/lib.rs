//! # Controls Core
//!
//! Gesture-to-transform engine for 2D drawing surfaces.
//! Compiles to WASM for browser hosts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              SurfaceController              │
//! ├─────────────────────────────────────────────┤
//! │  DeviceAdapter   │  GestureDispatcher       │
//! │  - Pointer       │  - Drag / pinch / wheel  │
//! │  - Touch         │  - Tap recognition       │
//! ├─────────────────────────────────────────────┤
//! │  ViewState       │  WidgetRegistry          │
//! │  - Translation   │  - Hit-testing           │
//! │  - Scale         │  - Focus / blur / click  │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod adapter;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod gesture;
pub mod math;
pub mod registry;
pub mod render;
pub mod view;
pub mod wheel;
pub mod widget;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use adapter::{DeviceAdapter, DeviceProfile};
pub use config::{Bounds, ControlsConfig, ControlsOptions, ScaleMode, Surface, UseButton};
pub use controller::SurfaceController;
pub use error::{ControlsError, ControlsResult};
pub use event::{
    DeltaMode, EventKind, InputEvent, PointerEvent, TouchEvent, TouchPhase, TouchPoint, WheelEvent,
};
pub use gesture::{EventOutcome, GestureDispatcher, GesturePhase, GestureState};
pub use registry::WidgetRegistry;
pub use render::{ContextCall, RecordingContext, RenderContext, TransformMatrix};
pub use view::ViewState;
pub use wheel::{init_line_height, line_height, DEFAULT_LINE_HEIGHT};
pub use widget::{
    CallbackHandler, DefaultHandler, Position, Widget, WidgetConfig, WidgetHandler, WidgetId,
    WidgetOptions,
};

/// Controls core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
