//! Error types for controls configuration.

use thiserror::Error;

use crate::widget::WidgetId;

/// Result type for controls operations.
pub type ControlsResult<T> = Result<T, ControlsError>;

/// Errors that can occur while configuring a controlled surface.
///
/// Every variant is raised synchronously at construction or registration
/// time. Gesture handling itself never fails.
#[derive(Debug, Error)]
pub enum ControlsError {
    /// The target surface cannot be driven (bad geometry).
    #[error("Not a usable drawing surface: {0}")]
    InvalidSurface(String),

    /// A numeric vector option is too short or holds non-numeric entries.
    #[error("Not an array of {min_len}-at-least numbers: {field} ({reason})")]
    NotANumberArray {
        /// Name of the offending option.
        field: &'static str,
        /// Minimum number of entries the option requires.
        min_len: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// A scalar numeric option is not a valid number.
    #[error("Not a valid number: {field}")]
    NotANumber {
        /// Name of the offending option.
        field: &'static str,
    },

    /// The widget is already present in the registry.
    #[error("Widget is already registered: {0}")]
    AlreadyRegistered(WidgetId),

    /// No widget with this id is registered.
    #[error("Widget not found: {0}")]
    WidgetNotFound(WidgetId),

    /// Options serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
