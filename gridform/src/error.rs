//! Engine error types.
//!
//! The error policy is deliberately binary: cell-construction failures inside
//! the resolver are recovered by substituting the raw cell value, everything
//! else propagates to the host exactly as raised. There is no taxonomy beyond
//! recovered-vs-propagated.

use std::any::Any;

use thiserror::Error;

/// Errors raised while turning configuration into view nodes.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No dynamic component is registered under the given name.
    #[error("no component registered under '{0}'")]
    UnknownComponent(String),

    /// A display-mode formatter failed for a column.
    #[error("formatter for column '{prop}' failed: {message}")]
    Formatter { prop: String, message: String },

    /// The virtualized backend received a grouped column.
    #[error(
        "column '{prop}' declares children; the virtualized backend only renders a flat column list"
    )]
    NestedColumnsUnsupported { prop: String },

    /// Edit mode was asked to resolve a column whose render type does not
    /// name a dynamic component.
    #[error("column '{prop}' does not name a dynamic component")]
    NotAComponent { prop: String },

    /// Caller-supplied render code panicked.
    #[error("render callback panicked: {0}")]
    Panic(String),
}

/// Extract a human-readable message from a panic payload.
///
/// Panics carry either `&str` or `String` payloads. Anything else falls back
/// to a generic message.
pub fn extract_panic_message(panic: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
