// Panel Errors
// Typed failures returned by panel, registry and descriptor operations

use thiserror::Error;

use super::control::ControlKind;

/// Errors produced by panel operations
#[derive(Debug, Error)]
pub enum PanelError {
    /// An operation targeted a title that is not registered
    #[error("no control titled '{0}'")]
    ControlNotFound(String),

    /// A control with this title already exists and the panel rejects duplicates
    #[error("a control titled '{0}' already exists")]
    DuplicateTitle(String),

    /// Numeric bounds are inconsistent
    #[error("invalid range for '{title}': min {min}, max {max}, step {step}")]
    InvalidRange {
        title: String,
        min: f64,
        max: f64,
        step: f64,
    },

    /// The declarative builder met a control type it does not know
    #[error("unknown control kind '{0}'")]
    UnknownControlKind(String),

    /// The control exists but is of a different kind than the operation expects
    #[error("control '{title}' is a {found} control, expected {expected}")]
    KindMismatch {
        title: String,
        expected: ControlKind,
        found: ControlKind,
    },

    /// A value could not be applied to a control
    #[error("invalid value for '{title}': {reason}")]
    InvalidValue { title: String, reason: String },

    /// Grid snapping needs a positive pitch
    #[error("grid size must be greater than zero")]
    InvalidGridSize,

    /// The theme was already installed by the first panel
    #[error("theme already installed; use_external_theme must run before the first panel is created")]
    ThemeLocked,

    /// A descriptor or theme document could not be parsed
    #[error("failed to parse {what}: {message}")]
    Parse { what: &'static str, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PanelError {
    pub(crate) fn invalid_value(title: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            title: title.to_string(),
            reason: reason.into(),
        }
    }
}

pub type PanelResult<T> = Result<T, PanelError>;
