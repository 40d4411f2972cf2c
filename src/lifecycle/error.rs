//! Lifecycle-specific error types

use thiserror::Error;

/// Errors that can occur while driving the application through a phase
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A component's `prepare`, `start` or `stop` failed.
    ///
    /// The component's own error is carried through unchanged; use
    /// [`anyhow::Error::downcast_ref`] to recover its concrete type.
    #[error(transparent)]
    Component(#[from] anyhow::Error),

    /// Operation timed out
    #[error("Timeout during {phase}: {message}")]
    Timeout {
        /// The lifecycle phase where timeout occurred
        phase: String,
        /// Additional error message
        message: String,
    },
}

impl LifecycleError {
    /// Create a timeout error
    pub fn timeout(phase: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Timeout {
            phase: phase.into(),
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// The error raised by the failing component, if that is what this is.
    pub fn component_error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Component(err) => Some(err),
            Self::Timeout { .. } => None,
        }
    }
}

/// A specialized Result type for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;
