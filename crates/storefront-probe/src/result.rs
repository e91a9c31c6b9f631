//! Result and error types for storefront-probe.

use thiserror::Error;

/// Result type for storefront-probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Structural query matched nothing within the wait budget
    #[error("No element matches {selector} after {waited_ms}ms")]
    ElementNotFound {
        /// Readable selector description
        selector: String,
        /// Time spent waiting
        waited_ms: u64,
    },

    /// Element was found but never became actionable
    #[error("Element {selector} not actionable after {ms}ms")]
    Timeout {
        /// Readable selector description
        selector: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Scenario-level invariant violated
    #[error("Assertion failed at '{step}': {message}")]
    AssertionFailure {
        /// Scenario step that failed
        step: String,
        /// Error message
        message: String,
    },

    /// Action not allowed from the current navigation state
    #[error("Cannot {action} from {from}")]
    InvalidTransition {
        /// State the session was in
        from: String,
        /// Attempted action
        action: String,
    },

    /// Page accessed while the session is on another page
    #[error("Expected to be on {expected}, session is on {actual}")]
    WrongPage {
        /// Page the caller asked for
        expected: String,
        /// Page the session is on
        actual: String,
    },

    /// Label did not contain a `$d.dd` amount
    #[error("No monetary amount in '{text}'")]
    UnparsableAmount {
        /// Offending text
        text: String,
    },

    /// Label did not contain an integer count
    #[error("No count in '{text}'")]
    UnparsableCount {
        /// Offending text
        text: String,
    },

    /// Cart lines break the one-line-per-product, quantity-one rule
    #[error("Cart invariant violated: {message}")]
    CartInvariant {
        /// Error message
        message: String,
    },

    /// Error reported by the element driver
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Invalid configuration value
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ProbeError {
    /// Build a driver error from any displayable cause
    pub fn driver(message: impl std::fmt::Display) -> Self {
        Self::Driver {
            message: message.to_string(),
        }
    }

    /// Build an assertion failure for a scenario step
    pub fn assertion(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AssertionFailure {
            step: step.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from a bounded wait running out
    #[must_use]
    pub const fn is_wait_failure(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. } | Self::Timeout { .. })
    }
}
