//! Unified error type exposed by **`keystone-core`**.
//!
//! Only failures that cannot be answered with an [`Envelope`] end up here:
//! configuration problems detected while building a client, and backend
//! errors a caller explicitly chose to propagate.  Call-level failures are
//! otherwise folded into [`Envelope::Failure`] and never raised.
//!
//! [`Envelope`]: crate::envelope::Envelope
//! [`Envelope::Failure`]: crate::envelope::Envelope::Failure

use thiserror::Error;

/// Convenient alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, KeystoneError>;

#[derive(Debug, Error)]
pub enum KeystoneError {
    /// A required configuration value is absent or empty.
    #[error("missing env variable: `{var}`")]
    MissingConfig { var: &'static str },

    /// A configuration value is present but cannot be used.
    #[error("invalid value for `{var}`: {reason}")]
    InvalidConfig { var: &'static str, reason: String },

    /// Generic forwarding of any backend-specific error.
    #[error("backend returned an error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl KeystoneError {
    /// `true` for errors raised while building a client from configuration.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            KeystoneError::MissingConfig { .. } | KeystoneError::InvalidConfig { .. }
        )
    }
}
