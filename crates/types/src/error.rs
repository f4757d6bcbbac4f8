//! Unified error type for the goofer workspace.

use crate::ServiceId;
use thiserror::Error;

/// Enumerates all error kinds that can occur across goofer crates.
#[derive(Debug, Error)]
pub enum GooferError {
    /// A required request parameter was absent or empty.
    #[error("{0} is required")]
    MissingParameter(&'static str),

    /// The request was valid but the upstream had no matching data.
    #[error("{0} not found")]
    NotFound(String),

    /// The upstream service returned a non-success status.
    #[error("{service} API error: status={status}, body={body}")]
    Upstream {
        service: ServiceId,
        status: u16,
        body: String,
    },

    /// Transport failure or an undecodable upstream body.
    #[error("{service} http error: {message}")]
    Http { service: ServiceId, message: String },

    /// Client-credentials token issuance failed.
    #[error("authentication error: {0}")]
    Auth(String),

    /// JSON serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Credential store failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An optional integration was requested but has no credentials.
    #[error("{0} integration is not configured")]
    NotConfigured(&'static str),

    /// Anything else; reported to clients as a generic failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GooferError {
    /// Shorthand for [`GooferError::Http`].
    pub fn http(service: ServiceId, err: impl std::fmt::Display) -> Self {
        Self::Http {
            service,
            message: err.to_string(),
        }
    }

    /// Returns the upstream service this error originated from, if any.
    #[must_use]
    pub fn service(&self) -> Option<ServiceId> {
        match self {
            Self::Upstream { service, .. } | Self::Http { service, .. } => Some(*service),
            Self::Auth(_) => Some(ServiceId::TwitchAuth),
            _ => None,
        }
    }
}

// ── Feature-gated From impls ──────────────────────────────────────────────────

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for GooferError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, GooferError>;
