//! Error taxonomy.
//!
//! Provider failures are typed so completion handlers can decide what to
//! surface: only weather failures reach the status line, everything else
//! is logged and swallowed.

/// Failure talking to any external provider (weather, geo-IP, search).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider} returned HTTP {status}")]
    Status { provider: String, status: u16 },
    #[error("{provider} request failed: {message}")]
    Transport { provider: String, message: String },
    #[error("{provider} returned malformed data: {message}")]
    Malformed { provider: String, message: String },
}

impl ProviderError {
    pub fn malformed(provider: &str, message: impl Into<String>) -> Self {
        Self::Malformed {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn transport(provider: &str, message: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

/// Location resolution failure. Never surfaced: the default city stays active.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("no device position and every IP provider failed")]
    Unavailable,
}
