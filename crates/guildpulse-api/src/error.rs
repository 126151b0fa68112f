use thiserror::Error;

/// Top-level error type for the `guildpulse-api` crate.
///
/// Every failure mode of a feed fetch collapses into one of these variants.
/// `guildpulse-core` surfaces them to the user as a single transient fetch
/// failure — there is no partial-success path, so callers never need to
/// distinguish which feed broke.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The feed responded with a non-success status code.
    #[error("feed returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The response body was not a valid feed document.
    #[error("feed deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// URL parsing error.
    #[error("invalid feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` if this is a transient error where the next manual or
    /// timer-triggered attempt might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
