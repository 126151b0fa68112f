use thiserror::Error;

/// Errors surfaced by the core layer.
///
/// A refresh failure is deliberately a single kind: the dashboard does not
/// distinguish which feed broke, only that this load cycle produced no new
/// data. The wrapped [`guildpulse_api::Error`] keeps the detail for logs.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Fetching or parsing either feed failed; stored series are unchanged.
    #[error("failed to load feed data: {0}")]
    Fetch(#[from] guildpulse_api::Error),
}

impl CoreError {
    /// Returns `true` if a later attempt might succeed on its own.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_transient(),
        }
    }
}
