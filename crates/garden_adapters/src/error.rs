//! Error type for external-collaborator failures.

use thiserror::Error;

/// A failed call to an external collaborator.
///
/// Non-fatal by design: the core's state is never touched by these, only
/// the adapter's pending request reports failure. The `Display` output is
/// the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// The advisory service failed or returned garbage.
    #[error("advisor unavailable: {0}")]
    Advisor(String),

    /// The leaderboard service failed.
    #[error("leaderboard sync failed: {0}")]
    Leaderboard(String),

    /// The market service failed.
    #[error("market request failed: {0}")]
    Market(String),
}
