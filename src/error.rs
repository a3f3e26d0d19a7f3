//! Error type for turn processing

use thiserror::Error;

/// Errors that are fatal to a turn
///
/// Classifier failures are not represented here: they are recovered inside
/// the MainMenu step and the turn completes with the confused fallback.
#[derive(Debug, Error)]
pub enum BotError {
    /// The state store could not be reached; no messages from this turn
    /// are considered delivered.
    #[error("conversation state store unavailable")]
    StateUnavailable(#[source] anyhow::Error),

    /// The message sink rejected an outbound message. Messages delivered
    /// before the failure are not rolled back.
    #[error("outbound message delivery failed")]
    DeliveryFailed(#[source] anyhow::Error),
}

/// Result alias for turn processing
pub type BotResult<T> = Result<T, BotError>;
