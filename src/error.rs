use thiserror::Error;

/// Recoverable input errors surfaced to the caller instead of silently
/// swallowed. Nothing here is fatal to the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("weight '{0}' is not a positive number")]
    InvalidWeight(String),

    #[error("no client with id {0}")]
    UnknownClient(i64),

    #[error("unknown status '{0}' (expected active, paused, or completed)")]
    UnknownStatus(String),

    #[error("unknown health flag '{0}'")]
    UnknownHealthFlag(String),

    #[error("unknown touchpoint kind '{0}' (expected morning or evening)")]
    UnknownTouchpointKind(String),
}
