use thiserror::Error;

/// Rejected session settings. Surfaced on the menu, never ends a game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid difficulty '{0}': expected easy, medium or hard")]
    InvalidDifficulty(String),
    #[error("invalid time '{0}': expected seconds per question, at least {min}", min = crate::quiz::MIN_SECONDS_PER_QUESTION)]
    InvalidTime(String),
}

/// Malformed answer input. Transient: the question stays and the clock keeps running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("no answer entered")]
    Empty,
    #[error("'{0}' is not a valid number")]
    NotANumber(String),
}
