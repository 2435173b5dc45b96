use std::fmt;

/// Errors surfaced by the arena and its host.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// Startup configuration that cannot produce a playable arena.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("preferences error: {0}")]
    Preferences(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration file errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// A state the arena must never reach. Reported by
/// [`crate::arena::Arena::validate_invariants`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InvariantViolation {
    LivesRunStateMismatch { lives: u32, run_over: bool },
    LiveBulletExpired { time_to_live: f64 },
    WrappedEntityOutOfBounds { x: f64, y: f64 },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LivesRunStateMismatch { lives, run_over } => {
                write!(f, "lives={lives} inconsistent with run_over={run_over}")
            }
            Self::LiveBulletExpired { time_to_live } => {
                write!(f, "bullet still alive with time_to_live={time_to_live}")
            }
            Self::WrappedEntityOutOfBounds { x, y } => {
                write!(f, "wrap-eligible entity outside the field at ({x}, {y})")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}
