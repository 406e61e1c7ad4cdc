#![forbid(unsafe_code)]
#![warn(clippy::all)]

mod kind;
mod limits;
mod value;

pub use kind::{LimitKind, LimitState};
pub use limits::{ApiLimitsConfig, RoleLimits};
pub use value::{parse_limit_value, RateLimitValue, RoleLimitValue, UniqueParams, IP_MARKER};

use thiserror::Error;

/// Reserved role holding the default limits applied when a role has no override.
pub const GLOBAL_ROLE: &str = "global";

pub fn is_global_role(role: &str) -> bool {
    role == GLOBAL_ROLE
}

#[derive(Error, Debug)]
pub enum LimitsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Editing session is closed")]
    SessionClosed,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type LimitsResult<T> = Result<T, LimitsError>;
