use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::LimitsError;

/// The limit categories, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitKind {
    DepthLimit,
    NodeLimit,
    BatchLimit,
    RateLimit,
    TimeLimit,
}

impl LimitKind {
    pub const ALL: [LimitKind; 5] = [
        LimitKind::DepthLimit,
        LimitKind::NodeLimit,
        LimitKind::BatchLimit,
        LimitKind::RateLimit,
        LimitKind::TimeLimit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LimitKind::DepthLimit => "depth_limit",
            LimitKind::NodeLimit => "node_limit",
            LimitKind::BatchLimit => "batch_limit",
            LimitKind::RateLimit => "rate_limit",
            LimitKind::TimeLimit => "time_limit",
        }
    }

    pub fn is_rate(&self) -> bool {
        matches!(self, LimitKind::RateLimit)
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LimitKind {
    type Err = LimitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LimitKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| LimitsError::InvalidArgument(format!("Unknown limit kind: {}", s)))
    }
}

/// Which value applies to a role for one limit kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LimitState {
    #[default]
    Global,
    #[serde(alias = "custom")]
    PerRole,
    Disabled,
}

impl fmt::Display for LimitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitState::Global => write!(f, "global"),
            LimitState::PerRole => write!(f, "per_role"),
            LimitState::Disabled => write!(f, "disabled"),
        }
    }
}

impl FromStr for LimitState {
    type Err = LimitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "global" => Ok(LimitState::Global),
            "per_role" | "custom" => Ok(LimitState::PerRole),
            "disabled" => Ok(LimitState::Disabled),
            other => Err(LimitsError::InvalidArgument(format!("Unknown limit state: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in LimitKind::ALL {
            assert_eq!(kind.as_str().parse::<LimitKind>().unwrap(), kind);
        }
        assert!("queue_limit".parse::<LimitKind>().is_err());
    }

    #[test]
    fn test_kind_ordering_matches_display_order() {
        let mut kinds = LimitKind::ALL.to_vec();
        kinds.reverse();
        kinds.sort();
        assert_eq!(kinds, LimitKind::ALL.to_vec());
    }

    #[test]
    fn test_state_accepts_custom_alias() {
        assert_eq!("custom".parse::<LimitState>().unwrap(), LimitState::PerRole);
        let state: LimitState = serde_json::from_str("\"custom\"").unwrap();
        assert_eq!(state, LimitState::PerRole);
        assert_eq!(serde_json::to_string(&LimitState::PerRole).unwrap(), "\"per_role\"");
    }
}
