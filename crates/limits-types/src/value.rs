use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::LimitKind;

/// Marker asking the rate limiter to key requests by client IP.
pub const IP_MARKER: &str = "IP";

/// Parses a limit amount. Anything other than a non-negative integer is `None`.
pub fn parse_limit_value(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UniqueParams {
    Ip,
    Params(Vec<String>),
}

impl UniqueParams {
    /// Exactly `"IP"` yields the marker. Anything else is split on commas,
    /// trimmed, and deduplicated keeping first occurrence. `None` when no
    /// names remain.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw == IP_MARKER {
            return Some(UniqueParams::Ip);
        }

        let mut params: Vec<String> = Vec::new();
        for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if !params.iter().any(|p| p == token) {
                params.push(token.to_string());
            }
        }

        if params.is_empty() {
            None
        } else {
            Some(UniqueParams::Params(params))
        }
    }
}

impl std::fmt::Display for UniqueParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UniqueParams::Ip => f.write_str(IP_MARKER),
            UniqueParams::Params(params) => f.write_str(&params.join(", ")),
        }
    }
}

impl Serialize for UniqueParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            UniqueParams::Ip => serializer.serialize_str(IP_MARKER),
            UniqueParams::Params(params) => params.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for UniqueParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Marker(String),
            List(Vec<String>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Marker(marker) if marker == IP_MARKER => Ok(UniqueParams::Ip),
            Raw::Marker(other) => Err(de::Error::custom(format!(
                "unique_params must be \"{}\" or a list, got \"{}\"",
                IP_MARKER, other
            ))),
            Raw::List(list) if list.is_empty() => {
                Err(de::Error::custom("unique_params list must not be empty"))
            }
            Raw::List(list) => Ok(UniqueParams::Params(list)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitValue {
    pub max_reqs_per_min: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_params: Option<UniqueParams>,
}

/// A single limit value. Rate limits are objects on the wire, every other
/// kind is a bare integer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleLimitValue {
    Rate(RateLimitValue),
    Count(u64),
}

impl RoleLimitValue {
    /// Builds the value for `kind` with a new amount, keeping the unique
    /// params of a previous rate value.
    pub fn with_amount(kind: LimitKind, previous: Option<&RoleLimitValue>, amount: u64) -> Self {
        if !kind.is_rate() {
            return RoleLimitValue::Count(amount);
        }

        let unique_params = previous.and_then(|v| v.unique_params().cloned());
        RoleLimitValue::Rate(RateLimitValue {
            max_reqs_per_min: amount,
            unique_params,
        })
    }

    pub fn amount(&self) -> u64 {
        match self {
            RoleLimitValue::Rate(rate) => rate.max_reqs_per_min,
            RoleLimitValue::Count(value) => *value,
        }
    }

    /// Whether this value has the wire shape `kind` expects.
    pub fn fits(&self, kind: LimitKind) -> bool {
        matches!(self, RoleLimitValue::Rate(_)) == kind.is_rate()
    }

    pub fn unique_params(&self) -> Option<&UniqueParams> {
        match self {
            RoleLimitValue::Rate(rate) => rate.unique_params.as_ref(),
            RoleLimitValue::Count(_) => None,
        }
    }
}

impl std::fmt::Display for RoleLimitValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleLimitValue::Count(value) => write!(f, "{}", value),
            RoleLimitValue::Rate(rate) => match &rate.unique_params {
                Some(params) => write!(f, "{}/min by {}", rate.max_reqs_per_min, params),
                None => write!(f, "{}/min", rate.max_reqs_per_min),
            },
        }
    }
}
