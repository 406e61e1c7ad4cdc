use limits_types::{parse_limit_value, LimitKind};

/// Display metadata and input validation for one limit kind.
pub struct LimitSpec {
    pub kind: LimitKind,
    pub title: &'static str,
    pub description: &'static str,
    pub parse: fn(&str) -> Option<u64>,
}

pub const LIMIT_SPECS: [LimitSpec; 5] = [
    LimitSpec {
        kind: LimitKind::DepthLimit,
        title: "Depth Limit",
        description: "Maximum relation depth a request can traverse.",
        parse: parse_limit_value,
    },
    LimitSpec {
        kind: LimitKind::NodeLimit,
        title: "Node Limit",
        description: "Maximum number of nodes which can be requested in a request.",
        parse: parse_limit_value,
    },
    LimitSpec {
        kind: LimitKind::BatchLimit,
        title: "Batch Request Limit",
        description: "Maximum number of operations that can be sent in a batch request.",
        parse: parse_limit_value,
    },
    LimitSpec {
        kind: LimitKind::RateLimit,
        title: "Request Rate Limit (Requests Per Minute)",
        description: "Request rate limit for the role, optionally keyed by unique parameters.",
        parse: parse_limit_value,
    },
    LimitSpec {
        kind: LimitKind::TimeLimit,
        title: "Operation time limit",
        description: "Timeout in seconds for GraphQL operations.",
        parse: parse_limit_value,
    },
];

pub fn spec_for(kind: LimitKind) -> &'static LimitSpec {
    // LIMIT_SPECS is indexed in LimitKind::ALL order
    &LIMIT_SPECS[kind as usize]
}
