use super::*;
use limits_types::{
    ApiLimitsConfig, LimitKind, LimitState, LimitsError, RateLimitValue, RoleLimitValue,
    RoleLimits, UniqueParams,
};
use proptest::prelude::*;

fn server_data() -> ApiLimitsConfig {
    ApiLimitsConfig::new()
        .with_limits(
            LimitKind::DepthLimit,
            RoleLimits::new(Some(RoleLimitValue::Count(10)))
                .with_role("user", RoleLimitValue::Count(4)),
        )
        .with_limits(
            LimitKind::RateLimit,
            RoleLimits::new(Some(RoleLimitValue::Rate(RateLimitValue {
                max_reqs_per_min: 600,
                unique_params: None,
            })))
            .with_role(
                "user",
                RoleLimitValue::Rate(RateLimitValue {
                    max_reqs_per_min: 60,
                    unique_params: Some(UniqueParams::Ip),
                }),
            ),
        )
}

#[test]
fn test_reset_round_trip() {
    let mut store = RoleLimitsStore::default();
    store.set_global_value(LimitKind::NodeLimit, "99");

    store.reset(server_data());
    assert_eq!(store.config(), &server_data());
    assert_eq!(
        store.config().global_value(LimitKind::DepthLimit),
        Some(&RoleLimitValue::Count(10))
    );
    assert!(store.limits(LimitKind::NodeLimit).is_none());
}

#[test]
fn test_set_disabled_keeps_values() {
    let mut store = RoleLimitsStore::new(server_data());
    store.set_disabled(true);
    assert!(store.is_read_only());
    assert_eq!(store.config(), &server_data());

    store.set_disabled(false);
    assert!(!store.is_read_only());
}

#[test]
fn test_set_global_value_every_kind() {
    let mut store = RoleLimitsStore::default();
    for kind in LimitKind::ALL {
        store.set_global_value(kind, "25");
        assert_eq!(store.config().global_value(kind).map(|v| v.amount()), Some(25));
    }
    assert!(matches!(
        store.config().global_value(LimitKind::RateLimit),
        Some(RoleLimitValue::Rate(_))
    ));
}

#[test]
fn test_invalid_global_value_is_ignored() {
    let mut store = RoleLimitsStore::new(server_data());
    store.set_global_value(LimitKind::DepthLimit, "ten");
    store.set_global_value(LimitKind::DepthLimit, "-3");
    store.set_global_value(LimitKind::DepthLimit, "");
    assert_eq!(store.config(), &server_data());
}

#[test]
fn test_rate_amount_update_keeps_unique_params() {
    let mut store = RoleLimitsStore::new(server_data());
    store.set_role_value(LimitKind::RateLimit, "user", "120");
    let value = store.config().role_value(LimitKind::RateLimit, "user").unwrap();
    assert_eq!(value.amount(), 120);
    assert_eq!(value.unique_params(), Some(&UniqueParams::Ip));
}

#[test]
fn test_set_role_value() {
    let mut store = RoleLimitsStore::new(server_data());
    store.set_role_value(LimitKind::NodeLimit, "editor", "7");
    assert_eq!(
        store.config().role_value(LimitKind::NodeLimit, "editor"),
        Some(&RoleLimitValue::Count(7))
    );

    store.set_role_value(LimitKind::NodeLimit, "editor", "seven");
    assert_eq!(
        store.config().role_value(LimitKind::NodeLimit, "editor"),
        Some(&RoleLimitValue::Count(7))
    );
}

#[test]
fn test_set_role_value_ignores_global_role() {
    let mut store = RoleLimitsStore::new(server_data());
    store.set_role_value(LimitKind::DepthLimit, "global", "1");
    assert_eq!(store.config(), &server_data());
}

#[test]
fn test_unique_params_ip_for_any_role() {
    let mut store = RoleLimitsStore::new(server_data());
    for role in ["global", "user", "editor"] {
        store.set_unique_params(role, "IP");
        assert_eq!(store.unique_params(role), Some(&UniqueParams::Ip));
    }
}

#[test]
fn test_unique_params_list() {
    let mut store = RoleLimitsStore::new(server_data());
    store.set_unique_params("user", "a, b ,c");
    let value = store.config().role_value(LimitKind::RateLimit, "user").unwrap();
    assert_eq!(
        value.unique_params(),
        Some(&UniqueParams::Params(vec!["a".into(), "b".into(), "c".into()]))
    );
    assert_eq!(value.amount(), 60);
}

#[test]
fn test_unique_params_global_role_targets_global_value() {
    let mut store = RoleLimitsStore::new(server_data());
    store.set_unique_params("global", "x-org-id");
    let global = store.config().global_value(LimitKind::RateLimit).unwrap();
    assert_eq!(global.amount(), 600);
    assert_eq!(
        global.unique_params(),
        Some(&UniqueParams::Params(vec!["x-org-id".into()]))
    );
    assert_eq!(
        store
            .config()
            .role_value(LimitKind::RateLimit, "user")
            .and_then(|v| v.unique_params()),
        Some(&UniqueParams::Ip)
    );
}

#[test]
fn test_empty_unique_params_clears() {
    let mut store = RoleLimitsStore::new(server_data());
    store.set_unique_params("user", " , ");
    let value = store.config().role_value(LimitKind::RateLimit, "user").unwrap();
    assert_eq!(value.unique_params(), None);
}

#[test]
fn test_set_limit_state() {
    let mut store = RoleLimitsStore::new(server_data());
    assert_eq!(store.state_for(LimitKind::DepthLimit, "user"), LimitState::PerRole);

    store.set_limit_state(LimitKind::DepthLimit, "user", LimitState::Global);
    assert_eq!(store.state_for(LimitKind::DepthLimit, "user"), LimitState::Global);
    assert_eq!(
        store.effective_value(LimitKind::DepthLimit, "user"),
        Some(&RoleLimitValue::Count(10))
    );
    assert_eq!(
        store.config().role_value(LimitKind::DepthLimit, "user"),
        Some(&RoleLimitValue::Count(4))
    );
}

#[test]
fn test_per_role_state_ignored_for_global_role() {
    let mut store = RoleLimitsStore::new(server_data());
    store.set_limit_state(LimitKind::DepthLimit, "global", LimitState::PerRole);
    assert_eq!(store.state_for(LimitKind::DepthLimit, "global"), LimitState::Global);
}

#[test]
fn test_is_unset() {
    let store = RoleLimitsStore::default();
    assert!(store.is_unset("user"));
    assert!(!store.is_unset("global"));
    assert!(store.is_unset(""));

    let store = RoleLimitsStore::new(server_data());
    assert!(!store.is_unset("user"));
    assert!(!store.is_unset("global"));
}

#[test]
fn test_is_unset_ignores_per_role_values() {
    let mut store = RoleLimitsStore::default();
    store.set_role_value(LimitKind::BatchLimit, "user", "3");
    assert!(store.is_unset("user"));

    store.set_global_value(LimitKind::TimeLimit, "30");
    assert!(!store.is_unset("user"));
}

#[test]
fn test_payload_drops_override_when_role_uses_global() {
    let mut store = RoleLimitsStore::new(server_data());
    store.set_limit_state(LimitKind::DepthLimit, "user", LimitState::Global);
    store.set_limit_state(LimitKind::RateLimit, "user", LimitState::Disabled);

    let payload = store.payload_for("user").unwrap();
    assert!(payload.role_value(LimitKind::DepthLimit, "user").is_none());
    assert!(payload.role_value(LimitKind::RateLimit, "user").is_none());
    assert_eq!(payload.global_value(LimitKind::DepthLimit), Some(&RoleLimitValue::Count(10)));
}

#[test]
fn test_payload_keeps_other_roles() {
    let mut store = RoleLimitsStore::new(server_data());
    store.set_role_value(LimitKind::DepthLimit, "editor", "2");
    store.set_limit_state(LimitKind::DepthLimit, "user", LimitState::Global);

    let payload = store.payload_for("user").unwrap();
    assert_eq!(
        payload.role_value(LimitKind::DepthLimit, "editor"),
        Some(&RoleLimitValue::Count(2))
    );
}

#[test]
fn test_payload_for_global_role_disabled_kind() {
    let mut store = RoleLimitsStore::new(server_data());
    store.set_limit_state(LimitKind::DepthLimit, "global", LimitState::Disabled);

    let payload = store.payload_for("global").unwrap();
    assert!(payload.limits(LimitKind::DepthLimit).is_none());
    assert!(payload.limits(LimitKind::RateLimit).is_some());
}

#[test]
fn test_payload_is_deterministic() {
    let mut store = RoleLimitsStore::new(server_data());
    store.set_role_value(LimitKind::NodeLimit, "user", "8");
    store.set_global_value(LimitKind::NodeLimit, "16");
    assert_eq!(store.payload_for("user").unwrap(), store.payload_for("user").unwrap());
}

#[test]
fn test_payload_rejects_override_without_global_value() {
    let mut store = RoleLimitsStore::new(server_data());
    store.set_role_value(LimitKind::NodeLimit, "user", "5");
    assert_eq!(store.state_for(LimitKind::NodeLimit, "user"), LimitState::PerRole);
    assert!(!store.is_unset("user"));

    assert!(matches!(
        store.payload_for("user"),
        Err(LimitsError::InvalidArgument(_))
    ));

    store.set_global_value(LimitKind::NodeLimit, "50");
    let payload = store.payload_for("user").unwrap();
    assert_eq!(
        payload.role_value(LimitKind::NodeLimit, "user"),
        Some(&RoleLimitValue::Count(5))
    );
}

#[test]
fn test_payload_allows_dropped_override_without_global_value() {
    let mut store = RoleLimitsStore::new(server_data());
    store.set_role_value(LimitKind::NodeLimit, "user", "5");
    store.set_limit_state(LimitKind::NodeLimit, "user", LimitState::Disabled);

    let payload = store.payload_for("user").unwrap();
    assert!(payload.limits(LimitKind::NodeLimit).is_none());
}

#[test]
fn test_unique_params_without_rate_are_held_back() {
    let mut store = RoleLimitsStore::new(server_data());
    store.set_unique_params("editor", "IP");

    assert_eq!(store.unique_params("editor"), Some(&UniqueParams::Ip));
    assert!(store.config().role_value(LimitKind::RateLimit, "editor").is_none());
    assert_eq!(store.state_for(LimitKind::RateLimit, "editor"), LimitState::Global);

    let payload = store.payload_for("editor").unwrap();
    assert!(payload.role_value(LimitKind::RateLimit, "editor").is_none());
    let json = serde_json::to_string(&payload).unwrap();
    assert!(!json.contains("\"max_reqs_per_min\":0"));
}

#[test]
fn test_held_back_unique_params_apply_with_rate() {
    let mut store = RoleLimitsStore::new(server_data());
    store.set_unique_params("editor", "tenant, user");
    store.set_role_value(LimitKind::RateLimit, "editor", "30");

    let value = store.config().role_value(LimitKind::RateLimit, "editor").unwrap();
    assert_eq!(value.amount(), 30);
    assert_eq!(
        value.unique_params(),
        Some(&UniqueParams::Params(vec!["tenant".into(), "user".into()]))
    );
    assert_eq!(store.unique_params("editor"), value.unique_params());
}

#[test]
fn test_reset_discards_held_back_unique_params() {
    let mut store = RoleLimitsStore::new(server_data());
    store.set_unique_params("editor", "IP");
    store.reset(server_data());
    assert_eq!(store.unique_params("editor"), None);
}

proptest! {
    #[test]
    fn prop_valid_global_value_is_stored(n in any::<u64>(), idx in 0usize..5) {
        let kind = LimitKind::ALL[idx];
        let mut store = RoleLimitsStore::new(server_data());
        store.set_global_value(kind, &n.to_string());
        prop_assert_eq!(store.config().global_value(kind).map(|v| v.amount()), Some(n));
    }

    #[test]
    fn prop_invalid_global_value_changes_nothing(raw in "[a-z. -]{0,10}", idx in 0usize..5) {
        let kind = LimitKind::ALL[idx];
        let mut store = RoleLimitsStore::new(server_data());
        store.set_global_value(kind, &raw);
        prop_assert_eq!(store.config(), &server_data());
    }
}
