use limits_types::{
    is_global_role, ApiLimitsConfig, LimitKind, LimitState, LimitsError, LimitsResult,
    RoleLimitValue, RoleLimits, UniqueParams, GLOBAL_ROLE,
};
use std::collections::BTreeMap;
use tracing::debug;

use super::validators::spec_for;

/// Target of a value update: the kind's global value or one role's override.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot<'a> {
    Global,
    Role(&'a str),
}

impl<'a> Slot<'a> {
    fn of(role: &'a str) -> Self {
        if is_global_role(role) {
            Slot::Global
        } else {
            Slot::Role(role)
        }
    }

    fn role(self) -> &'a str {
        match self {
            Slot::Global => GLOBAL_ROLE,
            Slot::Role(role) => role,
        }
    }
}

/// Editable copy of the API limits for one session.
///
/// Every mutator is a plain state transition. Malformed input leaves the
/// store untouched.
#[derive(Clone, Debug, Default)]
pub struct RoleLimitsStore {
    config: ApiLimitsConfig,
    read_only: bool,
    // unique params entered before the role has a request rate
    pending_params: BTreeMap<String, Option<UniqueParams>>,
}

impl RoleLimitsStore {
    pub fn new(config: ApiLimitsConfig) -> Self {
        Self {
            config,
            read_only: false,
            pending_params: BTreeMap::new(),
        }
    }

    pub fn reset(&mut self, data: ApiLimitsConfig) {
        self.config = data;
        self.pending_params.clear();
    }

    pub fn set_disabled(&mut self, flag: bool) {
        self.read_only = flag;
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_limit_state(&mut self, kind: LimitKind, role: &str, state: LimitState) {
        if is_global_role(role) && state == LimitState::PerRole {
            debug!("Ignoring per_role state for the global role on {}", kind);
            return;
        }
        self.config.limits_mut(kind).set_state(role, state);
    }

    pub fn set_global_value(&mut self, kind: LimitKind, raw: &str) {
        self.set_value(kind, Slot::Global, raw);
    }

    pub fn set_role_value(&mut self, kind: LimitKind, role: &str, raw: &str) {
        if is_global_role(role) {
            return;
        }
        self.set_value(kind, Slot::Role(role), raw);
    }

    pub fn set_unique_params(&mut self, role: &str, raw: &str) {
        let params = UniqueParams::parse(raw);
        let slot = Slot::of(role);
        let limits = self.config.limits_mut(LimitKind::RateLimit);

        match Self::get_mut(limits, slot) {
            Some(RoleLimitValue::Rate(rate)) => rate.unique_params = params,
            _ => {
                debug!("Holding unique params for {} until a request rate is set", slot.role());
                self.pending_params.insert(slot.role().to_string(), params);
            }
        }
    }

    /// Unique params of the role's rate limit, including ones still waiting
    /// for a request rate.
    pub fn unique_params(&self, role: &str) -> Option<&UniqueParams> {
        let slot = Slot::of(role);
        if let Some(params) = self.pending_params.get(slot.role()) {
            return params.as_ref();
        }
        self.config
            .limits(LimitKind::RateLimit)
            .and_then(|limits| Self::get(limits, slot))
            .and_then(RoleLimitValue::unique_params)
    }

    fn set_value(&mut self, kind: LimitKind, slot: Slot<'_>, raw: &str) {
        let Some(amount) = (spec_for(kind).parse)(raw) else {
            debug!("Rejected non-numeric {} input {:?}", kind, raw);
            return;
        };

        let limits = self.config.limits_mut(kind);
        let mut value = RoleLimitValue::with_amount(kind, Self::get(limits, slot), amount);
        if kind.is_rate() {
            if let (Some(params), RoleLimitValue::Rate(rate)) =
                (self.pending_params.remove(slot.role()), &mut value)
            {
                rate.unique_params = params;
            }
        }
        Self::put(limits, slot, value);
    }

    fn get_mut<'l>(limits: &'l mut RoleLimits, slot: Slot<'_>) -> Option<&'l mut RoleLimitValue> {
        match slot {
            Slot::Global => limits.global.as_mut(),
            Slot::Role(role) => limits.per_role.get_mut(role),
        }
    }

    fn get<'l>(limits: &'l RoleLimits, slot: Slot<'_>) -> Option<&'l RoleLimitValue> {
        match slot {
            Slot::Global => limits.global.as_ref(),
            Slot::Role(role) => limits.per_role.get(role),
        }
    }

    fn put(limits: &mut RoleLimits, slot: Slot<'_>, value: RoleLimitValue) {
        match slot {
            Slot::Global => limits.global = Some(value),
            Slot::Role(role) => {
                limits.per_role.insert(role.to_string(), value);
            }
        }
    }

    pub fn config(&self) -> &ApiLimitsConfig {
        &self.config
    }

    pub fn limits(&self, kind: LimitKind) -> Option<&RoleLimits> {
        self.config.limits(kind)
    }

    pub fn state_for(&self, kind: LimitKind, role: &str) -> LimitState {
        self.config
            .limits(kind)
            .map(|l| l.state_for(role))
            .unwrap_or(LimitState::Disabled)
    }

    pub fn effective_value(&self, kind: LimitKind, role: &str) -> Option<&RoleLimitValue> {
        self.config.limits(kind).and_then(|l| l.effective_value(role))
    }

    /// True when saving or removing settings for `role` makes no sense: the
    /// role is blank, or it is not the global role and no global limit exists.
    pub fn is_unset(&self, role: &str) -> bool {
        if role.is_empty() {
            return true;
        }
        !is_global_role(role) && !self.config.has_any_global()
    }

    /// The record sent on submit, with the session role's states applied.
    ///
    /// Fails when the role keeps an override on a kind without a global
    /// value, since such a kind cannot be stored.
    pub fn payload_for(&self, role: &str) -> LimitsResult<ApiLimitsConfig> {
        let mut payload = self.config.clone();
        for kind in LimitKind::ALL {
            let limits = payload.limits_mut(kind);
            let state = limits.state_for(role);
            if is_global_role(role) {
                if state == LimitState::Disabled {
                    limits.global = None;
                }
            } else if state != LimitState::PerRole {
                limits.per_role.remove(role);
            } else if limits.global.is_none() && limits.per_role.contains_key(role) {
                return Err(LimitsError::InvalidArgument(format!(
                    "{} override for role '{}' needs a global {} value",
                    kind, role, kind
                )));
            }
        }
        payload.clear_states();
        payload.prune();
        Ok(payload)
    }
}
