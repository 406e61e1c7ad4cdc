use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{is_global_role, LimitKind, LimitState, LimitsError, LimitsResult, RoleLimitValue};

/// Global value and per-role overrides for one limit kind.
///
/// The chosen [`LimitState`] per role lives only in the editing session and
/// is never serialized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleLimits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<RoleLimitValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub per_role: BTreeMap<String, RoleLimitValue>,
    #[serde(skip)]
    states: BTreeMap<String, LimitState>,
}

impl RoleLimits {
    pub fn new(global: Option<RoleLimitValue>) -> Self {
        Self {
            global,
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>, value: RoleLimitValue) -> Self {
        self.per_role.insert(role.into(), value);
        self
    }

    pub fn role_value(&self, role: &str) -> Option<&RoleLimitValue> {
        self.per_role.get(role)
    }

    /// The explicitly chosen state, or one derived from the stored values.
    pub fn state_for(&self, role: &str) -> LimitState {
        if let Some(state) = self.states.get(role) {
            return *state;
        }

        if !is_global_role(role) && self.per_role.contains_key(role) {
            LimitState::PerRole
        } else if self.global.is_some() {
            LimitState::Global
        } else {
            LimitState::Disabled
        }
    }

    pub fn set_state(&mut self, role: &str, state: LimitState) {
        self.states.insert(role.to_string(), state);
    }

    pub fn clear_states(&mut self) {
        self.states.clear();
    }

    /// The value enforced for `role` under its current state.
    pub fn effective_value(&self, role: &str) -> Option<&RoleLimitValue> {
        match self.state_for(role) {
            LimitState::Global => self.global.as_ref(),
            LimitState::PerRole => self.per_role.get(role),
            LimitState::Disabled => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_none() && self.per_role.is_empty()
    }
}

/// The full `api_limits` record, one [`RoleLimits`] per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawApiLimitsConfig")]
pub struct ApiLimitsConfig {
    #[serde(default)]
    pub disabled: bool,
    #[serde(flatten)]
    limits: BTreeMap<LimitKind, RoleLimits>,
}

#[derive(Deserialize)]
struct RawApiLimitsConfig {
    #[serde(default)]
    disabled: bool,
    #[serde(flatten)]
    limits: BTreeMap<LimitKind, RoleLimits>,
}

impl TryFrom<RawApiLimitsConfig> for ApiLimitsConfig {
    type Error = LimitsError;

    fn try_from(raw: RawApiLimitsConfig) -> Result<Self, Self::Error> {
        let config = Self {
            disabled: raw.disabled,
            limits: raw.limits,
        };
        config.check_shapes()?;
        Ok(config)
    }
}

impl ApiLimitsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, kind: LimitKind, limits: RoleLimits) -> Self {
        self.limits.insert(kind, limits);
        self
    }

    pub fn limits(&self, kind: LimitKind) -> Option<&RoleLimits> {
        self.limits.get(&kind)
    }

    pub fn limits_mut(&mut self, kind: LimitKind) -> &mut RoleLimits {
        self.limits.entry(kind).or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LimitKind, &RoleLimits)> {
        self.limits.iter().map(|(kind, limits)| (*kind, limits))
    }

    pub fn global_value(&self, kind: LimitKind) -> Option<&RoleLimitValue> {
        self.limits(kind).and_then(|l| l.global.as_ref())
    }

    pub fn role_value(&self, kind: LimitKind, role: &str) -> Option<&RoleLimitValue> {
        self.limits(kind).and_then(|l| l.role_value(role))
    }

    pub fn has_any_global(&self) -> bool {
        self.limits.values().any(|l| l.global.is_some())
    }

    /// Roles with an override for at least one kind.
    pub fn roles(&self) -> Vec<String> {
        let mut roles: Vec<String> = self
            .limits
            .values()
            .flat_map(|l| l.per_role.keys().cloned())
            .collect();
        roles.sort();
        roles.dedup();
        roles
    }

    /// Drops every override for `role`. For the global role this clears the
    /// global values instead.
    pub fn strip_role(&mut self, role: &str) {
        for limits in self.limits.values_mut() {
            if is_global_role(role) {
                limits.global = None;
            } else {
                limits.per_role.remove(role);
            }
        }
        self.prune();
    }

    /// Removes kinds without a global value. A kind's overrides cannot be
    /// stored without one.
    pub fn prune(&mut self) {
        self.limits.retain(|_, l| l.global.is_some());
    }

    pub fn clear_states(&mut self) {
        for limits in self.limits.values_mut() {
            limits.clear_states();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.limits.values().all(RoleLimits::is_empty)
    }

    /// Rate limits must be objects and every other kind a bare integer.
    pub fn check_shapes(&self) -> LimitsResult<()> {
        for (kind, limits) in &self.limits {
            let values = limits
                .global
                .iter()
                .map(|v| ("global", v))
                .chain(limits.per_role.iter().map(|(role, v)| (role.as_str(), v)));
            for (role, value) in values {
                if !value.fits(*kind) {
                    return Err(LimitsError::Serialization(format!(
                        "{} value for {} has the wrong shape: {}",
                        kind, role, value
                    )));
                }
            }
        }
        Ok(())
    }
}
