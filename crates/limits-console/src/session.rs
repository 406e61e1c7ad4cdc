//! Editing session for one role's API limits.
//!
//! The session owns the store for as long as the caller keeps it open.
//! Opening it on another role resets the store to fresh server data.

use limits_types::{ApiLimitsConfig, LimitsError, LimitsResult};
use tracing::{info, warn};

use crate::services::LimitsService;
use crate::store::RoleLimitsStore;

pub struct EditSession {
    role: String,
    store: RoleLimitsStore,
    open: bool,
    loading: bool,
}

impl EditSession {
    pub fn open(role: impl Into<String>, data: ApiLimitsConfig) -> Self {
        let role = role.into();
        info!("Editing API limits for role {}", role);
        Self {
            role,
            store: RoleLimitsStore::new(data),
            open: true,
            loading: false,
        }
    }

    /// Switches the session to another role (or reopens it) with fresh data.
    pub fn reopen(&mut self, role: impl Into<String>, data: ApiLimitsConfig) {
        self.role = role.into();
        self.store.reset(data);
        self.open = true;
        self.loading = false;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.loading = false;
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn store(&self) -> &RoleLimitsStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut RoleLimitsStore {
        &mut self.store
    }

    /// Whether the save and remove actions are available.
    pub fn can_save(&self) -> bool {
        self.open && !self.loading && !self.store.is_unset(&self.role)
    }

    /// Persists the session role's limits. On success the session closes; on
    /// failure it stays open so the caller can retry.
    pub async fn submit(&mut self, service: &dyn LimitsService) -> LimitsResult<()> {
        if !self.open {
            return Err(LimitsError::SessionClosed);
        }

        let payload = self.store.payload_for(&self.role)?;
        self.loading = true;
        let result = service.submit(&payload, &self.role).await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.open = false;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to save API limits for role {}: {}", self.role, e);
                Err(e)
            }
        }
    }

    /// Removes every setting of the session role. Closes the session on success.
    pub async fn remove(&mut self, service: &dyn LimitsService) -> LimitsResult<()> {
        if !self.open {
            return Err(LimitsError::SessionClosed);
        }

        self.loading = true;
        let result = service.remove(&self.role).await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.open = false;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to remove API limits for role {}: {}", self.role, e);
                Err(e)
            }
        }
    }
}
