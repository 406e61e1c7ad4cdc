use async_trait::async_trait;
use limits_types::{ApiLimitsConfig, LimitsError, LimitsResult};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::debug;

use super::LimitsService;

/// Keeps the persisted limits in process. Used for `--file` runs and tests.
pub struct MemoryLimitsService {
    stored: Mutex<ApiLimitsConfig>,
    failing: AtomicBool,
    submits: AtomicU64,
    removals: AtomicU64,
}

impl MemoryLimitsService {
    pub fn new(initial: ApiLimitsConfig) -> Self {
        Self {
            stored: Mutex::new(initial),
            failing: AtomicBool::new(false),
            submits: AtomicU64::new(0),
            removals: AtomicU64::new(0),
        }
    }

    /// Makes every following call fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn stored(&self) -> ApiLimitsConfig {
        self.stored.lock().clone()
    }

    pub fn submit_count(&self) -> u64 {
        self.submits.load(Ordering::Relaxed)
    }

    pub fn removal_count(&self) -> u64 {
        self.removals.load(Ordering::Relaxed)
    }

    fn check(&self) -> LimitsResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(LimitsError::Service("in-memory service set to fail".into()));
        }
        Ok(())
    }
}

impl Default for MemoryLimitsService {
    fn default() -> Self {
        Self::new(ApiLimitsConfig::default())
    }
}

#[async_trait]
impl LimitsService for MemoryLimitsService {
    async fn fetch(&self) -> LimitsResult<ApiLimitsConfig> {
        self.check()?;
        Ok(self.stored())
    }

    async fn submit(&self, config: &ApiLimitsConfig, role: &str) -> LimitsResult<()> {
        self.check()?;
        debug!("Storing limits submitted for role {}", role);
        *self.stored.lock() = config.clone();
        self.submits.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn remove(&self, role: &str) -> LimitsResult<()> {
        self.check()?;
        debug!("Removing stored limits for role {}", role);
        self.stored.lock().strip_role(role);
        self.removals.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
