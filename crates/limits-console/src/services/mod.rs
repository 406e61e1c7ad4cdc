mod http;
mod memory;

pub use http::{
    export_metadata_body, remove_body, remove_limits_body, set_limits_body, HttpLimitsService,
};
pub use memory::MemoryLimitsService;

use async_trait::async_trait;
use limits_types::{ApiLimitsConfig, LimitsResult};

/// Persistence and deletion of API limits.
///
/// Submitting the same payload twice must be safe.
#[async_trait]
pub trait LimitsService: Send + Sync {
    /// Current limits as stored by the server.
    async fn fetch(&self) -> LimitsResult<ApiLimitsConfig>;

    async fn submit(&self, config: &ApiLimitsConfig, role: &str) -> LimitsResult<()>;

    /// Drops every setting of `role`. For the global role this drops the
    /// global values.
    async fn remove(&self, role: &str) -> LimitsResult<()>;
}
