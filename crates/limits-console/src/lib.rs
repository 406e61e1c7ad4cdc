#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod services;
pub mod session;
pub mod store;

pub use config::{ConsoleConfig, LoggingConfig, LogLevel};
pub use services::{HttpLimitsService, LimitsService, MemoryLimitsService};
pub use session::EditSession;
pub use store::RoleLimitsStore;
