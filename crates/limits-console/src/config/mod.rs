mod console;
mod constants;
mod logging;
mod types;

pub use console::{ConsoleConfig, RedactedConfig};
pub use constants::*;
pub use logging::LoggingConfig;
pub use types::LogLevel;
