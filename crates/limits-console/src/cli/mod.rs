mod commands;
mod config_cmd;
mod limits_cmd;
mod utils;

pub use commands::{Cli, Commands};
pub use config_cmd::handle_config;
pub use limits_cmd::{remove_limits, set_limit, show_limits, Backend};
pub use utils::{init_logging, print_err};
