use super::commands::Cli;
use limits_console::config::LoggingConfig;
use limits_types::{LimitsError, LimitsResult};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init_logging(cli: &Cli, logging: &LoggingConfig) -> LimitsResult<()> {
    let level = if cli.quiet {
        "warn".to_string()
    } else {
        match cli.verbose {
            0 => logging.level.to_string(),
            1 => "info,limits_console=debug".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry()
        .with(env_filter);

    let log_file = cli.log_file.as_ref().or(logging.file.as_ref());
    if let Some(log_file) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .map_err(|e| LimitsError::Config(format!("Failed to open log file: {}", e)))?;
        let file_layer = fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false);
        if logging.json {
            subscriber.with(file_layer.json()).init();
        } else {
            subscriber.with(file_layer).init();
        }
    } else {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(cli.verbose >= 2);
        if logging.json {
            subscriber.with(stderr_layer.json()).init();
        } else {
            subscriber.with(stderr_layer).init();
        }
    }

    Ok(())
}

pub fn print_ok(message: &str) {
    println!("\x1b[38;5;46m[+]\x1b[0m {}", message);
}

pub fn print_err(message: &str) {
    eprintln!("\x1b[38;5;196m[-]\x1b[0m {}", message);
}
