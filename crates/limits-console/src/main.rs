mod cli;

use clap::Parser;
use cli::{
    Cli, Commands, Backend, init_logging, print_err, handle_config,
    show_limits, set_limit, remove_limits,
};
use limits_console::ConsoleConfig;
use limits_types::LimitsResult;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_err(&e.to_string());
        std::process::exit(1);
    }
}

async fn run() -> LimitsResult<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(ConsoleConfig::default_path);

    if let Commands::Config { action } = &cli.command {
        return handle_config(&config_path, action.clone(), &cli.format);
    }

    let config = ConsoleConfig::load(&config_path)?;
    init_logging(&cli, &config.logging)?;

    let backend = Backend::open(&config, cli.file.as_deref())?;

    match cli.command {
        Commands::Show { ref role } => {
            show_limits(&backend, role.as_deref(), &cli.format).await?;
        }
        Commands::Set { ref role, kind, state, ref value, ref unique_params } => {
            set_limit(
                &backend,
                role,
                kind,
                state,
                value.as_deref(),
                unique_params.as_deref(),
            )
            .await?;
        }
        Commands::Remove { ref role } => {
            remove_limits(&backend, role).await?;
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}
