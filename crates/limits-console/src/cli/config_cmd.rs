use super::commands::{ConfigAction, OutputFormat};
use super::utils::print_ok;
use limits_console::ConsoleConfig;
use limits_types::{LimitsError, LimitsResult};
use std::path::Path;

pub fn handle_config(
    config_path: &Path,
    action: Option<ConfigAction>,
    format: &OutputFormat,
) -> LimitsResult<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            let config = ConsoleConfig::load(config_path)?;
            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&config.redacted())
                        .map_err(|e| LimitsError::Serialization(e.to_string()))?;
                    println!("{}", json);
                }
                OutputFormat::Text => {
                    println!("\x1b[38;5;245mConfig file: {:?}\x1b[0m", config_path);
                    println!("{}", config.redacted());
                }
            }
        }
        Some(ConfigAction::Validate) => {
            if config_path.exists() {
                ConsoleConfig::load(config_path)?;
                print_ok("Configuration is valid");
            } else {
                println!("\x1b[38;5;245mNo configuration file found at {:?}\x1b[0m", config_path);
            }
        }
        Some(ConfigAction::Init { force }) => {
            if config_path.exists() && !force {
                return Err(LimitsError::Config(format!(
                    "Configuration already exists at {:?} (use --force to overwrite)",
                    config_path
                )));
            }
            ConsoleConfig::default().save(config_path)?;
            print_ok(&format!("Configuration written to {:?}", config_path));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("api-limits-cli-test-{}-{}", name, std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn test_validate_reports_broken_config() {
        let path = temp_config_path("broken");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "timeout_secs = \"soon\"\n").unwrap();

        let result = handle_config(&path, Some(ConfigAction::Validate), &OutputFormat::Text);
        assert!(matches!(result, Err(LimitsError::Config(_))));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_validate_accepts_written_defaults() {
        let path = temp_config_path("valid");
        handle_config(&path, Some(ConfigAction::Init { force: false }), &OutputFormat::Text).unwrap();
        assert!(handle_config(&path, Some(ConfigAction::Validate), &OutputFormat::Text).is_ok());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
