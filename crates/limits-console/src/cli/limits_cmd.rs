use super::commands::OutputFormat;
use super::utils::print_ok;
use limits_console::services::{HttpLimitsService, LimitsService, MemoryLimitsService};
use limits_console::store::{spec_for, LIMIT_SPECS};
use limits_console::{ConsoleConfig, EditSession};
use limits_types::{
    is_global_role, ApiLimitsConfig, LimitKind, LimitState, LimitsError, LimitsResult,
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where limits are read from and written to for one command.
pub enum Backend {
    Remote(HttpLimitsService),
    File(PathBuf, MemoryLimitsService),
}

impl Backend {
    pub fn open(config: &ConsoleConfig, file: Option<&Path>) -> LimitsResult<Self> {
        match file {
            Some(path) => {
                let data = if path.exists() {
                    let contents = std::fs::read_to_string(path).map_err(|e| {
                        LimitsError::Config(format!("Failed to read limits file: {}", e))
                    })?;
                    serde_json::from_str(&contents).map_err(|e| {
                        LimitsError::Serialization(format!("Invalid limits file: {}", e))
                    })?
                } else {
                    debug!("Limits file {:?} not found, starting empty", path);
                    ApiLimitsConfig::default()
                };
                Ok(Backend::File(path.to_path_buf(), MemoryLimitsService::new(data)))
            }
            None => Ok(Backend::Remote(HttpLimitsService::new(
                config.endpoint.clone(),
                config.admin_secret.clone(),
                config.timeout(),
            )?)),
        }
    }

    pub fn service(&self) -> &dyn LimitsService {
        match self {
            Backend::Remote(service) => service,
            Backend::File(_, service) => service,
        }
    }

    /// Writes the in-memory limits back for file backends.
    pub fn flush(&self) -> LimitsResult<()> {
        if let Backend::File(path, service) = self {
            let json = serde_json::to_string_pretty(&service.stored())
                .map_err(|e| LimitsError::Serialization(e.to_string()))?;
            std::fs::write(path, json)
                .map_err(|e| LimitsError::Config(format!("Failed to write limits file: {}", e)))?;
        }
        Ok(())
    }
}

pub async fn show_limits(
    backend: &Backend,
    role: Option<&str>,
    format: &OutputFormat,
) -> LimitsResult<()> {
    let limits = backend.service().fetch().await?;

    match (role, format) {
        (None, OutputFormat::Json) => {
            let json = serde_json::to_string_pretty(&limits)
                .map_err(|e| LimitsError::Serialization(e.to_string()))?;
            println!("{}", json);
        }
        (None, OutputFormat::Text) => print_all(&limits),
        (Some(role), OutputFormat::Json) => {
            let session = EditSession::open(role, limits);
            let entries: Vec<serde_json::Value> = LimitKind::ALL
                .iter()
                .map(|kind| {
                    serde_json::json!({
                        "kind": kind,
                        "state": session.store().state_for(*kind, role),
                        "effective": session.store().effective_value(*kind, role),
                    })
                })
                .collect();
            let json = serde_json::json!({ "role": role, "limits": entries });
            let json = serde_json::to_string_pretty(&json)
                .map_err(|e| LimitsError::Serialization(e.to_string()))?;
            println!("{}", json);
        }
        (Some(role), OutputFormat::Text) => print_role(&EditSession::open(role, limits)),
    }

    Ok(())
}

fn print_all(limits: &ApiLimitsConfig) {
    println!("\x1b[38;5;46mAPI Limits\x1b[0m{}", if limits.disabled { " (disabled)" } else { "" });
    println!("\x1b[38;5;245m{}\x1b[0m", "═".repeat(60));
    for spec in &LIMIT_SPECS {
        println!("{}", spec.title);
        match limits.limits(spec.kind) {
            Some(kind_limits) => {
                match &kind_limits.global {
                    Some(value) => println!("  global:  \x1b[38;5;51m{}\x1b[0m", value),
                    None => println!("  global:  \x1b[38;5;245mnot set\x1b[0m"),
                }
                for (role, value) in &kind_limits.per_role {
                    println!("  {:<8} \x1b[38;5;51m{}\x1b[0m", format!("{}:", role), value);
                }
            }
            None => println!("  \x1b[38;5;245mnot set\x1b[0m"),
        }
    }
}

fn print_role(session: &EditSession) {
    let role = session.role();
    let store = session.store();
    if is_global_role(role) {
        println!("\x1b[38;5;46mGlobal Settings\x1b[0m");
    } else {
        println!("\x1b[38;5;46mRole: {}\x1b[0m", role);
    }
    println!("\x1b[38;5;245m{}\x1b[0m", "═".repeat(60));
    for spec in &LIMIT_SPECS {
        let state = store.state_for(spec.kind, role);
        let value = store
            .effective_value(spec.kind, role)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<42} {:<9} \x1b[38;5;51m{}\x1b[0m", spec.title, state, value);
        println!("  \x1b[38;5;245m{}\x1b[0m", spec.description);
    }
}

pub async fn set_limit(
    backend: &Backend,
    role: &str,
    kind: LimitKind,
    state: Option<LimitState>,
    value: Option<&str>,
    unique_params: Option<&str>,
) -> LimitsResult<()> {
    if state.is_none() && value.is_none() && unique_params.is_none() {
        return Err(LimitsError::InvalidArgument(
            "Nothing to update: pass --state, --value or --unique-params".into(),
        ));
    }
    if unique_params.is_some() && !kind.is_rate() {
        return Err(LimitsError::InvalidArgument(
            "--unique-params only applies to rate_limit".into(),
        ));
    }

    let service = backend.service();
    let mut session = EditSession::open(role, service.fetch().await?);
    let store = session.store_mut();

    if let Some(raw) = value {
        if (spec_for(kind).parse)(raw).is_none() {
            return Err(LimitsError::InvalidArgument(format!(
                "{} expects a non-negative integer, got {:?}",
                kind, raw
            )));
        }
        if is_global_role(role) {
            store.set_global_value(kind, raw);
        } else {
            store.set_role_value(kind, role, raw);
            if state.is_none() {
                store.set_limit_state(kind, role, LimitState::PerRole);
            }
        }
    }
    if let Some(raw) = unique_params {
        store.set_unique_params(role, raw);
        let rate = if is_global_role(role) {
            store.config().global_value(kind)
        } else {
            store.config().role_value(kind, role)
        };
        if rate.is_none() {
            return Err(LimitsError::InvalidArgument(format!(
                "Role '{}' has no {} yet; pass --value with --unique-params",
                role, kind
            )));
        }
    }
    if let Some(state) = state {
        store.set_limit_state(kind, role, state);
    }

    ensure_saveable(&session)?;
    session.submit(service).await?;
    backend.flush()?;

    print_ok(&format!("Saved {} for role {}", kind, role));
    Ok(())
}

pub async fn remove_limits(backend: &Backend, role: &str) -> LimitsResult<()> {
    let service = backend.service();
    let mut session = EditSession::open(role, service.fetch().await?);

    ensure_saveable(&session)?;
    session.remove(service).await?;
    backend.flush()?;

    print_ok(&format!("Removed API limits for role {}", role));
    Ok(())
}

fn ensure_saveable(session: &EditSession) -> LimitsResult<()> {
    if session.can_save() {
        return Ok(());
    }
    Err(LimitsError::InvalidArgument(format!(
        "Role '{}' has no global limits to build on; set a global limit first",
        session.role()
    )))
}
