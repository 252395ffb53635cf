//! CLI-side configuration: layers global flags over `busops-config`
//! profiles and picks the backend.
//!
//! Core never sees these types; it receives a pre-built `ApiConfig`.

use std::time::Duration;

use clap::ValueEnum;

use busops_config::{Config, ConfigError, Profile};
use busops_core::{ApiConfig, FakeBackend, HttpBackend, TicketingApi, TlsVerification};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use busops_config::{config_path, load_config_or_default, save_config};

/// Presentation settings after flags and `[defaults]` are merged.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub output: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub yes: bool,
    pub page_size: u32,
}

impl Settings {
    pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Self {
        let output = global
            .output
            .or_else(|| OutputFormat::from_str(&cfg.defaults.output, true).ok())
            .unwrap_or(OutputFormat::Table);
        let color_mode = global
            .color
            .or_else(|| ColorMode::from_str(&cfg.defaults.color, true).ok())
            .unwrap_or(ColorMode::Auto);
        Self {
            output,
            color: crate::output::should_color(color_mode),
            quiet: global.quiet,
            yes: global.yes,
            page_size: cfg.defaults.page_size.max(1),
        }
    }
}

/// Resolve the active profile name from flags and config.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    cfg.active_profile_name(global.profile.as_deref())
}

/// Translate profile + global flags into an `ApiConfig`.
///
/// Flags win over the profile; with no profile, `--server` alone is enough.
pub fn build_api_config(global: &GlobalOpts, cfg: &Config) -> Result<ApiConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);
    let profile = if let Some(profile) = cfg.profiles.get(&profile_name) {
        profile.clone()
    } else if let Some(server) = &global.server {
        Profile::new(server.clone())
    } else if global.profile.is_some() {
        return Err(ConfigError::ProfileNotFound {
            name: profile_name,
            available: cfg.profiles.keys().cloned().collect(),
        }
        .into());
    } else {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    };

    let mut api = busops_config::profile_to_api_config(&profile, &cfg.defaults)?;
    if let Some(server) = &global.server {
        api.url = busops_config::parse_server_url(server)?;
    }
    if global.insecure {
        api.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        api.timeout = Duration::from_secs(secs);
    }
    Ok(api)
}

/// The backend every command talks to: the seeded fake under `--demo`,
/// otherwise the configured server.
pub fn backend(global: &GlobalOpts, cfg: &Config) -> Result<Box<dyn TicketingApi>, CliError> {
    if global.demo {
        tracing::info!("using in-memory demo backend");
        return Ok(Box::new(FakeBackend::new()));
    }
    let api = build_api_config(global, cfg)?;
    tracing::debug!(url = %api.url, timeout = ?api.timeout, "connecting");
    Ok(Box::new(HttpBackend::connect(&api)?))
}
