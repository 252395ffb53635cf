//! Config subcommand handlers.

use dialoguer::Input;

use busops_config::{Config, DEFAULT_SERVER, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Settings};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn save(cfg: &Config, settings: &Settings, message: &str) -> Result<(), CliError> {
    let path = config::save_config(cfg)?;
    output::print_status(message, settings.quiet);
    tracing::debug!(path = %path.display(), "config written");
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts, settings: &Settings) -> Result<(), CliError> {
    match args.command {
        // ── Init: guided setup ──────────────────────────────────────
        ConfigCommand::Init { server } => {
            let path = config::config_path();
            let mut cfg = config::load_config_or_default();
            let profile_name = global
                .profile
                .clone()
                .unwrap_or_else(|| busops_config::DEFAULT_PROFILE.into());

            let server = match server {
                Some(server) => server,
                None => {
                    eprintln!("busops configuration");
                    eprintln!("   Config path: {}\n", path.display());
                    Input::new()
                        .with_prompt("Server URL")
                        .default(DEFAULT_SERVER.to_owned())
                        .interact_text()
                        .map_err(prompt_err)?
                }
            };

            busops_config::parse_server_url(&server)?;
            cfg.profiles
                .insert(profile_name.clone(), Profile::new(server));
            cfg.default_profile = Some(profile_name.clone());
            save(
                &cfg,
                settings,
                &format!(
                    "Configuration written to {} (profile '{profile_name}')",
                    path.display()
                ),
            )
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let text = toml::to_string_pretty(&cfg).map_err(|e| CliError::Render(e.to_string()))?;
            let out = output::render_single(
                settings.output,
                &cfg,
                |_| text.trim_end().to_owned(),
                |c| c.active_profile_name(global.profile.as_deref()),
            )?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        // ── SetServer <url> ─────────────────────────────────────────
        ConfigCommand::SetServer { url } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            cfg.set_server(&profile_name, &url)?;
            save(
                &cfg,
                settings,
                &format!("Server for profile '{profile_name}' set to {url}"),
            )
        }

        // ── SetCaCert <path> ────────────────────────────────────────
        ConfigCommand::SetCaCert { path } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg
                .profiles
                .get_mut(&profile_name)
                .ok_or_else(|| CliError::ProfileNotFound {
                    name: profile_name.clone(),
                    available: "(run busops config init first)".into(),
                })?;
            profile.ca_cert = Some(path);
            save(
                &cfg,
                settings,
                &format!("CA certificate set on profile '{profile_name}'"),
            )
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            cfg.use_profile(&name)?;
            save(&cfg, settings, &format!("Default profile set to '{name}'"))
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.active_profile_name(None);
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: busops config init");
            } else {
                for (name, profile) in &cfg.profiles {
                    let marker = if *name == default { " *" } else { "" };
                    println!("{name}{marker}\t{}", profile.server);
                }
            }
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}
