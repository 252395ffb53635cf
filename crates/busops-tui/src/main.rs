//! `busops-tui`: terminal back-office console for the bus ticketing service.
//!
//! Built on [ratatui](https://ratatui.rs). Pages are navigable via number
//! keys (1-6): Home, Bus Lines, Bus Stops, Categories, Buy Ticket and
//! My Tickets. Each page loads its own data from the REST server when it
//! is opened; `--demo` swaps the server for a seeded in-memory backend.
//!
//! Logs are written to a file (default `/tmp/busops-tui.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use busops_config::Profile;
use busops_core::{FakeBackend, HttpBackend};

use crate::app::App;
use crate::screen::Route;
use crate::screens::Api;

/// Terminal console for managing bus stops, lines, ticket categories and tickets.
#[derive(Parser, Debug)]
#[command(name = "busops-tui", version, about)]
struct Cli {
    /// Use the seeded in-memory backend instead of a server
    #[arg(long)]
    demo: bool,

    /// Page to open first (e.g. /bus-lines/1)
    #[arg(long, default_value = "/")]
    open: String,

    /// Config profile to use
    #[arg(short, long, env = "BUSOPS_PROFILE")]
    profile: Option<String>,

    /// Server URL, overriding the profile (e.g. http://localhost:8080)
    #[arg(short, long, env = "BUSOPS_SERVER")]
    server: Option<String>,

    /// Log file path (defaults to /tmp/busops-tui.log)
    #[arg(long, default_value = "/tmp/busops-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing; stdout belongs to the terminal UI. Hold the
/// returned guard until exit so buffered lines are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("busops_tui={log_level},busops_core={log_level}"))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("busops-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Pick the backend: the seeded fake under `--demo`, otherwise the server
/// from `--server` or the active config profile. Returns it with a short
/// label for the status bar.
fn build_backend(cli: &Cli) -> Result<(Api, String)> {
    if cli.demo {
        return Ok((Arc::new(FakeBackend::new()), "demo data".into()));
    }

    let cfg = busops_config::load_config()?;
    let name = cfg.active_profile_name(cli.profile.as_deref());
    let profile = match (cfg.profiles.get(&name), &cli.server) {
        (Some(profile), _) => profile.clone(),
        (None, Some(server)) => Profile::new(server.clone()),
        (None, None) => {
            return Err(eyre!(
                "no server configured; run `busops config init`, pass --server, or use --demo"
            ));
        }
    };

    let mut api = busops_config::profile_to_api_config(&profile, &cfg.defaults)?;
    if let Some(server) = &cli.server {
        api.url = busops_config::parse_server_url(server)?;
    }
    let label = api.url.to_string();
    Ok((Arc::new(HttpBackend::connect(&api)?), label))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal switches to raw mode
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let route = Route::parse(&cli.open).ok_or_else(|| eyre!("unknown page: {}", cli.open))?;
    let (api, source) = build_backend(&cli)?;

    info!(%route, %source, "starting busops-tui");

    let mut app = App::new(api, route, source);
    app.run().await?;

    Ok(())
}
