//! Clap derive structures for the `busops` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// busops -- administration console for a bus-ticketing service
#[derive(Debug, Parser)]
#[command(
    name = "busops",
    version,
    about = "Administer bus stops, lines, routes, ticket categories and tickets",
    long_about = "Command-line console for a bus-ticketing REST service.\n\n\
        Every command talks to the server's /api endpoints; pricing, expiry\n\
        and renewal rules are enforced by the server. Use --demo to try the\n\
        commands against a seeded in-memory backend.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "BUSOPS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, short = 'S', env = "BUSOPS_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(long, short = 'o', env = "BUSOPS_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "BUSOPS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "BUSOPS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Run against a seeded in-memory backend instead of a server
    #[arg(long, global = true)]
    pub demo: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Headline counts: lines, categories, tickets
    #[command(alias = "home")]
    Dashboard,

    /// Manage bus stops
    #[command(alias = "stop")]
    Stops(StopsArgs),

    /// Manage bus lines
    #[command(alias = "line")]
    Lines(LinesArgs),

    /// View and edit the ordered stops of a bus line
    Route(RouteArgs),

    /// Manage ticket categories
    #[command(alias = "cat")]
    Categories(CategoriesArgs),

    /// Search, renew and cancel tickets
    #[command(alias = "t")]
    Tickets(TicketsArgs),

    /// Purchase a ticket
    Buy(BuyArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  STOPS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct StopsArgs {
    #[command(subcommand)]
    pub command: StopsCommand,
}

#[derive(Debug, Subcommand)]
pub enum StopsCommand {
    /// List bus stops
    #[command(alias = "ls")]
    List,

    /// Create a bus stop
    Create {
        #[arg(long)]
        name: String,

        /// Latitude (omitted when not given)
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<String>,

        /// Longitude (omitted when not given)
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<String>,
    },

    /// Update a bus stop; unset flags keep their current value
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        lat: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        lon: Option<String>,
    },

    /// Delete a bus stop
    #[command(alias = "rm")]
    Delete { id: i64 },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LINES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LinesArgs {
    #[command(subcommand)]
    pub command: LinesCommand,
}

#[derive(Debug, Subcommand)]
pub enum LinesCommand {
    /// List bus lines
    #[command(alias = "ls")]
    List,

    /// Show one bus line with its route
    Get { id: i64 },

    /// Create a bus line, optionally with its route
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// Stop id to visit, in order (repeatable)
        #[arg(long = "stop", value_name = "STOP_ID")]
        stops: Vec<i64>,
    },

    /// Update a bus line's name or description
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a bus line (deactivated instead while it has active tickets)
    #[command(alias = "rm")]
    Delete { id: i64 },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ROUTE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RouteArgs {
    #[command(subcommand)]
    pub command: RouteCommand,
}

/// Positions are 1-based, matching the stop order shown by `route show`.
#[derive(Debug, Subcommand)]
pub enum RouteCommand {
    /// Show the ordered stops of a line
    Show { line: i64 },

    /// Replace the whole route
    Set {
        line: i64,

        /// Stop ids in visiting order
        #[arg(required = true, value_name = "STOP_ID")]
        stops: Vec<i64>,
    },

    /// Append stops to the end of the route
    Append {
        line: i64,

        #[arg(required = true, value_name = "STOP_ID")]
        stops: Vec<i64>,
    },

    /// Remove the stop at a position
    Remove { line: i64, position: usize },

    /// Swap the stop at a position with its neighbour
    Move {
        line: i64,
        position: usize,
        direction: MoveDirection,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MoveDirection {
    /// Toward the start of the route
    Up,
    /// Toward the end of the route
    Down,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CATEGORIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub command: CategoriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    /// List ticket categories
    #[command(alias = "ls")]
    List,

    /// Create a ticket category
    Create {
        #[arg(long)]
        name: String,

        /// Validity in days; 0 for a single ride
        #[arg(long)]
        days: String,

        #[arg(long)]
        price: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Update a ticket category; unset flags keep their current value
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        days: Option<String>,

        #[arg(long)]
        price: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a ticket category
    #[command(alias = "rm")]
    Delete { id: i64 },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TICKETS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TicketsArgs {
    #[command(subcommand)]
    pub command: TicketsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TicketsCommand {
    /// Search tickets, newest purchase first
    #[command(alias = "ls")]
    List {
        /// Exact passenger email
        #[arg(long)]
        email: Option<String>,

        #[arg(long, default_value = "all")]
        status: StatusArg,

        /// Only tickets bound to this line
        #[arg(long)]
        line: Option<i64>,

        /// Zero-based page number
        #[arg(long, default_value = "0")]
        page: u32,

        /// Rows per page (defaults to the configured page size)
        #[arg(long)]
        size: Option<u32>,
    },

    /// Show one ticket
    Get { id: i64 },

    /// Renew (or reactivate) a ticket
    Renew { id: i64 },

    /// Cancel a ticket
    Cancel { id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    All,
    Active,
    Inactive,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BUY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BuyArgs {
    /// Passenger name
    #[arg(long)]
    pub name: String,

    /// Passenger email
    #[arg(long)]
    pub email: String,

    /// Ticket category id
    #[arg(long)]
    pub category: i64,

    /// Bus line id (omit for a ticket valid on all lines)
    #[arg(long)]
    pub line: Option<i64>,

    /// Start of validity, e.g. 2026-02-10T08:00 (defaults to now)
    #[arg(long)]
    pub valid_from: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init {
        /// Server URL; skips the interactive prompt
        #[arg(long)]
        server: Option<String>,
    },

    /// Display the resolved configuration
    Show,

    /// Set the server URL of the active profile
    SetServer { url: String },

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// List configured profiles
    Profiles,

    /// Print the config file location
    Path,

    /// Set a custom CA certificate for the active profile
    SetCaCert { path: PathBuf },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
