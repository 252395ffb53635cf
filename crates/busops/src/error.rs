//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use busops_config::ConfigError;
use busops_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the ticketing API at {url}")]
    #[diagnostic(
        code(busops::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             Reason: {reason}\n\
             Try: busops --demo dashboard   (no server needed)"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(busops::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout,

    // ── Server responses ─────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(busops::not_found),
        help("Run: busops {list_command} to see what exists")
    )]
    NotFound {
        message: String,
        list_command: String,
    },

    /// A 4xx the server explained: business rule or validation failure.
    #[error("{message}")]
    #[diagnostic(code(busops::rejected))]
    Rejected { message: String },

    #[error("{message}")]
    #[diagnostic(code(busops::api_error))]
    Api { message: String },

    // ── Input ────────────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(busops::validation))]
    Validation { field: String, reason: String },

    #[error("{0}")]
    #[diagnostic(code(busops::invalid_input))]
    InvalidInput(String),

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(busops::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: busops config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No server configured")]
    #[diagnostic(
        code(busops::no_config),
        help(
            "Create a profile with: busops config init\n\
             Or pass --server http://host:8080 (or --demo).\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(busops::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(busops::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("{0}")]
    #[diagnostic(code(busops::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(busops::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::InvalidInput(_)
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Point a not-found error at the listing that would help.
    pub fn with_list_hint(self, list_command: &str) -> Self {
        match self {
            Self::NotFound { message, .. } => Self::NotFound {
                message,
                list_command: list_command.into(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::NotFound { message } => Self::NotFound {
                message,
                list_command: "--help".into(),
            },
            CoreError::Rejected { message, .. } => Self::Rejected { message },
            CoreError::Api { message, .. } => Self::Api { message },
            CoreError::Validation { message } => Self::InvalidInput(message),
            CoreError::Config { message } | CoreError::Internal(message) => {
                Self::Internal(message)
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name, available } => Self::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let rejected: CliError =
            CoreError::from_status(400, "Single ride tickets cannot be renewed").into();
        assert_eq!(rejected.exit_code(), exit_code::CONFLICT);
        assert_eq!(rejected.to_string(), "Single ride tickets cannot be renewed");

        let missing: CliError = CoreError::from_status(404, "Ticket not found with id: 9").into();
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);

        let server: CliError = CoreError::from_status(503, "Service Unavailable").into();
        assert_eq!(server.exit_code(), exit_code::GENERAL);

        assert_eq!(CliError::Timeout.exit_code(), exit_code::TIMEOUT);
        let input: CliError = CoreError::validation("Price must be a number").into();
        assert_eq!(input.exit_code(), exit_code::USAGE);
    }
}
