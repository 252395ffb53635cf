// ── Runtime connection configuration ──
//
// Describes *how* to reach the ticketing API. Never touches disk:
// the CLI/TUI builds an `ApiConfig` from profiles and flags and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed staging servers).
    DangerAcceptInvalid,
}

/// Configuration for talking to one ticketing API server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server URL (e.g. `http://localhost:8080`). `/api` is appended if missing.
    pub url: Url,
    pub tls: TlsVerification,
    /// Per-request timeout. The only timeout in the system.
    pub timeout: Duration,
}

impl ApiConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }

    pub(crate) fn transport(&self) -> busops_api::TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => busops_api::TlsMode::System,
            TlsVerification::CustomCa(path) => busops_api::TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => busops_api::TlsMode::DangerAcceptInvalid,
        };
        busops_api::TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
