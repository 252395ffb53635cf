// ── Core error types ──
//
// Operator-facing errors from busops-core. Consumers never see JSON parse
// failures or reqwest internals directly; the `From<busops_api::Error>`
// impl folds them into variants whose Display is the message to show.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the ticketing API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to the ticketing API timed out")]
    Timeout,

    // ── Server-side rejections ───────────────────────────────────────
    /// 404 from the server. `message` is the server's own wording.
    #[error("{message}")]
    NotFound { message: String },

    /// Other 4xx: a business rule or validation failure on the server.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// 5xx or anything else non-2xx.
    #[error("{message}")]
    Api { status: Option<u16>, message: String },

    // ── Local errors ─────────────────────────────────────────────────
    /// Form input that could not be parsed into a request.
    #[error("{message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Classify a non-2xx response by status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => Self::NotFound { message },
            400..=499 => Self::Rejected { status, message },
            _ => Self::Api {
                status: Some(status),
                message,
            },
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// HTTP status carried by a server-side error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Rejected { status, .. } => Some(*status),
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<busops_api::Error> for CoreError {
    fn from(err: busops_api::Error) -> Self {
        match err {
            busops_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        status: e.status().map(|s| s.as_u16()),
                        message: e.to_string(),
                    }
                }
            }
            busops_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            busops_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            busops_api::Error::Api { status, message } => CoreError::from_status(status, message),
            busops_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Unexpected response from server: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_keep_server_wording() {
        let err: CoreError = busops_api::Error::Api {
            status: 400,
            message: "Single ride tickets cannot be renewed".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Rejected { status: 400, .. }));
        assert_eq!(err.to_string(), "Single ride tickets cannot be renewed");
    }

    #[test]
    fn not_found_is_classified() {
        let err = CoreError::from_status(404, "Bus line not found with id: 9");
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn server_errors_stay_generic() {
        let err = CoreError::from_status(500, "Internal Server Error");
        assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
    }
}
