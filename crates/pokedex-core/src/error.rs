// ── Core error types ──
//
// User-facing errors from pokedex-core. Consumers never match on HTTP
// status codes or JSON parse failures directly; the
// `From<pokedex_api::Error>` impl translates transport-layer errors into
// domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach catalog API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Catalog API request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Catalog API returned an unexpected response: {message}")]
    InvalidResponse { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<pokedex_api::Error> for CoreError {
    fn from(err: pokedex_api::Error) -> Self {
        match err {
            pokedex_api::Error::Status { operation, status } if status == 404 => {
                CoreError::NotFound {
                    resource: operation.into(),
                }
            }
            pokedex_api::Error::Status { .. } => CoreError::Api {
                status: err.status(),
                message: err.to_string(),
            },
            pokedex_api::Error::Transport(ref e) => {
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
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            pokedex_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            pokedex_api::Error::Client(message) => CoreError::Config { message },
            pokedex_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_404_maps_to_not_found() {
        let err = CoreError::from(pokedex_api::Error::Status {
            operation: "Pokemon detail",
            status: 404,
        });
        assert!(matches!(err, CoreError::NotFound { ref resource } if resource == "Pokemon detail"));
    }

    #[test]
    fn other_status_keeps_code_and_message() {
        let err = CoreError::from(pokedex_api::Error::Status {
            operation: "Pokemon list",
            status: 503,
        });
        match err {
            CoreError::Api { message, status } => {
                assert_eq!(status, Some(503));
                assert_eq!(message, "Failed to fetch Pokemon list: 503");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn deserialization_maps_to_invalid_response() {
        let err = CoreError::from(pokedex_api::Error::Deserialization {
            message: "expected array".into(),
            body: "{}".into(),
        });
        assert!(matches!(err, CoreError::InvalidResponse { .. }));
    }
}
