//! Error types for the Maia board client.
//!
//! Each layer gets its own `thiserror` enumeration: the FEN codec, the
//! remote prediction API and the user configuration. [`ErrorKind`] is the
//! display-only classification the application state keeps after a failed
//! action.

use std::fmt;

use thiserror::Error;

/// Failure to decode a FEN string. Row indices count from 0 at rank 8.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// Fewer than two space-delimited fields, or a placement without
    /// exactly eight rows.
    #[error("Malformed FEN: {0}")]
    MalformedFen(String),

    #[error("Invalid piece character '{ch}' in row {row}")]
    InvalidPieceChar { row: usize, ch: char },

    #[error("Row {row} describes more than 8 squares")]
    RowOverflow { row: usize },

    #[error("Row {row} describes fewer than 8 squares")]
    RowUnderflow { row: usize },

    /// The side-to-move field was something other than `w` or `b`.
    #[error("Invalid side to move: '{0}'")]
    InvalidTurnChar(String),
}

/// Failure talking to the prediction service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure: refused connection, DNS, reset.
    #[error("Server unreachable: {0}")]
    Unreachable(String),

    /// The local HTTP client could not be built (TLS backend, settings).
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP {status}{}", message_suffix(.message))]
    Status { status: u16, message: Option<String> },

    /// A request body could not be built or a response body could not be
    /// read as the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

impl ApiError {
    /// Message supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Invalid user configuration or environment setting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Elo rating {0} is outside 800..=2800")]
    EloOutOfRange(u32),

    #[error("Move count {0} is outside 1..=10")]
    TopKOutOfRange(u32),

    #[error("Unknown model type '{0}' (expected rapid or blitz)")]
    UnknownModelType(String),

    #[error("Unknown device '{0}' (expected cpu or gpu)")]
    UnknownDevice(String),

    #[error("Invalid API URL '{0}'")]
    InvalidApiUrl(String),
}

/// Classification of the last failed action, kept for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotInitialized,
    InitFailed,
    PredictFailed,
    Unreachable,
    InvalidFen,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::NotInitialized => "modèle non initialisé",
            ErrorKind::InitFailed => "échec de l'initialisation",
            ErrorKind::PredictFailed => "échec de la prédiction",
            ErrorKind::Unreachable => "serveur injoignable",
            ErrorKind::InvalidFen => "FEN invalide",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_includes_server_message() {
        let err = ApiError::Status {
            status: 500,
            message: Some("boom".to_string()),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
        assert_eq!(err.server_message(), Some("boom"));

        let bare = ApiError::Status {
            status: 404,
            message: None,
        };
        assert_eq!(bare.to_string(), "HTTP 404");
        assert_eq!(bare.server_message(), None);
    }

    #[test]
    fn error_kind_labels_are_localized() {
        assert_eq!(ErrorKind::PredictFailed.to_string(), "échec de la prédiction");
        assert_eq!(ErrorKind::Unreachable.to_string(), "serveur injoignable");
    }

    #[test]
    fn client_setup_error_is_not_a_server_reply() {
        let err = ApiError::Client("no TLS backend".to_string());
        assert_eq!(err.to_string(), "HTTP client setup failed: no TLS backend");
        assert!(err.server_message().is_none());
    }

    #[test]
    fn unreachable_has_no_server_message() {
        let err = ApiError::Unreachable("connection refused".to_string());
        assert!(err.server_message().is_none());
    }
}
