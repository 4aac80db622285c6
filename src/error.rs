// src/error.rs - Error taxonomy shared by every controller operation
use thiserror::Error;

/// Failure of a controller operation.
///
/// `NoSessionSelected` is resolved locally and never reaches the network.
/// The remaining kinds come back from the printer service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ControlError {
    #[error("Session not selected")]
    NoSessionSelected,
    #[error("Transport error: {0}")]
    Transport(String),
    /// Well-formed error response; the message is shown to the operator verbatim.
    #[error("{message}")]
    RemoteRejection { status: u16, message: String },
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for ControlError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ControlError::MalformedResponse(err.to_string())
        } else {
            ControlError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ControlError {
    fn from(err: serde_json::Error) -> Self {
        ControlError::MalformedResponse(err.to_string())
    }
}
