//! Error types for gateway operations.

use reqwest::StatusCode;

/// Failure kinds for gateway operations.
///
/// Callers can distinguish transport, protocol, and auth failures instead of
/// matching on message strings.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection refused, DNS failure, timeout, or a broken stream.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx status, undecodable JSON, or a missing expected field.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The gateway rejected the presented credential.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// Client-side validation failure; no request was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The caller cancelled the wait before a qualifying event arrived.
    #[error("wait cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::Protocol(format!("invalid response body: {}", e))
        } else {
            Error::Transport(e.to_string())
        }
    }
}

impl Error {
    /// Classify a non-success HTTP response, consuming its body for context.
    pub(crate) async fn from_response(response: reqwest::Response) -> Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Error::Auth(format!("{}: {}", status, body))
        } else {
            Error::Protocol(format!("{}: {}", status, body))
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
