use thiserror::Error;

/// Failures surfaced to the user. None of them are retried automatically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("Could not reach the board: {0}")]
    Network(String),

    #[error("The board did not answer within {0}ms")]
    Timeout(u64),

    /// 422 from the server; carries its message.
    #[error("{0}")]
    Rejected(String),

    /// 429 from the server; carries its message.
    #[error("{0}")]
    RateLimited(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
