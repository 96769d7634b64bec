use thiserror::Error;

/// Failure of a single call against the todo resource.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response: connect, timeout, I/O.
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// A response arrived but its body was not the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}
