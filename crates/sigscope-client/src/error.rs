use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend could not be reached or the command was never acknowledged.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The backend accepted the command but reported failure.
    #[error("backend command failed: {0}")]
    CommandFailed(String),

    #[error("protocol error: {0}")]
    Protocol(#[from] sigscope_protocol::ProtocolError),
}

pub type ClientResult<T> = Result<T, ClientError>;
