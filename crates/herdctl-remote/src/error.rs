//! Remote execution error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Remote execution failed: {0}")]
    Execution(String),

    #[error("Host key rejected for {host}: {reason}")]
    HostKeyRejected { host: String, reason: String },

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Transport-layer errors surface during session establishment; the
// exec phase maps its own errors to `Execution` explicitly.
impl From<russh::Error> for RemoteError {
    fn from(err: russh::Error) -> Self {
        RemoteError::Connection(err.to_string())
    }
}

impl From<russh_keys::Error> for RemoteError {
    fn from(err: russh_keys::Error) -> Self {
        RemoteError::Credential(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RemoteError>;
