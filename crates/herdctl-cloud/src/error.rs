//! Cloud provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Region unavailable: {0}")]
    RegionUnavailable(String),

    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    #[error("Credential import failed: {0}")]
    CredentialImport(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Provider API error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;
