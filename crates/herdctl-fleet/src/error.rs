//! Fleet core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error(
        "Invalid selector: {0}. Exactly one of customer id or node type must be given"
    )]
    InvalidSelector(String),

    #[error(
        "No public key configured. Set the PUB_KEY environment variable or pass a key path"
    )]
    MissingCredential,

    #[error("Timed out provisioning {instance_id}: waiting for {waiting_for}")]
    ProvisioningTimeout {
        instance_id: String,
        waiting_for: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Cloud(#[from] herdctl_cloud::CloudError),

    #[error(transparent)]
    Remote(#[from] herdctl_remote::RemoteError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FleetError>;
