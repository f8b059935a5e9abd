//! Typed request and response structs for the provider boundary
//!
//! Loosely-typed maps never travel past the session factory: requests
//! are validated here and converted to SDK shapes inside the provider
//! crate.

use serde::{Deserialize, Serialize};

use crate::error::{CloudError, Result};

/// One block device the instance should be created with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDeviceRequest {
    /// Device name as exposed to the guest (e.g. `/dev/xvdb`)
    pub device_name: String,

    /// Volume size in GiB
    pub size_gib: i32,

    /// Delete the volume when the instance terminates
    pub delete_on_termination: bool,
}

/// Request to create exactly one instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchRequest {
    /// Machine image identifier
    pub image_id: String,

    /// Provider size class (e.g. `t2.micro`)
    pub size_class: String,

    /// Name of a previously imported credential; becomes the
    /// instance's SSH key-pair
    pub credential_name: String,

    /// Additional block devices; may be empty, in which case the
    /// instance boots from the image's default volume only
    pub block_devices: Vec<BlockDeviceRequest>,
}

impl LaunchRequest {
    /// Validate the request before it reaches a provider SDK.
    pub fn validate(&self) -> Result<()> {
        if self.image_id.is_empty() {
            return Err(CloudError::InvalidRequest("image_id is empty".into()));
        }
        if self.size_class.is_empty() {
            return Err(CloudError::InvalidRequest("size_class is empty".into()));
        }
        if self.credential_name.is_empty() {
            return Err(CloudError::InvalidRequest(
                "credential_name is empty".into(),
            ));
        }
        for dev in &self.block_devices {
            if dev.size_gib <= 0 {
                return Err(CloudError::InvalidRequest(format!(
                    "block device {} has non-positive size {}",
                    dev.device_name, dev.size_gib
                )));
            }
        }
        Ok(())
    }
}

/// A key/value resource tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Tag equality filter for instance enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    pub key: String,
    pub value: String,
}

impl TagFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Instance lifecycle state as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceState {
    Pending,
    Running,
    Stopped,
    Terminated,
}

impl std::fmt::Display for InstanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceState::Pending => write!(f, "pending"),
            InstanceState::Running => write!(f, "running"),
            InstanceState::Stopped => write!(f, "stopped"),
            InstanceState::Terminated => write!(f, "terminated"),
        }
    }
}

/// One observed volume attachment on an instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeAttachment {
    pub volume_id: String,
    pub device_name: String,
    pub attached: bool,
}

/// Provider view of a single instance.
///
/// Volume attachment is asynchronous relative to instance creation, so
/// `attachments` may be empty for a bounded period after launch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceDescription {
    pub instance_id: String,
    pub state: InstanceState,
    pub public_ip: Option<String>,
    pub private_ip: Option<String>,
    pub tags: Vec<Tag>,
    pub attachments: Vec<VolumeAttachment>,
}

impl InstanceDescription {
    /// Look up a tag value by key.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }
}
