//! Fleet-level view of provider resources

use herdctl_cloud::{InstanceDescription, InstanceState};

use crate::tags::{TAG_CUSTOMER_ID, TAG_NODE_TYPE};

/// One volume observed on an instance.
///
/// The display name is materialized as the `VolumeName` tag on the
/// volume resource at provisioning time; a describe that does not read
/// volume tags leaves it unset.
#[derive(Debug, Clone)]
pub struct Volume {
    pub volume_id: String,
    pub device_name: String,
    pub display_name: Option<String>,
    pub attached: bool,
}

/// One instance with its ownership and role tags resolved.
#[derive(Debug, Clone)]
pub struct Instance {
    pub instance_id: String,
    pub customer_id: Option<String>,
    pub role_name: Option<String>,
    pub region: String,
    pub public_ip: Option<String>,
    pub private_ip: Option<String>,
    pub lifecycle_state: InstanceState,
    pub volumes: Vec<Volume>,
}

impl Instance {
    pub fn from_description(region: impl Into<String>, desc: &InstanceDescription) -> Self {
        Self {
            instance_id: desc.instance_id.clone(),
            customer_id: desc.tag(TAG_CUSTOMER_ID).map(str::to_string),
            role_name: desc.tag(TAG_NODE_TYPE).map(str::to_string),
            region: region.into(),
            public_ip: desc.public_ip.clone(),
            private_ip: desc.private_ip.clone(),
            lifecycle_state: desc.state,
            volumes: desc
                .attachments
                .iter()
                .map(|a| Volume {
                    volume_id: a.volume_id.clone(),
                    device_name: a.device_name.clone(),
                    display_name: None,
                    attached: a.attached,
                })
                .collect(),
        }
    }
}
