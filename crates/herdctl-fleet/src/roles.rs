//! Role profile registry
//!
//! A role profile is the declarative template for a machine shape:
//! image, size class and disk layout. The registry is immutable,
//! constructed once at startup and passed into the provisioner; the
//! set of valid role names is exactly the registry's keys.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FleetError, Result};
use herdctl_cloud::BlockDeviceRequest;

/// One disk in a role's layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskSpec {
    /// Device name, unique within a profile (e.g. `/dev/xvdb`)
    pub device_name: String,

    /// Volume size in GiB
    pub size_gib: i32,

    /// Delete the volume when the instance terminates
    #[serde(default = "default_true")]
    pub delete_on_termination: bool,

    /// Backup-designated disks receive a preparation step at
    /// provisioning time
    #[serde(default)]
    pub is_backup_disk: bool,
}

fn default_true() -> bool {
    true
}

/// Machine shape for one role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleProfile {
    pub role_name: String,
    pub image_id: String,
    pub size_class: String,
    #[serde(default)]
    pub disks: Vec<DiskSpec>,
}

impl RoleProfile {
    /// Device names of the backup-designated disks, in disk order.
    pub fn backup_devices(&self) -> Vec<&str> {
        self.disks
            .iter()
            .filter(|d| d.is_backup_disk)
            .map(|d| d.device_name.as_str())
            .collect()
    }

    pub fn is_backup_device(&self, device_name: &str) -> bool {
        self.disks
            .iter()
            .any(|d| d.is_backup_disk && d.device_name == device_name)
    }

    /// Block-device request set for instance creation, one entry per
    /// disk. Empty for zero-disk profiles.
    pub fn block_device_requests(&self) -> Vec<BlockDeviceRequest> {
        self.disks
            .iter()
            .map(|d| BlockDeviceRequest {
                device_name: d.device_name.clone(),
                size_gib: d.size_gib,
                delete_on_termination: d.delete_on_termination,
            })
            .collect()
    }
}

/// Immutable role name → profile mapping.
#[derive(Debug, Clone, Default)]
pub struct RoleRegistry {
    roles: BTreeMap<String, RoleProfile>,
}

impl RoleRegistry {
    pub fn builder() -> RoleRegistryBuilder {
        RoleRegistryBuilder::default()
    }

    /// The stock roles shipped with herdctl.
    pub fn builtin() -> Self {
        Self::builder()
            .register(RoleProfile {
                role_name: "Manager".into(),
                image_id: "ami-97785bed".into(),
                size_class: "t2.nano".into(),
                disks: vec![
                    DiskSpec {
                        device_name: "/dev/xvda".into(),
                        size_gib: 20,
                        delete_on_termination: true,
                        is_backup_disk: false,
                    },
                    DiskSpec {
                        device_name: "/dev/xvdb".into(),
                        size_gib: 10,
                        delete_on_termination: true,
                        is_backup_disk: true,
                    },
                ],
            })
            .register(RoleProfile {
                role_name: "Peer".into(),
                image_id: "ami-97785bed".into(),
                size_class: "t2.micro".into(),
                disks: vec![DiskSpec {
                    device_name: "/dev/xvda".into(),
                    size_gib: 10,
                    delete_on_termination: true,
                    is_backup_disk: false,
                }],
            })
            .build()
            .expect("builtin roles are well-formed")
    }

    /// Load additional or replacement roles from a JSON file holding
    /// an array of profiles.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let profiles: Vec<RoleProfile> = serde_json::from_str(&content)?;
        let mut builder = Self::builder();
        for profile in profiles {
            builder = builder.register(profile);
        }
        builder.build()
    }

    /// Look up a role profile by name.
    pub fn resolve(&self, role_name: &str) -> Result<&RoleProfile> {
        self.roles
            .get(role_name)
            .ok_or_else(|| FleetError::UnknownRole(role_name.to_string()))
    }

    pub fn role_names(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }
}

#[derive(Debug, Default)]
pub struct RoleRegistryBuilder {
    profiles: Vec<RoleProfile>,
}

impl RoleRegistryBuilder {
    pub fn register(mut self, profile: RoleProfile) -> Self {
        self.profiles.push(profile);
        self
    }

    /// Validate and freeze the registry. Duplicate role names and
    /// duplicate device names within a profile are rejected.
    pub fn build(self) -> Result<RoleRegistry> {
        let mut roles = BTreeMap::new();
        for profile in self.profiles {
            let mut seen = std::collections::BTreeSet::new();
            for disk in &profile.disks {
                if disk.size_gib <= 0 {
                    return Err(FleetError::Config(format!(
                        "role {}: disk {} has non-positive size",
                        profile.role_name, disk.device_name
                    )));
                }
                if !seen.insert(disk.device_name.as_str()) {
                    return Err(FleetError::Config(format!(
                        "role {}: duplicate device name {}",
                        profile.role_name, disk.device_name
                    )));
                }
            }
            if roles.insert(profile.role_name.clone(), profile).is_some() {
                return Err(FleetError::Config("duplicate role name".into()));
            }
        }
        Ok(RoleRegistry { roles })
    }
}
