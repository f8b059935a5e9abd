//! Tag vocabulary
//!
//! Classification lives entirely in resource tags so that later
//! enumeration and filtering stay consistent with provisioning.

/// Owner of an instance.
pub const TAG_CUSTOMER_ID: &str = "CustomerID";

/// Role the instance was provisioned as.
pub const TAG_NODE_TYPE: &str = "NodeType";

/// Back-reference from a volume to its instance.
pub const TAG_INSTANCE_ID: &str = "InstanceID";

/// Display name of a volume, derived from its disk spec.
pub const TAG_VOLUME_NAME: &str = "VolumeName";

/// Derive the display name for a volume from its device name.
///
/// The `/dev/` prefix is stripped, so `/dev/xvdb` becomes
/// `BackupDisk-xvdb` or `DataDisk-xvdb` depending on whether the
/// originating disk spec is backup-designated.
pub fn volume_display_name(device_name: &str, is_backup: bool) -> String {
    let suffix = device_name.strip_prefix("/dev/").unwrap_or(device_name);
    if is_backup {
        format!("BackupDisk-{suffix}")
    } else {
        format!("DataDisk-{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_strips_device_prefix() {
        assert_eq!(volume_display_name("/dev/xvda", false), "DataDisk-xvda");
        assert_eq!(volume_display_name("/dev/xvdb", true), "BackupDisk-xvdb");
    }

    #[test]
    fn display_name_without_prefix_is_kept() {
        assert_eq!(volume_display_name("xvdc", false), "DataDisk-xvdc");
    }
}
