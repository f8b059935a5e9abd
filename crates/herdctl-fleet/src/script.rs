//! Disk-preparation script template
//!
//! A pre-authored shell script with one substitution placeholder for
//! the device name. The core only loads the contents and substitutes
//! the placeholder before handing it to the remote channel.

use std::path::Path;

use crate::error::Result;

/// Placeholder replaced with the device name at render time.
pub const DEVICE_PLACEHOLDER: &str = "{{device}}";

const BUILTIN_TEMPLATE: &str = "\
sudo mkfs -t ext4 {{device}}
sudo mkdir -p /backup
sudo mount {{device}} /backup
";

/// Shell script template for preparing a backup disk.
#[derive(Debug, Clone)]
pub struct DiskPrepScript {
    template: String,
}

impl DiskPrepScript {
    /// The stock template: create a filesystem and mount it.
    pub fn builtin() -> Self {
        Self {
            template: BUILTIN_TEMPLATE.to_string(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            template: std::fs::read_to_string(path)?,
        })
    }

    /// Substitute the device placeholder.
    pub fn render(&self, device_name: &str) -> String {
        self.template.replace(DEVICE_PLACEHOLDER, device_name)
    }
}
