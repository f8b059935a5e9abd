//! Fleet configuration
//!
//! Defaults work with no file present; a JSON config can override the
//! region table, SSH user, key paths and polling parameters. Lookup
//! order: explicit path, `HERD_CONFIG` environment variable,
//! `herd.json` in the current directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FleetError, Result};

/// Environment variable naming the public-key file for credential
/// import, as an alternative to `public_key_path`.
pub const PUB_KEY_ENV: &str = "PUB_KEY";

const CONFIG_ENV: &str = "HERD_CONFIG";
const CONFIG_FILE: &str = "herd.json";

/// Bounded-polling parameters for provider state transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Fixed interval between probes, in milliseconds
    pub interval_ms: u64,

    /// Deadline after which the wait fails with a provisioning
    /// timeout, in milliseconds
    pub timeout_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1_000,
            timeout_ms: 300_000,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

/// Workspace-wide fleet settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Region table, grouped by area for display. Enumeration walks
    /// every region of every area.
    pub regions: BTreeMap<String, Vec<String>>,

    /// Remote user for disk preparation and script dispatch
    pub ssh_user: String,

    /// Public key file imported as the per-customer credential
    pub public_key_path: Option<PathBuf>,

    /// Disk-preparation script template; a builtin template is used
    /// when unset
    pub disk_prep_script: Option<PathBuf>,

    pub poll: PollConfig,
}

impl Default for FleetConfig {
    fn default() -> Self {
        let mut regions = BTreeMap::new();
        regions.insert(
            "US East".to_string(),
            vec!["us-east-1".to_string(), "us-east-2".to_string()],
        );
        regions.insert(
            "US West".to_string(),
            vec!["us-west-1".to_string(), "us-west-2".to_string()],
        );
        Self {
            regions,
            ssh_user: "ec2-user".to_string(),
            public_key_path: None,
            disk_prep_script: None,
            poll: PollConfig::default(),
        }
    }
}

impl FleetConfig {
    /// Load configuration, falling back to defaults when no file is
    /// found.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_json_file(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::from_json_file(Path::new(&path));
        }
        let local = Path::new(CONFIG_FILE);
        if local.exists() {
            return Self::from_json_file(local);
        }
        Ok(Self::default())
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FleetError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Every configured region, in stable (area, position) order.
    pub fn region_list(&self) -> Vec<&str> {
        self.regions
            .values()
            .flat_map(|rs| rs.iter().map(String::as_str))
            .collect()
    }

    /// Read the public-key material for credential import.
    ///
    /// Resolution order: configured path, then the `PUB_KEY`
    /// environment variable. Absence is a fatal configuration error.
    pub fn resolve_public_key(&self) -> Result<String> {
        let path = match &self.public_key_path {
            Some(path) => path.clone(),
            None => match std::env::var(PUB_KEY_ENV) {
                Ok(value) if !value.is_empty() => PathBuf::from(value),
                _ => return Err(FleetError::MissingCredential),
            },
        };
        std::fs::read_to_string(&path).map_err(|e| {
            FleetError::Config(format!("cannot read public key {}: {e}", path.display()))
        })
    }
}
