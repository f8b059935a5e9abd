pub mod backup;
pub mod create;
pub mod execute;
pub mod list_all;
pub mod list_nodes;

use std::path::PathBuf;

/// Fallback identity file when none is given on the command line.
pub(crate) fn default_identity_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".ssh").join("id_rsa"),
        None => PathBuf::from(".ssh/id_rsa"),
    }
}
