//! Backup lifecycle stubs
//!
//! The backup model (snapshot creation, enumeration, restore) is a
//! separate subsystem that has not been designed yet; these commands
//! parse their arguments and fail explicitly rather than pretend.

pub fn handle_backup(node_id: &str) -> anyhow::Result<()> {
    anyhow::bail!("backup for {node_id} is not implemented yet");
}

pub fn handle_list_backup(node_id: &str) -> anyhow::Result<()> {
    anyhow::bail!("list-backup for {node_id} is not implemented yet");
}

pub fn handle_rollback(rollback_id: &str) -> anyhow::Result<()> {
    anyhow::bail!("rollback to {rollback_id} is not implemented yet");
}
