//! Remote execution seam
//!
//! The provisioner and dispatcher talk to hosts through this trait so
//! tests can substitute a recording fake for the SSH channel.

use async_trait::async_trait;
use herdctl_remote::{ExecutionResult, RemoteChannel};

/// Runs one command on one host.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, host: &str, command: &str) -> herdctl_remote::Result<ExecutionResult>;
}

#[async_trait]
impl CommandRunner for RemoteChannel {
    async fn run(&self, host: &str, command: &str) -> herdctl_remote::Result<ExecutionResult> {
        RemoteChannel::run(self, host, command).await
    }
}
