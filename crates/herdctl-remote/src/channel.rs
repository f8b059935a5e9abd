//! SSH channel over russh

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use russh::client::{self, Handle};
use russh::{ChannelMsg, Disconnect};
use russh_keys::key;

use crate::error::{RemoteError, Result};
use crate::result::ExecutionResult;

/// Authentication material for the remote user.
#[derive(Debug, Clone)]
pub enum Credential {
    PrivateKey {
        path: PathBuf,
        passphrase: Option<String>,
    },
    Password(String),
}

/// Host key verification policy.
///
/// Trust-on-first-use is the default: an unknown key is learned into
/// the user's known-hosts file, a changed key is rejected. `AcceptAny`
/// skips verification entirely and is only appropriate for throwaway
/// fleets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostKeyPolicy {
    #[default]
    TrustOnFirstUse,
    AcceptAny,
}

struct HostKeyHandler {
    policy: HostKeyPolicy,
    host: String,
    port: u16,
}

#[async_trait]
impl client::Handler for HostKeyHandler {
    type Error = RemoteError;

    async fn check_server_key(
        &mut self,
        server_public_key: &key::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        match self.policy {
            HostKeyPolicy::AcceptAny => Ok(true),
            HostKeyPolicy::TrustOnFirstUse => {
                match russh_keys::check_known_hosts(&self.host, self.port, server_public_key) {
                    Ok(true) => Ok(true),
                    Ok(false) => {
                        tracing::warn!(host = %self.host, "learning new host key");
                        russh_keys::learn_known_hosts(&self.host, self.port, server_public_key)?;
                        Ok(true)
                    }
                    Err(e) => Err(RemoteError::HostKeyRejected {
                        host: self.host.clone(),
                        reason: e.to_string(),
                    }),
                }
            }
        }
    }
}

/// Runs single commands on remote hosts over SSH.
#[derive(Clone)]
pub struct RemoteChannel {
    user: String,
    credential: Credential,
    policy: HostKeyPolicy,
    port: u16,
}

impl RemoteChannel {
    pub fn new(user: impl Into<String>, credential: Credential) -> Self {
        Self {
            user: user.into(),
            credential,
            policy: HostKeyPolicy::default(),
            port: 22,
        }
    }

    pub fn with_host_key_policy(mut self, policy: HostKeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Run `command` on `host` to completion and capture its output.
    ///
    /// The session is disconnected before returning, on success and on
    /// every error path.
    pub async fn run(&self, host: &str, command: &str) -> Result<ExecutionResult> {
        let config = Arc::new(client::Config::default());
        let handler = HostKeyHandler {
            policy: self.policy,
            host: host.to_string(),
            port: self.port,
        };

        let mut session = client::connect(config, (host, self.port), handler).await?;

        let result = self.authenticate_and_exec(&mut session, host, command).await;
        let _ = session
            .disconnect(Disconnect::ByApplication, "", "English")
            .await;
        result
    }

    async fn authenticate_and_exec(
        &self,
        session: &mut Handle<HostKeyHandler>,
        host: &str,
        command: &str,
    ) -> Result<ExecutionResult> {
        let authenticated = match &self.credential {
            Credential::PrivateKey { path, passphrase } => {
                let key_pair = russh_keys::load_secret_key(path, passphrase.as_deref())?;
                session
                    .authenticate_publickey(&self.user, Arc::new(key_pair))
                    .await?
            }
            Credential::Password(password) => {
                session.authenticate_password(&self.user, password).await?
            }
        };
        if !authenticated {
            return Err(RemoteError::Connection(format!(
                "authentication rejected for {}@{host}",
                self.user
            )));
        }

        tracing::debug!(host, command, "executing remote command");

        let mut channel = session
            .channel_open_session()
            .await
            .map_err(|e| RemoteError::Execution(e.to_string()))?;
        channel
            .exec(true, command)
            .await
            .map_err(|e| RemoteError::Execution(e.to_string()))?;

        let mut stdout: Vec<u8> = Vec::new();
        let mut stderr: Vec<u8> = Vec::new();
        let mut exit_status = None;

        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                ChannelMsg::ExtendedData { ref data, ext } if ext == 1 => {
                    stderr.extend_from_slice(data)
                }
                ChannelMsg::ExitStatus { exit_status: code } => exit_status = Some(code),
                _ => {}
            }
        }

        Ok(ExecutionResult::from_streams(
            host,
            &stdout,
            &stderr,
            exit_status,
        ))
    }
}
