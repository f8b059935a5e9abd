//! Instance provisioner
//!
//! A single sequential pipeline per instance: resolve the role
//! profile, import the customer credential, launch, tag, wait for
//! volume attachment, tag volumes, and for backup-designated disks
//! wait for the running state and run the preparation script. Every
//! wait is a bounded poll with a fixed interval; exceeding the
//! deadline surfaces as a provisioning timeout instead of looping
//! forever.

use tokio::time::{Instant, sleep};

use herdctl_cloud::{
    ImportOutcome, LaunchRequest, QueryHandle, SessionFactory, Tag, VolumeAttachment,
};
use herdctl_remote::ExecutionResult;

use crate::config::FleetConfig;
use crate::error::{FleetError, Result};
use crate::roles::RoleRegistry;
use crate::runner::CommandRunner;
use crate::script::DiskPrepScript;
use crate::tags::{
    TAG_CUSTOMER_ID, TAG_INSTANCE_ID, TAG_NODE_TYPE, TAG_VOLUME_NAME, volume_display_name,
};

/// Outcome of the preparation script on one backup device.
#[derive(Debug)]
pub struct DiskPrepOutcome {
    pub device: String,
    pub result: ExecutionResult,
}

/// What one provisioning run produced.
///
/// `disk_prep` holds one entry per backup-designated device, in disk
/// order; a script that reported errors appears here with
/// `result.succeeded == false` rather than failing the provision.
#[derive(Debug)]
pub struct ProvisionOutcome {
    pub instance_id: String,
    pub disk_prep: Vec<DiskPrepOutcome>,
}

pub struct Provisioner<'a> {
    registry: &'a RoleRegistry,
    sessions: &'a dyn SessionFactory,
    runner: &'a dyn CommandRunner,
    config: &'a FleetConfig,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        registry: &'a RoleRegistry,
        sessions: &'a dyn SessionFactory,
        runner: &'a dyn CommandRunner,
        config: &'a FleetConfig,
    ) -> Self {
        Self {
            registry,
            sessions,
            runner,
            config,
        }
    }

    /// Provision one instance of `role_name` for `customer_id` in
    /// `region`, returning its provider-assigned id and the per-device
    /// disk-preparation outcomes.
    pub async fn provision(
        &self,
        role_name: &str,
        customer_id: &str,
        region: &str,
    ) -> Result<ProvisionOutcome> {
        let profile = self.registry.resolve(role_name)?;

        // Credential resolution is a configuration concern; fail
        // before touching the provider.
        let key_material = self.config.resolve_public_key()?;

        let (control, query) = self.sessions.open(region).await?;

        match control.import_credential(customer_id, &key_material).await? {
            ImportOutcome::Imported => {
                tracing::info!(customer_id, "imported credential");
            }
            ImportOutcome::AlreadyExists => {
                tracing::debug!(customer_id, "credential already registered");
            }
        }

        let request = LaunchRequest {
            image_id: profile.image_id.clone(),
            size_class: profile.size_class.clone(),
            credential_name: customer_id.to_string(),
            block_devices: profile.block_device_requests(),
        };
        let instance_id = control.launch_instance(&request).await?;
        tracing::info!(instance_id, role_name, customer_id, region, "instance created");

        control
            .create_tags(
                &instance_id,
                &[
                    Tag::new(TAG_CUSTOMER_ID, customer_id),
                    Tag::new(TAG_NODE_TYPE, role_name),
                ],
            )
            .await?;

        let attachments = self.wait_for_volumes(query.as_ref(), &instance_id).await?;
        for attachment in &attachments {
            let name = volume_display_name(
                &attachment.device_name,
                profile.is_backup_device(&attachment.device_name),
            );
            control
                .create_tags(
                    &attachment.volume_id,
                    &[
                        Tag::new(TAG_INSTANCE_ID, &instance_id),
                        Tag::new(TAG_VOLUME_NAME, name),
                    ],
                )
                .await?;
        }

        let backup_devices = profile.backup_devices();
        let mut disk_prep = Vec::new();
        if !backup_devices.is_empty() {
            let private_ip = self.wait_for_running(query.as_ref(), &instance_id).await?;
            let script = match &self.config.disk_prep_script {
                Some(path) => DiskPrepScript::load(path)?,
                None => DiskPrepScript::builtin(),
            };
            for device in backup_devices {
                tracing::info!(instance_id, device, "preparing backup disk");
                let result = self.runner.run(&private_ip, &script.render(device)).await?;
                if !result.succeeded {
                    tracing::warn!(
                        instance_id,
                        device,
                        stderr = ?result.standard_error,
                        "disk preparation reported errors"
                    );
                }
                disk_prep.push(DiskPrepOutcome {
                    device: device.to_string(),
                    result,
                });
            }
        }

        Ok(ProvisionOutcome {
            instance_id,
            disk_prep,
        })
    }

    /// Poll until at least one attached volume is observed.
    async fn wait_for_volumes(
        &self,
        query: &dyn QueryHandle,
        instance_id: &str,
    ) -> Result<Vec<VolumeAttachment>> {
        let deadline = Instant::now() + self.config.poll.timeout();
        loop {
            let desc = query.describe_instance(instance_id).await?;
            let attached: Vec<VolumeAttachment> = desc
                .attachments
                .iter()
                .filter(|a| a.attached)
                .cloned()
                .collect();
            if !attached.is_empty() {
                return Ok(attached);
            }
            if Instant::now() >= deadline {
                return Err(FleetError::ProvisioningTimeout {
                    instance_id: instance_id.to_string(),
                    waiting_for: "volume attachment".to_string(),
                });
            }
            sleep(self.config.poll.interval()).await;
        }
    }

    /// Poll until the instance is running and has a private address,
    /// returning that address.
    async fn wait_for_running(
        &self,
        query: &dyn QueryHandle,
        instance_id: &str,
    ) -> Result<String> {
        let deadline = Instant::now() + self.config.poll.timeout();
        loop {
            let desc = query.describe_instance(instance_id).await?;
            if desc.state == herdctl_cloud::InstanceState::Running {
                if let Some(ip) = desc.private_ip {
                    return Ok(ip);
                }
            }
            if Instant::now() >= deadline {
                return Err(FleetError::ProvisioningTimeout {
                    instance_id: instance_id.to_string(),
                    waiting_for: "running state".to_string(),
                });
            }
            sleep(self.config.poll.interval()).await;
        }
    }
}
