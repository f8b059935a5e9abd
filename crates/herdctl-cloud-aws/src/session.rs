//! EC2-backed session factory and handles

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ec2::Client;
use aws_sdk_ec2::primitives::Blob;
use aws_sdk_ec2::types::{BlockDeviceMapping, EbsBlockDevice, Filter, InstanceType};
use herdctl_cloud::{
    CloudError, ControlHandle, ImportOutcome, InstanceDescription, LaunchRequest, QueryHandle,
    Result, SessionFactory, Tag, TagFilter,
};

use crate::convert;

/// Opens region-scoped EC2 sessions.
#[derive(Debug, Clone, Default)]
pub struct AwsSessionFactory;

impl AwsSessionFactory {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SessionFactory for AwsSessionFactory {
    async fn open(&self, region: &str) -> Result<(Box<dyn ControlHandle>, Box<dyn QueryHandle>)> {
        if region.is_empty() {
            return Err(CloudError::RegionUnavailable("empty region name".into()));
        }

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        let client = Client::new(&config);

        tracing::debug!(region, "opened EC2 session");

        Ok((
            Box::new(Ec2Control {
                client: client.clone(),
            }),
            Box::new(Ec2Query { client }),
        ))
    }
}

/// Mutating EC2 calls.
pub struct Ec2Control {
    client: Client,
}

#[async_trait]
impl ControlHandle for Ec2Control {
    async fn launch_instance(&self, request: &LaunchRequest) -> Result<String> {
        request.validate()?;

        let mut launch = self
            .client
            .run_instances()
            .image_id(&request.image_id)
            .instance_type(InstanceType::from(request.size_class.as_str()))
            .key_name(&request.credential_name)
            .min_count(1)
            .max_count(1);

        for dev in &request.block_devices {
            launch = launch.block_device_mappings(
                BlockDeviceMapping::builder()
                    .device_name(&dev.device_name)
                    .ebs(
                        EbsBlockDevice::builder()
                            .volume_size(dev.size_gib)
                            .delete_on_termination(dev.delete_on_termination)
                            .build(),
                    )
                    .build(),
            );
        }

        let response = launch
            .send()
            .await
            .map_err(|e| convert::classify_error("run_instances", e))?;

        let instance_id = response
            .instances()
            .first()
            .and_then(|i| i.instance_id())
            .ok_or_else(|| CloudError::Api("run_instances returned no instance".into()))?
            .to_string();

        tracing::info!(instance_id, image_id = %request.image_id, "launched instance");
        Ok(instance_id)
    }

    async fn create_tags(&self, resource_id: &str, tags: &[Tag]) -> Result<()> {
        let mut call = self.client.create_tags().resources(resource_id);
        for tag in tags {
            call = call.tags(
                aws_sdk_ec2::types::Tag::builder()
                    .key(&tag.key)
                    .value(&tag.value)
                    .build(),
            );
        }
        call.send()
            .await
            .map_err(|e| convert::classify_error("create_tags", e))?;
        Ok(())
    }

    async fn import_credential(
        &self,
        name: &str,
        public_key_material: &str,
    ) -> Result<ImportOutcome> {
        let result = self
            .client
            .import_key_pair()
            .key_name(name)
            .public_key_material(Blob::new(public_key_material.as_bytes()))
            .send()
            .await;

        match result {
            Ok(_) => Ok(ImportOutcome::Imported),
            Err(e) if convert::is_duplicate_key_pair(&e) => Ok(ImportOutcome::AlreadyExists),
            Err(e) => Err(CloudError::CredentialImport(format!(
                "{name}: {}",
                convert::classify_error("import_key_pair", e)
            ))),
        }
    }
}

/// Read-only EC2 calls.
pub struct Ec2Query {
    client: Client,
}

#[async_trait]
impl QueryHandle for Ec2Query {
    async fn describe_instances(
        &self,
        filter: Option<&TagFilter>,
    ) -> Result<Vec<InstanceDescription>> {
        let mut call = self.client.describe_instances();
        if let Some(f) = filter {
            call = call.filters(
                Filter::builder()
                    .name(format!("tag:{}", f.key))
                    .values(&f.value)
                    .build(),
            );
        }

        // A region can hold more instances than one page; follow the
        // pagination token until the listing is exhausted.
        let mut pages = call.into_paginator().send();
        let mut instances = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| convert::classify_error("describe_instances", e))?;
            instances.extend(
                page.reservations()
                    .iter()
                    .flat_map(|r| r.instances())
                    .filter_map(convert::instance_description),
            );
        }
        Ok(instances)
    }

    async fn describe_instance(&self, instance_id: &str) -> Result<InstanceDescription> {
        let response = self
            .client
            .describe_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| convert::classify_error("describe_instances", e))?;

        response
            .reservations()
            .iter()
            .flat_map(|r| r.instances())
            .filter_map(convert::instance_description)
            .next()
            .ok_or_else(|| CloudError::InstanceNotFound(instance_id.to_string()))
    }
}
