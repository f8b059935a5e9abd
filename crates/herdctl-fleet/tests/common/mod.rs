//! In-memory cloud provider and recording command runner

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use herdctl_cloud::{
    BlockDeviceRequest, CloudError, ControlHandle, ImportOutcome, InstanceDescription,
    InstanceState, LaunchRequest, QueryHandle, SessionFactory, Tag, TagFilter,
};
use herdctl_fleet::{CommandRunner, FleetConfig, PollConfig};
use herdctl_remote::{ExecutionResult, RemoteError};
use tempfile::TempDir;

#[derive(Default)]
pub struct FakeState {
    pub next_id: u32,
    pub instances: Vec<FakeInstance>,
    pub tags: BTreeMap<String, Vec<Tag>>,
    pub imported: Vec<String>,
    pub launches: Vec<LaunchRequest>,
    pub describe_calls: u32,
}

pub struct FakeInstance {
    pub region: String,
    pub desc: InstanceDescription,
    pub block_devices: Vec<BlockDeviceRequest>,
    pub polls: u32,
    pub attach_after: u32,
    pub run_after: u32,
}

/// In-memory provider. Launched instances attach their volumes after
/// `attach_after` describe polls and reach the running state after
/// `run_after` polls, mimicking the provider's asynchronous
/// transitions.
#[derive(Clone, Default)]
pub struct FakeCloud {
    pub state: Arc<Mutex<FakeState>>,
    pub fail_regions: Vec<String>,
    pub attach_after: u32,
    pub run_after: u32,
}

impl FakeCloud {
    #[allow(dead_code)]
    pub fn new(attach_after: u32, run_after: u32) -> Self {
        Self {
            attach_after,
            run_after,
            ..Self::default()
        }
    }

    #[allow(dead_code)]
    pub fn with_fail_regions(mut self, regions: &[&str]) -> Self {
        self.fail_regions = regions.iter().map(|r| r.to_string()).collect();
        self
    }

    /// Seed a pre-existing instance; its tags become filterable.
    #[allow(dead_code)]
    pub fn seed_instance(&self, region: &str, desc: InstanceDescription) {
        let mut state = self.state.lock().unwrap();
        state
            .tags
            .insert(desc.instance_id.clone(), desc.tags.clone());
        state.instances.push(FakeInstance {
            region: region.to_string(),
            desc,
            block_devices: Vec::new(),
            polls: 0,
            attach_after: 0,
            run_after: 0,
        });
    }

    #[allow(dead_code)]
    pub fn recorded_tags(&self, resource_id: &str) -> Vec<Tag> {
        self.state
            .lock()
            .unwrap()
            .tags
            .get(resource_id)
            .cloned()
            .unwrap_or_default()
    }
}

fn advance(instance: &mut FakeInstance) {
    instance.polls += 1;
    let ordinal: u32 = instance
        .desc
        .instance_id
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .unwrap_or(0);
    if instance.polls >= instance.attach_after && instance.desc.attachments.is_empty() {
        instance.desc.attachments = if instance.block_devices.is_empty() {
            vec![herdctl_cloud::VolumeAttachment {
                volume_id: format!("vol-root-{}", instance.desc.instance_id),
                device_name: "/dev/xvda".to_string(),
                attached: true,
            }]
        } else {
            instance
                .block_devices
                .iter()
                .map(|d| herdctl_cloud::VolumeAttachment {
                    volume_id: format!(
                        "vol-{}",
                        d.device_name.strip_prefix("/dev/").unwrap_or(&d.device_name)
                    ),
                    device_name: d.device_name.clone(),
                    attached: true,
                })
                .collect()
        };
    }
    if instance.polls >= instance.run_after && instance.desc.state != InstanceState::Running {
        instance.desc.state = InstanceState::Running;
        instance.desc.private_ip = Some(format!("10.0.0.{ordinal}"));
        instance.desc.public_ip = Some(format!("54.0.0.{ordinal}"));
    }
}

#[async_trait]
impl SessionFactory for FakeCloud {
    async fn open(
        &self,
        region: &str,
    ) -> herdctl_cloud::Result<(Box<dyn ControlHandle>, Box<dyn QueryHandle>)> {
        if self.fail_regions.iter().any(|r| r == region) {
            return Err(CloudError::RegionUnavailable(region.to_string()));
        }
        Ok((
            Box::new(FakeControl {
                state: self.state.clone(),
                region: region.to_string(),
                attach_after: self.attach_after,
                run_after: self.run_after,
            }),
            Box::new(FakeQuery {
                state: self.state.clone(),
                region: region.to_string(),
            }),
        ))
    }
}

pub struct FakeControl {
    state: Arc<Mutex<FakeState>>,
    region: String,
    attach_after: u32,
    run_after: u32,
}

#[async_trait]
impl ControlHandle for FakeControl {
    async fn launch_instance(&self, request: &LaunchRequest) -> herdctl_cloud::Result<String> {
        request.validate()?;
        let mut state = self.state.lock().unwrap();
        state.launches.push(request.clone());
        let instance_id = format!("i-{:08}", state.next_id);
        state.next_id += 1;
        state.instances.push(FakeInstance {
            region: self.region.clone(),
            desc: InstanceDescription {
                instance_id: instance_id.clone(),
                state: InstanceState::Pending,
                public_ip: None,
                private_ip: None,
                tags: Vec::new(),
                attachments: Vec::new(),
            },
            block_devices: request.block_devices.clone(),
            polls: 0,
            attach_after: self.attach_after,
            run_after: self.run_after,
        });
        Ok(instance_id)
    }

    async fn create_tags(&self, resource_id: &str, tags: &[Tag]) -> herdctl_cloud::Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .tags
            .entry(resource_id.to_string())
            .or_default()
            .extend_from_slice(tags);
        Ok(())
    }

    async fn import_credential(
        &self,
        name: &str,
        _public_key_material: &str,
    ) -> herdctl_cloud::Result<ImportOutcome> {
        let mut state = self.state.lock().unwrap();
        if state.imported.iter().any(|n| n == name) {
            return Ok(ImportOutcome::AlreadyExists);
        }
        state.imported.push(name.to_string());
        Ok(ImportOutcome::Imported)
    }
}

pub struct FakeQuery {
    state: Arc<Mutex<FakeState>>,
    region: String,
}

#[async_trait]
impl QueryHandle for FakeQuery {
    async fn describe_instances(
        &self,
        filter: Option<&TagFilter>,
    ) -> herdctl_cloud::Result<Vec<InstanceDescription>> {
        let mut state = self.state.lock().unwrap();
        state.describe_calls += 1;
        let tags = state.tags.clone();
        let matches: Vec<InstanceDescription> = state
            .instances
            .iter()
            .filter(|i| i.region == self.region)
            .map(|i| {
                let mut desc = i.desc.clone();
                desc.tags = tags.get(&desc.instance_id).cloned().unwrap_or_default();
                desc
            })
            .filter(|desc| match filter {
                Some(f) => desc.tag(&f.key) == Some(f.value.as_str()),
                None => true,
            })
            .collect();
        Ok(matches)
    }

    async fn describe_instance(
        &self,
        instance_id: &str,
    ) -> herdctl_cloud::Result<InstanceDescription> {
        let mut state = self.state.lock().unwrap();
        state.describe_calls += 1;
        let tags = state.tags.clone();
        let instance = state
            .instances
            .iter_mut()
            .find(|i| i.region == self.region && i.desc.instance_id == instance_id)
            .ok_or_else(|| CloudError::InstanceNotFound(instance_id.to_string()))?;
        advance(instance);
        let mut desc = instance.desc.clone();
        desc.tags = tags.get(instance_id).cloned().unwrap_or_default();
        Ok(desc)
    }
}

pub struct RecordedCall {
    pub host: String,
    pub command: String,
    /// Lifecycle state of the addressed instance at call time.
    pub instance_state: Option<InstanceState>,
}

/// Recording command runner. Optionally observes the fake cloud so
/// tests can assert on instance state at execution time.
#[derive(Clone, Default)]
pub struct FakeRunner {
    pub calls: Arc<Mutex<Vec<RecordedCall>>>,
    pub cloud: Option<Arc<Mutex<FakeState>>>,
    pub fail_hosts: Vec<String>,
    pub stderr_hosts: Vec<String>,
}

impl FakeRunner {
    #[allow(dead_code)]
    pub fn observing(cloud: &FakeCloud) -> Self {
        Self {
            cloud: Some(cloud.state.clone()),
            ..Self::default()
        }
    }

    #[allow(dead_code)]
    pub fn with_fail_hosts(mut self, hosts: &[&str]) -> Self {
        self.fail_hosts = hosts.iter().map(|h| h.to_string()).collect();
        self
    }

    /// Hosts whose commands complete but write to stderr.
    #[allow(dead_code)]
    pub fn with_stderr_hosts(mut self, hosts: &[&str]) -> Self {
        self.stderr_hosts = hosts.iter().map(|h| h.to_string()).collect();
        self
    }

    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, host: &str, command: &str) -> herdctl_remote::Result<ExecutionResult> {
        if self.fail_hosts.iter().any(|h| h == host) {
            return Err(RemoteError::Connection(format!("{host}: connection refused")));
        }
        let instance_state = self.cloud.as_ref().and_then(|cloud| {
            cloud
                .lock()
                .unwrap()
                .instances
                .iter()
                .find(|i| {
                    i.desc.private_ip.as_deref() == Some(host)
                        || i.desc.public_ip.as_deref() == Some(host)
                })
                .map(|i| i.desc.state)
        });
        self.calls.lock().unwrap().push(RecordedCall {
            host: host.to_string(),
            command: command.to_string(),
            instance_state,
        });
        if self.stderr_hosts.iter().any(|h| h == host) {
            return Ok(ExecutionResult::from_streams(
                host,
                b"",
                b"mkfs: device is busy\n",
                Some(1),
            ));
        }
        Ok(ExecutionResult::from_streams(host, b"ok\n", b"", Some(0)))
    }
}

/// A config pointing at a temp public key, with fast polling.
#[allow(dead_code)]
pub fn test_config(dir: &TempDir, regions: &[&str]) -> FleetConfig {
    let key_path = dir.path().join("id_rsa.pub");
    std::fs::write(&key_path, "ssh-rsa AAAA test@host").unwrap();

    let mut config = FleetConfig::default();
    config.regions.clear();
    config.regions.insert(
        "Test".to_string(),
        regions.iter().map(|r| r.to_string()).collect(),
    );
    config.public_key_path = Some(key_path);
    config.poll = PollConfig {
        interval_ms: 1,
        timeout_ms: 2_000,
    };
    config
}
