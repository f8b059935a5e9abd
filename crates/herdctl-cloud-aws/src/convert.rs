//! SDK shape conversions
//!
//! Everything the EC2 SDK returns is converted to `herdctl-cloud`
//! types here, so the rest of the workspace never sees an SDK struct.

use aws_sdk_ec2::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_ec2::types::{
    AttachmentStatus, Instance, InstanceStateName, Tag as SdkTag,
};
use herdctl_cloud::{CloudError, InstanceDescription, InstanceState, Tag, VolumeAttachment};

/// Map an EC2 instance state name to the lifecycle model.
///
/// `shutting-down` and `stopping` collapse into `Stopped`; states the
/// SDK adds later default to `Pending`.
pub(crate) fn instance_state(name: Option<&InstanceStateName>) -> InstanceState {
    match name {
        Some(InstanceStateName::Running) => InstanceState::Running,
        Some(InstanceStateName::Stopped)
        | Some(InstanceStateName::Stopping)
        | Some(InstanceStateName::ShuttingDown) => InstanceState::Stopped,
        Some(InstanceStateName::Terminated) => InstanceState::Terminated,
        _ => InstanceState::Pending,
    }
}

pub(crate) fn tags(sdk_tags: &[SdkTag]) -> Vec<Tag> {
    sdk_tags
        .iter()
        .filter_map(|t| match (t.key(), t.value()) {
            (Some(k), Some(v)) => Some(Tag::new(k, v)),
            _ => None,
        })
        .collect()
}

pub(crate) fn instance_description(instance: &Instance) -> Option<InstanceDescription> {
    let instance_id = instance.instance_id()?.to_string();

    let attachments = instance
        .block_device_mappings()
        .iter()
        .filter_map(|mapping| {
            let device_name = mapping.device_name()?.to_string();
            let ebs = mapping.ebs()?;
            let volume_id = ebs.volume_id()?.to_string();
            let attached = matches!(ebs.status(), Some(AttachmentStatus::Attached));
            Some(VolumeAttachment {
                volume_id,
                device_name,
                attached,
            })
        })
        .collect();

    Some(InstanceDescription {
        instance_id,
        state: instance_state(instance.state().and_then(|s| s.name())),
        public_ip: instance.public_ip_address().map(str::to_string),
        private_ip: instance.private_ip_address().map(str::to_string),
        tags: tags(instance.tags()),
        attachments,
    })
}

/// Classify an SDK error into the cloud error taxonomy.
///
/// Endpoint resolution failures and region opt-in rejections are
/// `RegionUnavailable`; everything else is a plain API error.
pub(crate) fn classify_error<E, R>(context: &str, err: SdkError<E, R>) -> CloudError
where
    E: ProvideErrorMetadata + std::fmt::Debug,
    R: std::fmt::Debug,
{
    if matches!(err, SdkError::DispatchFailure(_)) {
        return CloudError::RegionUnavailable(format!("{context}: endpoint unreachable"));
    }

    let code = err.code().map(str::to_string);
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{err:?}"));

    classify_code(context, code.as_deref(), &message)
}

fn classify_code(context: &str, code: Option<&str>, message: &str) -> CloudError {
    match code {
        Some("AuthFailure") | Some("OptInRequired") | Some("UnsupportedOperation") => {
            CloudError::RegionUnavailable(format!("{context}: {message}"))
        }
        // An id that does not exist in the queried region is a lookup
        // miss, not an API failure.
        Some("InvalidInstanceID.NotFound") | Some("InvalidInstanceID.Malformed") => {
            CloudError::InstanceNotFound(format!("{context}: {message}"))
        }
        Some(code) => CloudError::Api(format!("{context}: {code}: {message}")),
        None => CloudError::Api(format!("{context}: {message}")),
    }
}

/// True when the error means the key pair is already registered.
pub(crate) fn is_duplicate_key_pair<E, R>(err: &SdkError<E, R>) -> bool
where
    E: ProvideErrorMetadata,
{
    err.code() == Some("InvalidKeyPair.Duplicate")
}
