//! Provider session traits
//!
//! A session is region-scoped and split along the mutate/read axis:
//! [`ControlHandle`] issues resource-management calls, [`QueryHandle`]
//! issues resource-query calls. Callers decide retry policy; none is
//! applied at this layer.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{InstanceDescription, LaunchRequest, Tag, TagFilter};

/// Outcome of a credential import.
///
/// An already-registered credential is an ignorable outcome, distinct
/// from a transport or authorization failure which surfaces as
/// [`crate::CloudError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported,
    AlreadyExists,
}

/// Mutating control-plane calls.
#[async_trait]
pub trait ControlHandle: Send + Sync {
    /// Create exactly one instance and return its provider-assigned id.
    async fn launch_instance(&self, request: &LaunchRequest) -> Result<String>;

    /// Attach tags to a resource (instance or volume).
    async fn create_tags(&self, resource_id: &str, tags: &[Tag]) -> Result<()>;

    /// Register a named public-key credential.
    async fn import_credential(&self, name: &str, public_key_material: &str)
    -> Result<ImportOutcome>;
}

/// Read-only control-plane calls.
#[async_trait]
pub trait QueryHandle: Send + Sync {
    /// Enumerate instances in this region, optionally narrowed by a
    /// tag filter.
    async fn describe_instances(
        &self,
        filter: Option<&TagFilter>,
    ) -> Result<Vec<InstanceDescription>>;

    /// Fetch the current description of one instance.
    async fn describe_instance(&self, instance_id: &str) -> Result<InstanceDescription>;
}

/// Produces region-scoped session handles.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Open a session for `region`.
    ///
    /// Fails with [`crate::CloudError::RegionUnavailable`] if the
    /// provider rejects the region.
    async fn open(&self, region: &str) -> Result<(Box<dyn ControlHandle>, Box<dyn QueryHandle>)>;
}
