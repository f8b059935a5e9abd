//! Cloud provider abstraction for herdctl
//!
//! This crate defines the contract the fleet core needs from a cloud
//! control plane: a region-scoped session split into a mutating
//! [`ControlHandle`] and a read-only [`QueryHandle`], plus the typed
//! request and response structs that cross that boundary.
//!
//! Providers (see `herdctl-cloud-aws`) implement the three traits;
//! everything above the session factory works against trait objects
//! and never sees a provider SDK type.

pub mod error;
pub mod session;
pub mod types;

pub use error::{CloudError, Result};
pub use session::{ControlHandle, ImportOutcome, QueryHandle, SessionFactory};
pub use types::{
    BlockDeviceRequest, InstanceDescription, InstanceState, LaunchRequest, Tag, TagFilter,
    VolumeAttachment,
};
