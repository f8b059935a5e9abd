//! Fleet provisioning, inventory and command dispatch
//!
//! The core of herdctl: given a declarative role profile and a
//! customer id, provision a tagged instance with the role's disk
//! layout ([`provision::Provisioner`]); enumerate the fleet and its
//! ownership across regions ([`inventory::Inventory`]); and fan a
//! script out to a tag-selected subset of the fleet
//! ([`dispatch::Dispatcher`]).
//!
//! All provider access goes through the `herdctl-cloud` session
//! traits and all remote execution through the [`runner::CommandRunner`]
//! seam, so the whole pipeline is testable against in-memory fakes.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod inventory;
pub mod model;
pub mod provision;
pub mod roles;
pub mod runner;
pub mod script;
pub mod tags;

pub use config::{FleetConfig, PollConfig};
pub use dispatch::{DispatchReport, Dispatcher, Selector};
pub use error::{FleetError, Result};
pub use inventory::{FleetRow, Inventory};
pub use model::{Instance, Volume};
pub use provision::{DiskPrepOutcome, ProvisionOutcome, Provisioner};
pub use roles::{DiskSpec, RoleProfile, RoleRegistry};
pub use runner::CommandRunner;
pub use script::DiskPrepScript;
