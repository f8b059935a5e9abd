//! Fleet command dispatcher
//!
//! Resolves a target set via tag filter and runs one script on every
//! addressable target, collecting a per-host outcome. A host failure
//! becomes a failed result, never an aborted dispatch.

use std::path::Path;

use herdctl_cloud::{SessionFactory, TagFilter};
use herdctl_remote::ExecutionResult;

use crate::config::FleetConfig;
use crate::error::{FleetError, Result};
use crate::runner::CommandRunner;
use crate::tags::{TAG_CUSTOMER_ID, TAG_NODE_TYPE};

/// Which tag dimension selects the target set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Customer(String),
    Role(String),
}

impl Selector {
    /// Validate the caller's options: exactly one dimension must be
    /// given.
    pub fn from_options(
        customer_id: Option<String>,
        node_type: Option<String>,
    ) -> Result<Self> {
        match (customer_id, node_type) {
            (Some(customer), None) => Ok(Selector::Customer(customer)),
            (None, Some(role)) => Ok(Selector::Role(role)),
            (Some(_), Some(_)) => Err(FleetError::InvalidSelector(
                "both customer id and node type given".into(),
            )),
            (None, None) => Err(FleetError::InvalidSelector(
                "neither customer id nor node type given".into(),
            )),
        }
    }

    fn tag_filter(&self) -> TagFilter {
        match self {
            Selector::Customer(customer) => TagFilter::new(TAG_CUSTOMER_ID, customer),
            Selector::Role(role) => TagFilter::new(TAG_NODE_TYPE, role),
        }
    }
}

/// Aggregate outcome of one dispatch.
///
/// `skipped` lists instances that matched the selector but had no
/// public address and therefore could not be targets.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub results: Vec<ExecutionResult>,
    pub skipped: Vec<String>,
}

impl DispatchReport {
    pub fn failed_hosts(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.succeeded)
            .map(|r| r.target_host.as_str())
            .collect()
    }
}

pub struct Dispatcher<'a> {
    sessions: &'a dyn SessionFactory,
    runner: &'a dyn CommandRunner,
    config: &'a FleetConfig,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        sessions: &'a dyn SessionFactory,
        runner: &'a dyn CommandRunner,
        config: &'a FleetConfig,
    ) -> Self {
        Self {
            sessions,
            runner,
            config,
        }
    }

    /// Run the script at `script_path` on every instance matching the
    /// selector options, in target-iteration order.
    pub async fn dispatch(
        &self,
        script_path: &Path,
        customer_id: Option<String>,
        node_type: Option<String>,
    ) -> Result<DispatchReport> {
        // Selector validation happens before any file or network IO.
        let selector = Selector::from_options(customer_id, node_type)?;
        let script = std::fs::read_to_string(script_path)?;
        let filter = selector.tag_filter();

        let mut report = DispatchReport::default();
        for region in self.config.region_list() {
            let query = match self.sessions.open(region).await {
                Ok((_, query)) => query,
                Err(e) => {
                    tracing::warn!(region, error = %e, "skipping region");
                    continue;
                }
            };
            let targets = match query.describe_instances(Some(&filter)).await {
                Ok(targets) => targets,
                Err(e) => {
                    tracing::warn!(region, error = %e, "query failed, skipping region");
                    continue;
                }
            };

            for target in targets {
                let Some(host) = target.public_ip.clone() else {
                    tracing::warn!(
                        instance_id = %target.instance_id,
                        "no public address, skipping dispatch target"
                    );
                    report.skipped.push(target.instance_id);
                    continue;
                };
                let result = match self.runner.run(&host, &script).await {
                    Ok(result) => result,
                    Err(e) => ExecutionResult::failure(&host, e.to_string()),
                };
                report.results.push(result);
            }
        }
        Ok(report)
    }
}
