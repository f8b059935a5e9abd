//! Fleet inventory
//!
//! Best-effort enumeration across every configured region. A region
//! whose session or query fails is logged and skipped so one broken
//! region never hides the rest of the fleet.

use herdctl_cloud::{CloudError, InstanceDescription, SessionFactory, TagFilter};

use crate::config::FleetConfig;
use crate::error::{FleetError, Result};
use crate::model::Instance;
use crate::tags::TAG_CUSTOMER_ID;

/// One row of `list_all` output.
#[derive(Debug, Clone)]
pub struct FleetRow {
    pub customer_id: Option<String>,
    pub instance_id: String,
    pub public_ip: Option<String>,
}

pub struct Inventory<'a> {
    sessions: &'a dyn SessionFactory,
    config: &'a FleetConfig,
}

impl<'a> Inventory<'a> {
    pub fn new(sessions: &'a dyn SessionFactory, config: &'a FleetConfig) -> Self {
        Self { sessions, config }
    }

    /// Every instance id in every configured region.
    pub async fn list_instance_ids(&self) -> Vec<String> {
        self.enumerate(None)
            .await
            .into_iter()
            .map(|(_, desc)| desc.instance_id)
            .collect()
    }

    /// Instance ids owned by one customer.
    pub async fn list_for_customer(&self, customer_id: &str) -> Vec<String> {
        let filter = TagFilter::new(TAG_CUSTOMER_ID, customer_id);
        self.enumerate(Some(&filter))
            .await
            .into_iter()
            .map(|(_, desc)| desc.instance_id)
            .collect()
    }

    /// Fetch tags and addresses for one instance, searching every
    /// region.
    pub async fn describe(&self, instance_id: &str) -> Result<Instance> {
        for region in self.config.region_list() {
            let query = match self.sessions.open(region).await {
                Ok((_, query)) => query,
                Err(e) => {
                    tracing::warn!(region, error = %e, "skipping region");
                    continue;
                }
            };
            match query.describe_instance(instance_id).await {
                Ok(desc) => return Ok(Instance::from_description(region, &desc)),
                Err(CloudError::InstanceNotFound(_)) => continue,
                Err(e) => {
                    tracing::warn!(region, error = %e, "describe failed, skipping region");
                    continue;
                }
            }
        }
        Err(FleetError::Cloud(CloudError::InstanceNotFound(
            instance_id.to_string(),
        )))
    }

    /// Ownership and addressing for the whole fleet. An absent
    /// `CustomerID` tag yields an empty owner, not an error.
    pub async fn list_all(&self) -> Vec<FleetRow> {
        self.enumerate(None)
            .await
            .into_iter()
            .map(|(_, desc)| FleetRow {
                customer_id: desc.tag(TAG_CUSTOMER_ID).map(str::to_string),
                instance_id: desc.instance_id,
                public_ip: desc.public_ip,
            })
            .collect()
    }

    /// Walk every region, swallowing per-region failures.
    pub(crate) async fn enumerate(
        &self,
        filter: Option<&TagFilter>,
    ) -> Vec<(String, InstanceDescription)> {
        let mut found = Vec::new();
        for region in self.config.region_list() {
            let query = match self.sessions.open(region).await {
                Ok((_, query)) => query,
                Err(e) => {
                    tracing::warn!(region, error = %e, "skipping region");
                    continue;
                }
            };
            match query.describe_instances(filter).await {
                Ok(descriptions) => {
                    for desc in descriptions {
                        found.push((region.to_string(), desc));
                    }
                }
                Err(e) => {
                    tracing::warn!(region, error = %e, "query failed, skipping region");
                }
            }
        }
        found
    }
}
