use herdctl_cloud_aws::AwsSessionFactory;
use herdctl_fleet::{FleetConfig, Inventory};

pub async fn handle(config: &FleetConfig, customer_id: &str) -> anyhow::Result<()> {
    let factory = AwsSessionFactory::new();
    let inventory = Inventory::new(&factory, config);

    for instance_id in inventory.list_for_customer(customer_id).await {
        println!("{instance_id}");
    }
    Ok(())
}
