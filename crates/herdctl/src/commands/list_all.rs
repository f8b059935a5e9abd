use colored::Colorize;
use herdctl_cloud_aws::AwsSessionFactory;
use herdctl_fleet::{FleetConfig, Inventory};

pub async fn handle(config: &FleetConfig) -> anyhow::Result<()> {
    let factory = AwsSessionFactory::new();
    let inventory = Inventory::new(&factory, config);

    println!(
        "{:<16} {:<20} {}",
        "CUSTOMER".bold(),
        "INSTANCE".bold(),
        "PUBLIC IP".bold()
    );
    for row in inventory.list_all().await {
        println!(
            "{:<16} {:<20} {}",
            row.customer_id.as_deref().unwrap_or("-"),
            row.instance_id,
            row.public_ip.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
