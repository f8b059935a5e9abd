use std::path::PathBuf;

use colored::Colorize;
use herdctl_cloud_aws::AwsSessionFactory;
use herdctl_fleet::{FleetConfig, Provisioner, RoleRegistry};
use herdctl_remote::{Credential, RemoteChannel};

pub async fn handle(
    config: &FleetConfig,
    customer_id: &str,
    node_type: &str,
    region: &str,
    public_key: Option<PathBuf>,
    identity: Option<PathBuf>,
    roles: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = config.clone();
    if public_key.is_some() {
        config.public_key_path = public_key;
    }

    let registry = match roles {
        Some(path) => RoleRegistry::from_json_file(&path)?,
        None => RoleRegistry::builtin(),
    };

    let identity = identity
        .or_else(|| default_identity(&config))
        .unwrap_or_else(super::default_identity_path);
    let channel = RemoteChannel::new(
        &config.ssh_user,
        Credential::PrivateKey {
            path: identity,
            passphrase: None,
        },
    );

    let factory = AwsSessionFactory::new();
    let provisioner = Provisioner::new(&registry, &factory, &channel, &config);

    println!(
        "{}",
        format!("Creating {node_type} instance for {customer_id} in {region}...").cyan()
    );
    let outcome = provisioner.provision(node_type, customer_id, region).await?;
    for prep in outcome.disk_prep.iter().filter(|p| !p.result.succeeded) {
        eprintln!(
            "{}",
            format!(
                "disk preparation on {} reported errors: {}",
                prep.device,
                prep.result.standard_error.join("; ")
            )
            .yellow()
        );
    }
    println!("{}", outcome.instance_id);
    Ok(())
}

/// The identity file conventionally sits next to the public key.
fn default_identity(config: &FleetConfig) -> Option<PathBuf> {
    let public = config.public_key_path.clone().or_else(|| {
        std::env::var(herdctl_fleet::config::PUB_KEY_ENV)
            .ok()
            .map(PathBuf::from)
    })?;
    let name = public.to_str()?;
    name.strip_suffix(".pub").map(PathBuf::from)
}
