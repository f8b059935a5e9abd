use std::path::{Path, PathBuf};

use colored::Colorize;
use herdctl_cloud_aws::AwsSessionFactory;
use herdctl_fleet::{Dispatcher, FleetConfig};
use herdctl_remote::{Credential, HostKeyPolicy, RemoteChannel};

#[allow(clippy::too_many_arguments)]
pub async fn handle(
    config: &FleetConfig,
    script: &Path,
    customer_id: Option<String>,
    node_type: Option<String>,
    user: Option<String>,
    key: Option<PathBuf>,
    password: Option<String>,
    accept_any_host_key: bool,
) -> anyhow::Result<()> {
    let credential = match (key, password) {
        (_, Some(password)) => Credential::Password(password),
        (Some(path), None) => Credential::PrivateKey {
            path,
            passphrase: None,
        },
        (None, None) => Credential::PrivateKey {
            path: super::default_identity_path(),
            passphrase: None,
        },
    };
    let policy = if accept_any_host_key {
        HostKeyPolicy::AcceptAny
    } else {
        HostKeyPolicy::TrustOnFirstUse
    };
    let channel = RemoteChannel::new(user.as_deref().unwrap_or(&config.ssh_user), credential)
        .with_host_key_policy(policy);

    let factory = AwsSessionFactory::new();
    let dispatcher = Dispatcher::new(&factory, &channel, config);
    let report = dispatcher.dispatch(script, customer_id, node_type).await?;

    for result in &report.results {
        let marker = if result.succeeded {
            "ok".green()
        } else {
            "failed".red()
        };
        println!("{} [{marker}]", result.target_host.bold());
        for line in &result.standard_output {
            println!("  {line}");
        }
        for line in &result.standard_error {
            eprintln!("  {}", line.red());
        }
    }
    for instance_id in &report.skipped {
        println!(
            "{}",
            format!("skipped {instance_id}: no public address").yellow()
        );
    }

    let failed = report.failed_hosts();
    println!(
        "{} succeeded, {} failed, {} skipped",
        report.results.len() - failed.len(),
        failed.len(),
        report.skipped.len()
    );
    if !failed.is_empty() {
        anyhow::bail!("{} host(s) failed", failed.len());
    }
    Ok(())
}
