mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use herdctl_fleet::FleetConfig;

#[derive(Parser)]
#[command(name = "herd")]
#[command(about = "Provision and operate per-customer EC2 fleets", version)]
struct Cli {
    /// Path to a JSON config file (default: HERD_CONFIG, then ./herd.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an instance for a customer
    Create {
        /// Owning customer
        #[arg(long)]
        customer_id: String,
        /// Role to provision (see `roles` config)
        #[arg(long, default_value = "Peer")]
        node_type: String,
        /// Target region
        #[arg(long, default_value = "us-east-1")]
        region: String,
        /// Public key imported as the customer credential
        #[arg(long, env = "PUB_KEY")]
        public_key: Option<PathBuf>,
        /// SSH identity file for disk preparation (default: public key
        /// path with its .pub suffix stripped)
        #[arg(long)]
        identity: Option<PathBuf>,
        /// Role definitions file (default: builtin Manager/Peer roles)
        #[arg(long)]
        roles: Option<PathBuf>,
    },
    /// List instance ids for a customer
    ListNodes {
        #[arg(long)]
        customer_id: String,
    },
    /// List customer id, instance id and address for the whole fleet
    ListAll,
    /// Execute a script on instances selected by customer or node type
    Execute {
        /// Script whose contents run on every target
        #[arg(long)]
        script: PathBuf,
        /// Select targets owned by this customer
        #[arg(long)]
        customer_id: Option<String>,
        /// Select targets provisioned as this role
        #[arg(long)]
        node_type: Option<String>,
        /// Remote user (default: config ssh_user)
        #[arg(short, long)]
        user: Option<String>,
        /// SSH identity file
        #[arg(long)]
        key: Option<PathBuf>,
        /// Password authentication instead of a key
        #[arg(long, conflicts_with = "key")]
        password: Option<String>,
        /// Skip host key verification entirely
        #[arg(long)]
        accept_any_host_key: bool,
    },
    /// Create a backup for a node (not implemented)
    Backup {
        #[arg(long)]
        node_id: String,
    },
    /// List backups for a node (not implemented)
    ListBackup {
        #[arg(long)]
        node_id: String,
    },
    /// Roll back a node to a backup (not implemented)
    Rollback {
        #[arg(long)]
        rollback_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = FleetConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Create {
            customer_id,
            node_type,
            region,
            public_key,
            identity,
            roles,
        } => {
            commands::create::handle(
                &config,
                &customer_id,
                &node_type,
                &region,
                public_key,
                identity,
                roles,
            )
            .await
        }
        Commands::ListNodes { customer_id } => {
            commands::list_nodes::handle(&config, &customer_id).await
        }
        Commands::ListAll => commands::list_all::handle(&config).await,
        Commands::Execute {
            script,
            customer_id,
            node_type,
            user,
            key,
            password,
            accept_any_host_key,
        } => {
            commands::execute::handle(
                &config,
                &script,
                customer_id,
                node_type,
                user,
                key,
                password,
                accept_any_host_key,
            )
            .await
        }
        Commands::Backup { node_id } => commands::backup::handle_backup(&node_id),
        Commands::ListBackup { node_id } => commands::backup::handle_list_backup(&node_id),
        Commands::Rollback { rollback_id } => commands::backup::handle_rollback(&rollback_id),
    }
}
