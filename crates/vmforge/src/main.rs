mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use vmforge_compute::{Authenticator, ComputeClient, ComputeConfig, PollConfig, TokenSource};

#[derive(Parser)]
#[command(name = "vmforge")]
#[command(about = "Provision, snapshot, clone and chain VM instances", long_about = None)]
struct Cli {
    /// Project to operate in
    #[arg(long, env = "VMFORGE_PROJECT", global = true)]
    project: Option<String>,

    /// Zone to operate in
    #[arg(long, env = "VMFORGE_ZONE", default_value = "us-west1-b", global = true)]
    zone: String,

    /// Service-account key file. Falls back to
    /// <config-dir>/vmforge/credentials.json, then to the
    /// VMFORGE_ACCESS_TOKEN environment variable.
    #[arg(long, env = "VMFORGE_CREDENTIALS", global = true)]
    credentials: Option<PathBuf>,

    /// Seconds between operation polls
    #[arg(long, env = "VMFORGE_POLL_INTERVAL", default_value_t = 5, global = true)]
    poll_interval: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an instance from a public image, opening its service port
    Deploy {
        /// Instance name
        name: String,
        /// Machine type (short name)
        #[arg(long, default_value = "f1-micro")]
        machine_type: String,
        /// Boot image path
        #[arg(
            long,
            default_value = "projects/ubuntu-os-cloud/global/images/family/ubuntu-2204-lts"
        )]
        image: String,
        /// File whose contents become the startup-script metadata
        #[arg(long)]
        startup_script: Option<PathBuf>,
        /// Service port to open and advertise
        #[arg(long, default_value_t = 5000)]
        port: u16,
    },
    /// Snapshot an instance's boot disk
    Snapshot {
        /// Source instance name (its boot disk shares the name)
        name: String,
        /// Snapshot name (defaults to base-snapshot-<instance>)
        #[arg(long)]
        snapshot_name: Option<String>,
    },
    /// Create K instances from a snapshot, sequentially, with timings
    Clone {
        /// Source snapshot name
        snapshot: String,
        /// Clones are named <prefix>-1 .. <prefix>-<count>
        #[arg(long, default_value = "clone")]
        prefix: String,
        /// Number of clones
        #[arg(long, default_value_t = 3)]
        count: u32,
        /// Machine type (short name)
        #[arg(long, default_value = "f1-micro")]
        machine_type: String,
        /// File whose contents become the startup-script metadata
        #[arg(long)]
        startup_script: Option<PathBuf>,
        /// Network tag (repeatable)
        #[arg(long)]
        tag: Vec<String>,
        /// Timing report path
        #[arg(long, default_value = "TIMING.md")]
        report: PathBuf,
    },
    /// Create a parent instance that provisions the rest of a launch plan
    Chain {
        /// Launch plan JSON file (the parent hop, with nested `next` hops)
        #[arg(long)]
        plan: PathBuf,
        /// URL the parent's bootstrap script downloads forge-agent from
        #[arg(long)]
        agent_url: String,
    },
    /// List the zone's instances
    List,
    /// Print version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    if matches!(cli.command, Commands::Version) {
        println!("vmforge {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let client = build_client(&cli)?;
    let poll = PollConfig::with_interval_secs(cli.poll_interval);
    let credentials_path = resolve_credentials_path(&cli);

    match cli.command {
        Commands::Deploy {
            name,
            machine_type,
            image,
            startup_script,
            port,
        } => {
            commands::deploy::handle(&client, name, machine_type, image, startup_script, port, &poll)
                .await
        }
        Commands::Snapshot { name, snapshot_name } => {
            commands::snapshot::handle(&client, name, snapshot_name, &poll).await
        }
        Commands::Clone {
            snapshot,
            prefix,
            count,
            machine_type,
            startup_script,
            tag,
            report,
        } => {
            commands::clone::handle(
                &client,
                snapshot,
                prefix,
                count,
                machine_type,
                startup_script,
                tag,
                report,
                &poll,
            )
            .await
        }
        Commands::Chain { plan, agent_url } => {
            let credentials = credentials_path.ok_or_else(|| {
                anyhow::anyhow!(
                    "chained launches need a service-account key file to hand \
                     down (--credentials or VMFORGE_CREDENTIALS)"
                )
            })?;
            commands::chain::handle(&client, plan, credentials, agent_url, &poll).await
        }
        Commands::List => commands::list::handle(&client).await,
        Commands::Version => unreachable!(),
    }
}

/// One client per process, built from explicit flags and env.
fn build_client(cli: &Cli) -> anyhow::Result<ComputeClient> {
    let Some(project) = cli.project.clone() else {
        println!(
            "{}",
            "Project is not set. Pass --project or set VMFORGE_PROJECT.".yellow()
        );
        anyhow::bail!("project is required");
    };

    let source = match resolve_credentials_path(cli) {
        Some(path) => {
            tracing::debug!("Using service-account credentials from {}", path.display());
            TokenSource::ServiceAccountFile(path)
        }
        None => {
            tracing::debug!("No key file found, using the token environment variable");
            TokenSource::Environment
        }
    };

    let config = ComputeConfig {
        project,
        zone: cli.zone.clone(),
    };

    Ok(ComputeClient::new(config, Authenticator::new(source)))
}

/// Explicit flag first, then the conventional per-user config location.
fn resolve_credentials_path(cli: &Cli) -> Option<PathBuf> {
    if let Some(path) = &cli.credentials {
        return Some(path.clone());
    }

    let default = dirs::config_dir()?.join("vmforge").join("credentials.json");
    default.exists().then_some(default)
}
