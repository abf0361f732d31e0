use clap::{Parser, Subcommand};
use forge_agent::LaunchArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "forge-agent")]
#[command(about = "Boot-time agent that provisions the next hop of a chained launch", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the launch payloads from instance metadata and create the
    /// planned instance
    Launch {
        /// Directory for fetched payloads and the agent log
        #[arg(long, default_value = "/srv")]
        work_dir: PathBuf,

        /// Metadata service root override
        #[arg(long, env = "FORGE_AGENT_METADATA_BASE")]
        metadata_base: Option<String>,

        /// Seconds between operation polls
        #[arg(long, default_value_t = 5)]
        poll_interval: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Launch {
            work_dir,
            metadata_base,
            poll_interval,
        } => {
            init_logging(&work_dir);

            let args = LaunchArgs {
                work_dir,
                metadata_base,
                poll_interval,
            };

            if let Err(e) = forge_agent::launch(&args).await {
                tracing::error!(error = %e, "Chained launch failed");
                return Err(e);
            }

            Ok(())
        }
    }
}

/// Log to a file in the work dir when possible, stderr otherwise. The
/// boot environment has no terminal, so ANSI is off either way.
fn init_logging(work_dir: &std::path::Path) {
    use std::fs::OpenOptions;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(work_dir.join("launch.log"))
        .ok();

    if let Some(file) = log_file {
        tracing_subscriber::fmt()
            .with_writer(file)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_ansi(false).init();
    }
}
