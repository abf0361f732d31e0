use colored::Colorize;
use std::path::PathBuf;
use vmforge_compute::{ComputeApi, PollConfig};
use vmforge_provision::{DeployOptions, FirewallOutcome, deploy};

pub async fn handle(
    api: &dyn ComputeApi,
    name: String,
    machine_type: String,
    image: String,
    startup_script: Option<PathBuf>,
    port: u16,
    poll: &PollConfig,
) -> anyhow::Result<()> {
    let startup_script = match startup_script {
        Some(path) => Some(std::fs::read_to_string(&path)?),
        None => None,
    };

    println!(
        "{}",
        format!("Deploying {} in {}...", name, api.zone()).blue().bold()
    );

    let options = DeployOptions {
        name,
        machine_type,
        source_image: image,
        startup_script,
        service_port: port,
    };

    let deployed = deploy(api, &options, poll).await?;

    match deployed.firewall {
        FirewallOutcome::AlreadyExists => {
            println!("  • firewall allow-{} already exists", deployed.service_port);
        }
        FirewallOutcome::Created(_) => {
            println!("  ✓ firewall allow-{} created", deployed.service_port);
        }
    }
    println!("  ✓ instance {} created", deployed.name.cyan());
    println!();
    println!(
        "Your service is running at {}",
        deployed.service_url().green().bold()
    );

    Ok(())
}
