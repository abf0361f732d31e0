use colored::Colorize;
use vmforge_compute::{ComputeApi, PollConfig};
use vmforge_provision::snapshot_boot_disk;

pub async fn handle(
    api: &dyn ComputeApi,
    name: String,
    snapshot_name: Option<String>,
    poll: &PollConfig,
) -> anyhow::Result<()> {
    println!("{}", "Your running instances are:".bold());
    for instance in api.list_instances().await? {
        println!("  • {}", instance.name);
    }
    println!();

    println!(
        "{}",
        format!("Creating snapshot for instance {}...", name).blue().bold()
    );

    let outcome = snapshot_boot_disk(api, &name, snapshot_name, poll).await?;

    println!("  ✓ snapshot {} created", outcome.snapshot_name.cyan());

    Ok(())
}
