use colored::Colorize;
use vmforge_compute::ComputeApi;

pub async fn handle(api: &dyn ComputeApi) -> anyhow::Result<()> {
    let instances = api.list_instances().await?;

    if instances.is_empty() {
        println!("No instances in zone {}.", api.zone());
        return Ok(());
    }

    println!("{}", format!("Instances in {}:", api.zone()).bold());
    for instance in instances {
        let status = instance.status.as_deref().unwrap_or("UNKNOWN").to_string();
        let ip = instance
            .external_ip()
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  • {} ({}) {}", instance.name.cyan(), status, ip);
    }

    Ok(())
}
