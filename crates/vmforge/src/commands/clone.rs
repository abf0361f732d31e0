use colored::Colorize;
use std::path::PathBuf;
use vmforge_compute::{ComputeApi, PollConfig};
use vmforge_provision::{CloneBatchOptions, run_batch, write_report};

#[allow(clippy::too_many_arguments)]
pub async fn handle(
    api: &dyn ComputeApi,
    snapshot: String,
    prefix: String,
    count: u32,
    machine_type: String,
    startup_script: Option<PathBuf>,
    tags: Vec<String>,
    report: PathBuf,
    poll: &PollConfig,
) -> anyhow::Result<()> {
    let startup_script = match startup_script {
        Some(path) => Some(std::fs::read_to_string(&path)?),
        None => None,
    };

    println!(
        "{}",
        format!("Cloning {} × {} from snapshot {}...", prefix, count, snapshot)
            .blue()
            .bold()
    );

    let options = CloneBatchOptions {
        snapshot,
        name_prefix: prefix,
        count,
        machine_type,
        startup_script,
        tags,
    };

    let timings = run_batch(api, &options, poll).await?;

    for timing in &timings {
        println!(
            "  ✓ {} created in {:.2} seconds",
            timing.name.cyan(),
            timing.seconds
        );
    }

    write_report(&report, &timings)?;
    println!();
    println!("Timing report written to {}", report.display().to_string().green());

    Ok(())
}
