use colored::Colorize;
use std::path::PathBuf;
use vmforge_compute::{ComputeApi, PollConfig, wait_for_operation};
use vmforge_provision::{ChainPayloads, LaunchPlan, build_chained_spec};

pub async fn handle(
    api: &dyn ComputeApi,
    plan_path: PathBuf,
    credentials_path: PathBuf,
    agent_url: String,
    poll: &PollConfig,
) -> anyhow::Result<()> {
    let plan: LaunchPlan = serde_json::from_str(&std::fs::read_to_string(&plan_path)?)?;
    let credentials_json = std::fs::read_to_string(&credentials_path)?;

    let payloads = ChainPayloads {
        credentials_json,
        agent_url,
    };

    println!(
        "{}",
        format!(
            "Launching chain of {} instance(s), starting with {}...",
            plan.depth(),
            plan.name
        )
        .blue()
        .bold()
    );

    let spec = build_chained_spec(api.zone(), &plan, &payloads)?;
    let operation = api.insert_instance(&spec).await?;
    wait_for_operation(api, &operation, poll).await?;

    println!("  ✓ parent instance {} created", plan.name.cyan());
    if let Some(next) = &plan.next {
        // Past this point the chain is fire-and-forget: the agent on the
        // parent creates the next hop out-of-band, and failures there are
        // only visible in the parent's /srv/forge-agent.log.
        println!(
            "  • agent on {} will provision {} after boot",
            plan.name,
            next.name.cyan()
        );
    }

    Ok(())
}
