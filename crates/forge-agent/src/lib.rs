//! Boot-time chained provisioner
//!
//! Runs inside a parent instance, started by the bootstrap startup
//! script. Repeats the driver's three-step contract out-of-band: fetch
//! the launch payloads from the instance metadata service, authenticate,
//! create the next hop and wait for its operation.
//!
//! The parent driver that created this instance is long gone by the time
//! this runs; coordination happens only through the control-plane
//! resource graph and instance metadata. Failures here are logged and
//! re-raised: they end the boot-time process, and nothing reports them
//! back to the original driver.

use anyhow::Context;
use std::path::PathBuf;
use vmforge_compute::{
    Authenticator, ComputeApi, ComputeClient, ComputeConfig, MetadataClient, PollConfig,
    TokenSource, wait_for_operation,
};
use vmforge_provision::chain::{AGENT_URL_KEY, CREDENTIALS_KEY, LAUNCH_PLAN_KEY};
use vmforge_provision::{ChainPayloads, LaunchPlan, build_chained_spec};

/// Settings for one launch run.
#[derive(Debug, Clone)]
pub struct LaunchArgs {
    /// Where fetched payloads are persisted (the bootstrap script uses
    /// `/srv`).
    pub work_dir: PathBuf,

    /// Metadata service root override (tests, emulators).
    pub metadata_base: Option<String>,

    /// Seconds between operation polls.
    pub poll_interval: u64,
}

/// Fetch payloads, authenticate, create the planned instance, wait.
pub async fn launch(args: &LaunchArgs) -> anyhow::Result<()> {
    let metadata = match &args.metadata_base {
        Some(base) => MetadataClient::with_base_url(base),
        None => MetadataClient::new(),
    };

    let plan_json = metadata
        .attribute(LAUNCH_PLAN_KEY)
        .await
        .context("fetching launch plan from metadata")?;
    let plan: LaunchPlan =
        serde_json::from_str(&plan_json).context("decoding launch plan")?;

    tracing::info!(instance = %plan.name, hops = plan.depth(), "Launch plan fetched");

    let credentials = metadata
        .attribute_opt(CREDENTIALS_KEY)
        .await
        .context("fetching credential payload from metadata")?;
    let agent_url = metadata
        .attribute_opt(AGENT_URL_KEY)
        .await
        .context("fetching agent URL from metadata")?;

    // A plan that chains further needs both payloads to hand down.
    if plan.next.is_some() && (credentials.is_none() || agent_url.is_none()) {
        anyhow::bail!("plan has a next hop but the chain payloads are incomplete");
    }

    let source = match &credentials {
        Some(json) => {
            let path = args.work_dir.join("service-credentials.json");
            std::fs::write(&path, json).context("persisting credential payload")?;
            tracing::info!(path = %path.display(), "Authenticating with service credentials");
            TokenSource::ServiceAccountFile(path)
        }
        None => {
            tracing::info!("Authenticating via the metadata server");
            TokenSource::MetadataServer
        }
    };

    let project = metadata
        .project_id()
        .await
        .context("resolving project from metadata")?;
    let zone = metadata.zone().await.context("resolving zone from metadata")?;

    let client = ComputeClient::new(
        ComputeConfig { project, zone },
        Authenticator::new(source),
    );

    let payloads = ChainPayloads {
        credentials_json: credentials.unwrap_or_default(),
        agent_url: agent_url.unwrap_or_default(),
    };

    let spec = build_chained_spec(client.zone(), &plan, &payloads)?;

    tracing::info!(instance = %plan.name, "Creating next-hop instance");
    let operation = client
        .insert_instance(&spec)
        .await
        .context("creating next-hop instance")?;

    // Agent-side waiting tolerates failed poll iterations.
    let poll = PollConfig::with_interval_secs(args.poll_interval).tolerant();
    wait_for_operation(&client, &operation, &poll)
        .await
        .context("waiting for next-hop operation")?;

    tracing::info!(instance = %plan.name, "Next-hop instance created");

    Ok(())
}
