//! Chained provisioning
//!
//! One instance provisions the next. The driver embeds everything the
//! next hop needs (a serialized [`LaunchPlan`], a credential payload,
//! and the URL of the agent binary) as string metadata on the parent
//! instance. At boot, the parent's bootstrap script downloads the agent,
//! and the agent repeats the same contract out-of-band: fetch metadata,
//! authenticate, create the child, wait.
//!
//! The driver has no visibility into the agent's outcome; the chain is
//! fire-and-forget past the parent's own create operation. Plans nest, so
//! the pattern generalizes to N-deep chains.

use crate::error::Result;
use crate::scripts::CHAIN_BOOTSTRAP;
use serde::{Deserialize, Serialize};
use vmforge_core::InstanceSpec;

/// Metadata key holding the serialized next-hop plan.
pub const LAUNCH_PLAN_KEY: &str = "launch-plan";

/// Metadata key holding the credential payload handed down the chain.
pub const CREDENTIALS_KEY: &str = "service-credentials";

/// Metadata key holding the agent binary's download URL.
pub const AGENT_URL_KEY: &str = "agent-url";

/// Metadata key the platform executes at boot.
pub const STARTUP_SCRIPT_KEY: &str = "startup-script";

/// One hop of a chained launch.
///
/// `startup_script` is what this hop's instance runs at boot *when it is
/// the last hop*. A hop with a `next` plan runs the bootstrap script
/// instead and carries its payloads forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchPlan {
    pub name: String,

    /// Short machine type name (`f1-micro`).
    pub machine_type: String,

    /// Full image path for the hop's boot disk.
    pub source_image: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub startup_script: Option<String>,

    /// The hop this instance should itself provision, if any.
    #[serde(default)]
    pub next: Option<Box<LaunchPlan>>,
}

impl LaunchPlan {
    /// Number of instances this plan will create, this hop included.
    pub fn depth(&self) -> usize {
        1 + self.next.as_deref().map_or(0, LaunchPlan::depth)
    }
}

/// Payloads handed from hop to hop unchanged.
#[derive(Debug, Clone)]
pub struct ChainPayloads {
    /// Service-account key JSON the downstream agent authenticates with.
    pub credentials_json: String,

    /// Where the bootstrap script downloads the agent binary from.
    pub agent_url: String,
}

/// Build the instance spec for the hop `plan` describes.
///
/// A terminal hop gets its own startup script (if any) and nothing else.
/// A hop with a `next` plan gets the bootstrap script plus the three
/// chain payloads as metadata, so its agent can create the next hop.
pub fn build_chained_spec(
    zone: &str,
    plan: &LaunchPlan,
    payloads: &ChainPayloads,
) -> Result<InstanceSpec> {
    let mut spec = InstanceSpec::new(&plan.name, zone, &plan.machine_type)
        .with_boot_image(&plan.source_image);
    for tag in &plan.tags {
        spec = spec.with_tag(tag.clone());
    }

    match &plan.next {
        Some(next) => {
            spec = spec
                .with_metadata_item(STARTUP_SCRIPT_KEY, CHAIN_BOOTSTRAP)
                .with_metadata_item(LAUNCH_PLAN_KEY, serde_json::to_string(next)?)
                .with_metadata_item(CREDENTIALS_KEY, payloads.credentials_json.as_str())
                .with_metadata_item(AGENT_URL_KEY, payloads.agent_url.as_str());
        }
        None => {
            if let Some(script) = &plan.startup_script {
                spec = spec.with_metadata_item(STARTUP_SCRIPT_KEY, script);
            }
        }
    }

    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_hop_plan() -> LaunchPlan {
        LaunchPlan {
            name: "vm1-instance".to_string(),
            machine_type: "f1-micro".to_string(),
            source_image: "projects/debian-cloud/global/images/family/debian-11".to_string(),
            tags: vec!["allow-5000".to_string()],
            startup_script: None,
            next: Some(Box::new(LaunchPlan {
                name: "vm2-instance".to_string(),
                machine_type: "f1-micro".to_string(),
                source_image: "projects/debian-cloud/global/images/family/debian-11".to_string(),
                tags: vec!["allow-5000".to_string()],
                startup_script: Some("#!/bin/bash\necho child\n".to_string()),
                next: None,
            })),
        }
    }

    fn payloads() -> ChainPayloads {
        ChainPayloads {
            credentials_json: r#"{"client_email": "robot@example.com"}"#.to_string(),
            agent_url: "https://releases.example.com/forge-agent".to_string(),
        }
    }

    #[test]
    fn test_parent_spec_carries_chain_payloads() {
        let plan = two_hop_plan();
        let spec = build_chained_spec("us-west1-b", &plan, &payloads()).unwrap();

        assert_eq!(spec.name, "vm1-instance");
        assert_eq!(spec.metadata.get(STARTUP_SCRIPT_KEY), Some(CHAIN_BOOTSTRAP));
        assert_eq!(
            spec.metadata.get(AGENT_URL_KEY),
            Some("https://releases.example.com/forge-agent")
        );
        assert_eq!(
            spec.metadata.get(CREDENTIALS_KEY),
            Some(r#"{"client_email": "robot@example.com"}"#)
        );

        // The embedded plan is the *next* hop, not the whole chain.
        let embedded: LaunchPlan =
            serde_json::from_str(spec.metadata.get(LAUNCH_PLAN_KEY).unwrap()).unwrap();
        assert_eq!(embedded.name, "vm2-instance");
        assert!(embedded.next.is_none());
    }

    #[test]
    fn test_terminal_hop_gets_plain_startup_script() {
        let plan = two_hop_plan();
        let child = plan.next.as_deref().unwrap();
        let spec = build_chained_spec("us-west1-b", child, &payloads()).unwrap();

        assert_eq!(
            spec.metadata.get(STARTUP_SCRIPT_KEY),
            Some("#!/bin/bash\necho child\n")
        );
        assert!(spec.metadata.get(LAUNCH_PLAN_KEY).is_none());
        assert!(spec.metadata.get(CREDENTIALS_KEY).is_none());
        assert!(spec.metadata.get(AGENT_URL_KEY).is_none());
    }

    #[test]
    fn test_plans_nest_to_arbitrary_depth() {
        let mut plan = two_hop_plan();
        plan.next.as_mut().unwrap().next = Some(Box::new(LaunchPlan {
            name: "vm3-instance".to_string(),
            machine_type: "f1-micro".to_string(),
            source_image: "projects/debian-cloud/global/images/family/debian-11".to_string(),
            tags: Vec::new(),
            startup_script: None,
            next: None,
        }));

        assert_eq!(plan.depth(), 3);

        let json = serde_json::to_string(&plan).unwrap();
        let roundtrip: LaunchPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.depth(), 3);
        assert_eq!(
            roundtrip.next.unwrap().next.unwrap().name,
            "vm3-instance"
        );
    }
}
