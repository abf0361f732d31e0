//! Deploy flow: firewall, instance from image, external IP

use crate::error::{ProvisionError, Result};
use crate::firewall::{FirewallOutcome, ensure_firewall};
use vmforge_compute::{ComputeApi, PollConfig, wait_for_operation};
use vmforge_core::{FirewallRule, InstanceSpec};

/// Options for deploying a fresh instance from a public image.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    pub name: String,

    /// Short machine type name (`f1-micro`).
    pub machine_type: String,

    /// Full image path (`projects/.../global/images/family/...`).
    pub source_image: String,

    /// Startup script installed as instance metadata, if any.
    pub startup_script: Option<String>,

    /// Service port opened by the firewall rule and advertised in the
    /// printed URL.
    pub service_port: u16,
}

/// Result of a successful deploy.
#[derive(Debug)]
pub struct Deployed {
    pub name: String,
    pub external_ip: String,
    pub service_port: u16,
    pub firewall: FirewallOutcome,
}

impl Deployed {
    /// `http://<ip>:<port>` for the deployed service.
    pub fn service_url(&self) -> String {
        format!("http://{}:{}", self.external_ip, self.service_port)
    }
}

/// Ensure the service-port firewall rule, create the instance, wait for
/// its operation, and read back the external IP.
pub async fn deploy(
    api: &dyn ComputeApi,
    options: &DeployOptions,
    poll: &PollConfig,
) -> Result<Deployed> {
    let tag = format!("allow-{}", options.service_port);
    let rule = FirewallRule::ingress_tcp(tag.clone(), &[options.service_port], tag.clone());
    let firewall = ensure_firewall(api, &rule).await?;

    let mut spec = InstanceSpec::new(&options.name, api.zone(), &options.machine_type)
        .with_boot_image(&options.source_image)
        .with_tag(tag);
    if let Some(script) = &options.startup_script {
        spec = spec.with_metadata_item("startup-script", script);
    }

    let operation = api.insert_instance(&spec).await?;
    wait_for_operation(api, &operation, poll).await?;

    let instance = api.get_instance(&options.name).await?;
    let external_ip = instance
        .external_ip()
        .ok_or_else(|| ProvisionError::MissingExternalIp(options.name.clone()))?
        .to_string();

    tracing::info!(instance = %options.name, ip = %external_ip, "Instance deployed");

    Ok(Deployed {
        name: options.name.clone(),
        external_ip,
        service_port: options.service_port,
        firewall,
    })
}
