//! Built-in startup scripts
//!
//! The bootstrap script is installed as the parent instance's
//! `startup-script` metadata when a chained launch is requested. It pulls
//! the agent binary from the URL the driver recorded in metadata and
//! hands control to `forge-agent launch`, which fetches the remaining
//! payloads itself over the metadata service.

/// Bootstrap script for a chained parent instance.
pub const CHAIN_BOOTSTRAP: &str = r#"#!/bin/bash
set -e

mkdir -p /srv
cd /srv

curl -fsSL -H "Metadata-Flavor: Google" \
  "http://metadata.google.internal/computeMetadata/v1/instance/attributes/agent-url" \
  -o agent-url

curl -fsSL "$(cat agent-url)" -o forge-agent
chmod +x forge-agent

./forge-agent launch --work-dir /srv >> /srv/forge-agent.log 2>&1
"#;
