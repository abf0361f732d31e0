//! Guarded firewall creation
//!
//! Idempotent-by-lookup: an existing rule short-circuits creation. The
//! three lookup outcomes are value tags, so callers branch on data rather
//! than on error types.

use crate::error::Result;
use vmforge_compute::ComputeApi;
use vmforge_core::{FirewallRule, Operation};

/// What [`ensure_firewall`] did.
#[derive(Debug)]
pub enum FirewallOutcome {
    /// The rule was already present; no insert was issued.
    AlreadyExists,

    /// The rule was submitted. The operation handle is returned but not
    /// awaited; firewall propagation is not on any flow's critical path.
    Created(Operation),
}

pub async fn ensure_firewall(
    api: &dyn ComputeApi,
    rule: &FirewallRule,
) -> Result<FirewallOutcome> {
    match api.get_firewall(&rule.name).await? {
        Some(_) => {
            tracing::info!(firewall = %rule.name, "Firewall rule already exists");
            Ok(FirewallOutcome::AlreadyExists)
        }
        None => {
            tracing::info!(firewall = %rule.name, "Creating firewall rule");
            let operation = api.insert_firewall(rule).await?;
            Ok(FirewallOutcome::Created(operation))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingApi;

    #[tokio::test]
    async fn test_existing_rule_skips_insert() {
        let api = RecordingApi::new("us-west1-b");
        let rule = FirewallRule::ingress_tcp("allow-5000", &[5000], "allow-5000");
        api.seed_firewall(rule.clone());

        let outcome = ensure_firewall(&api, &rule).await.unwrap();

        assert!(matches!(outcome, FirewallOutcome::AlreadyExists));
        assert!(
            !api.events()
                .iter()
                .any(|e| e.starts_with("insert-firewall")),
            "insert must not be issued for an existing rule"
        );
    }

    #[tokio::test]
    async fn test_missing_rule_is_created() {
        let api = RecordingApi::new("us-west1-b");
        let rule = FirewallRule::ingress_tcp("allow-5000", &[5000], "allow-5000");

        let outcome = ensure_firewall(&api, &rule).await.unwrap();

        assert!(matches!(outcome, FirewallOutcome::Created(_)));
        assert_eq!(api.events(), vec!["insert-firewall allow-5000"]);
    }

    #[tokio::test]
    async fn test_lookup_error_propagates() {
        let api = RecordingApi::new("us-west1-b").failing_firewall_lookup();
        let rule = FirewallRule::ingress_tcp("allow-5000", &[5000], "allow-5000");

        let result = ensure_firewall(&api, &rule).await;

        assert!(result.is_err());
        assert!(api.events().is_empty());
    }
}
