//! REST client for the compute control plane

use crate::api::ComputeApi;
use crate::auth::Authenticator;
use crate::error::{ComputeError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use vmforge_core::{FirewallRule, Instance, InstanceSpec, Operation, SnapshotSpec};

const API_BASE: &str = "https://compute.googleapis.com/compute/v1";

/// Project/zone scope for a client. Constructed once at process start and
/// handed to [`ComputeClient::new`]; nothing here is global state.
#[derive(Debug, Clone)]
pub struct ComputeConfig {
    pub project: String,
    pub zone: String,
}

/// The real control-plane client.
///
/// All calls are synchronous request/response from the caller's point of
/// view; mutations return an [`Operation`] handle that must be polled via
/// [`crate::wait_for_operation`] before the resource is usable.
pub struct ComputeClient {
    http: reqwest::Client,
    auth: Authenticator,
    config: ComputeConfig,
    base_url: String,
}

impl ComputeClient {
    pub fn new(config: ComputeConfig, auth: Authenticator) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth,
            config,
            base_url: API_BASE.to_string(),
        }
    }

    /// Point the client at a different API root. Intended for tests and
    /// API-compatible emulators.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn project(&self) -> &str {
        &self.config.project
    }

    fn zonal_url(&self, tail: &str) -> String {
        format!(
            "{}/projects/{}/zones/{}/{}",
            self.base_url, self.config.project, self.config.zone, tail
        )
    }

    fn global_url(&self, tail: &str) -> String {
        format!("{}/projects/{}/{}", self.base_url, self.config.project, tail)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let token = self.auth.access_token().await?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &impl serde::Serialize,
    ) -> Result<T> {
        let token = self.auth.access_token().await?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Self::api_error(status.as_u16(), &body))
        }
    }

    /// Map a non-success response to a typed error, preferring the
    /// control plane's `{"error": {"code", "message"}}` envelope when the
    /// body carries one.
    fn api_error(status: u16, body: &str) -> ComputeError {
        let message = serde_json::from_str::<ApiErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.trim().to_string());

        ComputeError::Api { status, message }
    }
}

#[async_trait]
impl ComputeApi for ComputeClient {
    fn zone(&self) -> &str {
        &self.config.zone
    }

    async fn insert_instance(&self, spec: &InstanceSpec) -> Result<Operation> {
        spec.validate()?;

        tracing::info!(instance = %spec.name, zone = %self.config.zone, "Submitting instance");
        self.post_json(&self.zonal_url("instances"), spec).await
    }

    async fn get_instance(&self, name: &str) -> Result<Instance> {
        self.get_json(&self.zonal_url(&format!("instances/{}", name)))
            .await
    }

    async fn list_instances(&self) -> Result<Vec<Instance>> {
        let list: InstanceList = self.get_json(&self.zonal_url("instances")).await?;
        Ok(list.items)
    }

    async fn get_firewall(&self, name: &str) -> Result<Option<FirewallRule>> {
        let url = self.global_url(&format!("global/firewalls/{}", name));
        let token = self.auth.access_token().await?;
        let response = self.http.get(&url).bearer_auth(token).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::api_error(status.as_u16(), &body));
        }

        Ok(Some(response.json::<FirewallRule>().await?))
    }

    async fn insert_firewall(&self, rule: &FirewallRule) -> Result<Operation> {
        vmforge_core::paths::validate_name(&rule.name)?;

        tracing::info!(firewall = %rule.name, "Submitting firewall rule");
        self.post_json(&self.global_url("global/firewalls"), rule)
            .await
    }

    async fn create_snapshot(&self, disk: &str, spec: &SnapshotSpec) -> Result<Operation> {
        vmforge_core::paths::validate_name(&spec.name)?;

        tracing::info!(disk = %disk, snapshot = %spec.name, "Submitting snapshot");
        self.post_json(
            &self.zonal_url(&format!("disks/{}/createSnapshot", disk)),
            spec,
        )
        .await
    }

    async fn get_zone_operation(&self, name: &str) -> Result<Operation> {
        self.get_json(&self.zonal_url(&format!("operations/{}", name)))
            .await
    }
}

/// Zonal instance listing. The control plane omits `items` entirely for an
/// empty zone; that decodes to an empty vec, not an error.
#[derive(Debug, Deserialize)]
struct InstanceList {
    #[serde(default)]
    items: Vec<Instance>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenSource;

    fn client() -> ComputeClient {
        ComputeClient::new(
            ComputeConfig {
                project: "my-project".to_string(),
                zone: "us-west1-b".to_string(),
            },
            Authenticator::new(TokenSource::Static("tok".to_string())),
        )
    }

    #[test]
    fn test_zonal_and_global_urls() {
        let client = client();
        assert_eq!(
            client.zonal_url("instances"),
            "https://compute.googleapis.com/compute/v1/projects/my-project/zones/us-west1-b/instances"
        );
        assert_eq!(
            client.global_url("global/firewalls/allow-5000"),
            "https://compute.googleapis.com/compute/v1/projects/my-project/global/firewalls/allow-5000"
        );
    }

    #[test]
    fn test_api_error_prefers_envelope_message() {
        let body = r#"{"error": {"code": 403, "message": "Quota exceeded"}}"#;
        match ComputeClient::api_error(403, body) {
            ComputeError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Quota exceeded");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        match ComputeClient::api_error(502, "bad gateway\n") {
            ComputeError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "bad gateway");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_listing_decodes_to_empty_vec() {
        let list: InstanceList = serde_json::from_str(r#"{"kind": "compute#instanceList"}"#).unwrap();
        assert!(list.items.is_empty());
    }

    #[test]
    fn test_listing_decodes_items() {
        let list: InstanceList = serde_json::from_str(
            r#"{"items": [{"name": "web-1", "status": "RUNNING"}, {"name": "web-2"}]}"#,
        )
        .unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].name, "web-1");
    }
}
