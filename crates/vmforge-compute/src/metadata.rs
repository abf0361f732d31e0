//! Instance metadata-service client
//!
//! Inside a provisioned VM, a well-known local HTTP endpoint serves
//! string-valued metadata attributes and the default service-account
//! token. The chained-provisioning agent uses this to pick up the
//! payloads its parent embedded at creation time.

use crate::auth::TokenResponse;
use crate::error::{ComputeError, Result};

const DEFAULT_BASE: &str = "http://metadata.google.internal/computeMetadata/v1";

/// The header the metadata service requires on every request.
const FLAVOR_HEADER: (&str, &str) = ("Metadata-Flavor", "Google");

pub struct MetadataClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for MetadataClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE)
    }

    /// Point at a different metadata root (tests, emulators).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn attribute_url(&self, key: &str) -> String {
        format!("{}/instance/attributes/{}", self.base_url, key)
    }

    /// Fetch one instance attribute as a string.
    pub async fn attribute(&self, key: &str) -> Result<String> {
        self.text(&self.attribute_url(key), key).await
    }

    /// Fetch an attribute, mapping a missing key to `None`.
    pub async fn attribute_opt(&self, key: &str) -> Result<Option<String>> {
        let response = self
            .http
            .get(self.attribute_url(key))
            .header(FLAVOR_HEADER.0, FLAVOR_HEADER.1)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ComputeError::Metadata {
                key: key.to_string(),
                message: format!("metadata service returned {}", status.as_u16()),
            });
        }

        Ok(Some(response.text().await?))
    }

    /// The project this instance lives in.
    pub async fn project_id(&self) -> Result<String> {
        self.text(&format!("{}/project/project-id", self.base_url), "project-id")
            .await
    }

    /// The instance's zone, reduced to its short name. The service
    /// reports a full path (`projects/<num>/zones/<zone>`).
    pub async fn zone(&self) -> Result<String> {
        let full = self
            .text(&format!("{}/instance/zone", self.base_url), "zone")
            .await?;
        Ok(full.rsplit('/').next().unwrap_or(&full).to_string())
    }

    async fn text(&self, url: &str, key: &str) -> Result<String> {
        let response = self
            .http
            .get(url)
            .header(FLAVOR_HEADER.0, FLAVOR_HEADER.1)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ComputeError::Metadata {
                key: key.to_string(),
                message: format!("metadata service returned {}", status.as_u16()),
            });
        }

        Ok(response.text().await?)
    }

    /// Default service-account token from the metadata server.
    pub async fn access_token(&self) -> Result<TokenResponse> {
        let url = format!(
            "{}/instance/service-accounts/default/token",
            self.base_url
        );

        let response = self
            .http
            .get(url)
            .header(FLAVOR_HEADER.0, FLAVOR_HEADER.1)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ComputeError::AuthenticationFailed(format!(
                "metadata token endpoint returned {}",
                status.as_u16()
            )));
        }

        Ok(response.json::<TokenResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_url() {
        let client = MetadataClient::new();
        assert_eq!(
            client.attribute_url("launch-plan"),
            "http://metadata.google.internal/computeMetadata/v1/instance/attributes/launch-plan"
        );
    }

    #[test]
    fn test_base_url_override() {
        let client = MetadataClient::with_base_url("http://127.0.0.1:8099/computeMetadata/v1");
        assert_eq!(
            client.attribute_url("agent-url"),
            "http://127.0.0.1:8099/computeMetadata/v1/instance/attributes/agent-url"
        );
    }
}
