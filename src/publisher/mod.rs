//! Post publishing collaborator
//!
//! The publish API is a black box behind [`PostPublisher`]: submit content
//! with a bearer credential, get back the publish timestamp or an error.
//! The concrete implementation targets LinkedIn's UGC posts API with
//! two-step identity resolution (OIDC `/userinfo`, `/me` fallback for
//! legacy scope setups).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// API version header value sent on versioned LinkedIn calls
const LINKEDIN_VERSION: &str = "202401";

/// Publish collaborator used by the lifecycle manager and the watcher
#[async_trait]
pub trait PostPublisher: Send + Sync {
    /// Submit plain-text content; returns the publish timestamp
    async fn publish(&self, content: &str, credential: &str) -> Result<DateTime<Utc>>;
}

/// Configuration for the LinkedIn publisher
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// API base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.linkedin.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl PublisherConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("LINKEDIN_API_BASE")
                .unwrap_or_else(|_| "https://api.linkedin.com".to_string()),
            timeout_secs: std::env::var("LINKEDIN_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserinfoResponse {
    #[serde(default)]
    sub: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    #[serde(default)]
    id: Option<serde_json::Value>,
}

/// LinkedIn UGC posts publisher
pub struct LinkedInPublisher {
    client: Client,
    config: PublisherConfig,
}

impl LinkedInPublisher {
    /// Create a publisher with the given config
    pub fn new(config: PublisherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a publisher from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(PublisherConfig::from_env())
    }

    /// Resolve the authenticated member's author URN
    ///
    /// Prefers OIDC `/userinfo`; falls back to `/me` with the versioned API
    /// header when the primary lookup fails.
    async fn resolve_author_urn(&self, credential: &str) -> Result<String> {
        if let Some(sub) = self.fetch_userinfo_sub(credential).await {
            return Ok(to_author_urn(&sub));
        }

        let url = format!("{}/v2/me", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(credential)
            .header("LinkedIn-Version", LINKEDIN_VERSION)
            .send()
            .await
            .map_err(|e| Error::publish(format!("/me request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::publish(format!(
                "/me error: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )));
        }

        let me: MeResponse = response
            .json()
            .await
            .map_err(|e| Error::publish(format!("invalid /me response: {e}")))?;

        let id = me
            .id
            .map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::publish("unable to resolve member id"))?;

        Ok(to_author_urn(&id))
    }

    /// Primary identity lookup; `None` on any failure so the caller can
    /// fall back to `/me`
    async fn fetch_userinfo_sub(&self, credential: &str) -> Option<String> {
        let url = format!("{}/v2/userinfo", self.config.base_url);
        let response = match self.client.get(&url).bearer_auth(credential).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("userinfo request failed: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "userinfo lookup rejected");
            return None;
        }

        match response.json::<UserinfoResponse>().await {
            Ok(userinfo) => userinfo.sub.filter(|s| !s.is_empty()),
            Err(e) => {
                warn!("invalid userinfo response: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl PostPublisher for LinkedInPublisher {
    async fn publish(&self, content: &str, credential: &str) -> Result<DateTime<Utc>> {
        let author_urn = self.resolve_author_urn(credential).await?;
        debug!(author = %author_urn, "submitting UGC post");

        let body = json!({
            "author": author_urn,
            "lifecycleState": "PUBLISHED",
            "specificContent": {
                "com.linkedin.ugc.ShareContent": {
                    "shareCommentary": { "text": content },
                    "shareMediaCategory": "NONE"
                }
            },
            "visibility": {
                "com.linkedin.ugc.MemberNetworkVisibility": "PUBLIC"
            }
        });

        let url = format!("{}/v2/ugcPosts", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(credential)
            .header("LinkedIn-Version", LINKEDIN_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::publish(format!("ugcPosts request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::publish(format!(
                "ugcPosts error: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )));
        }

        Ok(Utc::now())
    }
}

/// Strip known URN prefixes down to the bare member id
fn normalize_member_id(value: &str) -> &str {
    value
        .strip_prefix("urn:li:member:")
        .or_else(|| value.strip_prefix("urn:li:person:"))
        .unwrap_or(value)
}

/// Wrap a subject/member id into an author URN
///
/// Values already in person or organization form pass through; anything
/// else defaults to the person form.
fn to_author_urn(value: &str) -> String {
    if value.starts_with("urn:li:person:") || value.starts_with("urn:li:organization:") {
        value.to_string()
    } else {
        format!("urn:li:person:{}", normalize_member_id(value))
    }
}
