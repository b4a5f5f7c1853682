//! Thin client for the third-party site API (OAuth exchange and publishing).
//!
//! Plain request/response calls with a bearer credential; no retry.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::SiteApiConfig;

#[derive(Debug, thiserror::Error)]
pub enum SiteApiError {
    /// A required setting (e.g. `SITE_CLIENT_ID`) is not configured.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("no site API token available; complete the OAuth flow first")]
    MissingToken,

    #[error("site API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("site API returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    grant_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_uri: Option<&'a str>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishRequest<'a> {
    custom_domains: &'a [String],
    publish_to_webflow_subdomain: bool,
}

pub struct SiteApiClient {
    http: reqwest::Client,
    config: SiteApiConfig,
}

impl SiteApiClient {
    pub fn new(config: SiteApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Exchange an OAuth authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, SiteApiError> {
        let client_id = self
            .config
            .client_id
            .as_deref()
            .ok_or(SiteApiError::NotConfigured("SITE_CLIENT_ID"))?;
        let client_secret = self
            .config
            .client_secret
            .as_deref()
            .ok_or(SiteApiError::NotConfigured("SITE_CLIENT_SECRET"))?;

        let body = TokenRequest {
            client_id,
            client_secret,
            code,
            grant_type: "authorization_code",
            redirect_uri: self.config.redirect_uri.as_deref(),
        };

        let response = self
            .http
            .post(self.url("/oauth/access_token"))
            .json(&body)
            .send()
            .await?;
        let token: TokenResponse = check(response).await?.json().await?;

        tracing::info!("Site API token obtained");
        Ok(token.access_token)
    }

    /// Publish a site, optionally to a set of custom domains.
    ///
    /// Returns the upstream JSON body unchanged.
    pub async fn publish_site(
        &self,
        token: &str,
        site_id: &str,
        custom_domains: &[String],
    ) -> Result<serde_json::Value, SiteApiError> {
        let body = PublishRequest {
            custom_domains,
            publish_to_webflow_subdomain: custom_domains.is_empty(),
        };

        let response = self
            .http
            .post(self.url(&format!("/v2/sites/{site_id}/publish")))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let published = check(response).await?.json().await?;

        tracing::info!(site_id = %site_id, domains = custom_domains.len(), "Site publish requested");
        Ok(published)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, SiteApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(%status, "Site API call failed");
    Err(SiteApiError::Status { status, body })
}

/// The bearer token used for site API calls.
///
/// Seeded from `SITE_API_TOKEN`; replaced by each successful OAuth exchange.
#[derive(Debug, Default)]
pub struct TokenStore {
    token: RwLock<Option<String>>,
}

impl TokenStore {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            token: RwLock::new(initial),
        }
    }

    pub async fn get(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn set(&self, token: String) {
        *self.token.write().await = Some(token);
    }
}
