//! GitHub API client for installation tokens and comment posting.

pub mod app_auth;

pub use app_auth::{AppAuth, AppJwt, JwtCache, JWT_REUSE_BUFFER_SECS, JWT_TTL_SECS};

use serde::Deserialize;

use crate::config::GitHubAppConfig;
use crate::error::{GiflyError, Result};

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

const USER_AGENT: &str = concat!("gifly/", env!("CARGO_PKG_VERSION"));

/// GitHub API client.
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    auth: AppAuth,
}

impl GitHubClient {
    /// Creates a new GitHub client.
    pub fn new(config: &GitHubAppConfig) -> Result<Self> {
        Self::with_base_url(config, GITHUB_API_BASE)
    }

    /// Creates a client against a non-default API base URL (used in tests).
    pub fn with_base_url(config: &GitHubAppConfig, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GiflyError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            auth: AppAuth::new(config.app_id, config.private_key.clone()),
        })
    }

    /// Gets an installation access token.
    ///
    /// Mints (or reuses) an App JWT and exchanges it for a token scoped to
    /// the given installation. Tokens are not cached; each webhook event
    /// re-derives one.
    pub async fn get_installation_token(&self, installation_id: i64) -> Result<String> {
        if installation_id <= 0 {
            return Err(GiflyError::InvalidArgument(format!(
                "Installation ID must be positive, got {}",
                installation_id
            )));
        }

        let jwt = self.auth.app_jwt()?;

        let url = format!(
            "{}/app/installations/{}/access_tokens",
            self.base_url, installation_id
        );

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", format!("Bearer {}", jwt.token))
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            token: String,
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| GiflyError::Transient(format!("Failed to parse token response: {}", e)))?;

        tracing::debug!(installation_id, "Minted GitHub installation token");

        Ok(token_response.token)
    }

    /// Adds a comment to an issue or pull request.
    ///
    /// `comments_url` comes straight from the webhook payload; the token is
    /// an installation access token from [`GitHubClient::get_installation_token`].
    pub async fn post_comment(&self, comments_url: &str, body: &str, token: &str) -> Result<()> {
        let response = self
            .client
            .post(comments_url)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", format!("token {}", token))
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        tracing::debug!(comments_url, "Posted comment");

        Ok(())
    }
}

/// Maps a reqwest transport failure (timeout, connect error) to the error
/// taxonomy. The caller may retry these; HTTP-level failures are mapped
/// separately by status.
fn map_transport_error(err: reqwest::Error) -> GiflyError {
    GiflyError::Transient(err.to_string())
}

/// Maps a non-2xx GitHub response to the error taxonomy, keeping status and
/// body for diagnosis.
async fn error_for_status(response: reqwest::Response) -> GiflyError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    match status.as_u16() {
        401 => GiflyError::Authentication(body),
        403 => GiflyError::Permission(body),
        404 => GiflyError::NotFound(body),
        _ => GiflyError::Remote {
            status: status.as_u16(),
            body,
        },
    }
}
