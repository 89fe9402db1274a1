//! Application state for the gifly server.

use std::sync::Arc;

use gifly_core::config::GitHubAppConfig;
use gifly_core::giphy::GiphyClient;
use gifly_core::github::GitHubClient;

/// Server configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let port = match std::env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| format!("Invalid PORT: {}", value))?,
            Err(_) => 8080,
        };

        Ok(Self { port })
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// GitHub App configuration (webhook secret lives here).
    pub github_config: Arc<GitHubAppConfig>,
    /// GitHub API client with the App JWT cache.
    pub github: Arc<GitHubClient>,
    /// Giphy API client.
    pub giphy: Arc<GiphyClient>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(github_config: GitHubAppConfig, github: GitHubClient, giphy: GiphyClient) -> Self {
        Self {
            github_config: Arc::new(github_config),
            github: Arc::new(github),
            giphy: Arc::new(giphy),
        }
    }
}
