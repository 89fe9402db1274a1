use anyhow::Context;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gifly_core::config::{validate_environment, GiphyConfig, GitHubAppConfig};
use gifly_core::giphy::GiphyClient;
use gifly_core::github::GitHubClient;
use gifly_server::routes::api_router;
use gifly_server::state::{AppState, ServerConfig};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    if let Some(env_file) = &cli.env_file {
        dotenvy::from_path(env_file)
            .with_context(|| format!("Failed to load env file {}", env_file.display()))?;
    } else {
        // A missing .env is fine; configuration may come from the process env
        let _ = dotenvy::dotenv();
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gifly_server=debug,gifly_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Fail fast with one complete message instead of one variable at a time
    validate_environment().context("Configuration is incomplete")?;

    let github_config = GitHubAppConfig::from_env()?;
    let giphy_config = GiphyConfig::from_env();
    let server_config = ServerConfig::from_env().map_err(anyhow::Error::msg)?;
    let port = cli.port.unwrap_or(server_config.port);

    let github = GitHubClient::new(&github_config)?;
    let giphy = GiphyClient::new(&giphy_config)?;
    let state = AppState::new(github_config, github, giphy);

    let app = api_router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    tracing::info!("Gifly server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
