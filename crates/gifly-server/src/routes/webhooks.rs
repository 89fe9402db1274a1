//! Webhook endpoint handler for GitHub comment events.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use gifly_core::{
    crypto::MAX_WEBHOOK_SIZE,
    webhook::{extract_gif_query, parse_comment_event, GitHubVerifier},
    GiflyError,
};
use serde_json::json;

use crate::state::AppState;

/// Handler for GitHub webhooks.
///
/// POST /api/webhooks/github
///
/// The whole event is handled inline: GitHub retries failed deliveries, so
/// a non-2xx response is the recovery mechanism.
pub async fn handle_github_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    // 1. Check body size limit
    if body.len() > MAX_WEBHOOK_SIZE {
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(json!({"error": "Payload too large"})),
        );
    }

    // 2. Verify signature over the raw body (constant-time)
    let signature = headers
        .get("X-Hub-Signature-256")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let verifier = GitHubVerifier::new(&state.github_config.webhook_secret);
    if !verifier.verify(signature, &body) {
        tracing::warn!("GitHub webhook signature verification failed");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid signature"})),
        );
    }

    // 3. Parse and classify the event
    let event = match parse_comment_event(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Invalid webhook payload: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Invalid payload"})),
            );
        }
    };

    if !event.is_new_comment() {
        tracing::debug!(action = %event.action, "Ignoring event");
        return (StatusCode::OK, Json(json!({"status": "ignored"})));
    }

    let installation_id = match event.installation_id {
        Some(id) => id,
        None => {
            tracing::warn!("Comment event without an installation, ignoring");
            return (StatusCode::OK, Json(json!({"status": "ignored"})));
        }
    };

    // is_new_comment() guarantees both fields
    let comment_body = event.comment_body.unwrap_or_default();
    let comments_url = event.comments_url.unwrap_or_default();

    // 4. Extract the gifbot command
    let query = match extract_gif_query(&comment_body) {
        Some(query) => query,
        None => {
            return (StatusCode::OK, Json(json!({"status": "no_command"})));
        }
    };

    tracing::info!(query = %query, installation_id, "Handling gifbot command");

    // 5. Search for a GIF, falling back to trending
    let gif_url = match find_gif(&state, &query).await {
        Some(url) => url,
        None => {
            tracing::info!(query = %query, "No GIF found");
            return (StatusCode::OK, Json(json!({"status": "no_gif"})));
        }
    };

    // 6. Exchange the App JWT for an installation token
    let token = match state.github.get_installation_token(installation_id).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(installation_id, "Failed to get installation token: {}", e);
            return error_response(&e);
        }
    };

    // 7. Post the reply comment
    let comment = format!("![gif]({})", gif_url);
    if let Err(e) = state.github.post_comment(&comments_url, &comment, &token).await {
        tracing::error!("Failed to post comment: {}", e);
        return error_response(&e);
    }

    (StatusCode::OK, Json(json!({"status": "posted"})))
}

/// Searches for a GIF, trying trending as a fallback. Failures are logged
/// and treated as "no gif" so a Giphy outage never fails the webhook.
async fn find_gif(state: &AppState, query: &str) -> Option<String> {
    match state.giphy.search(query).await {
        Ok(Some(url)) => return Some(url),
        Ok(None) => tracing::debug!(query = %query, "No GIF results, trying trending"),
        Err(e) => {
            tracing::error!(query = %query, "Giphy search failed: {}", e);
            return None;
        }
    }

    match state.giphy.trending().await {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Giphy trending fallback failed: {}", e);
            None
        }
    }
}

/// Maps a core error to the webhook response status. Upstream API failures
/// surface as 502 so GitHub redelivers; everything else is a plain 500.
fn error_response(err: &GiflyError) -> (StatusCode, Json<serde_json::Value>) {
    let status = match err {
        GiflyError::Transient(_)
        | GiflyError::Authentication(_)
        | GiflyError::Permission(_)
        | GiflyError::NotFound(_)
        | GiflyError::Remote { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(json!({"error": err.to_string()})))
}
