//! Error types for the gifly core library.

use thiserror::Error;

/// Core error type for the gifly service.
#[derive(Error, Debug)]
pub enum GiflyError {
    #[error("Webhook verification failed")]
    WebhookVerificationFailed,

    #[error("Invalid webhook payload: {0}")]
    InvalidWebhookPayload(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Transient network error: {0}")]
    Transient(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Remote error {status}: {body}")]
    Remote { status: u16, body: String },
}

/// Result type alias for gifly operations.
pub type Result<T> = std::result::Result<T, GiflyError>;
