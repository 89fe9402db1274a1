//! Webhook signature verification.

use crate::crypto::verify_github_signature;

/// Verifier for GitHub webhook signatures.
pub struct GitHubVerifier<'a> {
    secret: &'a str,
}

impl<'a> GitHubVerifier<'a> {
    /// Creates a new GitHub verifier with the webhook secret.
    pub fn new(secret: &'a str) -> Self {
        Self { secret }
    }

    /// Verifies a GitHub webhook signature.
    ///
    /// # Arguments
    /// * `signature` - The X-Hub-Signature-256 header value
    /// * `body` - The raw request body
    pub fn verify(&self, signature: &str, body: &[u8]) -> bool {
        verify_github_signature(self.secret, signature, body)
    }
}
