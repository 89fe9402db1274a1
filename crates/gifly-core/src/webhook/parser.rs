//! Webhook payload parsing for GitHub comment events.

use serde::Deserialize;

use crate::error::{GiflyError, Result};

/// A parsed issue or pull request comment event.
#[derive(Debug, Clone)]
pub struct CommentEvent {
    /// The webhook action (e.g., "created", "edited", "deleted").
    pub action: String,
    /// The comment text, if the payload carried a comment.
    pub comment_body: Option<String>,
    /// The App installation that delivered the event.
    pub installation_id: Option<i64>,
    /// URL to post reply comments to.
    pub comments_url: Option<String>,
}

impl CommentEvent {
    /// Whether this event is a freshly created comment the bot can reply to.
    pub fn is_new_comment(&self) -> bool {
        self.action == "created" && self.comment_body.is_some() && self.comments_url.is_some()
    }
}

// GitHub payload structures

#[derive(Deserialize)]
struct CommentPayload {
    action: String,
    comment: Option<Comment>,
    installation: Option<Installation>,
    issue: Option<CommentTarget>,
    pull_request: Option<CommentTarget>,
}

#[derive(Deserialize)]
struct Comment {
    body: String,
}

#[derive(Deserialize)]
struct Installation {
    id: i64,
}

#[derive(Deserialize)]
struct CommentTarget {
    comments_url: String,
}

/// Parses a GitHub comment webhook payload.
///
/// The reply URL comes from `issue.comments_url` for issue comments and from
/// `pull_request.comments_url` for review comment events.
pub fn parse_comment_event(payload: &[u8]) -> Result<CommentEvent> {
    let data: CommentPayload = serde_json::from_slice(payload)
        .map_err(|e| GiflyError::InvalidWebhookPayload(e.to_string()))?;

    let comments_url = data
        .issue
        .map(|i| i.comments_url)
        .or(data.pull_request.map(|p| p.comments_url));

    Ok(CommentEvent {
        action: data.action,
        comment_body: data.comment.map(|c| c.body),
        installation_id: data.installation.map(|i| i.id),
        comments_url,
    })
}

/// Extracts the search term from a `[gifbot: <term>]` command.
///
/// Matching is case-insensitive; the captured term is trimmed. Returns None
/// when the comment carries no command or only an empty one.
pub fn extract_gif_query(comment_body: &str) -> Option<String> {
    let re = regex_lite::Regex::new(r"(?i)\[gifbot:(.*?)\]").expect("valid gifbot regex");
    let term = re.captures(comment_body)?.get(1)?.as_str().trim().to_string();
    if term.is_empty() {
        return None;
    }
    Some(term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_issue_comment() {
        let payload = r#"{
            "action": "created",
            "comment": {
                "body": "[gifbot: cats]"
            },
            "installation": {
                "id": 42
            },
            "issue": {
                "comments_url": "https://api.github.com/repos/owner/repo/issues/1/comments"
            }
        }"#;

        let event = parse_comment_event(payload.as_bytes()).unwrap();
        assert_eq!(event.action, "created");
        assert_eq!(event.comment_body.as_deref(), Some("[gifbot: cats]"));
        assert_eq!(event.installation_id, Some(42));
        assert_eq!(
            event.comments_url.as_deref(),
            Some("https://api.github.com/repos/owner/repo/issues/1/comments")
        );
        assert!(event.is_new_comment());
    }

    #[test]
    fn test_parse_pull_request_comment() {
        let payload = r#"{
            "action": "created",
            "comment": {
                "body": "nice [gifbot: ship it]"
            },
            "installation": {
                "id": 7
            },
            "pull_request": {
                "comments_url": "https://api.github.com/repos/owner/repo/issues/5/comments"
            }
        }"#;

        let event = parse_comment_event(payload.as_bytes()).unwrap();
        assert_eq!(
            event.comments_url.as_deref(),
            Some("https://api.github.com/repos/owner/repo/issues/5/comments")
        );
        assert!(event.is_new_comment());
    }

    #[test]
    fn test_parse_event_without_comment() {
        let payload = r#"{
            "action": "opened",
            "issue": {
                "comments_url": "https://api.github.com/repos/owner/repo/issues/1/comments"
            }
        }"#;

        let event = parse_comment_event(payload.as_bytes()).unwrap();
        assert_eq!(event.action, "opened");
        assert!(event.comment_body.is_none());
        assert!(!event.is_new_comment());
    }

    #[test]
    fn test_parse_invalid_payload() {
        assert!(parse_comment_event(b"not json").is_err());
    }

    #[test]
    fn test_extract_gif_query() {
        assert_eq!(
            extract_gif_query("[gifbot: cats]").as_deref(),
            Some("cats")
        );
        assert_eq!(
            extract_gif_query("look at this [GifBot:  dancing dog  ] haha").as_deref(),
            Some("dancing dog")
        );
        assert_eq!(extract_gif_query("no command here"), None);
        assert_eq!(extract_gif_query("[gifbot:]"), None);
        assert_eq!(extract_gif_query("[gifbot:   ]"), None);
    }
}
