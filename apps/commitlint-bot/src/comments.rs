//! Bot comment reconciliation.
//!
//! The comment state after a run depends only on the current report and on
//! whether a bot comment already exists, so repeated runs converge.

use crate::models::github::{Comment, RepoRef};
use crate::platform::{Platform, PlatformError};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
/// The single comment operation a run performs.
pub enum CommentAction {
    Create { body: String },
    Edit { id: u64, body: String },
    Delete { id: u64 },
    Keep,
}

/// The bot's own comment, earliest created first, then lowest id.
///
/// Other bot comments, if any, are left as they are.
pub fn find_bot_comment<'a>(comments: &'a [Comment], login: &str) -> Option<&'a Comment> {
    comments
        .iter()
        .filter(|c| c.author() == Some(login))
        .min_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
}

/// Decide what to do with the PR comment.
///
/// `total` is errors plus warnings for the run; `message` is the rendered
/// body when there is something to report.
pub fn plan(total: usize, message: Option<String>, existing: Option<&Comment>) -> CommentAction {
    match (total > 0, message, existing) {
        (true, Some(body), Some(c)) => CommentAction::Edit { id: c.id, body },
        (true, Some(body), None) => CommentAction::Create { body },
        (_, _, Some(c)) => CommentAction::Delete { id: c.id },
        (_, _, None) => CommentAction::Keep,
    }
}

/// Perform the planned action; at most one platform call.
pub fn apply<P: Platform + ?Sized>(
    platform: &P,
    repo: &RepoRef,
    number: u64,
    action: &CommentAction,
) -> Result<(), PlatformError> {
    match action {
        CommentAction::Create { body } => {
            info!(repo = %repo, pr = number, "creating bot comment");
            platform.create_comment(repo, number, body)
        }
        CommentAction::Edit { id, body } => {
            info!(repo = %repo, pr = number, comment = id, "editing bot comment");
            platform.edit_comment(repo, *id, body)
        }
        CommentAction::Delete { id } => {
            info!(repo = %repo, pr = number, comment = id, "deleting stale bot comment");
            platform.delete_comment(repo, *id)
        }
        CommentAction::Keep => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::github::User;

    fn comment(id: u64, login: &str, created_at: &str) -> Comment {
        Comment {
            id,
            user: Some(User {
                login: login.into(),
            }),
            body: Some("x".into()),
            created_at: created_at.into(),
        }
    }

    #[test]
    fn test_find_bot_comment_prefers_earliest() {
        let comments = vec![
            comment(9, "alice", "2024-01-01T00:00:00Z"),
            comment(7, "bot", "2024-03-01T00:00:00Z"),
            comment(5, "bot", "2024-02-01T00:00:00Z"),
            Comment {
                id: 1,
                user: None,
                body: None,
                created_at: "2023-01-01T00:00:00Z".into(),
            },
        ];
        assert_eq!(find_bot_comment(&comments, "bot").map(|c| c.id), Some(5));
        assert!(find_bot_comment(&comments, "carol").is_none());
    }

    #[test]
    fn test_same_timestamp_breaks_tie_by_id() {
        let comments = vec![
            comment(12, "bot", "2024-02-01T00:00:00Z"),
            comment(11, "bot", "2024-02-01T00:00:00Z"),
        ];
        assert_eq!(find_bot_comment(&comments, "bot").map(|c| c.id), Some(11));
    }

    #[test]
    fn test_plan_covers_all_cases() {
        let c = comment(3, "bot", "2024-01-01T00:00:00Z");
        assert_eq!(
            plan(2, Some("m".into()), Some(&c)),
            CommentAction::Edit {
                id: 3,
                body: "m".into()
            }
        );
        assert_eq!(
            plan(1, Some("m".into()), None),
            CommentAction::Create { body: "m".into() }
        );
        assert_eq!(plan(0, None, Some(&c)), CommentAction::Delete { id: 3 });
        assert_eq!(plan(0, None, None), CommentAction::Keep);
    }
}
