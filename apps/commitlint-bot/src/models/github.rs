//! Wire types for the GitHub REST API and webhook payloads.
//!
//! Only the fields the pipeline reads are modelled; unknown fields are
//! ignored by serde.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Repository coordinates (`owner/name`).
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(RepoRef {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(format!("expected owner/name, got '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeadRef {
    pub sha: String,
}

#[derive(Debug, Clone, Deserialize)]
/// Pull request fields used by a validation run.
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    /// `null` when the author left the description empty.
    #[serde(default)]
    pub body: Option<String>,
    pub head: HeadRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: User,
}

#[derive(Debug, Clone, Deserialize)]
/// `pull_request` webhook delivery, as found at `$GITHUB_EVENT_PATH`.
pub struct PullRequestEvent {
    #[serde(default)]
    pub action: Option<String>,
    pub pull_request: PullRequest,
    pub repository: Repository,
}

/// `pull_request` actions that change what there is to validate.
pub const VALIDATED_ACTIONS: [&str; 4] = ["opened", "synchronize", "edited", "reopened"];

impl PullRequestEvent {
    /// Payloads without an action (hand-made events) are always validated.
    pub fn should_validate(&self) -> bool {
        self.action
            .as_deref()
            .map_or(true, |a| VALIDATED_ACTIONS.contains(&a))
    }

    pub fn repo(&self) -> RepoRef {
        RepoRef {
            owner: self.repository.owner.login.clone(),
            name: self.repository.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommitDetail {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// One entry of the pull request commit listing.
pub struct PrCommit {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
/// Issue comment on a pull request.
pub struct Comment {
    pub id: u64,
    /// `null` for comments left by deleted accounts.
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

impl Comment {
    pub fn author(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.login.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    Pending,
    Success,
    Failure,
}

impl fmt::Display for StatusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusState::Pending => "pending",
            StatusState::Success => "success",
            StatusState::Failure => "failure",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Commit status payload written on the PR head commit.
pub struct CommitStatus {
    pub state: StatusState,
    pub description: String,
    pub context: String,
}
