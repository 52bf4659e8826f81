//! Commit status publishing.

use crate::models::github::{CommitStatus, RepoRef, StatusState};
use crate::models::Report;
use crate::platform::{Platform, PlatformError};
use tracing::info;

/// Context string the code host uses to tell this check apart from others.
pub const STATUS_CONTEXT: &str = "commitlint";

/// Status written before any commit is fetched.
pub fn pending() -> CommitStatus {
    CommitStatus {
        state: StatusState::Pending,
        description: "Waiting for the status to be reported".to_string(),
        context: STATUS_CONTEXT.to_string(),
    }
}

/// Final status for a fully aggregated report.
pub fn conclude(report: &Report) -> CommitStatus {
    CommitStatus {
        state: if report.valid {
            StatusState::Success
        } else {
            StatusState::Failure
        },
        description: format!(
            "found {} problems, {} warnings",
            report.tally.errors, report.tally.warnings
        ),
        context: STATUS_CONTEXT.to_string(),
    }
}

pub fn publish<P: Platform + ?Sized>(
    platform: &P,
    repo: &RepoRef,
    sha: &str,
    status: &CommitStatus,
) -> Result<(), PlatformError> {
    info!(repo = %repo, sha, state = %status.state, description = %status.description, "setting commit status");
    platform.create_status(repo, sha, status)
}
