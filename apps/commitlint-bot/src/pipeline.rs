//! Validation run orchestration.
//!
//! One run: resolve the bot login, pending status, drain all commits, build
//! the report, final status, then reconcile the bot comment. A platform
//! failure aborts the run where it happens. The login is resolved before any
//! write so a misconfigured identity never leaves a final status without its
//! comment; a failure while listing commits leaves the status `pending`.

use crate::comments::{self, CommentAction};
use crate::format;
use crate::models::github::{CommitStatus, PullRequest, RepoRef};
use crate::models::Report;
use crate::platform::{Platform, PlatformError};
use crate::report::build_report;
use crate::rules::RuleEvaluator;
use crate::status;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

#[derive(Debug, Serialize)]
/// Everything a run decided, for logging and CLI output.
pub struct RunOutcome {
    pub report: Report,
    pub status: CommitStatus,
    pub action: CommentAction,
}

pub fn run<P, E>(
    platform: &P,
    evaluator: &E,
    repo: &RepoRef,
    pr: &PullRequest,
) -> Result<RunOutcome, PipelineError>
where
    P: Platform + ?Sized,
    E: RuleEvaluator + ?Sized,
{
    let login = platform.bot_login()?;
    let sha = pr.head.sha.as_str();
    status::publish(platform, repo, sha, &status::pending())?;

    let commits = platform.list_commits(repo, pr.number)?;
    info!(repo = %repo, pr = pr.number, commits = commits.len(), "evaluating commits");
    let report = build_report(&commits, &pr.title, pr.body.as_deref(), evaluator);

    let final_status = status::conclude(&report);
    status::publish(platform, repo, sha, &final_status)?;

    let existing = platform.list_comments(repo, pr.number)?;
    let message = format::render(&report);
    let action = comments::plan(
        report.tally.total(),
        message,
        comments::find_bot_comment(&existing, &login),
    );
    comments::apply(platform, repo, pr.number, &action)?;

    Ok(RunOutcome {
        report,
        status: final_status,
        action,
    })
}
