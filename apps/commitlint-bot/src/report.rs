//! Commit report builder.
//!
//! Folds the PR check and every commit outcome into one `Report`. Commits are
//! evaluated on the rayon pool; `collect` keeps results in input order, so
//! the offender list always mirrors the order the commits were received in.

use crate::models::github::PrCommit;
use crate::models::{CommitOutcome, Outcome, Report, Tally};
use crate::pr::check_pr;
use crate::rules::RuleEvaluator;
use rayon::prelude::*;

/// First line of a commit message.
pub fn commit_title(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}

/// Build the report for one run.
///
/// Every commit is evaluated; an invalid commit marks the report invalid but
/// does not stop evaluation of the rest.
pub fn build_report<E>(
    commits: &[PrCommit],
    title: &str,
    description: Option<&str>,
    evaluator: &E,
) -> Report
where
    E: RuleEvaluator + ?Sized,
{
    let pr = check_pr(title, description);
    let outcomes: Vec<Outcome> = commits
        .par_iter()
        .map(|c| evaluator.evaluate(&c.commit.message))
        .collect();

    let seed = Report {
        valid: pr.status,
        commits: Vec::new(),
        pr,
        tally: Tally {
            errors: pr.error_weight(),
            warnings: 0,
        },
    };
    commits
        .iter()
        .zip(outcomes)
        .fold(seed, |mut report, (commit, outcome)| {
            report.valid &= outcome.valid;
            if outcome.has_issues() {
                report.tally = report.tally
                    + Tally {
                        errors: outcome.errors.len(),
                        warnings: outcome.warnings.len(),
                    };
                report.commits.push(CommitOutcome {
                    sha: commit.sha.clone(),
                    title: commit_title(&commit.commit.message).to_string(),
                    errors: outcome.errors,
                    warnings: outcome.warnings,
                });
            }
            report
        })
}
