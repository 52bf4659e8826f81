//! Shared data models for evaluator outcomes, reports, rules, and platform
//! wire types.

pub mod github;
pub mod rules;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single finding reported by the rule evaluator.
///
/// Whether it is an error or a warning is decided by the list that holds it.
pub struct Issue {
    pub rule: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Result of evaluating one commit message.
pub struct Outcome {
    pub valid: bool,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl Outcome {
    pub fn has_issues(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A commit that produced at least one error or warning.
pub struct CommitOutcome {
    pub sha: String,
    pub title: String,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
/// Outcome of the PR title/description convention check.
pub struct PrStatus {
    pub status: bool,
    pub title_ok: bool,
    pub description_ok: bool,
}

impl PrStatus {
    /// Number of failed checks, added to the error tally (0, 1 or 2).
    pub fn error_weight(&self) -> usize {
        usize::from(!self.title_ok) + usize::from(!self.description_ok)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
/// Running error/warning counters for one run.
pub struct Tally {
    pub errors: usize,
    pub warnings: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.errors + self.warnings
    }
}

impl std::ops::Add for Tally {
    type Output = Tally;

    fn add(self, rhs: Tally) -> Tally {
        Tally {
            errors: self.errors + rhs.errors,
            warnings: self.warnings + rhs.warnings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Aggregate of PR-level and commit-level outcomes for one run.
///
/// `commits` only holds offenders, in the order the commits were received.
pub struct Report {
    pub valid: bool,
    pub commits: Vec<CommitOutcome>,
    pub pr: PrStatus,
    pub tally: Tally,
}
