//! commitlint-bot core library.
//!
//! Validates the commits and the title/description of a pull request, then
//! reports back through a commit status and a single managed comment.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `rules`: Commit message evaluator trait and the policy-driven evaluator.
//! - `pr`: Pull request title/description convention check.
//! - `report`: Folds PR and commit outcomes into one `Report`.
//! - `format`: Markdown rendering of the bot comment.
//! - `comments`: Create/edit/delete decision for the bot comment.
//! - `status`: Commit status derivation and publishing.
//! - `platform`: Code host client trait and the GitHub implementation.
//! - `pipeline`: One validation run end to end.
//! - `models`: Report, rule policy and GitHub wire types.
//! - `output`: Human/JSON/markdown printers.
pub mod cli;
pub mod comments;
pub mod config;
pub mod format;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod platform;
pub mod pr;
pub mod report;
pub mod rules;
pub mod status;
