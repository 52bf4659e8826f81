//! commitlint-bot CLI binary entry point.
//! Resolves configuration, builds the evaluator, and runs a command.

use clap::Parser;
use commitlint_bot::cli::{Cli, Commands};
use commitlint_bot::config::{self, ConfigError, Effective};
use commitlint_bot::models::github::{PrCommit, PullRequest, PullRequestEvent, RepoRef};
use commitlint_bot::models::rules::RulePolicy;
use commitlint_bot::output;
use commitlint_bot::pipeline::{self, PipelineError};
use commitlint_bot::platform::{GitHub, Platform, PlatformError};
use commitlint_bot::report::build_report;
use commitlint_bot::rules::{self, PolicyEvaluator, RulesError};
use std::fs;
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Rules(#[from] RulesError),
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, CliError> {
    let s = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })?;
    serde_json::from_str(&s).map_err(|source| CliError::Json {
        path: path.to_string(),
        source,
    })
}

fn build_evaluator(eff: &Effective) -> Result<PolicyEvaluator, CliError> {
    let policy = match eff.rules.as_deref() {
        Some(path) => {
            info!(rules = %path.display(), "loading rules");
            rules::load_policy(path)?
        }
        None => {
            eprintln!(
                "{} No rules file configured; using the conventional preset.",
                output::note_prefix(output::use_colors(&eff.output))
            );
            RulePolicy::default()
        }
    };
    Ok(PolicyEvaluator::new(policy)?)
}

/// Pull request to validate: `--repo/--pr` wins over the event payload.
/// Returns `None` when the event's action does not call for a run.
fn resolve_pull(
    github: &GitHub,
    event: Option<&str>,
    repo: Option<&str>,
    pr: Option<u64>,
) -> Result<Option<(RepoRef, PullRequest)>, CliError> {
    if let (Some(repo), Some(number)) = (repo, pr) {
        let repo: RepoRef = repo.parse().map_err(ConfigError::InvalidRepo)?;
        let pull = github.get_pull_request(&repo, number)?;
        return Ok(Some((repo, pull)));
    }
    let path = event.ok_or(ConfigError::MissingEvent)?;
    let ev: PullRequestEvent = read_json(path)?;
    let action = ev.action.as_deref().unwrap_or("-");
    if !ev.should_validate() {
        info!(action, "skipping pull_request action");
        return Ok(None);
    }
    info!(action, "loaded event payload");
    Ok(Some((ev.repo(), ev.pull_request)))
}

fn cmd_run(
    eff: &Effective,
    event: Option<&str>,
    repo: Option<&str>,
    pr: Option<u64>,
) -> Result<i32, CliError> {
    let evaluator = build_evaluator(eff)?;
    let github = GitHub::new(
        &eff.api_url,
        eff.token()?,
        eff.bot_login.clone(),
        Duration::from_secs(eff.timeout_secs),
    )?;
    let Some((repo, pull)) = resolve_pull(&github, event, repo, pr)? else {
        return Ok(0);
    };
    info!(repo = %repo, pr = pull.number, sha = %pull.head.sha, "validating pull request");
    let outcome = pipeline::run(&github, &evaluator, &repo, &pull)?;
    output::print_run(&outcome, &eff.output).map_err(|source| CliError::Json {
        path: "<stdout>".into(),
        source,
    })?;
    Ok(0)
}

fn cmd_check(
    eff: &Effective,
    title: &str,
    body: Option<&str>,
    commits_path: &str,
) -> Result<i32, CliError> {
    let evaluator = build_evaluator(eff)?;
    let commits: Vec<PrCommit> = read_json(commits_path)?;
    let report = build_report(&commits, title, body, &evaluator);
    output::print_report(&report, &eff.output).map_err(|source| CliError::Json {
        path: "<stdout>".into(),
        source,
    })?;
    Ok(if report.valid { 0 } else { 1 })
}

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let (result, out_mode) = match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Commands::Run {
            repo_root,
            event,
            repo,
            pr,
            rules,
            output,
        } => match config::resolve_effective(
            repo_root.as_deref(),
            rules.as_deref(),
            output.as_deref(),
        ) {
            Ok(eff) => (
                cmd_run(&eff, event.as_deref(), repo.as_deref(), pr),
                eff.output,
            ),
            Err(e) => (Err(CliError::from(e)), output.unwrap_or_default()),
        },
        Commands::Check {
            repo_root,
            title,
            body,
            commits,
            rules,
            output,
        } => match config::resolve_effective(
            repo_root.as_deref(),
            rules.as_deref(),
            output.as_deref(),
        ) {
            Ok(eff) => (
                cmd_check(&eff, &title, body.as_deref(), &commits),
                eff.output,
            ),
            Err(e) => (Err(CliError::from(e)), output.unwrap_or_default()),
        },
    };
    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let color = out_mode != "json" && std::env::var_os("NO_COLOR").is_none();
            eprintln!("{} {}", output::error_prefix(color), e);
            if matches!(e, CliError::Config(ConfigError::MissingEvent)) {
                eprintln!(
                    "{} `check` lints commits locally without a pull request.",
                    output::note_prefix(color)
                );
            }
            std::process::exit(2);
        }
    }
}
