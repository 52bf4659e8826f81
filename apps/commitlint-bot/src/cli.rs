//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "commitlint-bot",
    version,
    about = "Lint pull request commits and report back to GitHub",
    long_about = "commitlint-bot validates every commit message of a pull request plus its title/description,\nsets a `commitlint` commit status and keeps a single bot comment up to date.\n\nConfiguration precedence: CLI > commitlint-bot.toml > defaults.",
    after_help = "Examples:\n  commitlint-bot run --event $GITHUB_EVENT_PATH\n  commitlint-bot run --repo acme/shop --pr 47\n  commitlint-bot check --title \"ABC-1: add search\" --body \"...\" --commits commits.json --output markdown",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current commitlint-bot version.")]
    Version,
    /// Validate a pull request and publish status and comment
    #[command(
        about = "Validate a pull request on GitHub",
        long_about = "Set a pending status, lint every commit of the pull request, set the final status and create, edit or delete the bot comment.",
        after_help = "Examples:\n  commitlint-bot run --event event.json\n  commitlint-bot run --repo acme/shop --pr 47 --output json"
    )]
    Run {
        #[arg(long, help = "Repository root used for config discovery (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, env = "GITHUB_EVENT_PATH", help = "pull_request webhook payload (JSON)")]
        event: Option<String>,
        #[arg(long, requires = "pr", help = "Repository as owner/name (fetches the PR via the API)")]
        repo: Option<String>,
        #[arg(long, requires = "repo", help = "Pull request number")]
        pr: Option<u64>,
        #[arg(long, help = "Rules file (TOML or YAML); default: built-in conventional preset")]
        rules: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Lint a pull request locally without touching GitHub
    #[command(
        about = "Dry-run the report locally",
        long_about = "Build the report from a title, description and a commits file in the GitHub list-commits JSON shape. Exits 1 when the report is invalid.",
        after_help = "Examples:\n  commitlint-bot check --title \"ABC-1: x\" --body d --commits commits.json\n  commitlint-bot check --title \"bad\" --commits commits.json --output markdown"
    )]
    Check {
        #[arg(long, help = "Repository root used for config discovery (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Pull request title")]
        title: String,
        #[arg(long, help = "Pull request description (omit for empty)")]
        body: Option<String>,
        #[arg(long, help = "Commits JSON file: [{\"sha\": ..., \"commit\": {\"message\": ...}}]")]
        commits: String,
        #[arg(long, help = "Rules file (TOML or YAML); default: built-in conventional preset")]
        rules: Option<String>,
        #[arg(long, help = "Output mode: human|json|markdown (default: human)")]
        output: Option<String>,
    },
}
