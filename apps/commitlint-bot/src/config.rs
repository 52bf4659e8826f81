//! Configuration discovery and effective settings resolution.
//!
//! The bot reads `commitlint-bot.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config.
//! Defaults:
//! - `rules`: none (built-in conventional preset)
//! - `output`: `human`
//! - `github.api_url`: `https://api.github.com`
//! - `github.token_env`: `GITHUB_TOKEN`
//! - `github.timeout_secs`: 30
//! - `github.bot_login`: `github-actions[bot]` when running under GitHub
//!   Actions (`GITHUB_ACTIONS=true`), otherwise looked up via the API
//!
//! Overrides precedence: CLI > config file > defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_NAMES: [&str; 3] = [
    "commitlint-bot.toml",
    "commitlint-bot.yaml",
    "commitlint-bot.yml",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("no GitHub token: set ${0} or github.token_env in commitlint-bot.toml")]
    MissingToken(String),
    #[error("no pull request given: pass --event, set $GITHUB_EVENT_PATH, or pass --repo and --pr")]
    MissingEvent,
    #[error("invalid repository: {0}")]
    InvalidRepo(String),
}

/// Login used by the default `GITHUB_TOKEN` inside GitHub Actions.
pub const ACTIONS_BOT_LOGIN: &str = "github-actions[bot]";

#[derive(Debug, Default, Deserialize, Clone)]
/// Platform section under `[github]`.
pub struct GithubCfg {
    pub api_url: Option<String>,
    pub token_env: Option<String>,
    /// Login the bot comments as; looked up via the API when absent.
    pub bot_login: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `commitlint-bot.toml|yaml`.
pub struct BotConfig {
    /// Rules file, relative to the repository root.
    pub rules: Option<String>,
    pub output: Option<String>,
    #[serde(default)]
    pub github: Option<GithubCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub rules: Option<PathBuf>,
    pub output: String,
    pub api_url: String,
    pub token_env: String,
    pub bot_login: Option<String>,
    pub timeout_secs: u64,
}

impl Effective {
    /// Read the API token from the configured environment variable.
    pub fn token(&self) -> Result<String, ConfigError> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingToken(self.token_env.clone()))
    }
}

/// Fallback bot login given the value of `GITHUB_ACTIONS`.
///
/// Installation tokens cannot call `GET /user`, so inside Actions the login
/// must be known up front.
pub fn default_bot_login(github_actions: Option<&str>) -> Option<String> {
    (github_actions == Some("true")).then(|| ACTIONS_BOT_LOGIN.to_string())
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a config file or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `BotConfig` from the first config file present under `root`.
///
/// Returns `Ok(None)` when no config file exists.
pub fn load_config(root: &Path) -> Result<Option<BotConfig>, ConfigError> {
    for name in CONFIG_NAMES {
        let path = root.join(name);
        if !path.exists() {
            continue;
        }
        let s = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let parsed = if name.ends_with(".toml") {
            toml::from_str::<BotConfig>(&s).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<BotConfig>(&s).map_err(|e| e.to_string())
        };
        return parsed
            .map(Some)
            .map_err(|message| ConfigError::Parse { path, message });
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_rules: Option<&str>,
    cli_output: Option<&str>,
) -> Result<Effective, ConfigError> {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root)?.unwrap_or_default();
    let gh = cfg.github.unwrap_or_default();

    let rules = cli_rules
        .map(|s| s.to_string())
        .or(cfg.rules)
        .map(|r| repo_root.join(r));
    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    Ok(Effective {
        rules,
        output,
        api_url: gh
            .api_url
            .unwrap_or_else(|| "https://api.github.com".to_string()),
        token_env: gh.token_env.unwrap_or_else(|| "GITHUB_TOKEN".to_string()),
        bot_login: gh.bot_login.or_else(|| {
            default_bot_login(std::env::var("GITHUB_ACTIONS").ok().as_deref())
        }),
        timeout_secs: gh.timeout_secs.unwrap_or(30),
        repo_root,
    })
}
