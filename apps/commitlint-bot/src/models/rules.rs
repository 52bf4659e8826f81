//! Rule policy schema used by the commit message evaluator.
//!
//! A policy is a list of `[[rules]]` entries tagged by `kind`. Every entry
//! carries an optional `level` (error|warning, default error) and an optional
//! `message` that replaces the built-in text.
//!
//! Messages matching an ignore pattern are not linted at all. Merge, revert,
//! fixup/squash and auto-merge messages are ignored unless
//! `default_ignores = false`; `ignores` adds extra regexes.

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
/// Root policy loaded from the rules file.
pub struct RulePolicy {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default = "default_true")]
    pub default_ignores: bool,
    #[serde(default)]
    pub ignores: Vec<String>,
}

/// Messages generated by git or the code host rather than written by hand.
pub const DEFAULT_IGNORES: [&str; 7] = [
    r"^Merge (branch|pull request|remote-tracking branch|tag) ",
    r"^Merge .+ into .+",
    r"^(R|r)evert ",
    r"^(fixup|squash)! ",
    r"^Automatic merge",
    r"^Auto-merged .+ into ",
    r"^Merged .+ (in|into) ",
];

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
/// Severity of a rule violation.
pub enum Level {
    #[default]
    Error,
    #[serde(alias = "warn")]
    Warning,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "kind")]
/// Commit message rules supported by the evaluator.
pub enum Rule {
    #[serde(rename = "header-max-length")]
    HeaderMaxLength {
        max: usize,
        #[serde(default)]
        level: Level,
        message: Option<String>,
    },
    #[serde(rename = "header-min-length")]
    HeaderMinLength {
        min: usize,
        #[serde(default)]
        level: Level,
        message: Option<String>,
    },
    #[serde(rename = "header-pattern")]
    HeaderPattern {
        regex: String,
        #[serde(default)]
        level: Level,
        message: Option<String>,
    },
    #[serde(rename = "type-enum")]
    TypeEnum {
        values: Vec<String>,
        #[serde(default)]
        level: Level,
        message: Option<String>,
    },
    #[serde(rename = "type-empty")]
    TypeEmpty {
        #[serde(default)]
        level: Level,
        message: Option<String>,
    },
    #[serde(rename = "subject-empty")]
    SubjectEmpty {
        #[serde(default)]
        level: Level,
        message: Option<String>,
    },
    #[serde(rename = "subject-full-stop")]
    SubjectFullStop {
        #[serde(default = "default_full_stop")]
        value: String,
        #[serde(default)]
        level: Level,
        message: Option<String>,
    },
    #[serde(rename = "body-leading-blank")]
    BodyLeadingBlank {
        #[serde(default)]
        level: Level,
        message: Option<String>,
    },
    #[serde(rename = "body-max-line-length")]
    BodyMaxLineLength {
        max: usize,
        #[serde(default)]
        level: Level,
        message: Option<String>,
    },
}

fn default_full_stop() -> String {
    ".".to_string()
}

impl Rule {
    /// Rule identifier as written in the rules file.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::HeaderMaxLength { .. } => "header-max-length",
            Rule::HeaderMinLength { .. } => "header-min-length",
            Rule::HeaderPattern { .. } => "header-pattern",
            Rule::TypeEnum { .. } => "type-enum",
            Rule::TypeEmpty { .. } => "type-empty",
            Rule::SubjectEmpty { .. } => "subject-empty",
            Rule::SubjectFullStop { .. } => "subject-full-stop",
            Rule::BodyLeadingBlank { .. } => "body-leading-blank",
            Rule::BodyMaxLineLength { .. } => "body-max-line-length",
        }
    }

    pub fn level(&self) -> Level {
        match self {
            Rule::HeaderMaxLength { level, .. }
            | Rule::HeaderMinLength { level, .. }
            | Rule::HeaderPattern { level, .. }
            | Rule::TypeEnum { level, .. }
            | Rule::TypeEmpty { level, .. }
            | Rule::SubjectEmpty { level, .. }
            | Rule::SubjectFullStop { level, .. }
            | Rule::BodyLeadingBlank { level, .. }
            | Rule::BodyMaxLineLength { level, .. } => *level,
        }
    }

    /// User-supplied message override, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Rule::HeaderMaxLength { message, .. }
            | Rule::HeaderMinLength { message, .. }
            | Rule::HeaderPattern { message, .. }
            | Rule::TypeEnum { message, .. }
            | Rule::TypeEmpty { message, .. }
            | Rule::SubjectEmpty { message, .. }
            | Rule::SubjectFullStop { message, .. }
            | Rule::BodyLeadingBlank { message, .. }
            | Rule::BodyMaxLineLength { message, .. } => message.as_deref(),
        }
    }
}

impl Default for RulePolicy {
    /// Conventional-commit preset used when no rules file is configured.
    fn default() -> Self {
        let types = [
            "build", "chore", "ci", "docs", "feat", "fix", "perf", "refactor", "revert", "style",
            "test",
        ];
        RulePolicy {
            rules: vec![
                Rule::HeaderMaxLength {
                    max: 100,
                    level: Level::Error,
                    message: None,
                },
                Rule::TypeEnum {
                    values: types.iter().map(|t| t.to_string()).collect(),
                    level: Level::Error,
                    message: None,
                },
                Rule::TypeEmpty {
                    level: Level::Error,
                    message: None,
                },
                Rule::SubjectEmpty {
                    level: Level::Error,
                    message: None,
                },
                Rule::SubjectFullStop {
                    value: default_full_stop(),
                    level: Level::Error,
                    message: None,
                },
                Rule::BodyLeadingBlank {
                    level: Level::Warning,
                    message: None,
                },
                Rule::BodyMaxLineLength {
                    max: 100,
                    level: Level::Error,
                    message: None,
                },
            ],
            default_ignores: true,
            ignores: Vec::new(),
        }
    }
}
