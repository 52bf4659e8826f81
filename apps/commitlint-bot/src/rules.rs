//! Commit message evaluation.
//!
//! `RuleEvaluator` is the seam the report builder depends on. The bundled
//! `PolicyEvaluator` interprets a `RulePolicy` against the conventional
//! `type(scope)!: subject` header shape. Issues are emitted in policy order.

use crate::models::rules::{Level, Rule, RulePolicy, DEFAULT_IGNORES};
use crate::models::{Issue, Outcome};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w*)(?:\(([^()]*)\))?!?: (.*)$").unwrap());

/// Evaluates a single commit message. Implementations must be deterministic.
pub trait RuleEvaluator: Sync {
    fn evaluate(&self, message: &str) -> Outcome;
}

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("cannot read rules file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("rules file {path} is not valid: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid header-pattern or ignore regex: {0}")]
    Regex(#[from] regex::Error),
}

/// Load a rule policy from TOML, or YAML when the extension says so.
pub fn load_policy(path: &Path) -> Result<RulePolicy, RulesError> {
    let s = fs::read_to_string(path).map_err(|source| RulesError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let parsed = if is_yaml {
        serde_yaml::from_str::<RulePolicy>(&s).map_err(|e| e.to_string())
    } else {
        toml::from_str::<RulePolicy>(&s).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| RulesError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

/// Split view of a commit message.
struct Parsed<'a> {
    header: &'a str,
    kind: Option<&'a str>,
    subject: Option<&'a str>,
    /// Lines following the header, blank separator included.
    rest: Vec<&'a str>,
}

fn parse(message: &str) -> Parsed<'_> {
    let mut lines = message.lines();
    let header = lines.next().unwrap_or("");
    let rest: Vec<&str> = lines.collect();
    let (kind, subject) = match HEADER_RE.captures(header) {
        Some(c) => (
            c.get(1).map(|m| m.as_str()).filter(|s| !s.is_empty()),
            c.get(3).map(|m| m.as_str()).filter(|s| !s.trim().is_empty()),
        ),
        None => (None, None),
    };
    Parsed {
        header,
        kind,
        subject,
        rest,
    }
}

/// Evaluator backed by a declarative rule policy.
pub struct PolicyEvaluator {
    rules: Vec<Rule>,
    patterns: Vec<Option<Regex>>,
    ignores: Vec<Regex>,
}

impl PolicyEvaluator {
    /// Build an evaluator, compiling every `header-pattern` and ignore regex
    /// up front.
    pub fn new(policy: RulePolicy) -> Result<Self, RulesError> {
        let defaults: &[&str] = if policy.default_ignores {
            &DEFAULT_IGNORES
        } else {
            &[]
        };
        let ignores = defaults
            .iter()
            .copied()
            .chain(policy.ignores.iter().map(String::as_str))
            .map(Regex::new)
            .collect::<Result<Vec<_>, _>>()?;
        let patterns = policy
            .rules
            .iter()
            .map(|r| match r {
                Rule::HeaderPattern { regex, .. } => Regex::new(regex).map(Some),
                _ => Ok(None),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PolicyEvaluator {
            rules: policy.rules,
            patterns,
            ignores,
        })
    }

    pub fn is_ignored(&self, message: &str) -> bool {
        self.ignores.iter().any(|re| re.is_match(message))
    }

    /// Built-in message for a violated rule, or `None` when it holds.
    fn violation(&self, rule: &Rule, pattern: Option<&Regex>, msg: &Parsed<'_>) -> Option<String> {
        match rule {
            Rule::HeaderMaxLength { max, .. } => {
                let len = msg.header.chars().count();
                (len > *max).then(|| {
                    format!(
                        "header must not be longer than {} characters, current length is {}",
                        max, len
                    )
                })
            }
            Rule::HeaderMinLength { min, .. } => {
                let len = msg.header.chars().count();
                (len < *min).then(|| {
                    format!(
                        "header must not be shorter than {} characters, current length is {}",
                        min, len
                    )
                })
            }
            Rule::HeaderPattern { regex, .. } => {
                let re = pattern?;
                (!re.is_match(msg.header)).then(|| format!("header must match pattern {}", regex))
            }
            Rule::TypeEnum { values, .. } => {
                let kind = msg.kind?;
                (!values.iter().any(|v| v == kind))
                    .then(|| format!("type must be one of [{}]", values.join(", ")))
            }
            Rule::TypeEmpty { .. } => msg.kind.is_none().then(|| "type may not be empty".into()),
            Rule::SubjectEmpty { .. } => msg
                .subject
                .is_none()
                .then(|| "subject may not be empty".into()),
            Rule::SubjectFullStop { value, .. } => {
                let subject = msg.subject?;
                subject
                    .ends_with(value.as_str())
                    .then(|| "subject may not end with full stop".into())
            }
            Rule::BodyLeadingBlank { .. } => {
                let first = msg.rest.first()?;
                (!first.trim().is_empty()).then(|| "body must have leading blank line".into())
            }
            Rule::BodyMaxLineLength { max, .. } => msg
                .rest
                .iter()
                .any(|l| l.chars().count() > *max)
                .then(|| format!("body's lines must not be longer than {} characters", max)),
        }
    }
}

impl RuleEvaluator for PolicyEvaluator {
    fn evaluate(&self, message: &str) -> Outcome {
        let mut out = Outcome::default();
        if self.is_ignored(message) {
            out.valid = true;
            return out;
        }
        let parsed = parse(message);
        for (rule, pattern) in self.rules.iter().zip(self.patterns.iter()) {
            let Some(builtin) = self.violation(rule, pattern.as_ref(), &parsed) else {
                continue;
            };
            let issue = Issue {
                rule: rule.name().to_string(),
                message: rule.message().map(str::to_string).unwrap_or(builtin),
            };
            match rule.level() {
                Level::Error => out.errors.push(issue),
                Level::Warning => out.warnings.push(issue),
            }
        }
        out.valid = out.errors.is_empty();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn default_eval() -> PolicyEvaluator {
        PolicyEvaluator::new(RulePolicy::default()).unwrap()
    }

    #[test]
    fn test_conventional_message_passes_defaults() {
        let out = default_eval().evaluate("feat(api): add paging\n\nSupports cursors.");
        assert!(out.valid);
        assert!(!out.has_issues());
    }

    #[test]
    fn test_missing_type_and_subject_are_errors() {
        let out = default_eval().evaluate("updated stuff");
        assert!(!out.valid);
        let rules: Vec<_> = out.errors.iter().map(|i| i.rule.as_str()).collect();
        assert_eq!(rules, vec!["type-empty", "subject-empty"]);
        assert_eq!(out.errors[0].message, "type may not be empty");
    }

    #[test]
    fn test_long_header_and_unknown_type() {
        let header = format!("feature: {}", "x".repeat(120));
        let out = default_eval().evaluate(&header);
        assert!(!out.valid);
        assert_eq!(
            out.errors[0].message,
            "header must not be longer than 100 characters, current length is 129"
        );
        assert!(out.errors[1].message.starts_with("type must be one of [build, chore"));
    }

    #[test]
    fn test_warning_only_keeps_message_valid() {
        let out = default_eval().evaluate("fix: handle null\nno blank line here");
        assert!(out.valid);
        assert!(out.errors.is_empty());
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].message, "body must have leading blank line");
    }

    #[test]
    fn test_message_override_and_warn_alias() {
        let policy: RulePolicy = toml::from_str(
            r#"
[[rules]]
kind = "subject-full-stop"
level = "warn"
message = "drop the trailing dot"
            "#,
        )
        .unwrap();
        let out = PolicyEvaluator::new(policy).unwrap().evaluate("fix: stuff.");
        assert!(out.valid);
        assert_eq!(out.warnings[0].message, "drop the trailing dot");
    }

    #[test]
    fn test_header_pattern_and_bad_regex() {
        let policy: RulePolicy = toml::from_str(
            r#"
[[rules]]
kind = "header-pattern"
regex = "^[A-Z]+-[0-9]+ "
            "#,
        )
        .unwrap();
        let ev = PolicyEvaluator::new(policy).unwrap();
        assert!(ev.evaluate("ABC-12 fix it").valid);
        assert!(!ev.evaluate("fix it").valid);

        let bad: RulePolicy = toml::from_str(
            r#"
[[rules]]
kind = "header-pattern"
regex = "(unclosed"
            "#,
        )
        .unwrap();
        assert!(matches!(PolicyEvaluator::new(bad), Err(RulesError::Regex(_))));
    }

    #[test]
    fn test_generated_messages_are_ignored_by_default() {
        let ev = default_eval();
        for msg in [
            "Merge branch 'main' into feature",
            "Merge pull request #12 from acme/x",
            "Merge remote-tracking branch 'origin/main'",
            "Revert \"feat: add x\"\n\nThis reverts commit abc.",
            "fixup! feat: add x",
            "squash! fix: y",
            "Automatic merge from release",
        ] {
            let out = ev.evaluate(msg);
            assert!(out.valid, "{}", msg);
            assert!(!out.has_issues(), "{}", msg);
        }
        // only the leading keyword is ignored
        assert!(!ev.evaluate("merged stuff").valid);
    }

    #[test]
    fn test_default_ignores_can_be_disabled_and_extended() {
        let policy: RulePolicy = toml::from_str(
            r#"
default_ignores = false
ignores = ["^WIP"]

[[rules]]
kind = "type-empty"
            "#,
        )
        .unwrap();
        let ev = PolicyEvaluator::new(policy).unwrap();
        assert!(!ev.evaluate("Merge branch 'main' into feature").valid);
        assert!(ev.evaluate("WIP poke").valid);

        let bad: RulePolicy = toml::from_str("ignores = [\"(oops\"]").unwrap();
        assert!(matches!(PolicyEvaluator::new(bad), Err(RulesError::Regex(_))));
    }

    #[test]
    fn test_load_policy_yaml_and_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rules.yaml");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(
            f,
            "{}",
            r#"
rules:
  - kind: header-max-length
    max: 10
    level: warning
            "#
        )
        .unwrap();
        let policy = load_policy(&path).unwrap();
        assert_eq!(policy.rules.len(), 1);
        assert_eq!(policy.rules[0].level(), Level::Warning);

        let missing = load_policy(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(RulesError::Io { .. })));
    }
}
