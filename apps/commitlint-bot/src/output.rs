//! Output rendering for the `check` and `run` commands.
//!
//! Supports `human` (default), `json`, and for reports `markdown`, which
//! prints the exact comment body the bot would post.

use crate::format;
use crate::models::github::StatusState;
use crate::models::Report;
use crate::pipeline::RunOutcome;
use crate::comments::CommentAction;
use owo_colors::OwoColorize;

pub fn use_colors(output: &str) -> bool {
    output == "human" && std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix(color: bool) -> String {
    if color {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix(color: bool) -> String {
    if color {
        "note:".cyan().bold().to_string()
    } else {
        "note:".to_string()
    }
}

/// Human-readable lines for a report; no trailing newline.
pub fn compose_report_human(report: &Report, color: bool) -> String {
    let mut lines: Vec<String> = Vec::new();
    if !report.pr.status {
        let mut what = Vec::new();
        if !report.pr.title_ok {
            what.push("title does not match ABC-123: ...");
        }
        if !report.pr.description_ok {
            what.push("description is empty");
        }
        let icon = if color { "✖".red().to_string() } else { "✖".to_string() };
        lines.push(format!("{} pull request: {}", icon, what.join(", ")));
    }
    for c in &report.commits {
        let sha = if color { c.sha.bold().to_string() } else { c.sha.clone() };
        lines.push(format!("{} {}", sha, c.title));
        for e in &c.errors {
            let icon = if color { "✖".red().to_string() } else { "✖".to_string() };
            lines.push(format!("  {} {} ❲{}❳", icon, e.message, e.rule));
        }
        for w in &c.warnings {
            let icon = if color { "▲".yellow().to_string() } else { "▲".to_string() };
            lines.push(format!("  {} {} ❲{}❳", icon, w.message, w.rule));
        }
    }
    let summary = format!(
        "— Summary — valid={} problems={} warnings={} flagged_commits={}",
        report.valid,
        report.tally.errors,
        report.tally.warnings,
        report.commits.len()
    );
    lines.push(if color { summary.bold().to_string() } else { summary });
    lines.join("\n")
}

/// Print a locally built report in the requested format.
pub fn print_report(report: &Report, output: &str) -> Result<(), serde_json::Error> {
    match output {
        "json" => println!("{}", serde_json::to_string_pretty(report)?),
        "markdown" => {
            if let Some(body) = format::render(report) {
                print!("{}", body);
            }
        }
        _ => println!("{}", compose_report_human(report, use_colors(output))),
    }
    Ok(())
}

fn describe_action(action: &CommentAction) -> String {
    match action {
        CommentAction::Create { .. } => "created bot comment".to_string(),
        CommentAction::Edit { id, .. } => format!("edited bot comment {}", id),
        CommentAction::Delete { id } => format!("deleted bot comment {}", id),
        CommentAction::Keep => "no comment needed".to_string(),
    }
}

/// Print the result of a pipeline run.
pub fn print_run(outcome: &RunOutcome, output: &str) -> Result<(), serde_json::Error> {
    if output == "json" {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }
    let color = use_colors(output);
    println!("{}", compose_report_human(&outcome.report, color));
    let state = outcome.status.state.to_string();
    let state = match (color, outcome.status.state) {
        (true, StatusState::Success) => state.green().bold().to_string(),
        (true, _) => state.red().bold().to_string(),
        (false, _) => state,
    };
    println!("status: {} ({})", state, outcome.status.description);
    println!("comment: {}", describe_action(&outcome.action));
    Ok(())
}
