//! Markdown rendering of a report into the bot comment body.
//!
//! The output is assembled from fixed blocks:
//! - a collapsible "PR Title/Description Issue" section with one fixed line,
//! - a collapsible "Commits Related Issue" section listing each offender as
//!   `* <sha>=> <title>` followed by its error lines, then its warning lines,
//! - a trailer with links to the standards and the amend help page.
//!
//! The block text, glyphs and link labels are recognised by existing users
//! and tooling and must stay byte-stable.

use crate::models::{CommitOutcome, Report};

const PR_ISSUE_LINE: &str = " - ✖ Wrong PR Title/Empty Description";

const TRAILER: &str = "

--------
You may need to change the PR or [Commit messages][ref] according to [Shopistan Standards][cc].


[cc]: https://shopdev.atlassian.net/wiki/spaces/GEN/pages/16482354/Commit+lint+standards
[ref]: https://help.github.com/articles/changing-a-commit-message/
[repo]: https://github.com/shopistan/commitlint-bot
";

fn details_block(summary: &str, content: &str) -> String {
    format!(
        "\n<details>\n<summary><b>{}</b></summary>\n\n{}\n\n</details>",
        summary, content
    )
}

fn pr_block() -> String {
    details_block("PR Title/Description Issue", PR_ISSUE_LINE)
}

/// One offender: header line, then errors, then warnings.
fn commit_lines(c: &CommitOutcome) -> String {
    let mut out = format!("* {}=> {}\n", c.sha, c.title);
    for e in &c.errors {
        out.push_str(&format!("  - ✖ {}\n", e.message));
    }
    for w in &c.warnings {
        out.push_str(&format!("  - ⚠ {}\n", w.message));
    }
    out
}

/// Heading reads "Related"; the bot's earlier "Releted" misspelling is not kept.
fn commits_block(commits: &[CommitOutcome]) -> String {
    let details: String = commits.iter().map(commit_lines).collect();
    details_block("Commits Related Issue", &details)
}

/// Render the comment body, or `None` when there is nothing to report.
pub fn render(report: &Report) -> Option<String> {
    let mut out = match (report.pr.status, report.commits.is_empty()) {
        (true, true) => return None,
        (false, false) => pr_block() + &commits_block(&report.commits),
        (true, false) => commits_block(&report.commits),
        (false, true) => pr_block(),
    };
    out.push_str(TRAILER);
    Some(out)
}
