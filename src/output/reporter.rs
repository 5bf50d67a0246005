use super::*;
use crate::analysis::{AnalysisReport, RepoRanking};
use anyhow::{Context, Result};
use colored::*;
use std::fmt::Write as _;
use std::fs;
use tracing::info;

pub struct Reporter {
    format: OutputFormat,
    output_path: Option<String>,
}

impl Reporter {
    pub fn new(format: &str, output_path: Option<&str>) -> Self {
        let format = OutputFormat::from(format);
        let output_path = output_path.map(|path| add_file_extension(path, &format));

        Self {
            format,
            output_path,
        }
    }

    pub fn render(&self, report: &AnalysisReport<'_>) -> Result<String> {
        match self.format {
            // Terminal styling only goes to stdout, never into a saved file.
            OutputFormat::Text => Ok(render_text(report, self.output_path.is_none())),
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).context("Failed to serialize report")
            }
        }
    }

    /// Writes the report to the configured file, or stdout if there is none.
    pub fn generate_report(&self, report: &AnalysisReport<'_>) -> Result<()> {
        let content = self.render(report)?;

        match &self.output_path {
            Some(path) => {
                fs::write(path, content)
                    .with_context(|| format!("Failed to write report to {}", path))?;
                info!("Report saved to {}", path);
            }
            None => println!("{}", content),
        }
        Ok(())
    }
}

fn heading(text: &str, styled: bool) -> String {
    if styled {
        text.bright_cyan().bold().to_string()
    } else {
        text.to_string()
    }
}

fn entity_name(text: &str, styled: bool) -> String {
    if styled {
        text.bright_white().to_string()
    } else {
        text.to_string()
    }
}

fn render_text(report: &AnalysisReport<'_>, styled: bool) -> String {
    let mut out = String::new();
    let n = report.top_n;

    let _ = writeln!(
        out,
        "\n{}",
        heading(
            &format!("Top {} active non-bot users with most pull requests:", n),
            styled
        )
    );
    if report.active_users_by_pull_requests.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (rank, entry) in report.active_users_by_pull_requests.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {}: {} PRs, {} commits",
            rank + 1,
            entity_name(&entry.user.username, styled),
            entry.pr_count,
            entry.commit_count
        );
    }

    write_repo_section(
        &mut out,
        &format!("Top {} repositories with most watch events:", n),
        &report.repos_by_watch_events,
        "watch events",
        styled,
    );
    write_repo_section(
        &mut out,
        &format!("Top {} repositories with most commits:", n),
        &report.repos_by_commits,
        "commits",
        styled,
    );

    out
}

fn write_repo_section(
    out: &mut String,
    title: &str,
    entries: &[RepoRanking<'_>],
    unit: &str,
    styled: bool,
) {
    let _ = writeln!(out, "\n{}", heading(title, styled));
    if entries.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (rank, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {}: {} {}",
            rank + 1,
            entity_name(&entry.repo.name, styled),
            entry.count,
            unit
        );
    }
}
