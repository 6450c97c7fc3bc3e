//! Folds git status and remote queries for each located repository into
//! three ordered text streams: the full report, change notices, and errors.
//!
//! Every step returns its own [`ReportLines`] fragment. The orchestrating
//! call merges fragments in a fixed order, so the result is deterministic
//! for an unchanged tree apart from the trailing timestamp line.

use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::config::Markers;
use crate::git::{CommandResult, Git};
use crate::locate::{Discovery, RepoMarker};

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn rule() -> String {
    "-".repeat(70)
}

fn remote_rule() -> String {
    "- ".repeat(35)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportLines {
    pub report: Vec<String>,
    pub messages: Vec<String>,
    pub errors: Vec<String>,
}

impl ReportLines {
    pub fn merge(&mut self, other: ReportLines) {
        self.report.extend(other.report);
        self.messages.extend(other.messages);
        self.errors.extend(other.errors);
    }

    /// Errors always land in the report as well as in the error stream.
    fn push_error(&mut self, block: String) {
        self.report.push(block.clone());
        self.errors.push(block);
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportState {
    #[serde(flatten)]
    pub lines: ReportLines,
    pub repos_found: bool,
    pub generated_at: Option<NaiveDateTime>,
}

impl ReportState {
    pub fn report_text(&self) -> String {
        self.lines.report.join("\n")
    }

    pub fn messages_text(&self) -> String {
        self.lines.messages.join("\n")
    }

    pub fn errors_text(&self) -> String {
        self.lines.errors.join("\n")
    }

    pub fn merge(&mut self, lines: ReportLines) {
        self.lines.merge(lines);
    }

    /// Close the report: provenance trailer when repositories were found,
    /// otherwise the "none found" notice.
    pub fn finish(&mut self, root: &Path, generated_at: NaiveDateTime) {
        if self.repos_found {
            self.lines.report.push(format!("\n{}", rule()));
            self.lines.report.push(format!(
                "Created {} by {} version {}.",
                generated_at.format("%Y-%m-%d %H:%M:%S"),
                APP_NAME,
                APP_VERSION
            ));
        } else {
            self.lines
                .report
                .push(format!("No repositories found under '{}'.", root.display()));
        }
        self.generated_at = Some(generated_at);
    }
}

/// Format a failed query. `outcome` is the wrapper's result: `Ok` with a
/// non-zero exit, or `Err` when git could not be run at all.
pub fn error_block(header: &str, outcome: &Result<CommandResult>) -> String {
    let mut lines = vec![header.to_string()];
    match outcome {
        Ok(result) => {
            lines.push(format!("ERROR ({})", result.code_display()));
            if !result.stderr.trim().is_empty() {
                lines.push(format!("STDERR:\n{}\n", result.stderr.trim_end()));
            }
            lines.push(format!("STDOUT:\n{}\n", result.stdout.trim_end()));
        }
        Err(e) => {
            lines.push("ERROR: Failed to run git command.".to_string());
            lines.push(format!("{:#}\n", e));
        }
    }
    lines.join("\n")
}

fn error_header(args: &[&str], repo: &Path) -> String {
    format!("ERRORS running 'git {}' in '{}'.", args.join(" "), repo.display())
}

pub struct Aggregator<'a> {
    git: &'a Git,
    markers: &'a Markers,
}

impl<'a> Aggregator<'a> {
    pub fn new(git: &'a Git, markers: &'a Markers) -> Self {
        Self { git, markers }
    }

    /// Run `args` in `repo`, handing stdout to `on_success` or recording an
    /// error block.
    fn query(
        &self,
        repo: &Path,
        args: &[&str],
        lines: &mut ReportLines,
        on_success: impl FnOnce(&str, &mut ReportLines),
    ) {
        let outcome = self.git.run(repo, args);
        match &outcome {
            Ok(result) if result.success() => on_success(&result.stdout, lines),
            _ => lines.push_error(error_block(&error_header(args, repo), &outcome)),
        }
    }

    pub fn status_step(&self, marker: &RepoMarker) -> ReportLines {
        let repo = marker.work_dir();
        let mut lines = ReportLines::default();
        lines
            .report
            .push(format!("{}\nRepository: '{}'\n", rule(), repo.display()));

        self.query(repo, &["status", "-u"], &mut lines, |stdout, lines| {
            lines.report.push(stdout.to_string());
            if !stdout.contains(&self.markers.clean) {
                lines
                    .messages
                    .push(format!("Repo '{}' has changes.", repo.display()));
            }
        });

        lines
    }

    /// List the configured remotes and run the detail step for each, in the
    /// order git lists them.
    pub fn remotes_step(&self, marker: &RepoMarker) -> ReportLines {
        let mut lines = ReportLines::default();
        let mut remotes = Vec::new();

        self.query(marker.work_dir(), &["remote", "show"], &mut lines, |stdout, _| {
            remotes.extend(
                stdout
                    .lines()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from),
            );
        });

        for remote in &remotes {
            lines.merge(self.remote_step(marker, remote));
        }

        lines
    }

    pub fn remote_step(&self, marker: &RepoMarker, remote: &str) -> ReportLines {
        let repo = marker.work_dir();
        let mut lines = ReportLines::default();
        lines
            .report
            .push(format!("{}\nRemote: '{}'\n", remote_rule(), remote));

        self.query(repo, &["remote", "show", remote], &mut lines, |stdout, lines| {
            lines.report.push(stdout.to_string());
            if !stdout.contains(&self.markers.up_to_date) {
                lines.messages.push(format!(
                    "Repo '{}' remote '{}' has changes.",
                    repo.display(),
                    remote
                ));
            }
        });

        lines
    }

    pub fn repository(&self, marker: &RepoMarker) -> ReportLines {
        let mut lines = self.status_step(marker);
        lines.merge(self.remotes_step(marker));
        lines
    }
}

/// Finalized report for a tree without repositories. Needs no git binary.
pub fn empty_report(root: &Path, generated_at: NaiveDateTime) -> ReportState {
    let mut state = ReportState::default();
    state.finish(root, generated_at);
    state
}

/// Process every located repository in order and finalize the report.
pub fn build_report(
    aggregator: &Aggregator,
    root: &Path,
    discovery: &Discovery,
    generated_at: NaiveDateTime,
) -> ReportState {
    let mut state = ReportState::default();

    state.repos_found = matches!(discovery, Discovery::Found(_));
    for marker in discovery.markers() {
        eprintln!("Checking '{}'.", marker.work_dir().display());
        debug!(git_dir = %marker.git_dir().display(), "processing repository");
        state.merge(aggregator.repository(marker));
    }

    state.finish(root, generated_at);
    state
}
