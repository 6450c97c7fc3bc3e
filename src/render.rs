use serde::Serialize;
use std::path::Path;

use crate::report::{rule, ReportState};

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub output_file: Option<&'a Path>,
    #[serde(flatten)]
    pub state: &'a ReportState,
}

fn section(title: &str, body: &str) -> Option<String> {
    if body.is_empty() {
        None
    } else {
        Some(format!("{}\n{}:\n\n{}\n\n", rule(), title, body))
    }
}

pub fn messages_section(state: &ReportState) -> Option<String> {
    section("MESSAGES", &state.messages_text())
}

pub fn errors_section(state: &ReportState) -> Option<String> {
    section("ERRORS", &state.errors_text())
}

/// Messages, then errors, then the full report.
pub fn file_contents(state: &ReportState) -> String {
    let mut out = String::new();
    if let Some(s) = messages_section(state) {
        out.push_str(&s);
    }
    if let Some(s) = errors_section(state) {
        out.push_str(&s);
    }
    out.push_str(&state.report_text());
    out
}

/// Console summary printed before the file is written.
pub fn format_summary_human(state: &ReportState) -> String {
    [messages_section(state), errors_section(state)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("\n")
}
