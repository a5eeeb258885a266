pub mod check;
pub mod status;
pub mod sync;
pub mod verify;

use crate::periods::pipeline::PipelineSummary;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }
}

pub fn attach_summary(report: &mut CommandReport, summary: &PipelineSummary) {
    report.detail(format!("lines={}", summary.lines));
    report.detail(format!("marker_lines={}", summary.marker_lines));
    report.detail(format!("skipped_lines={}", summary.skipped_lines));
    report.detail(format!("intervals={}", summary.intervals));
    report.detail(format!("resolved={}", summary.resolved));
    report.detail(format!("records={}", summary.bounded));
}
