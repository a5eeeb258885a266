use anyhow::Result;
use std::path::Path;

use crate::commands::{CommandReport, attach_summary};
use crate::periods::config::load_config;
use crate::periods::paths::resolve_paths;
use crate::periods::pipeline::collect_periods;
use crate::periods::span::SystemClock;

const SAMPLE_RECORDS: usize = 5;

pub fn run(file: &Path) -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let cfg = load_config(&paths)?;
    let settings = cfg.integrity.settings()?;

    let mut report = CommandReport::new("check");
    report.detail(format!("file={}", file.display()));

    let (records, summary) = collect_periods(file, &settings, &SystemClock)?;
    attach_summary(&mut report, &summary);

    for record in records.iter().take(SAMPLE_RECORDS) {
        report.detail(format!(
            "record _id={} timestamp={} duration={}",
            record.key, record.timestamp, record.duration
        ));
    }
    if records.len() > SAMPLE_RECORDS {
        report.detail(format!("…and {} more", records.len() - SAMPLE_RECORDS));
    }
    if records.is_empty() {
        report.detail("no periods found; nothing would be stored");
    }

    Ok(report)
}
