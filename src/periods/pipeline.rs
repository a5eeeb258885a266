use crate::periods::config::IntegritySettings;
use crate::periods::encode::{PeriodRecord, encode_period};
use crate::periods::guard::guard_durations;
use crate::periods::overlap::resolve_overlaps;
use crate::periods::span::{Clock, Interval, Spans};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub lines: usize,
    pub marker_lines: usize,
    pub skipped_lines: usize,
    pub intervals: usize,
    pub resolved: usize,
    pub bounded: usize,
}

/// Run the full extraction pipeline over one log file.
///
/// Stages run strictly left to right: lines → spans → overlap resolution →
/// duration guard → encoded records. Resolution runs before the guard, so
/// an over-long interval can still truncate its neighbour before being
/// dropped itself.
pub fn collect_periods(
    path: &Path,
    settings: &IntegritySettings,
    clock: &dyn Clock,
) -> Result<(Vec<PeriodRecord>, PipelineSummary)> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let mut spans = Spans::new(BufReader::new(file), clock);
    let mut intervals: Vec<Interval> = Vec::new();
    for span in &mut spans {
        intervals.push(span.with_context(|| format!("while scanning {}", path.display()))?);
    }
    let stats = spans.stats();

    let mut summary = PipelineSummary {
        lines: stats.lines,
        marker_lines: stats.marker_lines,
        skipped_lines: stats.skipped_lines,
        intervals: intervals.len(),
        ..PipelineSummary::default()
    };

    let resolved = resolve_overlaps(intervals, settings.overlap);
    summary.resolved = resolved.len();

    let bounded: Vec<Interval> =
        guard_durations(resolved, settings.duration_cap_secs, settings.duration).collect();
    summary.bounded = bounded.len();

    let records = bounded
        .iter()
        .map(|iv| encode_period(iv, settings.strict_offsets))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((records, summary))
}
