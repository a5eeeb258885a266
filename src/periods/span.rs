use crate::periods::clock::{self, MARKER};
use anyhow::Result;
use chrono::{Local, NaiveDateTime, Timelike};
use std::io::BufRead;

/// A work period as found in the log: a strictly positive span of
/// wall-clock time. Sub-second components are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    pub fn duration_secs(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}

/// Source of "now" for closing open clock lines. Injected so that tests
/// can pin the current instant.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpanStats {
    pub lines: usize,
    pub marker_lines: usize,
    pub skipped_lines: usize,
}

/// Lazy pass over a line source, yielding one `Interval` per usable marker
/// line, in file order. Restartable only by reopening the source.
pub struct Spans<'c, B> {
    lines: std::io::Lines<B>,
    clock: &'c dyn Clock,
    stats: SpanStats,
}

impl<'c, B: BufRead> Spans<'c, B> {
    pub fn new(reader: B, clock: &'c dyn Clock) -> Self {
        Self {
            lines: reader.lines(),
            clock,
            stats: SpanStats::default(),
        }
    }

    /// Counters accumulated so far; complete once the iterator is drained.
    pub fn stats(&self) -> SpanStats {
        self.stats
    }
}

impl<B: BufRead> Iterator for Spans<'_, B> {
    type Item = Result<Interval>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            self.stats.lines += 1;
            if !line.contains(MARKER) {
                continue;
            }
            self.stats.marker_lines += 1;

            let stamps = match clock::line_timestamps(&line) {
                Ok(stamps) => stamps,
                Err(err) => return Some(Err(err.into())),
            };

            let (start, end) = match stamps.len() {
                // An unclosed span: the period is still running, so it is
                // closed with the current instant.
                1 => (stamps[0], self.clock.now()),
                2 => (stamps[0], stamps[1]),
                // 0 or 3+ tokens is a corrupt line, not worth aborting for.
                _ => {
                    self.stats.skipped_lines += 1;
                    continue;
                }
            };

            // Inverted pairs are corrupt; equal pairs are clock-on/clock-off
            // within the same minute, a point rather than a period.
            if end <= start {
                self.stats.skipped_lines += 1;
                continue;
            }

            return Some(Ok(Interval { start, end }));
        }
    }
}
