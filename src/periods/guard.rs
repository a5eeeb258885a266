use crate::error::PeriodError;
use crate::periods::span::Interval;
use chrono::Duration;
use std::str::FromStr;

/// Longest credible single period. Org files can carry stale unclosed
/// clocks that turn into multi-day spans once closed; no real sitting
/// lasts a full day.
pub const DEFAULT_DURATION_CAP_SECS: i64 = 86_400;

/// What to do with an interval at or over the duration cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationPolicy {
    /// Drop the interval entirely.
    #[default]
    Discard,
    /// Cut the interval back to exactly the cap.
    Truncate,
}

impl FromStr for DurationPolicy {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discard" => Ok(Self::Discard),
            "truncate" => Ok(Self::Truncate),
            other => Err(PeriodError::Policy {
                name: "duration",
                value: other.to_string(),
            }),
        }
    }
}

/// Enforce the duration cap over an already-resolved sequence. The input
/// order is preserved; no re-sort happens here.
pub fn guard_durations(
    intervals: impl IntoIterator<Item = Interval>,
    cap_secs: i64,
    policy: DurationPolicy,
) -> impl Iterator<Item = Interval> {
    intervals.into_iter().filter_map(move |iv| {
        if iv.duration_secs() < cap_secs {
            return Some(iv);
        }
        match policy {
            DurationPolicy::Discard => None,
            DurationPolicy::Truncate => Some(Interval {
                start: iv.start,
                end: iv.start + Duration::seconds(cap_secs),
            }),
        }
    })
}
