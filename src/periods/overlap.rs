use crate::error::PeriodError;
use crate::periods::span::Interval;
use std::str::FromStr;

/// What to do with the earlier of two overlapping intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Cut the earlier interval's tail back to the later one's start.
    #[default]
    Truncate,
    /// Drop the earlier interval entirely.
    Discard,
}

impl FromStr for OverlapPolicy {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truncate" => Ok(Self::Truncate),
            "discard" => Ok(Self::Discard),
            other => Err(PeriodError::Policy {
                name: "overlap",
                value: other.to_string(),
            }),
        }
    }
}

/// Sort intervals by `(start, end)` and repair chronological overlaps
/// between consecutive neighbours. The later interval's start always wins;
/// the final interval has no successor and is emitted unchanged.
///
/// Output order is sorted order, not input order.
pub fn resolve_overlaps(intervals: Vec<Interval>, policy: OverlapPolicy) -> Vec<Interval> {
    let mut sorted = intervals;
    sorted.sort_by_key(|iv| (iv.start, iv.end));

    let mut out = Vec::with_capacity(sorted.len());
    for pair in sorted.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.end <= b.start {
            out.push(a);
        } else if policy == OverlapPolicy::Truncate {
            out.push(Interval {
                start: a.start,
                end: b.start,
            });
        }
    }
    if let Some(last) = sorted.last() {
        out.push(*last);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{OverlapPolicy, resolve_overlaps};
    use crate::periods::span::Interval;
    use chrono::NaiveDateTime;

    fn iv(start: &str, end: &str) -> Interval {
        let parse = |t| NaiveDateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S").expect("datetime");
        Interval {
            start: parse(start),
            end: parse(end),
        }
    }

    #[test]
    fn truncation_cuts_the_earlier_tail() {
        let input = vec![
            iv("2014-01-10 10:00:00", "2014-01-10 11:00:00"),
            iv("2014-01-10 10:30:00", "2014-01-10 12:00:00"),
        ];
        let out = resolve_overlaps(input, OverlapPolicy::Truncate);
        assert_eq!(
            out,
            vec![
                iv("2014-01-10 10:00:00", "2014-01-10 10:30:00"),
                iv("2014-01-10 10:30:00", "2014-01-10 12:00:00"),
            ]
        );
    }

    #[test]
    fn discard_drops_the_earlier_interval() {
        let input = vec![
            iv("2014-01-10 10:00:00", "2014-01-10 11:00:00"),
            iv("2014-01-10 10:30:00", "2014-01-10 12:00:00"),
        ];
        let out = resolve_overlaps(input, OverlapPolicy::Discard);
        assert_eq!(out, vec![iv("2014-01-10 10:30:00", "2014-01-10 12:00:00")]);
    }

    #[test]
    fn chronological_input_passes_through_sorted() {
        let input = vec![
            iv("2014-01-10 12:00:00", "2014-01-10 13:00:00"),
            iv("2014-01-10 10:00:00", "2014-01-10 11:00:00"),
        ];
        let out = resolve_overlaps(input.clone(), OverlapPolicy::Truncate);
        assert_eq!(
            out,
            vec![
                iv("2014-01-10 10:00:00", "2014-01-10 11:00:00"),
                iv("2014-01-10 12:00:00", "2014-01-10 13:00:00"),
            ]
        );
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let input = vec![
            iv("2014-01-10 10:00:00", "2014-01-10 11:00:00"),
            iv("2014-01-10 11:00:00", "2014-01-10 12:00:00"),
        ];
        let out = resolve_overlaps(input.clone(), OverlapPolicy::Truncate);
        assert_eq!(out, input);
    }

    #[test]
    fn empty_and_singleton_inputs_are_stable() {
        assert!(resolve_overlaps(Vec::new(), OverlapPolicy::Truncate).is_empty());
        let one = vec![iv("2014-01-10 10:00:00", "2014-01-10 11:00:00")];
        assert_eq!(resolve_overlaps(one.clone(), OverlapPolicy::Discard), one);
    }

    #[test]
    fn policy_parsing_rejects_unknown_values() {
        assert_eq!("truncate".parse::<OverlapPolicy>(), Ok(OverlapPolicy::Truncate));
        assert_eq!(" Discard ".parse::<OverlapPolicy>(), Ok(OverlapPolicy::Discard));
        assert!("maybe".parse::<OverlapPolicy>().is_err());
    }
}
