use thiserror::Error;

/// Fatal failures of the period pipeline.
///
/// Line-level noise in a log file (wrong token counts, inverted or
/// zero-duration pairs) is filtered silently and never surfaces here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("unrecognized clock token `{token}`: {reason}")]
    Parse { token: String, reason: String },
    #[error("invalid {name} policy `{value}`; use `truncate` or `discard`")]
    Policy { name: &'static str, value: String },
    #[error("timezone offset of {hours} hours from UTC is implausibly large")]
    OffsetRange { hours: u64 },
    #[error("timezone offset of {seconds}s is not rounded to a whole minute")]
    OffsetPrecision { seconds: i64 },
}
