use crate::error::PeriodError;
use chrono::{DateTime, Local, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};

/// The absolute instant a naive wall-clock value denotes under the host's
/// current timezone rules.
///
/// Clock tokens carry no timezone, so the host's present rules are applied
/// retroactively. This is a heuristic: periods logged on the other side of
/// a daylight-saving transition from "now" get the wrong offset. That
/// inaccuracy is inherited and accepted, not a defect to correct here.
pub fn local_instant(naive: NaiveDateTime) -> DateTime<Local> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        // DST fold: two instants share this wall-clock value; take the earlier.
        LocalResult::Ambiguous(earliest, _) => earliest,
        // DST gap: this wall-clock value never existed locally. Pin it with
        // the offset in effect right now, which is all the heuristic
        // promises anyway.
        LocalResult::None => {
            let offset = Local::now().offset().fix();
            Utc.from_utc_datetime(&(naive - offset)).with_timezone(&Local)
        }
    }
}

/// Seconds east of UTC in effect for `naive` under the heuristic above.
///
/// Measured as the gap between two readings of the same naive value: once
/// as local wall-clock time, once as if it were already UTC.
pub fn utc_offset_secs(naive: NaiveDateTime) -> i64 {
    let unixtime = local_instant(naive).timestamp();
    naive.and_utc().timestamp() - unixtime
}

/// Format an offset in seconds as an ISO timezone suffix, `±HH:MM`.
///
/// Offsets are expected to be rounded to a minute. By default stray
/// seconds are ignored; in strict mode they are an error.
pub fn iso_offset(seconds: i64, strict: bool) -> Result<String, PeriodError> {
    let sign = if seconds < 0 { '-' } else { '+' };
    let magnitude = seconds.unsigned_abs();

    let hours = magnitude / 3600;
    let minutes = (magnitude % 3600) / 60;

    if hours > 99 {
        return Err(PeriodError::OffsetRange { hours });
    }
    if strict && magnitude % 60 != 0 {
        return Err(PeriodError::OffsetPrecision { seconds });
    }

    Ok(format!("{sign}{hours:02}:{minutes:02}"))
}
