use crate::error::PeriodError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Lines carrying this literal are scanned for clock tokens; everything
/// else in a log file is ignored. The match is case-sensitive.
pub const MARKER: &str = "CLOCK";

/// Extract every non-empty `[`..`]` substring from a line, in order.
pub fn bracketed_tokens(line: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = line;
    while let Some(open) = rest.find('[') {
        rest = &rest[open + 1..];
        let Some(close) = rest.find(']') else {
            break;
        };
        if close > 0 {
            out.push(&rest[..close]);
        }
        rest = &rest[close + 1..];
    }
    out
}

fn malformed(token: &str, reason: impl Into<String>) -> PeriodError {
    PeriodError::Parse {
        token: token.to_string(),
        reason: reason.into(),
    }
}

/// Parse a clock token of the form `YYYY-MM-DD WWW HH:MM`.
///
/// The weekday word is cosmetic in org files and is only checked for
/// shape (three letters), never against the calendar. Seconds are always
/// zero in the result.
pub fn parse_clock_token(token: &str) -> Result<NaiveDateTime, PeriodError> {
    let mut fields = token.split_whitespace();
    let (Some(date), Some(weekday), Some(time), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed(token, "expected `YYYY-MM-DD WWW HH:MM`"));
    };

    if weekday.len() != 3 || !weekday.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(malformed(token, "weekday abbreviation must be three letters"));
    }

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|err| malformed(token, format!("bad date: {err}")))?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|err| malformed(token, format!("bad time: {err}")))?;

    Ok(date.and_time(time))
}

/// All clock timestamps on a line, in file order.
///
/// Callers are expected to pass only marker lines; any bracketed substring
/// that is not a well-formed clock token is a fatal parse error, since it
/// indicates a systematically malformed file rather than ordinary noise.
pub fn line_timestamps(line: &str) -> Result<Vec<NaiveDateTime>, PeriodError> {
    bracketed_tokens(line)
        .into_iter()
        .map(parse_clock_token)
        .collect()
}
