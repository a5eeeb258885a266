use crate::error::PeriodError;
use crate::periods::offset;
use crate::periods::span::Interval;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// The storage-ready form of one period. Immutable once built; the store
/// driver batches these without ever mutating them.
///
/// `key` doubles as the document identifier, which is why it serializes
/// as `_id` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// UTC ISO instant of the period start, e.g. `2014-01-10T10:20:00Z`.
    #[serde(rename = "_id")]
    pub key: String,
    /// Local ISO instant of the same start, e.g. `2014-01-10T11:20:00+01:00`.
    pub timestamp: String,
    /// Whole elapsed seconds, floored.
    pub duration: i64,
    /// Reserved for future use; always empty.
    pub category: Vec<String>,
}

pub fn encode_period(interval: &Interval, strict_offsets: bool) -> Result<PeriodRecord, PeriodError> {
    let tz = offset::iso_offset(offset::utc_offset_secs(interval.start), strict_offsets)?;

    let key = offset::local_instant(interval.start)
        .with_timezone(&Utc)
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string();
    let timestamp = format!("{}{tz}", interval.start.format("%Y-%m-%dT%H:%M:%S"));

    Ok(PeriodRecord {
        key,
        timestamp,
        duration: interval.duration_secs(),
        category: Vec::new(),
    })
}
