//! Wall-clock formatting at a fixed UTC offset.

use chrono::{DateTime, FixedOffset, Utc};

/// Converts UTC epoch seconds into `HH:MM:SS` at `offset`.
///
/// Returns `None` when the timestamp is outside the range chrono can represent.
pub fn epoch_to_clock(secs: i64, offset: FixedOffset) -> Option<String> {
    DateTime::from_timestamp(secs, 0)
        .map(|utc| utc.with_timezone(&offset).format("%H:%M:%S").to_string())
}

/// Short label for an offset, e.g. `UTC+6`, `UTC-5` or `UTC+5:30`.
pub fn offset_label(offset: FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    if secs == 0 {
        return "UTC".to_string();
    }

    let sign = if secs < 0 { '-' } else { '+' };
    let minutes = secs.unsigned_abs() / 60;
    let (hours, minutes) = (minutes / 60, minutes % 60);

    if minutes == 0 {
        format!("UTC{sign}{hours}")
    } else {
        format!("UTC{sign}{hours}:{minutes:02}")
    }
}

/// Long human-readable "last refreshed" stamp, e.g.
/// `Friday, October 16, 2026, 20:05 (UTC+6)`.
pub fn refresh_stamp(now: DateTime<Utc>, offset: FixedOffset) -> String {
    let local = now.with_timezone(&offset);
    format!("{} ({})", local.format("%A, %B %-d, %Y, %H:%M"), offset_label(offset))
}
