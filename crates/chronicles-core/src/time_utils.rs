use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::debug;

// ── Spreadsheet serial dates ──────────────────────────────────────────────────

/// Days between the spreadsheet serial epoch (1899-12-30) and the Unix epoch.
pub const SERIAL_EPOCH_OFFSET_DAYS: i64 = 25_569;

const MILLIS_PER_DAY: i64 = 86_400 * 1_000;

/// Convert a spreadsheet serial day number into a UTC [`DateTime`].
///
/// Computes `(serial - 25569) * 86400 * 1000` milliseconds since the Unix
/// epoch. Returns `None` when the arithmetic overflows or the instant is
/// outside the range chrono can represent.
///
/// ```
/// use chronicles_core::time_utils::serial_to_datetime;
///
/// let dt = serial_to_datetime(45930).unwrap();
/// assert_eq!(dt.format("%Y-%m-%d").to_string(), "2025-10-01");
/// ```
pub fn serial_to_datetime(serial: i64) -> Option<DateTime<Utc>> {
    let millis = serial
        .checked_sub(SERIAL_EPOCH_OFFSET_DAYS)?
        .checked_mul(MILLIS_PER_DAY)?;
    DateTime::from_timestamp_millis(millis)
}

/// Calendar-day key (`YYYY-MM-DD`, UTC) for a timestamp.
pub fn day_key(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

// ── Filter bounds ─────────────────────────────────────────────────────────────

/// Parse a date-range bound as entered in a date picker or on the CLI.
///
/// Accepts `YYYY-MM-DD` (interpreted as UTC midnight) and RFC 3339
/// date-times (a trailing `Z` is allowed). Empty input and anything
/// unrecognised yield `None`, which callers treat as "unbounded".
pub fn parse_date_bound(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let naive = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&naive));
    }

    let normalised = match s.strip_suffix('Z') {
        Some(stripped) => format!("{}+00:00", stripped),
        None => s.to_string(),
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Some(dt.with_timezone(&Utc));
    }

    const FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];
    for fmt in FORMATS {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    debug!("ignoring unparseable date bound \"{}\"", s);
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────
