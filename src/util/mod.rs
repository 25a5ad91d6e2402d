use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Format used by `<input type="datetime-local">`.
pub(crate) const LOCAL_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Absolute timestamp → wall-clock value for a datetime-local input in `tz`.
pub(crate) fn to_local_input<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format(LOCAL_INPUT_FORMAT).to_string()
}

/// Wall-clock value from a datetime-local input, interpreted in `tz`, back to
/// an absolute timestamp. Blank input means "no reminder".
///
/// Browsers may include seconds (`HH:MM:SS`); both forms are accepted. For a
/// wall-clock time that occurs twice (DST fall-back) the earlier instant wins;
/// a time skipped by DST is rejected.
pub(crate) fn from_local_input<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(value, LOCAL_INPUT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// e.g. "May 1, 2024, 10:00"
pub(crate) fn format_long(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&chrono::Local)
        .format("%B %-d, %Y, %H:%M")
        .to_string()
}

/// e.g. "May 1, 2024"
pub(crate) fn format_short(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&chrono::Local)
        .format("%b %-d, %Y")
        .to_string()
}

pub(crate) fn paragraphs(content: &str) -> Vec<String> {
    content.split('\n').map(str::to_string).collect()
}

/// Cleared when the owning view is torn down; async work checks it before
/// touching view state.
#[derive(Clone, Debug)]
pub(crate) struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub(crate) fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn kill(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .expect("valid rfc3339")
            .with_timezone(&Utc)
    }

    #[test]
    fn test_to_local_input_applies_offset() {
        let tz = FixedOffset::west_opt(3 * 3600).expect("offset");
        assert_eq!(
            to_local_input(&utc("2024-05-01T12:30:00Z"), &tz),
            "2024-05-01T09:30"
        );
    }

    #[test]
    fn test_reminder_roundtrip_to_the_minute() {
        let original = utc("2024-11-03T05:45:27.123Z");
        let to_minute = original
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .expect("truncate");
        for offset_hours in [-11, -3, 0, 2, 5, 14] {
            let tz = FixedOffset::east_opt(offset_hours * 3600).expect("offset");
            let shown = to_local_input(&original, &tz);
            let back = from_local_input(&shown, &tz).expect("parses back");
            assert_eq!(back, to_minute);
        }
    }

    #[test]
    fn test_from_local_input_accepts_seconds() {
        let tz = FixedOffset::east_opt(0).expect("offset");
        assert_eq!(
            from_local_input("2024-05-01T09:30:15", &tz),
            Some(utc("2024-05-01T09:30:15Z"))
        );
    }

    #[test]
    fn test_from_local_input_blank_and_garbage() {
        let tz = FixedOffset::east_opt(0).expect("offset");
        assert_eq!(from_local_input("", &tz), None);
        assert_eq!(from_local_input("   ", &tz), None);
        assert_eq!(from_local_input("tomorrow", &tz), None);
    }

    #[test]
    fn test_paragraphs_split_on_newlines() {
        assert_eq!(paragraphs("milk\neggs"), vec!["milk", "eggs"]);
        assert_eq!(paragraphs(""), vec![""]);
    }

    #[test]
    fn test_liveness_kill_is_shared() {
        let l = Liveness::new();
        let clone = l.clone();
        assert!(clone.is_alive());
        l.kill();
        assert!(!clone.is_alive());
    }
}
