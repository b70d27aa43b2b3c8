//! Date-range activation windows
//!
//! The same rule serves the text banner and the image banner. Unparseable
//! bounds fail closed.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Which end of the window a value describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Evaluates windows in the site timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    offset: FixedOffset,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }
}

impl Scheduler {
    /// Scheduler for a site `utc_offset_minutes` east of UTC; out-of-range offsets fall back to UTC
    pub fn new(utc_offset_minutes: i32) -> Self {
        match utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
        {
            Some(offset) => Self { offset },
            None => {
                tracing::warn!(
                    "Invalid site UTC offset {} minutes, using UTC",
                    utc_offset_minutes
                );
                Self::default()
            }
        }
    }

    /// Whether `now` lies inside the closed window `[start, end]`
    pub fn is_active(&self, start: Option<&str>, end: Option<&str>, now: DateTime<Utc>) -> bool {
        let Ok(start) = self.bound(start, Bound::Start) else {
            return false;
        };
        let Ok(end) = self.bound(end, Bound::End) else {
            return false;
        };

        if start.is_some_and(|start| now < start) {
            return false;
        }
        if end.is_some_and(|end| now > end) {
            return false;
        }
        true
    }

    /// Parse a stored date; date-only values cover the whole day
    pub fn parse(&self, raw: &str, bound: Bound) -> Option<DateTime<Utc>> {
        let raw = raw.trim();

        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }

        let naive = NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .or_else(|| {
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
                match bound {
                    Bound::Start => date.and_hms_opt(0, 0, 0),
                    Bound::End => date.and_hms_opt(23, 59, 59),
                }
            })?;

        self.offset
            .from_local_datetime(&naive)
            .single()
            .map(|local| local.with_timezone(&Utc))
    }

    /// `Ok(None)` when unset, `Err(())` when set but unparseable
    fn bound(&self, raw: Option<&str>, bound: Bound) -> Result<Option<DateTime<Utc>>, ()> {
        match raw.map(str::trim).filter(|value| !value.is_empty()) {
            None => Ok(None),
            Some(value) => match self.parse(value, bound) {
                Some(parsed) => Ok(Some(parsed)),
                None => {
                    tracing::debug!("Unparseable {:?} date {:?}, banner inactive", bound, value);
                    Err(())
                }
            },
        }
    }
}

/// [`Scheduler::is_active`] in UTC
pub fn is_active(start: Option<&str>, end: Option<&str>, now: DateTime<Utc>) -> bool {
    Scheduler::default().is_active(start, end, now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_no_dates_always_active() {
        assert!(is_active(None, None, at("2024-06-01T12:00:00Z")));
        assert!(is_active(Some(""), Some("  "), at("1999-01-01T00:00:00Z")));
    }

    #[test]
    fn test_future_start_is_inactive() {
        assert!(!is_active(Some("2099-01-01"), None, at("2024-01-01T00:00:00Z")));
    }

    #[test]
    fn test_past_end_is_inactive() {
        assert!(!is_active(None, Some("2020-01-01"), at("2024-01-01T00:00:00Z")));
    }

    #[test]
    fn test_unparseable_bound_fails_closed() {
        let now = at("2024-01-01T00:00:00Z");
        assert!(!is_active(Some("next tuesday"), Some("2099-01-01"), now));
        assert!(!is_active(Some("2020-01-01"), Some("soon"), now));
        assert!(!is_active(Some("2024-13-45"), None, now));
    }

    #[test]
    fn test_closed_interval_is_inclusive() {
        let start = Some("2024-03-01T09:00:00Z");
        let end = Some("2024-03-01T17:00:00Z");
        assert!(is_active(start, end, at("2024-03-01T09:00:00Z")));
        assert!(is_active(start, end, at("2024-03-01T17:00:00Z")));
        assert!(!is_active(start, end, at("2024-03-01T08:59:59Z")));
        assert!(!is_active(start, end, at("2024-03-01T17:00:01Z")));
    }

    #[test]
    fn test_date_only_end_covers_whole_day() {
        let end = Some("2024-03-01");
        assert!(is_active(None, end, at("2024-03-01T23:59:59Z")));
        assert!(!is_active(None, end, at("2024-03-02T00:00:00Z")));
    }

    #[test]
    fn test_accepted_formats() {
        let scheduler = Scheduler::default();
        let expected = at("2024-05-10T08:30:00Z");
        for raw in [
            "2024-05-10T08:30:00Z",
            "2024-05-10T10:30:00+02:00",
            "2024-05-10T08:30",
            "2024-05-10T08:30:00",
            "2024-05-10 08:30",
            "2024-05-10 08:30:00",
        ] {
            assert_eq!(scheduler.parse(raw, Bound::Start), Some(expected), "{raw}");
        }
    }

    #[test]
    fn test_site_offset_applies_to_naive_dates() {
        let scheduler = Scheduler::new(120);
        assert_eq!(
            scheduler.parse("2024-05-10T10:30", Bound::Start),
            Some(at("2024-05-10T08:30:00Z"))
        );
        assert!(!scheduler.is_active(Some("2024-05-10T10:30"), None, at("2024-05-10T08:29:00Z")));
    }
}
