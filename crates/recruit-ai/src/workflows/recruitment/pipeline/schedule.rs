use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::error::ScheduleIssue;

const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse an interview date. Offset-less values are read as UTC and bare dates as midnight UTC.
pub fn parse_interview_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub(crate) fn require_future(
    raw: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ScheduleIssue> {
    let raw = match raw {
        Some(value) if !value.trim().is_empty() => value,
        _ => return Err(ScheduleIssue::Absent),
    };

    let scheduled =
        parse_interview_date(raw).ok_or_else(|| ScheduleIssue::Unparseable(raw.to_string()))?;

    if scheduled <= now {
        return Err(ScheduleIssue::NotInFuture { scheduled, now });
    }

    Ok(scheduled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    #[test]
    fn accepts_offsets_naive_times_and_bare_dates() {
        assert_eq!(
            parse_interview_date("2026-11-02T10:30:00+05:30"),
            Some(at("2026-11-02T05:00:00Z"))
        );
        assert_eq!(
            parse_interview_date("2026-11-02T10:30"),
            Some(at("2026-11-02T10:30:00Z"))
        );
        assert_eq!(
            parse_interview_date(" 2026-11-02 "),
            Some(at("2026-11-02T00:00:00Z"))
        );
        assert_eq!(parse_interview_date("next tuesday"), None);
    }

    #[test]
    fn rejects_missing_and_past_dates() {
        let now = at("2026-10-19T09:00:00Z");

        assert_eq!(require_future(None, now), Err(ScheduleIssue::Absent));
        assert_eq!(require_future(Some("  "), now), Err(ScheduleIssue::Absent));
        assert_eq!(
            require_future(Some("soon"), now),
            Err(ScheduleIssue::Unparseable("soon".to_string()))
        );
        assert_eq!(
            require_future(Some("2026-10-19T09:00:00Z"), now),
            Err(ScheduleIssue::NotInFuture {
                scheduled: now,
                now,
            })
        );
        assert_eq!(
            require_future(Some("2026-10-20"), now),
            Ok(at("2026-10-20T00:00:00Z"))
        );
    }
}
