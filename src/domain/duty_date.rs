//! Duty-date resolution with the morning handover rule
//!
//! The on-duty roster for a calendar day technically starts the evening
//! before, so an early-morning lookup must still see the previous day's
//! assignment until the 08:00 handover.

use chrono::{DateTime, Duration, Local, NaiveDateTime, Timelike};

/// Local hour at which the duty assignment switches to the current day.
pub const MORNING_CUTOFF_HOUR: u32 = 8;

/// Resolve the portal query date (`DD.MM.YYYY`) for a lookup timestamp.
///
/// Defaults to the current local time when no timestamp is given. With
/// `morning_change` enabled, timestamps before 08:00:00 are shifted back by
/// one day; exactly 08:00:00 is not shifted.
pub fn resolve_query_date(timestamp: Option<DateTime<Local>>, morning_change: bool) -> String {
    let timestamp = timestamp.unwrap_or_else(Local::now);
    format_duty_date(timestamp.naive_local(), morning_change)
}

/// Pure core of [`resolve_query_date`] on a naive local timestamp.
pub fn format_duty_date(timestamp: NaiveDateTime, morning_change: bool) -> String {
    let effective = if morning_change && timestamp.hour() < MORNING_CUTOFF_HOUR {
        timestamp - Duration::hours(24)
    } else {
        timestamp
    };
    effective.format("%d.%m.%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn at(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(hour, min, sec)
            .unwrap()
    }

    #[rstest]
    #[case(0, 0, 0, "14.03.2024")]
    #[case(7, 59, 59, "14.03.2024")]
    #[case(8, 0, 0, "15.03.2024")]
    #[case(8, 0, 1, "15.03.2024")]
    #[case(12, 30, 0, "15.03.2024")]
    #[case(23, 59, 59, "15.03.2024")]
    fn morning_change_shifts_only_before_cutoff(
        #[case] hour: u32,
        #[case] min: u32,
        #[case] sec: u32,
        #[case] expected: &str,
    ) {
        assert_eq!(format_duty_date(at(hour, min, sec), true), expected);
    }

    #[rstest]
    #[case(0, 0, 0)]
    #[case(7, 59, 59)]
    #[case(8, 0, 0)]
    #[case(23, 59, 59)]
    fn without_morning_change_date_is_unchanged(
        #[case] hour: u32,
        #[case] min: u32,
        #[case] sec: u32,
    ) {
        assert_eq!(format_duty_date(at(hour, min, sec), false), "15.03.2024");
    }

    #[test]
    fn early_lookup_crosses_month_boundary() {
        let timestamp = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        assert_eq!(format_duty_date(timestamp, true), "29.02.2024");
    }
}
