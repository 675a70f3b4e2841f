//! Period boundary computation.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

use super::types::{PeriodError, PeriodName, PeriodRange, PeriodSpec};

/// Resolves a named period ending at `now`.
///
/// Calendar boundaries (midnight, first of month, quarter, year) are taken in
/// `tz` and converted back to UTC.
#[must_use]
pub fn resolve(name: PeriodName, now: DateTime<Utc>, tz: Tz) -> PeriodRange {
    let local = now.with_timezone(&tz).date_naive();

    let start = match name {
        PeriodName::Today => local_midnight(tz, local),
        PeriodName::Week => now - Duration::days(7),
        PeriodName::Month => local_midnight(tz, first_of_month(local.year(), local.month())),
        PeriodName::Quarter => {
            let quarter_month = (local.month0() / 3) * 3 + 1;
            local_midnight(tz, first_of_month(local.year(), quarter_month))
        }
        PeriodName::Year => local_midnight(tz, first_of_month(local.year(), 1)),
    };

    // A local midnight inside a DST gap can land after `now`.
    let range = PeriodRange::ending_at(start, now);
    debug!(period = %name, start = %range.start(), end = %range.end(), "resolved period");
    range
}

/// Resolves a caller-supplied period. Custom ranges are validated.
pub fn resolve_spec(
    spec: &PeriodSpec,
    now: DateTime<Utc>,
    tz: Tz,
) -> Result<PeriodRange, PeriodError> {
    match *spec {
        PeriodSpec::Named(name) => Ok(resolve(name, now, tz)),
        PeriodSpec::Custom { start, end } => PeriodRange::new(start, end),
    }
}

/// The period of equal length immediately preceding `range`.
#[must_use]
pub fn previous_period(range: &PeriodRange) -> PeriodRange {
    let start = range
        .start()
        .checked_sub_signed(range.duration())
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    PeriodRange::ending_at(start, range.start())
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn local_midnight(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::default());
    tz.from_local_datetime(&naive)
        .earliest()
        .map_or_else(|| naive.and_utc(), |dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    const RIYADH: Tz = chrono_tz::Asia::Riyadh;

    fn now() -> DateTime<Utc> {
        // 2026-10-14 12:30 in Riyadh (UTC+3)
        Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap()
    }

    #[rstest]
    #[case(PeriodName::Today, Utc.with_ymd_and_hms(2026, 10, 13, 21, 0, 0).unwrap())]
    #[case(PeriodName::Week, Utc.with_ymd_and_hms(2026, 10, 7, 9, 30, 0).unwrap())]
    #[case(PeriodName::Month, Utc.with_ymd_and_hms(2026, 9, 30, 21, 0, 0).unwrap())]
    #[case(PeriodName::Quarter, Utc.with_ymd_and_hms(2026, 9, 30, 21, 0, 0).unwrap())]
    #[case(PeriodName::Year, Utc.with_ymd_and_hms(2025, 12, 31, 21, 0, 0).unwrap())]
    fn test_named_period_boundaries(#[case] name: PeriodName, #[case] start: DateTime<Utc>) {
        let range = resolve(name, now(), RIYADH);

        assert_eq!(range.start(), start);
        assert_eq!(range.end(), now());
    }

    #[rstest]
    #[case(2, 1)]
    #[case(5, 4)]
    #[case(8, 7)]
    #[case(12, 10)]
    fn test_quarter_starts_on_quarter_month(#[case] month: u32, #[case] quarter_month: u32) {
        let now = Utc.with_ymd_and_hms(2026, month, 15, 12, 0, 0).unwrap();

        let range = resolve(PeriodName::Quarter, now, RIYADH);

        let local_start = range.start().with_timezone(&RIYADH);
        assert_eq!(local_start.month(), quarter_month);
        assert_eq!(local_start.day(), 1);
    }

    #[test]
    fn test_local_day_differs_from_utc_day() {
        // 22:00 UTC on Oct 14 is already Oct 15 in Riyadh.
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 22, 0, 0).unwrap();

        let range = resolve(PeriodName::Today, now, RIYADH);

        assert_eq!(range.start(), Utc.with_ymd_and_hms(2026, 10, 14, 21, 0, 0).unwrap());
    }

    #[test]
    fn test_custom_range_is_validated() {
        let start = Utc.with_ymd_and_hms(2026, 10, 2, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();

        let result = resolve_spec(&PeriodSpec::Custom { start, end }, now(), RIYADH);

        assert!(matches!(result, Err(PeriodError::InvalidRange { .. })));
    }

    #[test]
    fn test_previous_month_period() {
        let start = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 10, 11, 0, 0, 0).unwrap();
        let range = PeriodRange::new(start, end).unwrap();

        let previous = previous_period(&range);

        assert_eq!(previous.start(), Utc.with_ymd_and_hms(2026, 9, 21, 0, 0, 0).unwrap());
        assert_eq!(previous.end(), start);
    }

    proptest! {
        #[test]
        fn prop_previous_period_is_adjacent_and_equal_length(
            start_secs in 0i64..4_000_000_000,
            len_secs in 0i64..400_000_000,
        ) {
            let start = DateTime::<Utc>::from_timestamp(start_secs, 0).unwrap();
            let end = start + Duration::seconds(len_secs);
            let range = PeriodRange::new(start, end).unwrap();

            let previous = previous_period(&range);

            prop_assert_eq!(previous.end(), range.start());
            prop_assert_eq!(previous.duration(), range.duration());
        }

        #[test]
        fn prop_named_periods_end_at_now(secs in 0i64..4_000_000_000, idx in 0usize..5) {
            let names = [
                PeriodName::Today,
                PeriodName::Week,
                PeriodName::Month,
                PeriodName::Quarter,
                PeriodName::Year,
            ];
            let now = DateTime::<Utc>::from_timestamp(secs, 0).unwrap();

            let range = resolve(names[idx], now, RIYADH);

            prop_assert_eq!(range.end(), now);
            prop_assert!(range.start() <= now);
        }
    }
}
