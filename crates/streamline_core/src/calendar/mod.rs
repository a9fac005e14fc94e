//! Calendar computations for the month view and per-day lookups.
//!
//! # Responsibility
//! - Carry timezone and first-weekday settings explicitly into every
//!   calendar computation.
//! - Define the half-open day range used by all per-day queries.
//!
//! # Invariants
//! - No function here reads ambient locale or timezone state; callers pass
//!   a `CalendarConfig`.
//! - A day range is `[start_of_day(d), start_of_day(d + 1))`.

pub mod day_filter;
pub mod month_grid;

use chrono::{
    DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday,
};

const GAP_SCAN_STEP_SECONDS: i64 = 15 * 60;
const GAP_SCAN_STEPS: i64 = 24 * 60 * 60 / GAP_SCAN_STEP_SECONDS;

/// Timezone and week layout used by calendar computations.
#[derive(Debug, Clone)]
pub struct CalendarConfig<Tz: TimeZone> {
    timezone: Tz,
    first_weekday: Weekday,
}

impl<Tz: TimeZone> CalendarConfig<Tz> {
    pub fn new(timezone: Tz, first_weekday: Weekday) -> Self {
        Self {
            timezone,
            first_weekday,
        }
    }

    pub fn timezone(&self) -> &Tz {
        &self.timezone
    }

    /// Weekday shown in the leftmost grid column.
    pub fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    /// Calendar day containing `instant` in this calendar's timezone.
    pub fn date_of(&self, instant: &DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }

    /// Earliest instant of `day` in this calendar's timezone.
    ///
    /// Ambiguous midnights resolve to the earlier instant. When midnight is
    /// skipped by a DST transition, the first existing local second of the
    /// day is used.
    pub fn start_of_day(&self, day: NaiveDate) -> DateTime<Utc> {
        let midnight = day.and_time(NaiveTime::MIN);
        self.earliest_local(&midnight)
            .or_else(|| self.first_instant_after_gap(midnight))
            .unwrap_or_else(|| midnight.and_utc())
    }

    /// Half-open instant range covering `day`.
    pub fn day_range(&self, day: NaiveDate) -> DayRange {
        let start = self.start_of_day(day);
        let end = day
            .succ_opt()
            .map_or(DateTime::<Utc>::MAX_UTC, |next| self.start_of_day(next));
        DayRange { start, end }
    }

    /// Quarter-hour steps locate the end of the gap, then bisection narrows it to
    /// the second. Transitions in tzdata fall on whole seconds.
    fn first_instant_after_gap(&self, midnight: NaiveDateTime) -> Option<DateTime<Utc>> {
        let day = midnight.date();
        let at = |seconds: i64| midnight + Duration::seconds(seconds);

        let mut missing = 0;
        let (mut existing, mut found) = (1..=GAP_SCAN_STEPS)
            .map(|step| step * GAP_SCAN_STEP_SECONDS)
            .take_while(|seconds| at(*seconds).date() == day)
            .find_map(|seconds| match self.earliest_local(&at(seconds)) {
                Some(instant) => Some((seconds, instant)),
                None => {
                    missing = seconds;
                    None
                }
            })?;

        while existing - missing > 1 {
            let mid = missing + (existing - missing) / 2;
            match self.earliest_local(&at(mid)) {
                Some(instant) => {
                    existing = mid;
                    found = instant;
                }
                None => missing = mid,
            }
        }
        Some(found)
    }

    fn earliest_local(&self, local: &NaiveDateTime) -> Option<DateTime<Utc>> {
        self.timezone
            .from_local_datetime(local)
            .earliest()
            .map(|instant| instant.with_timezone(&Utc))
    }
}

impl CalendarConfig<Local> {
    /// App default: device timezone, weeks starting on Monday.
    pub fn local_monday() -> Self {
        Self::new(Local, Weekday::Mon)
    }
}

impl CalendarConfig<Utc> {
    pub fn utc(first_weekday: Weekday) -> Self {
        Self::new(Utc, first_weekday)
    }
}

/// Half-open `[start, end)` range of instants covering one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayRange {
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.start <= *instant && *instant < self.end
    }
}

/// Maps the 1=Sunday..7=Saturday numbering to a weekday.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        1 => Some(Weekday::Sun),
        2 => Some(Weekday::Mon),
        3 => Some(Weekday::Tue),
        4 => Some(Weekday::Wed),
        5 => Some(Weekday::Thu),
        6 => Some(Weekday::Fri),
        7 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Inverse of [`weekday_from_index`].
pub fn weekday_index(weekday: Weekday) -> u8 {
    // number_from_sunday is 1-based.
    weekday.number_from_sunday() as u8
}

#[cfg(test)]
mod tests {
    use super::{weekday_from_index, weekday_index, CalendarConfig};
    use chrono::{Duration, FixedOffset, NaiveDate, TimeZone, Utc, Weekday};

    #[test]
    fn weekday_index_roundtrips_sunday_first_numbering() {
        for index in 1..=7 {
            let weekday = weekday_from_index(index).unwrap();
            assert_eq!(weekday_index(weekday), index);
        }
        assert_eq!(weekday_from_index(2), Some(Weekday::Mon));
        assert_eq!(weekday_from_index(0), None);
        assert_eq!(weekday_from_index(8), None);
    }

    #[test]
    fn start_of_day_uses_calendar_timezone() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let calendar = CalendarConfig::new(tokyo, Weekday::Mon);
        let day = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();

        let start = calendar.start_of_day(day);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap());
    }

    #[test]
    fn day_range_spans_one_day_without_dst() {
        let calendar = CalendarConfig::utc(Weekday::Mon);
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let range = calendar.day_range(day);

        assert_eq!(range.end - range.start, Duration::days(1));
        assert!(range.contains(&range.start));
        assert!(!range.contains(&range.end));
    }

    #[test]
    fn date_of_converts_into_calendar_timezone() {
        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        let calendar = CalendarConfig::new(west, Weekday::Mon);
        let instant = Utc.with_ymd_and_hms(2025, 3, 12, 2, 0, 0).unwrap();

        assert_eq!(
            calendar.date_of(&instant),
            NaiveDate::from_ymd_opt(2025, 3, 11).unwrap()
        );
    }
}
