//! Per-day event lookup.
//!
//! All helpers reduce to the same half-open day range from
//! [`CalendarConfig::day_range`] and never mutate their input.

use super::CalendarConfig;
use crate::model::event::Event;
use chrono::{NaiveDate, TimeZone};

/// Maximum number of emoji badges shown on one calendar day.
pub const MAX_DAY_EMOJIS: usize = 3;

/// Returns events whose timestamp falls on `day`, preserving input order.
pub fn events_on_day<'a, Tz: TimeZone>(
    events: &'a [Event],
    day: NaiveDate,
    calendar: &CalendarConfig<Tz>,
) -> Vec<&'a Event> {
    let range = calendar.day_range(day);
    events
        .iter()
        .filter(|event| range.contains(&event.timestamp))
        .collect()
}

/// Whether any event falls on `day`.
pub fn has_events<Tz: TimeZone>(
    events: &[Event],
    day: NaiveDate,
    calendar: &CalendarConfig<Tz>,
) -> bool {
    let range = calendar.day_range(day);
    events.iter().any(|event| range.contains(&event.timestamp))
}

/// Distinct emojis of the events on `day`, in first-seen order, capped at
/// [`MAX_DAY_EMOJIS`].
pub fn event_emojis<'a, Tz: TimeZone>(
    events: &'a [Event],
    day: NaiveDate,
    calendar: &CalendarConfig<Tz>,
) -> Vec<&'a str> {
    let mut emojis: Vec<&'a str> = Vec::with_capacity(MAX_DAY_EMOJIS);
    for event in events_on_day(events, day, calendar) {
        if emojis.len() == MAX_DAY_EMOJIS {
            break;
        }
        if !emojis.contains(&event.emoji.as_str()) {
            emojis.push(event.emoji.as_str());
        }
    }
    emojis
}
