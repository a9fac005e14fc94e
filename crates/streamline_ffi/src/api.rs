//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose list, add, delete, detail and calendar use-cases to Dart via FRB.
//! - Keep error semantics simple: envelopes carry `ok` plus a message.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Timestamps cross the boundary as UTC epoch milliseconds.
//! - Calendar calls use the device timezone with Monday as first weekday.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use streamline_core::db::open_db;
use streamline_core::{
    build_month_grid, core_version as core_version_inner, event_emojis, has_events,
    init_logging as init_logging_inner, ping as ping_inner, CalendarConfig, DayCell, Event,
    EventId, EventStore, NewEvent, RepoResult, SqliteEventRepository, EMOJI_PALETTE,
};

const DB_FILE_NAME: &str = "streamline.sqlite3";
const DB_PATH_ENV: &str = "STREAMLINE_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Emoji choices for the add-event form, in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn emoji_palette() -> Vec<String> {
    EMOJI_PALETTE.iter().map(|emoji| (*emoji).to_string()).collect()
}

/// One event as rendered by list, calendar and detail screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventItem {
    pub event_id: String,
    pub title: String,
    pub description: String,
    pub emoji: String,
    pub timestamp_ms: i64,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventListResponse {
    pub ok: bool,
    pub items: Vec<EventItem>,
    pub message: String,
}

/// Detail response envelope. `item` is `None` when the event is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetailResponse {
    pub ok: bool,
    pub item: Option<EventItem>,
    pub message: String,
}

/// Create response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventActionResponse {
    pub ok: bool,
    pub event_id: Option<String>,
    pub message: String,
}

/// Delete response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDeleteResponse {
    pub ok: bool,
    /// IDs that existed and were removed.
    pub deleted_ids: Vec<String>,
    pub message: String,
}

/// One month-grid position. Blank padding has `day = None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    pub day: Option<u32>,
    /// Local start of the day as epoch milliseconds; `None` for blanks.
    pub day_start_ms: Option<i64>,
    pub is_selected: bool,
    pub has_events: bool,
    /// Up to three distinct emojis of the day's events.
    pub emojis: Vec<String>,
}

/// Month grid response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonthResponse {
    pub ok: bool,
    pub year: i32,
    pub month: u32,
    /// Short weekday names, Monday first.
    pub weekday_headers: Vec<String>,
    /// Whole weeks, row-major.
    pub cells: Vec<CalendarCell>,
    pub message: String,
}

/// Lists every event in insertion order.
#[flutter_rust_bridge::frb(sync)]
pub fn events_list() -> EventListResponse {
    match with_event_store(|store| store.all()) {
        Ok(events) => EventListResponse {
            ok: true,
            items: events.into_iter().map(to_event_item).collect(),
            message: String::new(),
        },
        Err(err) => EventListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("events_list failed: {err}"),
        },
    }
}

/// Loads one event for the detail screen.
#[flutter_rust_bridge::frb(sync)]
pub fn event_get(event_id: String) -> EventDetailResponse {
    let result = parse_event_id(&event_id)
        .and_then(|id| with_event_store(|store| store.get(id)));
    match result {
        Ok(Some(event)) => EventDetailResponse {
            ok: true,
            item: Some(to_event_item(event)),
            message: String::new(),
        },
        Ok(None) => EventDetailResponse {
            ok: true,
            item: None,
            message: "Event not found.".to_string(),
        },
        Err(err) => EventDetailResponse {
            ok: false,
            item: None,
            message: format!("event_get failed: {err}"),
        },
    }
}

/// Saves the add-event form.
///
/// `timestamp_ms = None` stamps the event with the current time.
#[flutter_rust_bridge::frb(sync)]
pub fn event_create(
    title: String,
    description: String,
    emoji: String,
    timestamp_ms: Option<i64>,
) -> EventActionResponse {
    let result = timestamp_ms
        .map(parse_epoch_ms)
        .transpose()
        .and_then(|timestamp| {
            let mut draft = NewEvent::titled(title)
                .description(description)
                .emoji(emoji);
            draft.timestamp = timestamp;
            with_event_store(|store| store.add(draft))
        });

    match result {
        Ok(event) => EventActionResponse {
            ok: true,
            event_id: Some(event.id.to_string()),
            message: "Event created.".to_string(),
        },
        Err(err) => EventActionResponse {
            ok: false,
            event_id: None,
            message: format!("event_create failed: {err}"),
        },
    }
}

/// Deletes events by ID. Unknown IDs are ignored; malformed IDs fail the call.
#[flutter_rust_bridge::frb(sync)]
pub fn events_delete(event_ids: Vec<String>) -> EventDeleteResponse {
    let result = event_ids
        .iter()
        .map(|raw| parse_event_id(raw))
        .collect::<Result<Vec<_>, _>>()
        .and_then(|ids| with_event_store(|store| store.delete(&ids)));

    match result {
        Ok(removed) => EventDeleteResponse {
            ok: true,
            message: format!("Deleted {} event(s).", removed.len()),
            deleted_ids: removed.iter().map(ToString::to_string).collect(),
        },
        Err(err) => EventDeleteResponse {
            ok: false,
            deleted_ids: Vec::new(),
            message: format!("events_delete failed: {err}"),
        },
    }
}

/// Builds the month grid with per-day event badges.
///
/// `selected_ms` marks the day containing that instant as selected.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_month(year: i32, month: u32, selected_ms: Option<i64>) -> CalendarMonthResponse {
    let calendar = CalendarConfig::local_monday();
    let failure = |message: String| CalendarMonthResponse {
        ok: false,
        year,
        month,
        weekday_headers: Vec::new(),
        cells: Vec::new(),
        message,
    };

    let Some(first_day) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return failure(format!("calendar_month failed: invalid month {year}-{month}"));
    };
    let selected = match selected_ms.map(parse_epoch_ms).transpose() {
        Ok(instant) => instant.map(|instant| calendar.date_of(&instant)),
        Err(err) => return failure(format!("calendar_month failed: {err}")),
    };
    let events = match with_event_store(|store| store.all()) {
        Ok(events) => events,
        Err(err) => return failure(format!("calendar_month failed: {err}")),
    };

    let grid = build_month_grid(first_day, calendar.first_weekday());
    let cells = grid
        .cells()
        .iter()
        .map(|cell| match cell {
            DayCell::Blank => CalendarCell {
                day: None,
                day_start_ms: None,
                is_selected: false,
                has_events: false,
                emojis: Vec::new(),
            },
            DayCell::Day(date) => CalendarCell {
                day: Some(date.day()),
                day_start_ms: Some(calendar.start_of_day(*date).timestamp_millis()),
                is_selected: selected == Some(*date),
                has_events: has_events(&events, *date, &calendar),
                emojis: event_emojis(&events, *date, &calendar)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            },
        })
        .collect();

    CalendarMonthResponse {
        ok: true,
        year: grid.year(),
        month: grid.month(),
        weekday_headers: grid
            .weekday_headers()
            .iter()
            .map(ToString::to_string)
            .collect(),
        cells,
        message: String::new(),
    }
}

/// Lists the events on the local day containing `day_ms`.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_day_events(day_ms: i64) -> EventListResponse {
    let calendar = CalendarConfig::local_monday();
    let result = parse_epoch_ms(day_ms).and_then(|instant| {
        let day = calendar.date_of(&instant);
        with_event_store(|store| store.events_on(day, &calendar))
    });

    match result {
        Ok(events) => {
            let message = if events.is_empty() {
                "No events on this day.".to_string()
            } else {
                String::new()
            };
            EventListResponse {
                ok: true,
                items: events.into_iter().map(to_event_item).collect(),
                message,
            }
        }
        Err(err) => EventListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("calendar_day_events failed: {err}"),
        },
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_event_store<T>(
    f: impl FnOnce(&EventStore<SqliteEventRepository<'_>>) -> RepoResult<T>,
) -> Result<T, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| format!("DB open failed: {err}"))?;
    let repo = SqliteEventRepository::try_new(&conn)
        .map_err(|err| format!("repo init failed: {err}"))?;
    let store = EventStore::new(repo);
    f(&store).map_err(|err| err.to_string())
}

fn parse_event_id(raw: &str) -> Result<EventId, String> {
    EventId::parse_str(raw.trim()).map_err(|_| {
        warn!("event=ffi_parse module=ffi status=error error_code=invalid_event_id");
        format!("invalid event id `{raw}`")
    })
}

fn parse_epoch_ms(value: i64) -> Result<DateTime<Utc>, String> {
    DateTime::<Utc>::from_timestamp_millis(value)
        .ok_or_else(|| format!("timestamp {value} is out of range"))
}

fn to_event_item(event: Event) -> EventItem {
    EventItem {
        event_id: event.id.to_string(),
        timestamp_ms: event.timestamp.timestamp_millis(),
        title: event.title,
        description: event.description,
        emoji: event.emoji,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        calendar_day_events, calendar_month, core_version, emoji_palette, event_create,
        event_get, events_delete, events_list, init_logging, ping,
    };
    use chrono::{Datelike, Local, TimeZone};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn palette_starts_with_default_emoji() {
        let palette = emoji_palette();
        assert_eq!(palette.len(), 10);
        assert_eq!(palette[0], "📝");
    }

    #[test]
    fn create_get_list_delete_roundtrip() {
        let title = unique_token("ffi-roundtrip");
        let created = event_create(title.clone(), "body".to_string(), "🚀".to_string(), None);
        assert!(created.ok, "{}", created.message);
        let event_id = created.event_id.expect("create should return event_id");

        let detail = event_get(event_id.clone());
        assert!(detail.ok, "{}", detail.message);
        let item = detail.item.expect("created event should be found");
        assert_eq!(item.title, title);
        assert_eq!(item.emoji, "🚀");

        let listed = events_list();
        assert!(listed.items.iter().any(|item| item.event_id == event_id));

        let deleted = events_delete(vec![event_id.clone()]);
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.deleted_ids, vec![event_id.clone()]);
        assert!(event_get(event_id).item.is_none());
    }

    #[test]
    fn create_rejects_blank_title() {
        let response = event_create("  ".to_string(), String::new(), "📝".to_string(), None);
        assert!(!response.ok);
        assert!(response.message.contains("title"));
    }

    #[test]
    fn delete_rejects_malformed_id() {
        let response = events_delete(vec!["not-an-id".to_string()]);
        assert!(!response.ok);
        assert!(response.deleted_ids.is_empty());
    }

    #[test]
    fn calendar_month_marks_event_day() {
        let timestamp = Local
            .with_ymd_and_hms(2031, 7, 15, 12, 0, 0)
            .earliest()
            .expect("local noon exists");
        let created = event_create(
            unique_token("ffi-calendar"),
            String::new(),
            "🎯".to_string(),
            Some(timestamp.timestamp_millis()),
        );
        assert!(created.ok, "{}", created.message);

        let month = calendar_month(2031, 7, Some(timestamp.timestamp_millis()));
        assert!(month.ok, "{}", month.message);
        assert_eq!(month.cells.len() % 7, 0);
        assert_eq!(month.weekday_headers[0], "Mon");

        let cell = month
            .cells
            .iter()
            .find(|cell| cell.day == Some(timestamp.day()))
            .expect("day 15 should be in the grid");
        assert!(cell.is_selected);
        assert!(cell.has_events);
        assert!(cell.emojis.iter().any(|emoji| emoji == "🎯"));

        let event_id = created.event_id.expect("create should return event_id");
        let day = calendar_day_events(timestamp.timestamp_millis());
        assert!(day.ok, "{}", day.message);
        assert!(day.items.iter().any(|item| item.event_id == event_id));

        let deleted = events_delete(vec![event_id.clone()]);
        assert_eq!(deleted.deleted_ids, vec![event_id]);
    }

    #[test]
    fn calendar_month_rejects_invalid_month() {
        let response = calendar_month(2025, 13, None);
        assert!(!response.ok);
        assert!(response.cells.is_empty());
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
