//! Core domain logic for StreamLine.
//! This crate is the single source of truth for event and calendar invariants.

pub mod calendar;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calendar::day_filter::{event_emojis, events_on_day, has_events, MAX_DAY_EMOJIS};
pub use calendar::month_grid::{build_month_grid, DayCell, MonthGrid, DAYS_PER_WEEK};
pub use calendar::{weekday_from_index, weekday_index, CalendarConfig, DayRange};
pub use logging::{
    default_log_level, init_logging, logging_status, LogLevel, LoggingError, LoggingStatus,
};
pub use model::event::{
    is_palette_emoji, Event, EventId, EventValidationError, NewEvent, DEFAULT_EMOJI,
    DEFAULT_TITLE, EMOJI_PALETTE,
};
pub use repo::event_repo::{EventRepository, RepoError, RepoResult, SqliteEventRepository};
pub use service::event_store::{EventStore, StoreChange, SubscriptionId};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
