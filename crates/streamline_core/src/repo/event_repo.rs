//! Event repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert, batch delete and enumerate APIs over the `events` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `list_events` returns rows in insertion order.
//! - `delete_events` applies the whole id-set in one transaction.
//! - Timestamps are stored as UTC epoch milliseconds.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::event::{Event, EventId, EventValidationError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const EVENT_SELECT_SQL: &str = "SELECT
    uuid,
    timestamp_ms,
    title,
    description,
    emoji
FROM events";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for event persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EventValidationError),
    Db(DbError),
    InvalidData(String),
    /// Connection was not opened through `open_db*`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted event data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<EventValidationError> for RepoError {
    fn from(value: EventValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract backing the event store.
pub trait EventRepository {
    /// Inserts one event and returns its ID.
    fn create_event(&self, event: &Event) -> RepoResult<EventId>;
    /// Gets one event by ID.
    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>>;
    /// Lists all events in insertion order.
    fn list_events(&self) -> RepoResult<Vec<Event>>;
    /// Deletes every matching event and returns the IDs actually removed.
    /// Unknown IDs are ignored.
    fn delete_events(&self, ids: &[EventId]) -> RepoResult<Vec<EventId>>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&self, event: &Event) -> RepoResult<EventId> {
        event.validate()?;

        self.conn.execute(
            "INSERT INTO events (
                uuid,
                timestamp_ms,
                title,
                description,
                emoji
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                event.id.to_string(),
                event.timestamp.timestamp_millis(),
                event.title.as_str(),
                event.description.as_str(),
                event.emoji.as_str(),
            ],
        )?;

        Ok(event.id)
    }

    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let row = stmt
            .query_row([id.to_string()], |row| Ok(read_event_row(row)))
            .optional()?;
        row.transpose()
    }

    fn list_events(&self) -> RepoResult<Vec<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut events = Vec::new();

        while let Some(row) = rows.next()? {
            events.push(read_event_row(row)?);
        }

        Ok(events)
    }

    fn delete_events(&self, ids: &[EventId]) -> RepoResult<Vec<EventId>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let tx = self.conn.unchecked_transaction()?;
        let mut removed = Vec::new();
        {
            let mut stmt = tx.prepare("DELETE FROM events WHERE uuid = ?1;")?;
            for id in ids {
                if stmt.execute([id.to_string()])? > 0 {
                    removed.push(*id);
                }
            }
        }
        tx.commit()?;

        Ok(removed)
    }
}

fn read_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in events.uuid"))
    })?;

    let timestamp_ms: i64 = row.get("timestamp_ms")?;
    let timestamp = DateTime::<Utc>::from_timestamp_millis(timestamp_ms).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "timestamp `{timestamp_ms}` out of range in events.timestamp_ms"
        ))
    })?;

    let event = Event::with_id(
        id,
        timestamp,
        row.get::<_, String>("title")?,
        row.get::<_, String>("description")?,
        row.get::<_, String>("emoji")?,
    );
    event.validate()?;
    Ok(event)
}
