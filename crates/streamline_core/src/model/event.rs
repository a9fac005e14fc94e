//! Event domain model.
//!
//! # Responsibility
//! - Define the canonical event record rendered by list, calendar and
//!   detail views.
//! - Provide the fixed emoji palette and creation defaults.
//!
//! # Invariants
//! - `id` is stable and never reused for another event.
//! - `title` is non-empty after trimming.
//! - `emoji` is exactly one extended grapheme cluster.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

/// Stable identifier for every event.
pub type EventId = Uuid;

/// Emoji choices offered by the add-event form, in display order.
pub const EMOJI_PALETTE: [&str; 10] = [
    "📝", "🎉", "💼", "🏆", "🚀", "🎯", "📅", "🔍", "💡", "🛠️",
];

/// Emoji used when the user keeps the form default.
pub const DEFAULT_EMOJI: &str = "📝";

/// Title used when a record is built without one.
pub const DEFAULT_TITLE: &str = "Untitled event";

/// Returns whether `emoji` is one of the palette entries.
pub fn is_palette_emoji(emoji: &str) -> bool {
    EMOJI_PALETTE.contains(&emoji)
}

/// Validation errors for event invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Emoji is empty or spans more than one glyph.
    InvalidEmoji(String),
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "event title cannot be empty"),
            Self::InvalidEmoji(value) => {
                write!(f, "event emoji must be a single glyph, got `{value}`")
            }
        }
    }
}

impl Error for EventValidationError {}

/// Canonical event record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Stable ID assigned at creation.
    pub id: EventId,
    /// Instant the event refers to. Defaults to creation time.
    pub timestamp: DateTime<Utc>,
    /// Display title.
    pub title: String,
    /// Free text, may be empty.
    pub description: String,
    /// Decorative glyph, usually from `EMOJI_PALETTE`.
    pub emoji: String,
}

impl Event {
    /// Creates an event with a generated ID.
    pub fn new(
        timestamp: DateTime<Utc>,
        title: impl Into<String>,
        description: impl Into<String>,
        emoji: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), timestamp, title, description, emoji)
    }

    /// Creates an event with a caller-provided ID.
    ///
    /// Used when rebuilding records from storage.
    pub fn with_id(
        id: EventId,
        timestamp: DateTime<Utc>,
        title: impl Into<String>,
        description: impl Into<String>,
        emoji: impl Into<String>,
    ) -> Self {
        Self {
            id,
            timestamp,
            title: title.into(),
            description: description.into(),
            emoji: emoji.into(),
        }
    }

    /// Checks title and emoji invariants.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.title.trim().is_empty() {
            return Err(EventValidationError::EmptyTitle);
        }
        if self.emoji.graphemes(true).count() != 1 {
            return Err(EventValidationError::InvalidEmoji(self.emoji.clone()));
        }
        Ok(())
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new(Utc::now(), DEFAULT_TITLE, "", DEFAULT_EMOJI)
    }
}

/// Add-event form payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub emoji: String,
    /// `None` means "now" at insert time.
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewEvent {
    /// Starts a draft with the form defaults: default emoji, empty description,
    /// timestamp resolved at insert time.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            emoji: DEFAULT_EMOJI.to_string(),
            timestamp: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = emoji.into();
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Whether the form may enable its save action.
    pub fn can_save(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Materializes the draft into a validated event with a fresh ID.
    ///
    /// The title is trimmed; the description is kept verbatim.
    pub fn into_event(self, now: DateTime<Utc>) -> Result<Event, EventValidationError> {
        let event = Event::new(
            self.timestamp.unwrap_or(now),
            self.title.trim(),
            self.description,
            self.emoji,
        );
        event.validate()?;
        Ok(event)
    }
}
