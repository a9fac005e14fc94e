use chrono::{TimeZone, Utc};
use streamline_core::{Event, EventValidationError, NewEvent, DEFAULT_EMOJI, DEFAULT_TITLE};

#[test]
fn default_event_uses_form_defaults() {
    let event = Event::default();
    assert_eq!(event.title, DEFAULT_TITLE);
    assert_eq!(event.emoji, DEFAULT_EMOJI);
    assert!(event.description.is_empty());
    assert!(event.validate().is_ok());
}

#[test]
fn new_events_get_distinct_ids() {
    let now = Utc::now();
    let a = Event::new(now, "a", "", "📝");
    let b = Event::new(now, "a", "", "📝");
    assert_ne!(a.id, b.id);
}

#[test]
fn emoji_validation_counts_glyphs_not_code_points() {
    let now = Utc::now();
    // Variation selector and ZWJ sequences are single glyphs.
    assert!(Event::new(now, "t", "", "🛠️").validate().is_ok());
    assert!(Event::new(now, "t", "", "👩‍💻").validate().is_ok());

    assert_eq!(
        Event::new(now, "t", "", "").validate(),
        Err(EventValidationError::InvalidEmoji(String::new()))
    );
    assert!(Event::new(now, "t", "", "ab").validate().is_err());
}

#[test]
fn description_may_be_empty_but_title_may_not() {
    let now = Utc::now();
    assert!(Event::new(now, "title", "", "📝").validate().is_ok());
    assert_eq!(
        Event::new(now, "\t\n ", "body", "📝").validate(),
        Err(EventValidationError::EmptyTitle)
    );
}

#[test]
fn serialized_shape_is_stable() {
    let timestamp = Utc.with_ymd_and_hms(2025, 3, 11, 10, 0, 0).unwrap();
    let event = NewEvent::titled("Launch")
        .emoji("🚀")
        .description("ship it")
        .at(timestamp)
        .into_event(Utc::now())
        .unwrap();

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["title"], "Launch");
    assert_eq!(value["emoji"], "🚀");
    assert_eq!(value["description"], "ship it");
    assert_eq!(value["timestamp"], "2025-03-11T10:00:00Z");
    assert_eq!(value["id"], event.id.to_string());

    let decoded: Event = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, event);
}
