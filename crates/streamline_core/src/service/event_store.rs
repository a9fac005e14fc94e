//! Event store use-case service.
//!
//! # Responsibility
//! - Provide add/delete/list entry points for UI and FFI callers.
//! - Notify subscribers after each committed mutation.
//!
//! # Invariants
//! - Listeners run only after the repository call succeeded.
//! - A delete that removes nothing neither notifies nor bumps the revision.
//! - The store is single-threaded; it is intentionally not `Sync`.

use crate::calendar::day_filter::events_on_day;
use crate::calendar::CalendarConfig;
use crate::model::event::{Event, EventId, NewEvent};
use crate::repo::event_repo::{EventRepository, RepoResult};
use chrono::{NaiveDate, TimeZone, Utc};
use log::{debug, info};
use std::cell::Cell;

/// Handle returned by [`EventStore::subscribe`].
pub type SubscriptionId = u64;

/// Mutation delivered to store subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Added(EventId),
    /// IDs that were actually removed, in request order.
    Deleted(Vec<EventId>),
}

type Listener = Box<dyn Fn(&StoreChange)>;

/// Ordered event collection with change notification.
pub struct EventStore<R: EventRepository> {
    repo: R,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
    revision: Cell<u64>,
}

impl<R: EventRepository> EventStore<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            listeners: Vec::new(),
            next_subscription: 1,
            revision: Cell::new(0),
        }
    }

    /// Validates and stores a form draft. A missing timestamp becomes "now".
    pub fn add(&self, draft: NewEvent) -> RepoResult<Event> {
        let event = draft.into_event(Utc::now())?;
        self.insert(&event)?;
        Ok(event)
    }

    /// Stores a fully built event.
    pub fn insert(&self, event: &Event) -> RepoResult<EventId> {
        let id = self.repo.create_event(event)?;
        info!("event=event_create module=store status=ok event_id={id}");
        self.commit(StoreChange::Added(id));
        Ok(id)
    }

    /// Removes every event whose ID is in `ids`; unknown IDs are skipped.
    ///
    /// Returns the IDs that were removed.
    pub fn delete(&self, ids: &[EventId]) -> RepoResult<Vec<EventId>> {
        let removed = self.repo.delete_events(ids)?;
        info!(
            "event=event_delete module=store status=ok requested={} removed={}",
            ids.len(),
            removed.len()
        );
        if !removed.is_empty() {
            self.commit(StoreChange::Deleted(removed.clone()));
        }
        Ok(removed)
    }

    /// Deletes by position in [`EventStore::all`], as list swipe actions do.
    ///
    /// Out-of-range offsets are ignored.
    pub fn delete_at(&self, offsets: &[usize]) -> RepoResult<Vec<EventId>> {
        let events = self.repo.list_events()?;
        let ids = offsets
            .iter()
            .filter_map(|offset| events.get(*offset).map(|event| event.id))
            .collect::<Vec<_>>();
        self.delete(&ids)
    }

    /// All events in insertion order.
    pub fn all(&self) -> RepoResult<Vec<Event>> {
        self.repo.list_events()
    }

    pub fn get(&self, id: EventId) -> RepoResult<Option<Event>> {
        self.repo.get_event(id)
    }

    /// Events that fall on `day` in `calendar`, in insertion order.
    pub fn events_on<Tz: TimeZone>(
        &self,
        day: NaiveDate,
        calendar: &CalendarConfig<Tz>,
    ) -> RepoResult<Vec<Event>> {
        let events = self.repo.list_events()?;
        Ok(events_on_day(&events, day, calendar)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Registers a listener called after every committed mutation.
    pub fn subscribe(&mut self, listener: impl Fn(&StoreChange) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        debug!("event=store_subscribe module=store subscription={id}");
        id
    }

    /// Removes a listener. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        before != self.listeners.len()
    }

    /// Counter bumped on every committed mutation, for callers that poll.
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    fn commit(&self, change: StoreChange) {
        self.revision.set(self.revision.get() + 1);
        for (_, listener) in &self.listeners {
            listener(&change);
        }
    }
}
