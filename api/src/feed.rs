//! Activity reconciliation.
//!
//! The feed merges two independent sources: a one-shot historical backfill and
//! a live stream of polled logs. Both paths maintain the same invariants:
//!
//! - ids are unique within the feed,
//! - entries are ordered newest first by `timestamp_ms`,
//! - the feed never holds more than its capacity,
//! - a `RoundEnded` without a winner is never present.

use std::cmp::Reverse;
use std::collections::HashSet;

use crate::consts::FEED_CAPACITY;
use crate::event::DomainEvent;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityFeed {
    entries: Vec<DomainEvent>,
    capacity: usize,
}

impl Default for ActivityFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityFeed {
    pub fn new() -> Self {
        Self::with_capacity(FEED_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn entries(&self) -> &[DomainEvent] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &DomainEvent> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Merges a historical batch. The batch is authoritative for its own ids;
    /// entries already held under other ids (typically live events that raced
    /// ahead of the backfill) are kept. The union is re-sorted and truncated.
    ///
    /// Within the batch, a repeat of the same event is collapsed, while a
    /// distinct event whose id collides gets a `-N` suffix in batch order.
    pub fn load_historical(&mut self, events: impl IntoIterator<Item = DomainEvent>) {
        let mut merged: Vec<DomainEvent> = Vec::new();
        for mut event in events {
            if event.is_winnerless_round_end() {
                continue;
            }
            if merged.iter().any(|e| same_event(e, &event)) {
                continue;
            }
            if merged.iter().any(|e| e.id == event.id) {
                event.id = unique_id(&merged, &event.id);
            }
            merged.push(event);
        }

        let seen: HashSet<String> = merged.iter().map(|e| e.id.clone()).collect();
        let held = std::mem::take(&mut self.entries);
        let kept: Vec<DomainEvent> = held
            .into_iter()
            .filter(|e| !seen.contains(&e.id))
            .filter(|e| !merged.iter().any(|m| same_event(m, e)))
            .collect();
        merged.extend(kept);

        self.entries = merged;
        self.sort_and_truncate();
    }

    /// Inserts one live event. Returns whether the event was inserted.
    ///
    /// A colliding id is disambiguated with a `-N` suffix, unless the held
    /// entry was decoded from the very same log, in which case this is a
    /// redelivery and nothing changes.
    pub fn append_live(&mut self, mut event: DomainEvent) -> bool {
        if event.is_winnerless_round_end() {
            return false;
        }

        if let Some(existing) = self.entries.iter().find(|e| e.id == event.id) {
            if existing.origin.is_some() && existing.origin == event.origin {
                tracing::debug!("ignoring redelivered event {}", event.id);
                return false;
            }
            event.id = unique_id(&self.entries, &event.id);
        }

        self.entries.insert(0, event);
        self.sort_and_truncate();
        true
    }

    // Stable, so events with equal timestamps keep their insertion order.
    fn sort_and_truncate(&mut self) {
        self.entries.sort_by_key(|e| Reverse(e.timestamp_ms));
        self.entries.truncate(self.capacity);
    }
}

/// Whether two entries were decoded from the same log. Without a log identity,
/// the round, time and payload must all match.
fn same_event(a: &DomainEvent, b: &DomainEvent) -> bool {
    match (&a.origin, &b.origin) {
        (Some(x), Some(y)) => x == y,
        (None, None) => a.round_id == b.round_id && a.timestamp_ms == b.timestamp_ms && a.payload == b.payload,
        _ => false,
    }
}

fn unique_id(entries: &[DomainEvent], base: &str) -> String {
    let mut n = 1;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !entries.iter().any(|e| e.id == candidate) {
            return candidate;
        }
        n += 1;
    }
}
