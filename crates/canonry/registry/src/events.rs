//! Append-only audit event chain.
//!
//! Each committed mutation appends exactly one record, inside the same
//! write-lock hold as the mutation it describes. Records are hash-chained
//! with blake3 so any rewrite of history is detectable.

use crate::state::ChronicleState;
use crate::ChronicleRegistry;
use canonry_types::{ChronicleError, ChronicleEvent, EventRecord, UniverseId};
use chrono::{DateTime, Utc};
use uuid::Uuid;

impl ChronicleState {
    pub fn append_event(&mut self, event: ChronicleEvent) {
        let previous_hash = self.events.last().map(|record| record.hash.clone());
        let sequence = self.events.len() as u64 + 1;
        let timestamp = Utc::now();
        let hash = compute_event_hash(previous_hash.as_deref(), sequence, timestamp, &event);

        self.events.push(EventRecord {
            event_id: format!("event-{}", Uuid::new_v4()),
            sequence,
            timestamp,
            event,
            previous_hash,
            hash,
        });
    }

    fn event_touches_universe(&self, event: &ChronicleEvent, universe_id: UniverseId) -> bool {
        match event {
            ChronicleEvent::UniverseCreated { universe, .. }
            | ChronicleEvent::AuthorAuthorized { universe, .. }
            | ChronicleEvent::StoryAdded { universe, .. }
            | ChronicleEvent::StoryMarkedCanonical { universe, .. } => *universe == universe_id,
            ChronicleEvent::StoryLiked { story, .. } => self
                .stories
                .get(story)
                .is_some_and(|s| s.universe_id == universe_id),
            ChronicleEvent::AuthorRegistered { .. } => false,
        }
    }
}

fn compute_event_hash(
    previous_hash: Option<&str>,
    sequence: u64,
    timestamp: DateTime<Utc>,
    event: &ChronicleEvent,
) -> String {
    let payload = serde_json::json!({
        "previous_hash": previous_hash,
        "sequence": sequence,
        "timestamp": timestamp,
        "event": event,
    })
    .to_string();
    blake3::hash(payload.as_bytes()).to_hex().to_string()
}

impl ChronicleRegistry {
    /// The full event feed in commit order.
    pub fn events(&self) -> Result<Vec<EventRecord>, ChronicleError> {
        let state = self.read()?;
        Ok(state.events.clone())
    }

    /// Events concerning one universe: its creation, grants, stories, likes,
    /// and canonical markings.
    pub fn events_for_universe(
        &self,
        universe_id: UniverseId,
    ) -> Result<Vec<EventRecord>, ChronicleError> {
        let state = self.read()?;
        if !state.universes.contains_key(&universe_id) {
            return Err(ChronicleError::UniverseNotFound(universe_id));
        }
        Ok(state
            .events
            .iter()
            .filter(|record| state.event_touches_universe(&record.event, universe_id))
            .cloned()
            .collect())
    }

    /// Tip of the hash chain, if any event has been committed.
    pub fn latest_event_hash(&self) -> Result<Option<String>, ChronicleError> {
        let state = self.read()?;
        Ok(state.events.last().map(|record| record.hash.clone()))
    }
}
