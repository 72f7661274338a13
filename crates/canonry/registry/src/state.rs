//! The shared chronicle state: tables, counters, and the event chain.

use canonry_types::{
    Author, AuthorAddress, EventRecord, Story, StoryId, Universe, UniverseId,
};
use std::collections::{BTreeMap, HashMap};

/// Everything the registry knows, guarded by one lock.
///
/// The id counters hold the next identifier to hand out; allocated ids are
/// exactly the range `[1, next)`. Counters are mutated only inside the
/// atomic commit of the corresponding create operation.
pub struct ChronicleState {
    pub authors: HashMap<AuthorAddress, Author>,
    pub universes: BTreeMap<UniverseId, Universe>,
    pub stories: BTreeMap<StoryId, Story>,
    pub next_universe_id: u64,
    pub next_story_id: u64,
    pub total_universes: u64,
    pub total_stories: u64,
    pub events: Vec<EventRecord>,
}

impl Default for ChronicleState {
    fn default() -> Self {
        Self {
            authors: HashMap::new(),
            universes: BTreeMap::new(),
            stories: BTreeMap::new(),
            next_universe_id: 1,
            next_story_id: 1,
            total_universes: 0,
            total_stories: 0,
            events: Vec::new(),
        }
    }
}

impl ChronicleState {
    pub fn allocate_universe_id(&mut self) -> UniverseId {
        let id = UniverseId(self.next_universe_id);
        self.next_universe_id += 1;
        id
    }

    pub fn allocate_story_id(&mut self) -> StoryId {
        let id = StoryId(self.next_story_id);
        self.next_story_id += 1;
        id
    }

    pub fn is_registered(&self, address: &AuthorAddress) -> bool {
        self.authors.contains_key(address)
    }
}
