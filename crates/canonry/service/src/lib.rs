//! Canonry Service - the unified chronicle facade
//!
//! Thin front over `canonry-registry`: every public operation delegates to
//! the registry's atomic commit path and emits one structured tracing event
//! per successful commit. Embedders that want the raw registry can reach it
//! through [`ChronicleService::registry`].

#![deny(unsafe_code)]

pub use canonry_registry::ChronicleRegistry;
pub use canonry_types::{
    Author, AuthorAddress, ChronicleConfig, ChronicleError, ChronicleEvent, ChronicleStatistics,
    EventRecord, Story, StoryId, Universe, UniverseId, Visibility,
};

use std::sync::Arc;

/// The chronicle service.
pub struct ChronicleService {
    registry: Arc<ChronicleRegistry>,
}

impl ChronicleService {
    /// Create a service with default policy.
    pub fn new() -> Self {
        Self::with_config(ChronicleConfig::default())
    }

    /// Create a service with explicit policy knobs.
    pub fn with_config(config: ChronicleConfig) -> Self {
        Self {
            registry: Arc::new(ChronicleRegistry::with_config(config)),
        }
    }

    /// Wrap an existing registry (e.g. one shared with another component).
    pub fn with_registry(registry: Arc<ChronicleRegistry>) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &ChronicleRegistry {
        &self.registry
    }

    // ============ Identity ============

    /// Register a pseudonymous author.
    pub fn register_author(
        &self,
        address: AuthorAddress,
        pseudonym: impl Into<String>,
    ) -> Result<(), ChronicleError> {
        let pseudonym = pseudonym.into();
        self.registry
            .register_author(address.clone(), pseudonym.clone())?;
        tracing::info!(author = %address, pseudonym = %pseudonym, "Registered author");
        Ok(())
    }

    /// Author record with aggregate counters. Unknown addresses read as a
    /// zeroed default with `registered == false`.
    pub fn author_stats(&self, address: &AuthorAddress) -> Result<Author, ChronicleError> {
        self.registry.author_stats(address)
    }

    // ============ Universes ============

    /// Create a universe owned by `caller`.
    pub fn create_universe(
        &self,
        caller: AuthorAddress,
        name: impl Into<String>,
        description: impl Into<String>,
        visibility: Visibility,
    ) -> Result<UniverseId, ChronicleError> {
        let id = self
            .registry
            .create_universe(caller.clone(), name, description, visibility)?;
        tracing::info!(universe = %id, creator = %caller, visibility = ?visibility, "Created universe");
        Ok(id)
    }

    /// Snapshot of a universe record.
    pub fn universe(&self, id: UniverseId) -> Result<Universe, ChronicleError> {
        self.registry.universe(id)
    }

    /// Grant contributor access to a private universe. Creator-only.
    pub fn authorize_author(
        &self,
        caller: AuthorAddress,
        universe_id: UniverseId,
        target: AuthorAddress,
    ) -> Result<(), ChronicleError> {
        self.registry
            .authorize_author(caller.clone(), universe_id, target.clone())?;
        tracing::info!(universe = %universe_id, author = %target, granted_by = %caller, "Authorized author");
        Ok(())
    }

    /// Whether `address` may contribute stories to the universe.
    pub fn is_authorized(
        &self,
        universe_id: UniverseId,
        address: &AuthorAddress,
    ) -> Result<bool, ChronicleError> {
        self.registry.is_authorized(universe_id, address)
    }

    // ============ Stories ============

    /// Add a story to a universe.
    pub fn add_story(
        &self,
        caller: AuthorAddress,
        universe_id: UniverseId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<StoryId, ChronicleError> {
        let id = self
            .registry
            .add_story(caller.clone(), universe_id, title, content)
            .map_err(|err| {
                tracing::debug!(universe = %universe_id, author = %caller, error = %err, "Story rejected");
                err
            })?;
        tracing::info!(story = %id, universe = %universe_id, author = %caller, "Added story");
        Ok(id)
    }

    /// Like a story (at most once per identity, ever).
    pub fn like_story(
        &self,
        caller: AuthorAddress,
        story_id: StoryId,
    ) -> Result<(), ChronicleError> {
        self.registry
            .like_story(caller.clone(), story_id)
            .map_err(|err| {
                tracing::debug!(story = %story_id, reader = %caller, error = %err, "Like rejected");
                err
            })?;
        tracing::info!(story = %story_id, reader = %caller, "Liked story");
        Ok(())
    }

    /// Certify a story as canonical lore. Universe-creator-only.
    pub fn mark_story_canonical(
        &self,
        caller: AuthorAddress,
        story_id: StoryId,
    ) -> Result<(), ChronicleError> {
        self.registry.mark_story_canonical(caller.clone(), story_id)?;
        tracing::info!(story = %story_id, marked_by = %caller, "Marked story canonical");
        Ok(())
    }

    /// Snapshot of a story record.
    pub fn story(&self, id: StoryId) -> Result<Story, ChronicleError> {
        self.registry.story(id)
    }

    /// Story ids of a universe in creation order.
    pub fn universe_stories(
        &self,
        universe_id: UniverseId,
    ) -> Result<Vec<StoryId>, ChronicleError> {
        self.registry.universe_stories(universe_id)
    }

    // ============ Statistics & events ============

    /// Registry-wide totals in one consistent snapshot.
    pub fn statistics(&self) -> Result<ChronicleStatistics, ChronicleError> {
        self.registry.statistics()
    }

    /// The full audit event feed in commit order.
    pub fn events(&self) -> Result<Vec<EventRecord>, ChronicleError> {
        self.registry.events()
    }

    /// Events concerning one universe.
    pub fn events_for_universe(
        &self,
        universe_id: UniverseId,
    ) -> Result<Vec<EventRecord>, ChronicleError> {
        self.registry.events_for_universe(universe_id)
    }

    /// Tip of the audit hash chain.
    pub fn latest_event_hash(&self) -> Result<Option<String>, ChronicleError> {
        self.registry.latest_event_hash()
    }
}

impl Default for ChronicleService {
    fn default() -> Self {
        Self::new()
    }
}
