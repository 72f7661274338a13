//! Story creation, likes, and canonical certification.

use crate::ChronicleRegistry;
use canonry_types::{AuthorAddress, ChronicleError, ChronicleEvent, Story, StoryId, UniverseId};
use chrono::Utc;
use std::collections::BTreeSet;

impl ChronicleRegistry {
    /// Add a story to a universe. Private universes require the caller to be
    /// an authorized contributor; public universes accept any registered
    /// author.
    pub fn add_story(
        &self,
        caller: AuthorAddress,
        universe_id: UniverseId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<StoryId, ChronicleError> {
        let title = title.into();
        let content = content.into();
        if title.trim().is_empty() {
            return Err(ChronicleError::InvalidInput(
                "story title must not be empty".to_string(),
            ));
        }
        if content.trim().is_empty() {
            return Err(ChronicleError::InvalidInput(
                "story content must not be empty".to_string(),
            ));
        }

        let mut state = self.write()?;
        if !state.is_registered(&caller) {
            return Err(ChronicleError::NotRegistered(caller));
        }
        {
            let universe = state
                .universes
                .get(&universe_id)
                .ok_or(ChronicleError::UniverseNotFound(universe_id))?;
            if !universe.visibility.is_public() && !universe.authorized_authors.contains(&caller) {
                return Err(ChronicleError::Forbidden(format!(
                    "{universe_id} is private and {caller} is not an authorized contributor"
                )));
            }
        }

        let id = state.allocate_story_id();
        state.stories.insert(
            id,
            Story {
                id,
                universe_id,
                title,
                content,
                author: caller.clone(),
                created_at: Utc::now(),
                likes: 0,
                canonical: false,
                liked_by: BTreeSet::new(),
            },
        );
        if let Some(universe) = state.universes.get_mut(&universe_id) {
            universe.stories.push(id);
            universe.story_count += 1;
        }
        if let Some(author) = state.authors.get_mut(&caller) {
            author.story_count += 1;
        }
        state.total_stories += 1;
        state.append_event(ChronicleEvent::StoryAdded {
            story: id,
            universe: universe_id,
            author: caller,
        });
        Ok(id)
    }

    /// Like a story. A given identity may like a given story at most once,
    /// ever; there is no unlike.
    ///
    /// By default the caller does not have to be a registered author; set
    /// `ChronicleConfig::require_registered_likers` to demand registration.
    pub fn like_story(
        &self,
        caller: AuthorAddress,
        story_id: StoryId,
    ) -> Result<(), ChronicleError> {
        let mut state = self.write()?;
        if self.config().require_registered_likers && !state.is_registered(&caller) {
            return Err(ChronicleError::NotRegistered(caller));
        }

        let story_author = {
            let story = state
                .stories
                .get_mut(&story_id)
                .ok_or(ChronicleError::StoryNotFound(story_id))?;
            if !story.liked_by.insert(caller.clone()) {
                return Err(ChronicleError::AlreadyLiked {
                    story: story_id,
                    reader: caller,
                });
            }
            story.likes += 1;
            story.author.clone()
        };
        if let Some(author) = state.authors.get_mut(&story_author) {
            author.likes_received += 1;
        }
        state.append_event(ChronicleEvent::StoryLiked {
            story: story_id,
            reader: caller,
            author: story_author,
        });
        Ok(())
    }

    /// Certify a story as canonical lore. Only the creator of the story's
    /// parent universe may do this, regardless of who authored the story.
    /// The flag is one-way; repeating the call is a harmless no-op.
    pub fn mark_story_canonical(
        &self,
        caller: AuthorAddress,
        story_id: StoryId,
    ) -> Result<(), ChronicleError> {
        let mut state = self.write()?;
        let universe_id = state
            .stories
            .get(&story_id)
            .map(|story| story.universe_id)
            .ok_or(ChronicleError::StoryNotFound(story_id))?;
        let creator = state
            .universes
            .get(&universe_id)
            .map(|universe| universe.creator.clone())
            .ok_or(ChronicleError::UniverseNotFound(universe_id))?;
        if creator != caller {
            return Err(ChronicleError::Forbidden(format!(
                "only the creator of {universe_id} may mark stories canonical"
            )));
        }

        let newly_marked = state
            .stories
            .get_mut(&story_id)
            .is_some_and(|story| !std::mem::replace(&mut story.canonical, true));
        if newly_marked {
            state.append_event(ChronicleEvent::StoryMarkedCanonical {
                story: story_id,
                universe: universe_id,
                marked_by: caller,
            });
        }
        Ok(())
    }

    /// Snapshot of a story record.
    pub fn story(&self, id: StoryId) -> Result<Story, ChronicleError> {
        let state = self.read()?;
        state
            .stories
            .get(&id)
            .cloned()
            .ok_or(ChronicleError::StoryNotFound(id))
    }

    /// Story ids of a universe in creation order.
    pub fn universe_stories(
        &self,
        universe_id: UniverseId,
    ) -> Result<Vec<StoryId>, ChronicleError> {
        let state = self.read()?;
        state
            .universes
            .get(&universe_id)
            .map(|universe| universe.stories.clone())
            .ok_or(ChronicleError::UniverseNotFound(universe_id))
    }
}
