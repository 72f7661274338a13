//! Canonry Registry - the single source of truth for the chronicle
//!
//! All tables (authors, universes, stories), the sequential id counters, and
//! the audit event chain live in one state struct behind one lock. Every
//! mutating operation validates, mutates, and appends its event inside a
//! single write-lock hold, so each commit is all-or-nothing and id
//! allocation is strictly serialized. Queries take the read lock and return
//! cloned snapshots.

#![deny(unsafe_code)]

mod events;
mod identity;
mod state;
mod stories;
mod universes;

use canonry_types::{ChronicleConfig, ChronicleError, ChronicleStatistics};
use state::ChronicleState;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The chronicle registry.
pub struct ChronicleRegistry {
    state: RwLock<ChronicleState>,
    config: ChronicleConfig,
}

impl ChronicleRegistry {
    /// Create a registry with default policy.
    pub fn new() -> Self {
        Self::with_config(ChronicleConfig::default())
    }

    /// Create a registry with explicit policy knobs.
    pub fn with_config(config: ChronicleConfig) -> Self {
        Self {
            state: RwLock::new(ChronicleState::default()),
            config,
        }
    }

    pub fn config(&self) -> &ChronicleConfig {
        &self.config
    }

    /// Registry-wide totals in one consistent snapshot.
    pub fn statistics(&self) -> Result<ChronicleStatistics, ChronicleError> {
        let state = self.read()?;
        Ok(ChronicleStatistics {
            total_authors: state.authors.len() as u64,
            total_universes: state.total_universes,
            total_stories: state.total_stories,
            total_likes: state.stories.values().map(|story| story.likes).sum(),
        })
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, ChronicleState>, ChronicleError> {
        self.state.read().map_err(|_| ChronicleError::LockPoisoned)
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, ChronicleState>, ChronicleError> {
        self.state.write().map_err(|_| ChronicleError::LockPoisoned)
    }
}

impl Default for ChronicleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
