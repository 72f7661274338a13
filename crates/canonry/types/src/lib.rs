//! Canonry Types - the shared vocabulary of the chronicle
//!
//! Identifiers, entity records, audit events, and the single error surface
//! used by every Canonry component. Records here are plain data; all
//! invariant enforcement lives in `canonry-registry`.

#![deny(unsafe_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Opaque, externally supplied identity key for an author.
///
/// Canonry never interprets the address; it is a stable pseudonymous key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AuthorAddress(pub String);

impl AuthorAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }
}

impl std::fmt::Display for AuthorAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dense sequential universe identifier, allocated from 1 and never reused.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct UniverseId(pub u64);

impl std::fmt::Display for UniverseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "universe-{}", self.0)
    }
}

/// Dense sequential story identifier, allocated from 1 and never reused.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct StoryId(pub u64);

impl std::fmt::Display for StoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "story-{}", self.0)
    }
}

/// Contribution policy of a universe, fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Any registered author may contribute stories.
    Public,
    /// Only authorized authors may contribute stories.
    Private,
}

impl Visibility {
    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }
}

/// A registered author and their derived aggregate statistics.
///
/// Counters are monotonically non-decreasing; they are mutated only by the
/// registry as a side effect of that author's actions or of likes received.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub address: AuthorAddress,
    pub pseudonym: String,
    pub universe_count: u64,
    pub story_count: u64,
    pub likes_received: u64,
    pub registered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<DateTime<Utc>>,
}

impl Author {
    /// Zeroed fallback record for an address that never registered.
    pub fn unregistered(address: AuthorAddress) -> Self {
        Self {
            address,
            pseudonym: String::new(),
            universe_count: 0,
            story_count: 0,
            likes_received: 0,
            registered: false,
            registered_at: None,
        }
    }
}

/// A collaborative fiction setting with an owning creator and an access policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Universe {
    pub id: UniverseId,
    pub name: String,
    pub description: String,
    pub creator: AuthorAddress,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
    /// Derived count; always equals `stories.len()`.
    pub story_count: u64,
    /// Authors permitted to contribute when the universe is private.
    /// The creator is always a member.
    pub authorized_authors: BTreeSet<AuthorAddress>,
    /// Append-only story index in creation order.
    pub stories: Vec<StoryId>,
}

/// A titled, authored contribution bound to one universe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    pub universe_id: UniverseId,
    pub title: String,
    pub content: String,
    pub author: AuthorAddress,
    pub created_at: DateTime<Utc>,
    /// Derived count; always equals `liked_by.len()`.
    pub likes: u64,
    /// One-way flag set by the universe creator; never cleared.
    pub canonical: bool,
    pub liked_by: BTreeSet<AuthorAddress>,
}

/// Registry-wide totals, derived from the tables in one snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChronicleStatistics {
    pub total_authors: u64,
    pub total_universes: u64,
    pub total_stories: u64,
    pub total_likes: u64,
}

/// One audit event per committed mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChronicleEvent {
    AuthorRegistered {
        address: AuthorAddress,
        pseudonym: String,
    },
    UniverseCreated {
        universe: UniverseId,
        creator: AuthorAddress,
        visibility: Visibility,
    },
    AuthorAuthorized {
        universe: UniverseId,
        author: AuthorAddress,
        granted_by: AuthorAddress,
    },
    StoryAdded {
        story: StoryId,
        universe: UniverseId,
        author: AuthorAddress,
    },
    StoryLiked {
        story: StoryId,
        reader: AuthorAddress,
        author: AuthorAddress,
    },
    StoryMarkedCanonical {
        story: StoryId,
        universe: UniverseId,
        marked_by: AuthorAddress,
    },
}

/// A committed event wrapped with its position in the tamper-evident chain.
///
/// `hash` covers the previous hash, sequence, timestamp, and event payload,
/// so any rewrite of history breaks the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_id: String,
    /// Dense from 1, in commit order.
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub event: ChronicleEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_hash: Option<String>,
    pub hash: String,
}

/// Policy knobs for deliberately-decided behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChronicleConfig {
    /// When true, `like_story` requires the caller to be a registered author.
    /// The default (`false`) preserves the original open-likes behavior.
    pub require_registered_likers: bool,
}

/// Every failure the chronicle can report.
///
/// All variants are total validation failures: the operation that returned
/// one has left state exactly as it was.
#[derive(Debug, Error)]
pub enum ChronicleError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("author not registered: {0}")]
    NotRegistered(AuthorAddress),

    #[error("author already registered: {0}")]
    AlreadyRegistered(AuthorAddress),

    #[error("universe not found: {0}")]
    UniverseNotFound(UniverseId),

    #[error("story not found: {0}")]
    StoryNotFound(StoryId),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("{story} already liked by {reader}")]
    AlreadyLiked {
        story: StoryId,
        reader: AuthorAddress,
    },

    #[error("chronicle state lock poisoned")]
    LockPoisoned,
}
