//! Author registration and stats reads.

use crate::ChronicleRegistry;
use canonry_types::{Author, AuthorAddress, ChronicleError, ChronicleEvent};
use chrono::Utc;

impl ChronicleRegistry {
    /// Register a pseudonymous author. One-shot: an address registers at
    /// most once and the pseudonym is immutable afterwards.
    pub fn register_author(
        &self,
        address: AuthorAddress,
        pseudonym: impl Into<String>,
    ) -> Result<(), ChronicleError> {
        let pseudonym = pseudonym.into();
        if pseudonym.trim().is_empty() {
            return Err(ChronicleError::InvalidInput(
                "pseudonym must not be empty".to_string(),
            ));
        }

        let mut state = self.write()?;
        if state.is_registered(&address) {
            return Err(ChronicleError::AlreadyRegistered(address));
        }

        let author = Author {
            address: address.clone(),
            pseudonym: pseudonym.clone(),
            universe_count: 0,
            story_count: 0,
            likes_received: 0,
            registered: true,
            registered_at: Some(Utc::now()),
        };
        state.authors.insert(address.clone(), author);
        state.append_event(ChronicleEvent::AuthorRegistered { address, pseudonym });
        Ok(())
    }

    /// Author record with aggregate counters.
    ///
    /// Never fails on an unknown address: an address that never registered
    /// yields a zeroed record with `registered == false`, preserving the
    /// original read-fallback contract.
    pub fn author_stats(&self, address: &AuthorAddress) -> Result<Author, ChronicleError> {
        let state = self.read()?;
        Ok(state
            .authors
            .get(address)
            .cloned()
            .unwrap_or_else(|| Author::unregistered(address.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_read_back() {
        let registry = ChronicleRegistry::new();
        let alice = AuthorAddress::new("0xa11ce");
        registry.register_author(alice.clone(), "Alice").unwrap();

        let stats = registry.author_stats(&alice).unwrap();
        assert!(stats.registered);
        assert_eq!(stats.pseudonym, "Alice");
        assert_eq!(stats.universe_count, 0);
        assert!(stats.registered_at.is_some());
    }

    #[test]
    fn registration_is_one_shot() {
        let registry = ChronicleRegistry::new();
        let alice = AuthorAddress::new("0xa11ce");
        registry.register_author(alice.clone(), "Alice").unwrap();

        let result = registry.register_author(alice.clone(), "Alicia");
        assert!(matches!(result, Err(ChronicleError::AlreadyRegistered(a)) if a == alice));
        // The original pseudonym stands.
        assert_eq!(registry.author_stats(&alice).unwrap().pseudonym, "Alice");
    }

    #[test]
    fn pseudonym_must_not_be_empty() {
        let registry = ChronicleRegistry::new();
        let result = registry.register_author(AuthorAddress::new("0xb0b"), "   ");
        assert!(matches!(result, Err(ChronicleError::InvalidInput(_))));
        assert!(registry.events().unwrap().is_empty());
    }

    #[test]
    fn unknown_address_reads_as_zeroed_default() {
        let registry = ChronicleRegistry::new();
        let ghost = AuthorAddress::new("0xghost");
        let stats = registry.author_stats(&ghost).unwrap();
        assert!(!stats.registered);
        assert_eq!(stats.address, ghost);
        assert_eq!(stats.story_count, 0);
    }
}
