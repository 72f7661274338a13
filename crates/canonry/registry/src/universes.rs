//! Universe creation and per-universe access control.

use crate::ChronicleRegistry;
use canonry_types::{
    AuthorAddress, ChronicleError, ChronicleEvent, Universe, UniverseId, Visibility,
};
use chrono::Utc;
use std::collections::BTreeSet;

impl ChronicleRegistry {
    /// Create a universe owned by `caller`. The creator is auto-authorized
    /// as a contributor.
    pub fn create_universe(
        &self,
        caller: AuthorAddress,
        name: impl Into<String>,
        description: impl Into<String>,
        visibility: Visibility,
    ) -> Result<UniverseId, ChronicleError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ChronicleError::InvalidInput(
                "universe name must not be empty".to_string(),
            ));
        }

        let mut state = self.write()?;
        if !state.is_registered(&caller) {
            return Err(ChronicleError::NotRegistered(caller));
        }

        let id = state.allocate_universe_id();
        let mut authorized_authors = BTreeSet::new();
        authorized_authors.insert(caller.clone());
        state.universes.insert(
            id,
            Universe {
                id,
                name,
                description: description.into(),
                creator: caller.clone(),
                visibility,
                created_at: Utc::now(),
                story_count: 0,
                authorized_authors,
                stories: Vec::new(),
            },
        );
        if let Some(author) = state.authors.get_mut(&caller) {
            author.universe_count += 1;
        }
        state.total_universes += 1;
        state.append_event(ChronicleEvent::UniverseCreated {
            universe: id,
            creator: caller,
            visibility,
        });
        Ok(id)
    }

    /// Snapshot of a universe record.
    pub fn universe(&self, id: UniverseId) -> Result<Universe, ChronicleError> {
        let state = self.read()?;
        state
            .universes
            .get(&id)
            .cloned()
            .ok_or(ChronicleError::UniverseNotFound(id))
    }

    /// Grant `target` contributor access to a universe. Creator-only, not
    /// delegable. Re-authorizing an existing member is a successful no-op
    /// and appends no event.
    pub fn authorize_author(
        &self,
        caller: AuthorAddress,
        universe_id: UniverseId,
        target: AuthorAddress,
    ) -> Result<(), ChronicleError> {
        let mut state = self.write()?;
        let creator = state
            .universes
            .get(&universe_id)
            .map(|universe| universe.creator.clone())
            .ok_or(ChronicleError::UniverseNotFound(universe_id))?;
        if creator != caller {
            return Err(ChronicleError::Forbidden(format!(
                "only the creator of {universe_id} may authorize contributors"
            )));
        }
        if !state.is_registered(&target) {
            return Err(ChronicleError::NotRegistered(target));
        }

        let newly_granted = state
            .universes
            .get_mut(&universe_id)
            .is_some_and(|universe| universe.authorized_authors.insert(target.clone()));
        if newly_granted {
            state.append_event(ChronicleEvent::AuthorAuthorized {
                universe: universe_id,
                author: target,
                granted_by: caller,
            });
        }
        Ok(())
    }

    /// Whether `address` may contribute stories to the universe: public
    /// universes accept any registered author, private ones only members of
    /// the authorized set.
    pub fn is_authorized(
        &self,
        universe_id: UniverseId,
        address: &AuthorAddress,
    ) -> Result<bool, ChronicleError> {
        let state = self.read()?;
        let universe = state
            .universes
            .get(&universe_id)
            .ok_or(ChronicleError::UniverseNotFound(universe_id))?;
        Ok(universe.visibility.is_public() || universe.authorized_authors.contains(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered(registry: &ChronicleRegistry, key: &str) -> AuthorAddress {
        let address = AuthorAddress::new(key);
        registry.register_author(address.clone(), key).unwrap();
        address
    }

    #[test]
    fn creation_requires_registration() {
        let registry = ChronicleRegistry::new();
        let result = registry.create_universe(
            AuthorAddress::new("nobody"),
            "Verse",
            "",
            Visibility::Public,
        );
        assert!(matches!(result, Err(ChronicleError::NotRegistered(_))));
    }

    #[test]
    fn creation_requires_a_name() {
        let registry = ChronicleRegistry::new();
        let alice = registered(&registry, "alice");
        let result = registry.create_universe(alice, "  ", "", Visibility::Public);
        assert!(matches!(result, Err(ChronicleError::InvalidInput(_))));
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let registry = ChronicleRegistry::new();
        let alice = registered(&registry, "alice");
        let first = registry
            .create_universe(alice.clone(), "First", "", Visibility::Public)
            .unwrap();
        let second = registry
            .create_universe(alice.clone(), "Second", "", Visibility::Private)
            .unwrap();
        assert_eq!(first, UniverseId(1));
        assert_eq!(second, UniverseId(2));
        assert_eq!(registry.author_stats(&alice).unwrap().universe_count, 2);
    }

    #[test]
    fn creator_is_always_authorized() {
        let registry = ChronicleRegistry::new();
        let alice = registered(&registry, "alice");
        let id = registry
            .create_universe(alice.clone(), "Verse", "", Visibility::Private)
            .unwrap();
        assert!(registry.is_authorized(id, &alice).unwrap());
        let universe = registry.universe(id).unwrap();
        assert!(universe.authorized_authors.contains(&alice));
    }

    #[test]
    fn lookup_of_unallocated_id_fails() {
        let registry = ChronicleRegistry::new();
        let result = registry.universe(UniverseId(999));
        assert!(matches!(
            result,
            Err(ChronicleError::UniverseNotFound(UniverseId(999)))
        ));
    }

    #[test]
    fn authorization_is_creator_only() {
        let registry = ChronicleRegistry::new();
        let alice = registered(&registry, "alice");
        let carol = registered(&registry, "carol");
        let mallory = registered(&registry, "mallory");
        let id = registry
            .create_universe(alice, "Verse", "", Visibility::Private)
            .unwrap();

        let result = registry.authorize_author(mallory, id, carol);
        assert!(matches!(result, Err(ChronicleError::Forbidden(_))));
    }

    #[test]
    fn authorization_requires_registered_target() {
        let registry = ChronicleRegistry::new();
        let alice = registered(&registry, "alice");
        let id = registry
            .create_universe(alice.clone(), "Verse", "", Visibility::Private)
            .unwrap();

        let result = registry.authorize_author(alice, id, AuthorAddress::new("ghost"));
        assert!(matches!(result, Err(ChronicleError::NotRegistered(_))));
    }

    #[test]
    fn authorization_of_missing_universe_fails() {
        let registry = ChronicleRegistry::new();
        let alice = registered(&registry, "alice");
        let result = registry.authorize_author(alice.clone(), UniverseId(7), alice);
        assert!(matches!(result, Err(ChronicleError::UniverseNotFound(_))));
    }

    #[test]
    fn reauthorization_is_a_silent_no_op() {
        let registry = ChronicleRegistry::new();
        let alice = registered(&registry, "alice");
        let carol = registered(&registry, "carol");
        let id = registry
            .create_universe(alice.clone(), "Verse", "", Visibility::Private)
            .unwrap();

        registry
            .authorize_author(alice.clone(), id, carol.clone())
            .unwrap();
        let events_after_first = registry.events().unwrap().len();
        registry.authorize_author(alice, id, carol.clone()).unwrap();

        assert_eq!(registry.events().unwrap().len(), events_after_first);
        assert!(registry.is_authorized(id, &carol).unwrap());
    }

    #[test]
    fn public_universes_admit_any_identity_query() {
        let registry = ChronicleRegistry::new();
        let alice = registered(&registry, "alice");
        let id = registry
            .create_universe(alice, "Open Verse", "", Visibility::Public)
            .unwrap();
        assert!(registry
            .is_authorized(id, &AuthorAddress::new("anyone"))
            .unwrap());
    }
}
