use std::collections::BTreeMap;

use crate::entity::{Entity, EntitySet};

/// Key whose entities are excluded from every suite and test.
pub const WILDCARD: &str = "*";

/// Per-suite, per-test and global exclusion of entities.
///
/// Names are the dotted suite/test names. A name nobody registered is inert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    wildcard: EntitySet,
    by_name: BTreeMap<String, EntitySet>,
}

impl Blacklist {
    pub fn new(wildcard: EntitySet, by_name: BTreeMap<String, EntitySet>) -> Self {
        Self { wildcard, by_name }
    }

    /// Build from a name → entities table; the `*` key becomes the wildcard.
    pub fn from_table<I>(table: I) -> Self
    where
        I: IntoIterator<Item = (String, EntitySet)>,
    {
        let mut blacklist = Blacklist::default();
        for (name, entities) in table {
            if name == WILDCARD {
                for entity in &entities {
                    blacklist.wildcard.insert(entity.clone());
                }
            } else {
                let set = blacklist.by_name.entry(name).or_default();
                for entity in &entities {
                    set.insert(entity.clone());
                }
            }
        }
        blacklist
    }

    pub fn is_blacklisted(&self, entity: &Entity, name: &str) -> bool {
        if self.wildcard.contains(entity) {
            return true;
        }
        self.by_name
            .get(name)
            .is_some_and(|entities| entities.contains(entity))
    }

    pub fn is_empty(&self) -> bool {
        self.wildcard.is_empty() && self.by_name.values().all(EntitySet::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp() -> Entity {
        Entity::service_provider("https://sp.example.org")
    }

    fn idp() -> Entity {
        Entity::identity_provider("https://idp.example.org")
    }

    fn set(entities: &[Entity]) -> EntitySet {
        entities.iter().cloned().collect()
    }

    #[test]
    fn empty_blacklist_excludes_nothing() {
        let blacklist = Blacklist::default();
        assert!(blacklist.is_empty());
        assert!(!blacklist.is_blacklisted(&sp(), "sp_metadata"));
    }

    #[test]
    fn wildcard_applies_to_every_name() {
        let blacklist = Blacklist::new(set(&[sp()]), BTreeMap::new());
        assert!(blacklist.is_blacklisted(&sp(), "sp_metadata"));
        assert!(blacklist.is_blacklisted(&sp(), "anything.at_all"));
        assert!(!blacklist.is_blacklisted(&idp(), "sp_metadata"));
    }

    #[test]
    fn named_entry_applies_only_to_that_name() {
        let blacklist = Blacklist::from_table(vec![(
            "sp_metadata.certificate_matches".to_string(),
            set(&[sp()]),
        )]);
        assert!(blacklist.is_blacklisted(&sp(), "sp_metadata.certificate_matches"));
        assert!(!blacklist.is_blacklisted(&sp(), "sp_metadata"));
        assert!(!blacklist.is_blacklisted(&idp(), "sp_metadata.certificate_matches"));
    }

    #[test]
    fn truth_table() {
        let blacklist = Blacklist::from_table(vec![
            (WILDCARD.to_string(), set(&[idp()])),
            ("entity_information".to_string(), set(&[sp()])),
        ]);
        let names = ["entity_information", "sp_metadata", "unknown.name"];
        for entity in [sp(), idp()] {
            for name in names {
                let expected = entity == idp() || (entity == sp() && name == "entity_information");
                assert_eq!(
                    blacklist.is_blacklisted(&entity, name),
                    expected,
                    "{} / {}",
                    entity,
                    name
                );
            }
        }
    }

    #[test]
    fn role_is_part_of_the_key() {
        let blacklist = Blacklist::new(set(&[sp()]), BTreeMap::new());
        let same_id_idp = Entity::identity_provider("https://sp.example.org");
        assert!(!blacklist.is_blacklisted(&same_id_idp, "sp_metadata"));
    }
}
