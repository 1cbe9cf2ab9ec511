use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::MetadataError;

/// The role an entity plays in the federation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRole {
    ServiceProvider,
    IdentityProvider,
}

impl EntityRole {
    /// Short form used in logs and reports.
    pub fn short(self) -> &'static str {
        match self {
            EntityRole::ServiceProvider => "sp",
            EntityRole::IdentityProvider => "idp",
        }
    }
}

impl fmt::Display for EntityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRole::ServiceProvider => write!(f, "service provider"),
            EntityRole::IdentityProvider => write!(f, "identity provider"),
        }
    }
}

impl FromStr for EntityRole {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "saml20-sp" | "sp" | "service_provider" | "serviceprovider" => {
                Ok(EntityRole::ServiceProvider)
            }
            "saml20-idp" | "idp" | "identity_provider" | "identityprovider" => {
                Ok(EntityRole::IdentityProvider)
            }
            _ => Err(MetadataError::UnknownRole(s.to_string())),
        }
    }
}

/// A federation participant, keyed by entity ID and role.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Entity {
    id: String,
    role: EntityRole,
}

impl Entity {
    pub fn new(id: impl Into<String>, role: EntityRole) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn service_provider(id: impl Into<String>) -> Self {
        Self::new(id, EntityRole::ServiceProvider)
    }

    pub fn identity_provider(id: impl Into<String>) -> Self {
        Self::new(id, EntityRole::IdentityProvider)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> EntityRole {
        self.role
    }

    pub fn is_service_provider(&self) -> bool {
        self.role == EntityRole::ServiceProvider
    }

    pub fn is_identity_provider(&self) -> bool {
        self.role == EntityRole::IdentityProvider
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.role.short())
    }
}

/// Deduplicating set of entities. Equality ignores insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntitySet {
    entities: BTreeSet<Entity>,
}

impl EntitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the entity was already present.
    pub fn insert(&mut self, entity: Entity) -> bool {
        self.entities.insert(entity)
    }

    pub fn contains(&self, entity: &Entity) -> bool {
        self.entities.contains(entity)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }
}

impl FromIterator<Entity> for EntitySet {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self {
            entities: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a EntitySet {
    type Item = &'a Entity;
    type IntoIter = std::collections::btree_set::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}
