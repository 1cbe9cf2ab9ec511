use serde::Serialize;

use super::{
    AssertionConsumerService, Certificate, Contact, LocalizedText, NameIdFormat, Scope,
    SingleSignOnService, Url,
};
use crate::entity::{Entity, EntityRole};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Organization {
    pub names: LocalizedText,
    pub display_names: LocalizedText,
    pub urls: LocalizedText,
}

/// Metadata an entity publishes about itself (one `EntityDescriptor`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishedMetadata {
    pub entity_id: String,
    pub certificates: Vec<Certificate>,
    pub assertion_consumer_services: Vec<AssertionConsumerService>,
    pub single_sign_on_services: Vec<SingleSignOnService>,
    pub name_id_formats: Vec<NameIdFormat>,
    pub display_names: LocalizedText,
    pub descriptions: LocalizedText,
    pub logos: Vec<Url>,
    pub organization: Option<Organization>,
    pub contacts: Vec<Contact>,
    pub scopes: Vec<Scope>,
}

impl PublishedMetadata {
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            ..Self::default()
        }
    }

    /// Matching entity ID and a non-empty endpoint list for the entity's role
    /// (ACS for a service provider, SSO for an identity provider). The other
    /// role's endpoints are not looked at.
    pub fn is_published_for(&self, entity: &Entity) -> bool {
        if self.entity_id != entity.id() {
            return false;
        }
        match entity.role() {
            EntityRole::ServiceProvider => !self.assertion_consumer_services.is_empty(),
            EntityRole::IdentityProvider => !self.single_sign_on_services.is_empty(),
        }
    }

    pub fn has_certificate(&self, certificate: &Certificate) -> bool {
        self.certificates.contains(certificate)
    }
}
