use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{
    AssertionConsumerService, Certificate, Contact, ContactSet, LocalizedText, Logo,
    MetadataError, NameIdFormat, Scope, SingleSignOnService, Url,
};
use crate::entity::EntityRole;
use crate::validation::{Node, ValidationContext};
use crate::violation::ViolationWriter;

/// Property holding a support page that must answer with 200.
pub const SUPPORT_URL_PROPERTY: &str = "support_url";

/// Which users an identity provider may assert as guests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum GuestQualifier {
    All,
    Some,
    None,
}

impl FromStr for GuestQualifier {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "All" | "all" => Ok(GuestQualifier::All),
            "Some" | "some" => Ok(GuestQualifier::Some),
            "None" | "none" => Ok(GuestQualifier::None),
            other => Err(MetadataError::UnknownGuestQualifier(other.to_string())),
        }
    }
}

impl TryFrom<String> for GuestQualifier {
    type Error = MetadataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The operator-maintained policy record for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredMetadata {
    role: EntityRole,
    metadata_url: Option<Url>,
    assertion_consumer_services: Vec<AssertionConsumerService>,
    single_sign_on_services: Vec<SingleSignOnService>,
    contacts: ContactSet,
    name: LocalizedText,
    description: LocalizedText,
    keywords: LocalizedText,
    logos: Vec<Logo>,
    default_name_id_format: NameIdFormat,
    name_id_formats: Vec<NameIdFormat>,
    scopes: Vec<Scope>,
    certificate: Option<Certificate>,
    sign_redirects: Option<bool>,
    guest_qualifier: Option<GuestQualifier>,
    properties: BTreeMap<String, String>,
}

impl ConfiguredMetadata {
    pub fn builder(role: EntityRole) -> ConfiguredMetadataBuilder {
        ConfiguredMetadataBuilder {
            metadata: ConfiguredMetadata {
                role,
                metadata_url: None,
                assertion_consumer_services: Vec::new(),
                single_sign_on_services: Vec::new(),
                contacts: ContactSet::new(),
                name: LocalizedText::new(),
                description: LocalizedText::new(),
                keywords: LocalizedText::new(),
                logos: Vec::new(),
                default_name_id_format: NameIdFormat::Unset,
                name_id_formats: Vec::new(),
                scopes: Vec::new(),
                certificate: None,
                sign_redirects: None,
                guest_qualifier: None,
                properties: BTreeMap::new(),
            },
        }
    }

    /// Start from the registry's entity type string (`saml20-sp`, `saml20-idp`).
    pub fn builder_for_type(entity_type: &str) -> Result<ConfiguredMetadataBuilder, MetadataError> {
        Ok(Self::builder(entity_type.parse()?))
    }

    pub fn role(&self) -> EntityRole {
        self.role
    }

    pub fn metadata_url(&self) -> Option<&Url> {
        self.metadata_url.as_ref()
    }

    pub fn assertion_consumer_services(&self) -> &[AssertionConsumerService] {
        &self.assertion_consumer_services
    }

    pub fn single_sign_on_services(&self) -> &[SingleSignOnService] {
        &self.single_sign_on_services
    }

    pub fn contacts(&self) -> &ContactSet {
        &self.contacts
    }

    pub fn name(&self) -> &LocalizedText {
        &self.name
    }

    pub fn description(&self) -> &LocalizedText {
        &self.description
    }

    pub fn keywords(&self) -> &LocalizedText {
        &self.keywords
    }

    pub fn logos(&self) -> &[Logo] {
        &self.logos
    }

    pub fn default_name_id_format(&self) -> &NameIdFormat {
        &self.default_name_id_format
    }

    pub fn name_id_formats(&self) -> &[NameIdFormat] {
        &self.name_id_formats
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn certificate(&self) -> Option<&Certificate> {
        self.certificate.as_ref()
    }

    /// `None` when the operator has not decided.
    pub fn sign_redirects(&self) -> Option<bool> {
        self.sign_redirects
    }

    pub fn guest_qualifier(&self) -> Option<GuestQualifier> {
        self.guest_qualifier
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub(crate) fn check(&self, writer: &mut dyn ViolationWriter, context: &ValidationContext) {
        match self.role {
            EntityRole::ServiceProvider => {
                if self.assertion_consumer_services.is_empty() {
                    writer.add("no AssertionConsumerService configured".to_string());
                }
                if !self.default_name_id_format.is_set() {
                    writer.add("no default NameID format configured".to_string());
                }
            }
            EntityRole::IdentityProvider => {
                if self.single_sign_on_services.is_empty() {
                    writer.add("no SingleSignOnService configured".to_string());
                }
                if self.scopes.is_empty() {
                    writer.add("identity provider has no scope configured".to_string());
                }
            }
        }

        let mut seen = BTreeSet::new();
        for acs in &self.assertion_consumer_services {
            if !seen.insert(acs.index.as_str()) {
                writer.add(format!(
                    "AssertionConsumerService index \"{}\" is used more than once",
                    acs.index
                ));
            }
        }

        if !self.name.has("en") {
            writer.add("name has no English (en) translation".to_string());
        }
        if !self.description.has("en") {
            writer.add("description has no English (en) translation".to_string());
        }

        if self.default_name_id_format.is_set()
            && !self.name_id_formats.is_empty()
            && !self.name_id_formats.contains(&self.default_name_id_format)
        {
            writer.add(format!(
                "default NameID format {} is not among the accepted formats",
                self.default_name_id_format
            ));
        }

        if self.guest_qualifier.is_some() && self.role != EntityRole::IdentityProvider {
            writer.add("guest qualifier only applies to identity providers".to_string());
        }

        if let Some(support_url) = self.property(SUPPORT_URL_PROPERTY) {
            if let Err(reason) = context.check_reachable(support_url) {
                writer.add(format!(
                    "support URL \"{}\" is not reachable: {}",
                    support_url, reason
                ));
            }
        }
    }

    pub(crate) fn children(&self) -> Vec<(Node<'_>, String)> {
        let mut children = Vec::new();

        if let Some(ref url) = self.metadata_url {
            children.push((Node::Url(url), "Metadata URL".to_string()));
        }
        for acs in &self.assertion_consumer_services {
            children.push((
                Node::AssertionConsumerService(acs),
                format!("AssertionConsumerService index #{}", acs.index),
            ));
        }
        for (i, sso) in self.single_sign_on_services.iter().enumerate() {
            children.push((
                Node::SingleSignOnService(sso),
                format!("SingleSignOnService #{}", i),
            ));
        }
        for (i, contact) in self.contacts.iter().enumerate() {
            children.push((Node::Contact(contact), format!("Contact #{}", i)));
        }
        children.push((Node::LocalizedText(&self.name), "Name".to_string()));
        children.push((
            Node::LocalizedText(&self.description),
            "Description".to_string(),
        ));
        children.push((Node::LocalizedText(&self.keywords), "Keywords".to_string()));
        for (i, logo) in self.logos.iter().enumerate() {
            children.push((Node::Logo(logo), format!("Logo #{}", i)));
        }
        if self.default_name_id_format.is_set() {
            children.push((
                Node::NameIdFormat(&self.default_name_id_format),
                "Default NameIDFormat".to_string(),
            ));
        }
        for (i, format) in self.name_id_formats.iter().enumerate() {
            children.push((Node::NameIdFormat(format), format!("NameIDFormat #{}", i)));
        }
        for (i, scope) in self.scopes.iter().enumerate() {
            children.push((Node::Scope(scope), format!("Scope #{}", i)));
        }
        if let Some(ref certificate) = self.certificate {
            children.push((Node::Certificate(certificate), "Certificate".to_string()));
        }

        children
    }
}

pub struct ConfiguredMetadataBuilder {
    metadata: ConfiguredMetadata,
}

impl ConfiguredMetadataBuilder {
    pub fn metadata_url(mut self, url: impl Into<Url>) -> Self {
        self.metadata.metadata_url = Some(url.into());
        self
    }

    pub fn assertion_consumer_service(mut self, acs: AssertionConsumerService) -> Self {
        self.metadata.assertion_consumer_services.push(acs);
        self
    }

    pub fn single_sign_on_service(mut self, sso: SingleSignOnService) -> Self {
        self.metadata.single_sign_on_services.push(sso);
        self
    }

    pub fn contact(mut self, contact: Contact) -> Self {
        self.metadata.contacts.insert(contact);
        self
    }

    pub fn name(mut self, name: LocalizedText) -> Self {
        self.metadata.name = name;
        self
    }

    pub fn description(mut self, description: LocalizedText) -> Self {
        self.metadata.description = description;
        self
    }

    pub fn keywords(mut self, keywords: LocalizedText) -> Self {
        self.metadata.keywords = keywords;
        self
    }

    pub fn logo(mut self, logo: Logo) -> Self {
        self.metadata.logos.push(logo);
        self
    }

    pub fn default_name_id_format(mut self, format: NameIdFormat) -> Self {
        self.metadata.default_name_id_format = format;
        self
    }

    pub fn name_id_format(mut self, format: NameIdFormat) -> Self {
        self.metadata.name_id_formats.push(format);
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.metadata.scopes.push(scope);
        self
    }

    pub fn certificate(mut self, certificate: Certificate) -> Self {
        self.metadata.certificate = Some(certificate);
        self
    }

    pub fn sign_redirects(mut self, sign: Option<bool>) -> Self {
        self.metadata.sign_redirects = sign;
        self
    }

    pub fn guest_qualifier(mut self, qualifier: Option<GuestQualifier>) -> Self {
        self.metadata.guest_qualifier = qualifier;
        self
    }

    pub fn property(mut self, key: &str, value: &str) -> Self {
        self.metadata
            .properties
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> ConfiguredMetadata {
        self.metadata
    }
}
