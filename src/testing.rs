//! Fixtures and fakes shared by unit tests.

use std::cell::Cell;

use anyhow::{bail, Result};

use crate::entity::{Entity, EntityRole};
use crate::model::{
    AssertionConsumerService, Binding, ConfiguredMetadata, ConfiguredMetadataBuilder, Contact,
    ContactType, LocalizedText, NameIdFormat, PublishedMetadata, Scope, SingleSignOnService,
};
use crate::source::{Fetcher, PublishedMetadataSource};
use crate::validation::{Method, ProbeError, Prober, ValidationContext};

/// Answers every request with the same status.
pub struct FixedStatus(pub u16);

impl Prober for FixedStatus {
    fn request(&self, _method: Method, _url: &str) -> Result<u16, ProbeError> {
        Ok(self.0)
    }
}

/// Fails every request at the transport level.
pub struct Unreachable;

impl Prober for Unreachable {
    fn request(&self, _method: Method, url: &str) -> Result<u16, ProbeError> {
        Err(ProbeError::Transport {
            url: url.to_string(),
            reason: "connection refused".to_string(),
        })
    }
}

/// Every URL answers 200.
pub fn context_ok() -> ValidationContext {
    ValidationContext::new(Box::new(FixedStatus(200)))
}

fn support_contact() -> Contact {
    Contact::new(ContactType::Support)
        .with_name("Service", "Desk")
        .with_email("help@example.org")
}

/// A service provider without violations.
pub fn valid_sp() -> ConfiguredMetadataBuilder {
    ConfiguredMetadata::builder(EntityRole::ServiceProvider)
        .metadata_url("https://sp.example.org/Shibboleth.sso/Metadata")
        .assertion_consumer_service(AssertionConsumerService::new(
            Binding::HttpPost,
            "https://sp.example.org/Shibboleth.sso/SAML2/POST",
            "0",
        ))
        .contact(support_contact())
        .name(LocalizedText::new().with("en", "Wiki").with("nl", "Wiki"))
        .description(LocalizedText::new().with("en", "A wiki"))
        .default_name_id_format(NameIdFormat::Persistent)
}

/// An identity provider without violations.
pub fn valid_idp() -> ConfiguredMetadataBuilder {
    ConfiguredMetadata::builder(EntityRole::IdentityProvider)
        .metadata_url("https://idp.example.org/idp/shibboleth")
        .single_sign_on_service(SingleSignOnService::new(
            Binding::HttpRedirect,
            "https://idp.example.org/idp/profile/SAML2/Redirect/SSO",
        ))
        .contact(support_contact())
        .name(LocalizedText::new().with("en", "Campus login"))
        .description(LocalizedText::new().with("en", "Login for staff and students"))
        .scope(Scope::Literal("example.org".to_string()))
}

/// Published counterpart of [`valid_sp`].
pub fn published_sp() -> PublishedMetadata {
    let mut metadata = PublishedMetadata::new("https://sp.example.org");
    metadata
        .assertion_consumer_services
        .push(AssertionConsumerService::new(
            Binding::HttpPost,
            "https://sp.example.org/Shibboleth.sso/SAML2/POST",
            "0",
        ));
    metadata.name_id_formats.push(NameIdFormat::Persistent);
    metadata.display_names = LocalizedText::new().with("en", "Wiki").with("nl", "Wiki");
    metadata.contacts.push(support_contact());
    metadata
}

/// Published counterpart of [`valid_idp`].
pub fn published_idp() -> PublishedMetadata {
    let mut metadata = PublishedMetadata::new("https://idp.example.org");
    metadata.single_sign_on_services.push(SingleSignOnService::new(
        Binding::HttpRedirect,
        "https://idp.example.org/idp/profile/SAML2/Redirect/SSO",
    ));
    metadata.display_names = LocalizedText::new().with("en", "Campus login");
    metadata.scopes.push(Scope::Literal("example.org".to_string()));
    metadata.contacts.push(support_contact());
    metadata
}

/// Serves one document for every entity and counts lookups.
pub struct CountingPublished {
    metadata: Option<PublishedMetadata>,
    calls: Cell<usize>,
}

impl CountingPublished {
    pub fn with(metadata: PublishedMetadata) -> Self {
        Self {
            metadata: Some(metadata),
            calls: Cell::new(0),
        }
    }

    pub fn empty() -> Self {
        Self {
            metadata: None,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl PublishedMetadataSource for CountingPublished {
    fn metadata_for(&self, _entity: &Entity) -> Option<PublishedMetadata> {
        self.calls.set(self.calls.get() + 1);
        self.metadata.clone()
    }
}

/// Returns a fixed body, or fails when built without one.
pub struct StaticFetcher {
    body: Option<String>,
    calls: Cell<usize>,
}

impl StaticFetcher {
    pub fn new(body: Option<&str>) -> Self {
        Self {
            body: body.map(str::to_string),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Fetcher for StaticFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        match &self.body {
            Some(body) => Ok(body.clone()),
            None => bail!("GET {} failed: connection refused", url),
        }
    }
}
