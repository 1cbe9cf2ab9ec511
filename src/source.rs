//! Where configured and published metadata come from.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::entity::{Entity, EntitySet};
use crate::model::{ConfiguredMetadata, PublishedMetadata, Url};
use crate::parsers::saml_metadata;

pub trait ConfiguredMetadataSource {
    fn configured_entities(&self) -> EntitySet;
    fn metadata_for(&self, entity: &Entity) -> Result<ConfiguredMetadata>;
}

pub trait PublishedMetadataSource {
    /// `None` covers every way of not getting exactly one descriptor.
    fn metadata_for(&self, entity: &Entity) -> Option<PublishedMetadata>;
}

/// Retrieves a document by URL.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Configured metadata held in memory, usually built from the config file.
#[derive(Debug, Default)]
pub struct StaticConfiguredMetadata {
    entities: BTreeMap<Entity, ConfiguredMetadata>,
}

impl StaticConfiguredMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: Entity, metadata: ConfiguredMetadata) {
        self.entities.insert(entity, metadata);
    }

    /// Metadata URL per entity, for [`HttpPublishedMetadata`].
    pub fn metadata_urls(&self) -> BTreeMap<Entity, Url> {
        self.entities
            .iter()
            .filter_map(|(entity, metadata)| {
                metadata
                    .metadata_url()
                    .map(|url| (entity.clone(), url.clone()))
            })
            .collect()
    }
}

impl FromIterator<(Entity, ConfiguredMetadata)> for StaticConfiguredMetadata {
    fn from_iter<I: IntoIterator<Item = (Entity, ConfiguredMetadata)>>(iter: I) -> Self {
        Self {
            entities: iter.into_iter().collect(),
        }
    }
}

impl ConfiguredMetadataSource for StaticConfiguredMetadata {
    fn configured_entities(&self) -> EntitySet {
        self.entities.keys().cloned().collect()
    }

    fn metadata_for(&self, entity: &Entity) -> Result<ConfiguredMetadata> {
        self.entities
            .get(entity)
            .cloned()
            .with_context(|| format!("{} is not configured", entity))
    }
}

/// Downloads each entity's published metadata from its configured URL.
pub struct HttpPublishedMetadata<'a> {
    fetcher: &'a dyn Fetcher,
    urls: BTreeMap<Entity, Url>,
}

impl<'a> HttpPublishedMetadata<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, urls: BTreeMap<Entity, Url>) -> Self {
        Self { fetcher, urls }
    }
}

impl PublishedMetadataSource for HttpPublishedMetadata<'_> {
    fn metadata_for(&self, entity: &Entity) -> Option<PublishedMetadata> {
        let Some(url) = self.urls.get(entity) else {
            debug!(entity = %entity, "no metadata URL configured");
            return None;
        };

        let xml = match self.fetcher.fetch(url.as_str()) {
            Ok(xml) => xml,
            Err(e) => {
                warn!(entity = %entity, url = %url, "could not fetch published metadata: {:#}", e);
                return None;
            }
        };

        let descriptors = match saml_metadata::parse_str(&xml) {
            Ok(descriptors) => descriptors,
            Err(e) => {
                warn!(entity = %entity, url = %url, "published metadata is not valid XML: {:#}", e);
                return None;
            }
        };

        let mut matching: Vec<_> = descriptors
            .into_iter()
            .filter(|d| d.entity_id == entity.id())
            .collect();
        match matching.len() {
            1 => matching.pop(),
            0 => {
                warn!(entity = %entity, url = %url, "published metadata has no descriptor for this entity");
                None
            }
            n => {
                warn!(entity = %entity, url = %url, "published metadata has {} descriptors for this entity", n);
                None
            }
        }
    }
}
