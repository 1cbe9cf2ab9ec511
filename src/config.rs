//! The `fedcheck.toml` configuration file.
//!
//! Looked up at the `--config` path when given, otherwise `./fedcheck.toml`,
//! then `$HOME/.fedcheck.toml`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::blacklist::Blacklist;
use crate::entity::{Entity, EntityRole, EntitySet};
use crate::http::HttpConfig;
use crate::model::{
    AssertionConsumerService, Certificate, ConfiguredMetadata, Contact, GuestQualifier,
    LocalizedText, Logo, NameIdFormat, Scope, SingleSignOnService, Url,
};
use crate::source::StaticConfiguredMetadata;

pub const FILE_NAME: &str = "fedcheck.toml";
const HOME_FILE_NAME: &str = ".fedcheck.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub http: HttpConfig,
    /// Suite or test name (or `*`) to the entities it skips.
    pub blacklist: BTreeMap<String, Vec<EntityRef>>,
    pub entities: Vec<EntityConfig>,
}

/// An entity named by ID and role, as used in blacklist entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityRef {
    pub id: String,
    pub role: String,
}

impl EntityRef {
    fn to_entity(&self) -> Result<Entity> {
        let role: EntityRole = self
            .role
            .parse()
            .with_context(|| format!("Invalid role for {}", self.id))?;
        Ok(Entity::new(&self.id, role))
    }
}

/// One `[[entities]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityConfig {
    pub id: String,
    /// `saml20-sp`, `saml20-idp` or one of their aliases.
    #[serde(rename = "type")]
    pub entity_type: String,
    pub metadata_url: Option<Url>,
    #[serde(default)]
    pub assertion_consumer_services: Vec<AssertionConsumerService>,
    #[serde(default)]
    pub single_sign_on_services: Vec<SingleSignOnService>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub keywords: LocalizedText,
    #[serde(default)]
    pub logos: Vec<Logo>,
    #[serde(default)]
    pub default_name_id_format: NameIdFormat,
    #[serde(default)]
    pub name_id_formats: Vec<NameIdFormat>,
    #[serde(default)]
    pub scopes: Vec<Scope>,
    pub certificate: Option<Certificate>,
    pub sign_redirects: Option<bool>,
    pub guest_qualifier: Option<GuestQualifier>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl EntityConfig {
    pub fn to_metadata(&self) -> Result<(Entity, ConfiguredMetadata)> {
        let mut builder = ConfiguredMetadata::builder_for_type(&self.entity_type)
            .with_context(|| format!("Invalid type for entity {}", self.id))?
            .name(self.name.clone())
            .description(self.description.clone())
            .keywords(self.keywords.clone())
            .default_name_id_format(self.default_name_id_format.clone())
            .sign_redirects(self.sign_redirects)
            .guest_qualifier(self.guest_qualifier);

        if let Some(ref url) = self.metadata_url {
            builder = builder.metadata_url(url.clone());
        }
        if let Some(ref certificate) = self.certificate {
            builder = builder.certificate(certificate.clone());
        }
        for acs in &self.assertion_consumer_services {
            builder = builder.assertion_consumer_service(acs.clone());
        }
        for sso in &self.single_sign_on_services {
            builder = builder.single_sign_on_service(sso.clone());
        }
        for contact in &self.contacts {
            builder = builder.contact(contact.clone());
        }
        for logo in &self.logos {
            builder = builder.logo(logo.clone());
        }
        for format in &self.name_id_formats {
            builder = builder.name_id_format(format.clone());
        }
        for scope in &self.scopes {
            builder = builder.scope(scope.clone());
        }
        for (key, value) in &self.properties {
            builder = builder.property(key, value);
        }

        let metadata = builder.build();
        Ok((Entity::new(&self.id, metadata.role()), metadata))
    }
}

impl Config {
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration")
    }

    /// Load from `explicit`, or from the first default location that exists.
    pub fn load(explicit: Option<&Path>) -> Result<(PathBuf, Self)> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => default_candidates()
                .into_iter()
                .find(|candidate| candidate.is_file())
                .with_context(|| {
                    format!(
                        "No configuration found; pass --config or create ./{} or ~/{}",
                        FILE_NAME, HOME_FILE_NAME
                    )
                })?,
        };

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        Ok((path, config))
    }

    /// Configured metadata per entity. An entity may appear once per role.
    pub fn configured_metadata(&self) -> Result<StaticConfiguredMetadata> {
        let mut source = StaticConfiguredMetadata::new();
        let mut seen = EntitySet::new();
        for entry in &self.entities {
            let (entity, metadata) = entry.to_metadata()?;
            if !seen.insert(entity.clone()) {
                bail!("{} is configured more than once", entity);
            }
            source.insert(entity, metadata);
        }
        Ok(source)
    }

    pub fn blacklist(&self) -> Result<Blacklist> {
        let table = self
            .blacklist
            .iter()
            .map(|(name, refs)| {
                let entities = refs
                    .iter()
                    .map(EntityRef::to_entity)
                    .collect::<Result<EntitySet>>()?;
                Ok((name.clone(), entities))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Blacklist::from_table(table))
    }
}

fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(FILE_NAME)];
    if let Some(home) = std::env::var_os("HOME") {
        candidates.push(PathBuf::from(home).join(HOME_FILE_NAME));
    }
    candidates
}
