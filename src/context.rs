use std::cell::OnceCell;

use tracing::{debug, info_span, Span};

use crate::entity::Entity;
use crate::model::{ConfiguredMetadata, PublishedMetadata};
use crate::source::PublishedMetadataSource;
use crate::validation::{ValidationContext, Validator};

/// Everything a test may look at for one entity.
///
/// Published metadata is fetched on first access and kept, absence
/// included, for the lifetime of the context. Not shareable across threads.
pub struct VerificationContext<'a> {
    entity: Entity,
    configured: ConfiguredMetadata,
    published_source: &'a dyn PublishedMetadataSource,
    published: OnceCell<Option<PublishedMetadata>>,
    validation: &'a ValidationContext,
    span: Span,
}

impl<'a> VerificationContext<'a> {
    pub fn new(
        entity: Entity,
        configured: ConfiguredMetadata,
        published_source: &'a dyn PublishedMetadataSource,
        validation: &'a ValidationContext,
    ) -> Self {
        let span = info_span!("entity", id = %entity.id(), role = entity.role().short());
        Self {
            entity,
            configured,
            published_source,
            published: OnceCell::new(),
            validation,
            span,
        }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn configured(&self) -> &ConfiguredMetadata {
        &self.configured
    }

    pub fn remote_metadata(&self) -> Option<&PublishedMetadata> {
        self.published
            .get_or_init(|| {
                debug!(entity = %self.entity, "fetching published metadata");
                self.published_source.metadata_for(&self.entity)
            })
            .as_ref()
    }

    /// Published metadata that actually describes this entity in its role.
    pub fn published_for_entity(&self) -> Option<&PublishedMetadata> {
        self.remote_metadata()
            .filter(|metadata| metadata.is_published_for(&self.entity))
    }

    pub fn validator(&self) -> Validator<'a> {
        Validator::new(self.validation)
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context_ok, published_sp, valid_sp, CountingPublished};

    #[test]
    fn remote_metadata_is_fetched_once() {
        let entity = Entity::service_provider("https://sp.example.org");
        let source = CountingPublished::with(published_sp());
        let validation = context_ok();
        let context = VerificationContext::new(entity, valid_sp().build(), &source, &validation);

        assert_eq!(source.calls(), 0);
        assert!(context.remote_metadata().is_some());
        assert!(context.remote_metadata().is_some());
        assert!(context.published_for_entity().is_some());
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn absence_is_memoized_too() {
        let entity = Entity::service_provider("https://sp.example.org");
        let source = CountingPublished::empty();
        let validation = context_ok();
        let context = VerificationContext::new(entity, valid_sp().build(), &source, &validation);

        assert!(context.remote_metadata().is_none());
        assert!(context.remote_metadata().is_none());
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn metadata_for_another_role_is_not_published_for_entity() {
        let entity = Entity::identity_provider("https://sp.example.org");
        let source = CountingPublished::with(published_sp());
        let validation = context_ok();
        let context = VerificationContext::new(entity, valid_sp().build(), &source, &validation);

        assert!(context.remote_metadata().is_some());
        assert!(context.published_for_entity().is_none());
    }
}
