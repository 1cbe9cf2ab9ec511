
use crate::name::{NameError, NameResolver};
use crate::suite::NamedTest;

use test::{
    AssertionConsumerServicesMatch, CertificateMatches, ConfiguredMetadataValid,
    NameIdFormatPublished, PublishedMetadataAvailable,
};

pub(super) fn register(names: &mut NameResolver) -> Result<(), NameError> {
    names
        .register_test::<ConfiguredMetadataValid>()?
        .register_test::<PublishedMetadataAvailable>()?
        .register_test::<AssertionConsumerServicesMatch>()?
        .register_test::<CertificateMatches>()?
        .register_test::<NameIdFormatPublished>()?;
    Ok(())
}

pub(super) fn tests(names: &NameResolver) -> Result<Vec<NamedTest>, NameError> {
    Ok(vec![
        names.named(ConfiguredMetadataValid)?,
        names.named(PublishedMetadataAvailable)?,
        names.named(AssertionConsumerServicesMatch)?,
        names.named(CertificateMatches)?,
        names.named(NameIdFormatPublished)?,
    ])
}
