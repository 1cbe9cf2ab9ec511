pub mod test;

use crate::name::{NameError, NameResolver};
use crate::suite::NamedTest;

use test::{
    CertificateMatches, ConfiguredMetadataValid, PublishedMetadataAvailable, ScopesPublished,
    SingleSignOnServicesMatch,
};

pub(super) fn register(names: &mut NameResolver) -> Result<(), NameError> {
    names
        .register_test::<ConfiguredMetadataValid>()?
        .register_test::<PublishedMetadataAvailable>()?
        .register_test::<SingleSignOnServicesMatch>()?
        .register_test::<CertificateMatches>()?
        .register_test::<ScopesPublished>()?;
    Ok(())
}

pub(super) fn tests(names: &NameResolver) -> Result<Vec<NamedTest>, NameError> {
    Ok(vec![
        names.named(ConfiguredMetadataValid)?,
        names.named(PublishedMetadataAvailable)?,
        names.named(SingleSignOnServicesMatch)?,
        names.named(CertificateMatches)?,
        names.named(ScopesPublished)?,
    ])
}
