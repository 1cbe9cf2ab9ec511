pub mod binding;
pub mod certificate;
pub mod configured;
pub mod contact;
pub mod endpoint;
pub mod localized;
pub mod logo;
pub mod published;
pub mod scope;
pub mod url;

use thiserror::Error;

pub use binding::{Binding, NameIdFormat};
pub use certificate::{CertInfo, Certificate};
pub use configured::{ConfiguredMetadata, ConfiguredMetadataBuilder, GuestQualifier};
pub use contact::{Contact, ContactSet, ContactType};
pub use endpoint::{AssertionConsumerService, SingleSignOnService};
pub use localized::{Locale, LocalizedText};
pub use logo::Logo;
pub use published::{Organization, PublishedMetadata};
pub use scope::Scope;
pub use url::Url;

/// Construction-time invariant failures of the value model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("entity type \"{0}\" is neither a service provider nor an identity provider")]
    UnknownRole(String),
    #[error("unknown guest qualifier \"{0}\"")]
    UnknownGuestQualifier(String),
    #[error("unknown contact type \"{0}\"")]
    UnknownContactType(String),
}

/// Digits only, at least one, no leading zero.
///
/// Configuration values are always strings. `"0"`, `"012"`, `"1.5"` and
/// `"-1"` are all rejected.
pub(crate) fn is_positive_number(value: &str) -> bool {
    !value.is_empty() && !value.starts_with('0') && value.bytes().all(|b| b.is_ascii_digit())
}

/// Digits only, at least one. Zero is allowed.
pub(crate) fn is_unsigned_number(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
