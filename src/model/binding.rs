use std::fmt;

use serde::{Deserialize, Serialize};

use crate::violation::ViolationWriter;

pub const HTTP_POST: &str = "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-POST";
pub const HTTP_REDIRECT: &str = "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect";
pub const HTTP_ARTIFACT: &str = "urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Artifact";
pub const SOAP: &str = "urn:oasis:names:tc:SAML:2.0:bindings:SOAP";
pub const PAOS: &str = "urn:oasis:names:tc:SAML:2.0:bindings:PAOS";
pub const HOK_SSO: &str = "urn:oasis:names:tc:SAML:2.0:profiles:holder-of-key:SSO:browser";

/// SAML protocol binding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Binding {
    #[default]
    Unset,
    HttpPost,
    HttpRedirect,
    HttpArtifact,
    Soap,
    Paos,
    HolderOfKey,
    Unknown(String),
}

impl Binding {
    pub fn urn(&self) -> &str {
        match self {
            Binding::Unset => "",
            Binding::HttpPost => HTTP_POST,
            Binding::HttpRedirect => HTTP_REDIRECT,
            Binding::HttpArtifact => HTTP_ARTIFACT,
            Binding::Soap => SOAP,
            Binding::Paos => PAOS,
            Binding::HolderOfKey => HOK_SSO,
            Binding::Unknown(urn) => urn,
        }
    }

    pub fn is_set(&self) -> bool {
        *self != Binding::Unset
    }

    pub(crate) fn check(&self, writer: &mut dyn ViolationWriter) {
        match self {
            Binding::Unset => writer.add("binding is not set".to_string()),
            Binding::Unknown(urn) => {
                writer.add(format!("\"{}\" is not a supported SAML binding", urn))
            }
            _ => {}
        }
    }
}

impl From<&str> for Binding {
    fn from(urn: &str) -> Self {
        match urn.trim() {
            "" => Binding::Unset,
            HTTP_POST => Binding::HttpPost,
            HTTP_REDIRECT => Binding::HttpRedirect,
            HTTP_ARTIFACT => Binding::HttpArtifact,
            SOAP => Binding::Soap,
            PAOS => Binding::Paos,
            HOK_SSO => Binding::HolderOfKey,
            other => Binding::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Binding {
    fn from(urn: String) -> Self {
        Binding::from(urn.as_str())
    }
}

impl From<Binding> for String {
    fn from(binding: Binding) -> Self {
        binding.urn().to_string()
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Unset => f.write_str("(unset)"),
            other => f.write_str(other.urn()),
        }
    }
}

pub const NAMEID_UNSPECIFIED: &str = "urn:oasis:names:tc:SAML:1.1:nameid-format:unspecified";
pub const NAMEID_EMAIL: &str = "urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress";
pub const NAMEID_TRANSIENT: &str = "urn:oasis:names:tc:SAML:2.0:nameid-format:transient";
pub const NAMEID_PERSISTENT: &str = "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent";

/// SAML NameID format.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NameIdFormat {
    #[default]
    Unset,
    Unspecified,
    EmailAddress,
    Transient,
    Persistent,
    Unknown(String),
}

impl NameIdFormat {
    pub fn urn(&self) -> &str {
        match self {
            NameIdFormat::Unset => "",
            NameIdFormat::Unspecified => NAMEID_UNSPECIFIED,
            NameIdFormat::EmailAddress => NAMEID_EMAIL,
            NameIdFormat::Transient => NAMEID_TRANSIENT,
            NameIdFormat::Persistent => NAMEID_PERSISTENT,
            NameIdFormat::Unknown(urn) => urn,
        }
    }

    pub fn is_set(&self) -> bool {
        *self != NameIdFormat::Unset
    }

    pub(crate) fn check(&self, writer: &mut dyn ViolationWriter) {
        match self {
            NameIdFormat::Unset => writer.add("NameID format is not set".to_string()),
            NameIdFormat::Unknown(urn) => {
                writer.add(format!("\"{}\" is not a supported NameID format", urn))
            }
            _ => {}
        }
    }
}

impl From<&str> for NameIdFormat {
    fn from(urn: &str) -> Self {
        match urn.trim() {
            "" => NameIdFormat::Unset,
            NAMEID_UNSPECIFIED => NameIdFormat::Unspecified,
            NAMEID_EMAIL => NameIdFormat::EmailAddress,
            NAMEID_TRANSIENT => NameIdFormat::Transient,
            NAMEID_PERSISTENT => NameIdFormat::Persistent,
            other => NameIdFormat::Unknown(other.to_string()),
        }
    }
}

impl From<String> for NameIdFormat {
    fn from(urn: String) -> Self {
        NameIdFormat::from(urn.as_str())
    }
}

impl From<NameIdFormat> for String {
    fn from(format: NameIdFormat) -> Self {
        format.urn().to_string()
    }
}

impl fmt::Display for NameIdFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameIdFormat::Unset => f.write_str("(unset)"),
            other => f.write_str(other.urn()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::Violations;

    #[test]
    fn binding_parses_known_urns() {
        assert_eq!(Binding::from(HTTP_POST), Binding::HttpPost);
        assert_eq!(Binding::from(" "), Binding::Unset);
        assert_eq!(
            Binding::from("urn:example:binding"),
            Binding::Unknown("urn:example:binding".into())
        );
    }

    #[test]
    fn unset_is_distinct_from_unknown() {
        let mut violations = Violations::new();
        Binding::Unset.check(&mut violations);
        Binding::from("urn:example:binding").check(&mut violations);
        Binding::HttpRedirect.check(&mut violations);
        assert_eq!(
            violations.into_vec(),
            vec![
                "binding is not set",
                "\"urn:example:binding\" is not a supported SAML binding"
            ]
        );
    }

    #[test]
    fn name_id_format_round_trips_through_string() {
        let format = NameIdFormat::from(NAMEID_PERSISTENT);
        assert_eq!(String::from(format.clone()), NAMEID_PERSISTENT);
        assert!(format.is_set());
        assert!(!NameIdFormat::default().is_set());
    }
}
