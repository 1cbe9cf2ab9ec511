pub mod saml_metadata;
