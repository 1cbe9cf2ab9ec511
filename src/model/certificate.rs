use std::fmt;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::*;
use x509_parser::public_key::PublicKey;

use crate::validation::ValidationContext;
use crate::violation::ViolationWriter;

const MIN_RSA_KEY_BITS: u32 = 2048;

/// An X.509 certificate as found in metadata.
///
/// Stored as its base64 DER body with PEM armor and whitespace removed, so
/// the configured and published copies compare equal regardless of line
/// wrapping.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Certificate(String);

#[derive(Debug)]
pub struct CertInfo {
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    /// Zero for key types whose size is not determined.
    pub key_size_bits: u32,
    pub rsa: bool,
    pub subject: String,
}

impl Certificate {
    /// Accepts PEM text or a bare base64 body.
    pub fn new(text: &str) -> Self {
        let body: String = text
            .lines()
            .filter(|line| !line.trim_start().starts_with("-----"))
            .flat_map(|line| line.chars())
            .filter(|c| !c.is_whitespace())
            .collect();
        Self(body)
    }

    pub fn base64(&self) -> &str {
        &self.0
    }

    pub fn to_pem(&self) -> String {
        let mut pem = String::from("-----BEGIN CERTIFICATE-----\n");
        let bytes = self.0.as_bytes();
        for chunk in bytes.chunks(64) {
            pem.push_str(&String::from_utf8_lossy(chunk));
            pem.push('\n');
        }
        pem.push_str("-----END CERTIFICATE-----\n");
        pem
    }

    pub fn info(&self) -> Result<CertInfo> {
        let pem_text = self.to_pem();
        let (_, pem) = parse_x509_pem(pem_text.as_bytes())
            .map_err(|e| anyhow::anyhow!("PEM parse error: {}", e))?;
        let (_, cert) = X509Certificate::from_der(&pem.contents)
            .map_err(|e| anyhow::anyhow!("X509 parse error: {}", e))?;

        let not_before = cert.validity().not_before.to_datetime();
        let not_after = cert.validity().not_after.to_datetime();

        let (key_size_bits, rsa) = match cert.public_key().parsed() {
            Ok(PublicKey::RSA(rsa)) => (rsa.key_size() as u32, true),
            Ok(PublicKey::EC(_)) => (ec_key_size(&cert), false),
            _ => (0, false),
        };

        Ok(CertInfo {
            not_before: DateTime::from_timestamp(not_before.unix_timestamp(), 0)
                .unwrap_or_default(),
            not_after: DateTime::from_timestamp(not_after.unix_timestamp(), 0)
                .unwrap_or_default(),
            key_size_bits,
            rsa,
            subject: cert.subject().to_string(),
        })
    }

    pub(crate) fn check(&self, writer: &mut dyn ViolationWriter, context: &ValidationContext) {
        if self.0.is_empty() {
            writer.add("certificate is empty".to_string());
            return;
        }

        let info = match self.info() {
            Ok(info) => info,
            Err(e) => {
                writer.add(format!("certificate could not be parsed: {}", e));
                return;
            }
        };

        let now = context.now();
        if info.not_after < now {
            writer.add(format!(
                "certificate for \"{}\" expired on {}",
                info.subject,
                info.not_after.format("%Y-%m-%d")
            ));
        } else if info.not_before > now {
            writer.add(format!(
                "certificate for \"{}\" is not valid before {}",
                info.subject,
                info.not_before.format("%Y-%m-%d")
            ));
        }

        if info.rsa && info.key_size_bits < MIN_RSA_KEY_BITS {
            writer.add(format!(
                "{}-bit RSA key is shorter than the required {} bits",
                info.key_size_bits, MIN_RSA_KEY_BITS
            ));
        }
    }
}

fn ec_key_size(cert: &X509Certificate<'_>) -> u32 {
    let oid = cert
        .public_key()
        .algorithm
        .parameters
        .as_ref()
        .and_then(|params| params.as_oid().ok())
        .map(|oid| oid.to_string());
    match oid.as_deref() {
        Some("1.2.840.10045.3.1.7") => 256, // P-256
        Some("1.3.132.0.34") => 384,        // P-384
        Some("1.3.132.0.35") => 521,        // P-521
        _ => 256,
    }
}

impl From<String> for Certificate {
    fn from(value: String) -> Self {
        Certificate::new(&value)
    }
}

impl From<Certificate> for String {
    fn from(value: Certificate) -> Self {
        value.0
    }
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.0.chars().take(16).collect();
        write!(f, "{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::context_ok;
    use crate::violation::Violations;

    #[test]
    fn armor_and_wrapping_are_ignored_for_equality() {
        let pem = "-----BEGIN CERTIFICATE-----\nMIIB\nAAAA\n-----END CERTIFICATE-----\n";
        let bare = "  MIIBAAAA ";
        assert_eq!(Certificate::new(pem), Certificate::new(bare));
        assert_eq!(Certificate::new(pem).base64(), "MIIBAAAA");
    }

    #[test]
    fn pem_output_wraps_at_64_columns() {
        let body = "A".repeat(100);
        let pem = Certificate::new(&body).to_pem();
        let lines: Vec<_> = pem.lines().collect();
        assert_eq!(lines[0], "-----BEGIN CERTIFICATE-----");
        assert_eq!(lines[1].len(), 64);
        assert_eq!(lines[2].len(), 36);
        assert_eq!(lines[3], "-----END CERTIFICATE-----");
    }

    #[test]
    fn garbage_is_reported_not_thrown() {
        let mut violations = Violations::new();
        Certificate::new("not a certificate").check(&mut violations, &context_ok());
        let messages = violations.into_vec();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("certificate could not be parsed"));
    }

    #[test]
    fn empty_certificate_is_reported() {
        let mut violations = Violations::new();
        Certificate::new("").check(&mut violations, &context_ok());
        assert_eq!(violations.into_vec(), vec!["certificate is empty"]);
    }
}
