use std::fmt;

use serde::{Deserialize, Serialize};

use crate::violation::ViolationWriter;

/// A URL as written in configuration or metadata. Not normalized.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Url(String);

impl Url {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn scheme(&self) -> Option<&str> {
        self.0.split_once("://").map(|(scheme, _)| scheme)
    }

    pub fn host(&self) -> Option<&str> {
        let (_, rest) = self.0.split_once("://")?;
        let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
        let host_port = authority.rsplit('@').next().unwrap_or_default();
        let host = match host_port.rsplit_once(':') {
            Some((host, port)) if port.bytes().all(|b| b.is_ascii_digit()) => host,
            _ => host_port,
        };
        if host.is_empty() {
            None
        } else {
            Some(host)
        }
    }

    pub(crate) fn check(&self, writer: &mut dyn ViolationWriter) {
        if self.0.trim().is_empty() {
            writer.add("URL is empty".to_string());
            return;
        }
        if self.0.chars().any(char::is_whitespace) {
            writer.add(format!("\"{}\" contains whitespace", self.0));
        }
        match self.scheme() {
            None => {
                writer.add(format!("\"{}\" is not an absolute URL", self.0));
                return;
            }
            Some("https") => {}
            Some("http") => writer.add(format!("\"{}\" must use https", self.0)),
            Some(other) => writer.add(format!(
                "\"{}\" uses unsupported scheme \"{}\"",
                self.0, other
            )),
        }
        if self.host().is_none() {
            writer.add(format!("\"{}\" has no host", self.0));
        }
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Url {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
