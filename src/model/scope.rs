use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::violation::ViolationWriter;

/// Shibboleth scope constraint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Literal(String),
    Regex(String),
}

impl Scope {
    pub fn value(&self) -> &str {
        match self {
            Scope::Literal(v) | Scope::Regex(v) => v,
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, Scope::Regex(_))
    }

    pub(crate) fn check(&self, writer: &mut dyn ViolationWriter) {
        match self {
            Scope::Literal(v) if v.trim().is_empty() => {
                writer.add("scope is empty".to_string())
            }
            Scope::Literal(v) if v.chars().any(char::is_whitespace) => {
                writer.add(format!("scope \"{}\" contains whitespace", v))
            }
            Scope::Literal(_) => {}
            Scope::Regex(pattern) => {
                if let Err(e) = Regex::new(pattern) {
                    writer.add(format!(
                        "regular expression \"{}\" does not compile: {}",
                        pattern, e
                    ));
                }
            }
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Literal(v) => f.write_str(v),
            Scope::Regex(v) => write!(f, "/{}/", v),
        }
    }
}
