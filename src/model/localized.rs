use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::Node;
use crate::violation::ViolationWriter;

/// Language tag of a localized value, e.g. `en`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn english() -> Self {
        Self::new("en")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn check(&self, writer: &mut dyn ViolationWriter) {
        let valid = self.0.len() == 2 && self.0.bytes().all(|b| b.is_ascii_lowercase());
        if !valid {
            writer.add(format!(
                "\"{}\" is not a two-letter ISO 639-1 language code",
                self.0
            ));
        }
    }
}

impl From<String> for Locale {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Locale {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<Locale> for String {
    fn from(value: Locale) -> Self {
        value.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Locale → text map (names, descriptions, keywords).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<Locale, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locale: &str, text: &str) -> Self {
        self.insert(Locale::from(locale), text);
        self
    }

    pub fn insert(&mut self, locale: Locale, text: impl Into<String>) {
        self.0.insert(locale, text.into());
    }

    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(&Locale::from(locale)).map(String::as_str)
    }

    pub fn has(&self, locale: &str) -> bool {
        self.get(locale).is_some_and(|t| !t.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Locale, &str)> {
        self.0.iter().map(|(l, t)| (l, t.as_str()))
    }

    pub(crate) fn check(&self, writer: &mut dyn ViolationWriter) {
        for (locale, text) in &self.0 {
            if text.trim().is_empty() {
                writer.add(format!("translation for \"{}\" is empty", locale));
            }
        }
    }

    pub(crate) fn children(&self) -> Vec<(Node<'_>, String)> {
        self.0
            .keys()
            .map(|locale| (Node::Locale(locale), format!("Locale {}", locale)))
            .collect()
    }
}

impl FromIterator<(Locale, String)> for LocalizedText {
    fn from_iter<I: IntoIterator<Item = (Locale, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
