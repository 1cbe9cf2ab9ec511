use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::MetadataError;
use crate::violation::ViolationWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ContactType {
    Technical,
    Support,
    Administrative,
    Billing,
    Other,
}

impl ContactType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactType::Technical => "technical",
            ContactType::Support => "support",
            ContactType::Administrative => "administrative",
            ContactType::Billing => "billing",
            ContactType::Other => "other",
        }
    }
}

impl FromStr for ContactType {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "technical" => Ok(ContactType::Technical),
            "support" => Ok(ContactType::Support),
            "administrative" => Ok(ContactType::Administrative),
            "billing" => Ok(ContactType::Billing),
            "other" => Ok(ContactType::Other),
            _ => Err(MetadataError::UnknownContactType(s.to_string())),
        }
    }
}

impl TryFrom<String> for ContactType {
    type Error = MetadataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContactType> for String {
    fn from(value: ContactType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "type")]
    pub contact_type: ContactType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
}

impl Contact {
    pub fn new(contact_type: ContactType) -> Self {
        Self {
            contact_type,
            given_name: None,
            surname: None,
            email: None,
            telephone: None,
        }
    }

    pub fn with_name(mut self, given_name: &str, surname: &str) -> Self {
        self.given_name = Some(given_name.to_string());
        self.surname = Some(surname.to_string());
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    /// Email address without a `mailto:` prefix. Blank addresses are `None`.
    pub fn email_address(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(|e| e.trim().trim_start_matches("mailto:").trim())
            .filter(|e| !e.is_empty())
    }

    pub(crate) fn check(&self, writer: &mut dyn ViolationWriter) {
        match self.email_address() {
            None => {
                writer.add(format!("{} contact has no email address", self.contact_type))
            }
            Some(email) if !is_plausible_email(email) => {
                writer.add(format!("\"{}\" is not a valid email address", email))
            }
            Some(_) => {}
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Contacts deduplicated by value, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSet {
    contacts: Vec<Contact>,
}

impl ContactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, contact: Contact) -> bool {
        if self.contacts.contains(&contact) {
            return false;
        }
        self.contacts.push(contact);
        true
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter()
    }

    pub fn of_type(&self, contact_type: ContactType) -> impl Iterator<Item = &Contact> {
        self.contacts
            .iter()
            .filter(move |c| c.contact_type == contact_type)
    }
}

impl FromIterator<Contact> for ContactSet {
    fn from_iter<I: IntoIterator<Item = Contact>>(iter: I) -> Self {
        let mut set = ContactSet::new();
        for contact in iter {
            set.insert(contact);
        }
        set
    }
}
