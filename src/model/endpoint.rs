use serde::{Deserialize, Serialize};

use super::{is_unsigned_number, Binding, Url};
use crate::validation::Node;
use crate::violation::ViolationWriter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionConsumerService {
    #[serde(default)]
    pub binding: Binding,
    pub location: Url,
    /// Kept as written; only digits are accepted.
    pub index: String,
}

impl AssertionConsumerService {
    pub fn new(binding: Binding, location: impl Into<Url>, index: impl Into<String>) -> Self {
        Self {
            binding,
            location: location.into(),
            index: index.into(),
        }
    }

    /// Same binding and location; the index is not compared.
    pub fn matches(&self, other: &AssertionConsumerService) -> bool {
        self.binding == other.binding && self.location == other.location
    }

    pub(crate) fn check(&self, writer: &mut dyn ViolationWriter) {
        if !is_unsigned_number(&self.index) {
            writer.add(format!(
                "index \"{}\" must be a non-negative number",
                self.index
            ));
        }
        if self.binding == Binding::HttpRedirect {
            writer.add("HTTP-Redirect cannot be used to receive assertions".to_string());
        }
    }

    pub(crate) fn children(&self) -> Vec<(Node<'_>, String)> {
        vec![
            (Node::Binding(&self.binding), "Binding".to_string()),
            (Node::Url(&self.location), "Location".to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleSignOnService {
    #[serde(default)]
    pub binding: Binding,
    pub location: Url,
}

impl SingleSignOnService {
    pub fn new(binding: Binding, location: impl Into<Url>) -> Self {
        Self {
            binding,
            location: location.into(),
        }
    }

    pub(crate) fn check(&self, writer: &mut dyn ViolationWriter) {
        // Unset and unknown bindings are reported by the Binding child.
        if matches!(self.binding, Binding::Paos | Binding::HolderOfKey) {
            writer.add(format!("{} cannot be used for single sign-on", self.binding));
        }
    }

    pub(crate) fn children(&self) -> Vec<(Node<'_>, String)> {
        vec![
            (Node::Binding(&self.binding), "Binding".to_string()),
            (Node::Url(&self.location), "Location".to_string()),
        ]
    }
}
