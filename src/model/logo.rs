use serde::{Deserialize, Serialize};

use super::{is_positive_number, Url};
use crate::validation::{Node, ValidationContext};
use crate::violation::{SubpathWriter, ViolationWriter};

/// Logo reference. Dimensions stay strings as they come from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logo {
    pub url: Url,
    pub width: String,
    pub height: String,
}

impl Logo {
    pub fn new(url: &str, width: &str, height: &str) -> Self {
        Self {
            url: Url::new(url),
            width: width.to_string(),
            height: height.to_string(),
        }
    }

    pub(crate) fn check(&self, writer: &mut dyn ViolationWriter, context: &ValidationContext) {
        for (field, value) in [("width", &self.width), ("height", &self.height)] {
            if !is_positive_number(value) {
                SubpathWriter::new(writer, field)
                    .add("must be a number larger than 0".to_string());
            }
        }

        if let Err(reason) = context.check_reachable(self.url.as_str()) {
            writer.add(format!("logo \"{}\" is not reachable: {}", self.url, reason));
        }
    }

    pub(crate) fn children(&self) -> Vec<(Node<'_>, String)> {
        vec![(Node::Url(&self.url), "url".to_string())]
    }
}
