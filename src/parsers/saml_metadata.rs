use anyhow::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::model::{
    AssertionConsumerService, Binding, Certificate, Contact, ContactType, Locale, LocalizedText,
    NameIdFormat, Organization, PublishedMetadata, Scope, SingleSignOnService, Url,
};

/// Every `EntityDescriptor` in a metadata document, in document order.
///
/// Accepts a bare `EntityDescriptor` as well as an `EntitiesDescriptor`
/// aggregate. Elements the checks do not look at are ignored.
pub fn parse_str(xml: &str) -> Result<Vec<PublishedMetadata>> {
    let mut reader = Reader::from_str(xml);
    let mut state = ParseState::default();
    let mut element_stack: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Err(e) => anyhow::bail!("XML parse error at position {}: {}", reader.error_position(), e),
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let name = local_name(&e);
                state.open(&name, &e, &element_stack);
                element_stack.push(name);
            }
            Ok(Event::Empty(e)) => {
                let name = local_name(&e);
                state.open(&name, &e, &element_stack);
                state.close(&name, &element_stack);
            }
            Ok(Event::Text(e)) => state.text.push_str(&e.unescape()?),
            Ok(Event::CData(e)) => state.text.push_str(&String::from_utf8_lossy(&e.into_inner())),
            Ok(Event::End(_)) => {
                if let Some(name) = element_stack.pop() {
                    state.close(&name, &element_stack);
                }
            }
            _ => {}
        }
    }

    Ok(state.descriptors)
}

#[derive(Default)]
struct ParseState {
    descriptors: Vec<PublishedMetadata>,
    current: Option<PublishedMetadata>,
    contact: Option<Contact>,
    text: String,
    lang: Option<String>,
    scope_is_regex: bool,
}

impl ParseState {
    fn open(&mut self, name: &str, e: &BytesStart<'_>, stack: &[String]) {
        self.text.clear();
        self.lang = get_attr(e, "lang");

        match name {
            "EntityDescriptor" => {
                let entity_id = get_attr(e, "entityID").unwrap_or_default();
                self.current = Some(PublishedMetadata::new(entity_id));
            }
            "AssertionConsumerService" if in_element(stack, "SPSSODescriptor") => {
                if let Some(md) = self.current.as_mut() {
                    md.assertion_consumer_services.push(AssertionConsumerService::new(
                        Binding::from(get_attr(e, "Binding").unwrap_or_default()),
                        Url::new(get_attr(e, "Location").unwrap_or_default()),
                        get_attr(e, "index").unwrap_or_default(),
                    ));
                }
            }
            "SingleSignOnService" if in_element(stack, "IDPSSODescriptor") => {
                if let Some(md) = self.current.as_mut() {
                    md.single_sign_on_services.push(SingleSignOnService::new(
                        Binding::from(get_attr(e, "Binding").unwrap_or_default()),
                        Url::new(get_attr(e, "Location").unwrap_or_default()),
                    ));
                }
            }
            "Organization" => {
                if let Some(md) = self.current.as_mut() {
                    md.organization.get_or_insert_with(Organization::default);
                }
            }
            "ContactPerson" => {
                let contact_type = get_attr(e, "contactType")
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(ContactType::Other);
                self.contact = Some(Contact::new(contact_type));
            }
            "Scope" => {
                self.scope_is_regex = get_attr(e, "regexp").is_some_and(|v| v.trim() == "true");
            }
            _ => {}
        }
    }

    /// `stack` no longer contains `name` itself.
    fn close(&mut self, name: &str, stack: &[String]) {
        let text = std::mem::take(&mut self.text).trim().to_string();

        if name == "EntityDescriptor" {
            if let Some(md) = self.current.take() {
                self.descriptors.push(md);
            }
            return;
        }
        if name == "ContactPerson" {
            if let (Some(contact), Some(md)) = (self.contact.take(), self.current.as_mut()) {
                md.contacts.push(contact);
            }
            return;
        }

        if let Some(contact) = self.contact.as_mut() {
            let field = match name {
                "GivenName" => &mut contact.given_name,
                "SurName" => &mut contact.surname,
                "EmailAddress" => &mut contact.email,
                "TelephoneNumber" => &mut contact.telephone,
                _ => return,
            };
            *field = Some(text);
            return;
        }

        let lang = self.lang.take().unwrap_or_else(|| Locale::english().to_string());
        let Some(md) = self.current.as_mut() else {
            return;
        };
        let in_ui_info = in_element(stack, "UIInfo");

        match name {
            "X509Certificate" if in_element(stack, "KeyDescriptor") => {
                let certificate = Certificate::new(&text);
                if !md.certificates.contains(&certificate) {
                    md.certificates.push(certificate);
                }
            }
            "NameIDFormat" => md.name_id_formats.push(NameIdFormat::from(text)),
            "DisplayName" if in_ui_info => insert(&mut md.display_names, lang, text),
            "Description" if in_ui_info => insert(&mut md.descriptions, lang, text),
            "Logo" if in_ui_info => md.logos.push(Url::new(text)),
            "OrganizationName" | "OrganizationDisplayName" | "OrganizationURL" => {
                let organization = md.organization.get_or_insert_with(Organization::default);
                let target = match name {
                    "OrganizationName" => &mut organization.names,
                    "OrganizationDisplayName" => &mut organization.display_names,
                    _ => &mut organization.urls,
                };
                insert(target, lang, text);
            }
            "Scope" => {
                let scope = if self.scope_is_regex {
                    Scope::Regex(text)
                } else {
                    Scope::Literal(text)
                };
                md.scopes.push(scope);
            }
            _ => {}
        }
    }
}

fn insert(target: &mut LocalizedText, lang: String, text: String) {
    target.insert(Locale::new(lang), text);
}

fn in_element(stack: &[String], name: &str) -> bool {
    stack.iter().any(|s| s == name)
}

fn local_name(e: &BytesStart<'_>) -> String {
    let full = String::from_utf8_lossy(e.name().as_ref()).to_string();
    full.rsplit(':').next().unwrap_or(&full).to_string()
}

fn get_attr(e: &BytesStart<'_>, name: &str) -> Option<String> {
    e.attributes().filter_map(|a| a.ok()).find_map(|a| {
        let key = String::from_utf8_lossy(a.key.as_ref()).to_string();
        let local_key = key.rsplit(':').next().unwrap_or(&key);
        if local_key == name {
            Some(String::from_utf8_lossy(&a.value).to_string())
        } else {
            None
        }
    })
}
