//! Recursive validation of the metadata value model.
//!
//! Every validatable value is wrapped in a [`Node`]. A node knows its own
//! local invariants and which children it has; [`Validator::visit`] is the
//! single place that walks the tree and labels child violations with their
//! position.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::trace;

use crate::model::{
    AssertionConsumerService, Binding, Certificate, ConfiguredMetadata, Contact, Locale,
    LocalizedText, Logo, NameIdFormat, Scope, SingleSignOnService, Url,
};
use crate::violation::{SubpathWriter, ViolationWriter, Violations};

/// Request method of a reachability probe. Probes only ever GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
}

/// Performs outbound HTTP requests for reachability checks.
pub trait Prober {
    /// Returns the response status code.
    fn request(&self, method: Method, url: &str) -> Result<u16, ProbeError>;
}

/// Shared, read-only state handed to every node during a walk.
pub struct ValidationContext {
    prober: Box<dyn Prober>,
    now: DateTime<Utc>,
}

impl ValidationContext {
    pub fn new(prober: Box<dyn Prober>) -> Self {
        Self {
            prober,
            now: Utc::now(),
        }
    }

    /// Pin the clock used for certificate expiry checks.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// GET the URL and require a 200 response.
    pub fn check_reachable(&self, url: &str) -> Result<(), String> {
        match self.prober.request(Method::Get, url) {
            Ok(200) => Ok(()),
            Ok(status) => Err(format!("returned HTTP status {}", status)),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// A validatable value in the metadata tree.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    ConfiguredMetadata(&'a ConfiguredMetadata),
    Url(&'a Url),
    Binding(&'a Binding),
    NameIdFormat(&'a NameIdFormat),
    AssertionConsumerService(&'a AssertionConsumerService),
    SingleSignOnService(&'a SingleSignOnService),
    Contact(&'a Contact),
    LocalizedText(&'a LocalizedText),
    Locale(&'a Locale),
    Logo(&'a Logo),
    Scope(&'a Scope),
    Certificate(&'a Certificate),
}

impl<'a> Node<'a> {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::ConfiguredMetadata(_) => "configured_metadata",
            Node::Url(_) => "url",
            Node::Binding(_) => "binding",
            Node::NameIdFormat(_) => "name_id_format",
            Node::AssertionConsumerService(_) => "assertion_consumer_service",
            Node::SingleSignOnService(_) => "single_sign_on_service",
            Node::Contact(_) => "contact",
            Node::LocalizedText(_) => "localized_text",
            Node::Locale(_) => "locale",
            Node::Logo(_) => "logo",
            Node::Scope(_) => "scope",
            Node::Certificate(_) => "certificate",
        }
    }

    fn check(&self, writer: &mut dyn ViolationWriter, context: &ValidationContext) {
        match self {
            Node::ConfiguredMetadata(v) => v.check(writer, context),
            Node::Url(v) => v.check(writer),
            Node::Binding(v) => v.check(writer),
            Node::NameIdFormat(v) => v.check(writer),
            Node::AssertionConsumerService(v) => v.check(writer),
            Node::SingleSignOnService(v) => v.check(writer),
            Node::Contact(v) => v.check(writer),
            Node::LocalizedText(v) => v.check(writer),
            Node::Locale(v) => v.check(writer),
            Node::Logo(v) => v.check(writer, context),
            Node::Scope(v) => v.check(writer),
            Node::Certificate(v) => v.check(writer, context),
        }
    }

    fn children(&self) -> Vec<(Node<'a>, String)> {
        match *self {
            Node::ConfiguredMetadata(v) => v.children(),
            Node::AssertionConsumerService(v) => v.children(),
            Node::SingleSignOnService(v) => v.children(),
            Node::LocalizedText(v) => v.children(),
            Node::Logo(v) => v.children(),
            Node::Url(_)
            | Node::Binding(_)
            | Node::NameIdFormat(_)
            | Node::Contact(_)
            | Node::Locale(_)
            | Node::Scope(_)
            | Node::Certificate(_) => Vec::new(),
        }
    }
}

/// Walks a node tree, collecting violations.
pub struct Validator<'c> {
    context: &'c ValidationContext,
}

impl<'c> Validator<'c> {
    pub fn new(context: &'c ValidationContext) -> Self {
        Self { context }
    }

    pub fn validate(&self, node: Node<'_>) -> Violations {
        let mut violations = Violations::new();
        self.visit(node, &mut violations);
        violations
    }

    pub fn visit(&self, node: Node<'_>, writer: &mut dyn ViolationWriter) {
        trace!(node = node.kind(), "validating");
        node.check(writer, self.context);
        for (child, label) in node.children() {
            let mut sub = SubpathWriter::new(writer, label);
            self.visit(child, &mut sub);
        }
    }
}
