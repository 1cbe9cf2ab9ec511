//! Built-in suites.
//!
//! Suite types live here and their tests in `<suite>/test.rs`, so that type
//! paths normalize to `sp_metadata` and `sp_metadata.certificate_matches`.

pub mod entity_information;
pub mod idp_metadata;
pub mod sp_metadata;

use crate::context::VerificationContext;
use crate::entity::EntityRole;
use crate::name::{NameError, NameResolver};
use crate::result::{Severity, TestResult};
use crate::suite::{NamedTest, Suite};
use crate::validation::Node;

/// Configured and published metadata of service providers.
#[derive(Debug, Default)]
pub struct SpMetadata;

impl Suite for SpMetadata {
    fn tests(&self, names: &NameResolver) -> Result<Vec<NamedTest>, NameError> {
        sp_metadata::tests(names)
    }

    fn skip_reason(&self, context: &VerificationContext<'_>) -> Option<String> {
        not_a(context, EntityRole::ServiceProvider)
    }
}

/// Configured and published metadata of identity providers.
#[derive(Debug, Default)]
pub struct IdpMetadata;

impl Suite for IdpMetadata {
    fn tests(&self, names: &NameResolver) -> Result<Vec<NamedTest>, NameError> {
        idp_metadata::tests(names)
    }

    fn skip_reason(&self, context: &VerificationContext<'_>) -> Option<String> {
        not_a(context, EntityRole::IdentityProvider)
    }
}

/// Contact and display information, for every entity.
#[derive(Debug, Default)]
pub struct EntityInformation;

impl Suite for EntityInformation {
    fn tests(&self, names: &NameResolver) -> Result<Vec<NamedTest>, NameError> {
        entity_information::tests(names)
    }
}

/// Every built-in suite and test, suites in run order.
pub fn registry() -> Result<NameResolver, NameError> {
    let mut names = NameResolver::new();
    names
        .register_suite::<SpMetadata>()?
        .register_suite::<IdpMetadata>()?
        .register_suite::<EntityInformation>()?;
    sp_metadata::register(&mut names)?;
    idp_metadata::register(&mut names)?;
    entity_information::register(&mut names)?;
    Ok(names)
}

fn not_a(context: &VerificationContext<'_>, role: EntityRole) -> Option<String> {
    let actual = context.entity().role();
    (actual != role).then(|| format!("only applies to a {}, not to a {}", role, actual))
}

/// Shared by the per-role suites.
pub(crate) fn configured_metadata_valid(context: &VerificationContext<'_>) -> TestResult {
    let violations = context
        .validator()
        .validate(Node::ConfiguredMetadata(context.configured()));
    if violations.is_empty() {
        return TestResult::success();
    }
    TestResult::failed(
        &format!(
            "configured metadata has {} violation(s)",
            violations.len()
        ),
        &violations.to_string(),
        Severity::High,
    )
}

pub(crate) fn published_metadata_available(context: &VerificationContext<'_>) -> TestResult {
    if context.published_for_entity().is_some() {
        return TestResult::success();
    }
    let role = context.entity().role();
    match (context.configured().metadata_url(), context.remote_metadata()) {
        (None, _) => TestResult::failed(
            "no metadata URL configured",
            "Published metadata cannot be checked without the URL it is served from.",
            Severity::High,
        ),
        (Some(url), None) => TestResult::failed(
            "published metadata could not be retrieved",
            &format!(
                "{} did not serve exactly one EntityDescriptor for {}.",
                url,
                context.entity().id()
            ),
            Severity::High,
        ),
        (Some(url), Some(_)) => TestResult::failed(
            &format!("published metadata does not describe this {}", role),
            &format!(
                "The EntityDescriptor served by {} has no {} endpoints.",
                url,
                match role {
                    EntityRole::ServiceProvider => "AssertionConsumerService",
                    EntityRole::IdentityProvider => "SingleSignOnService",
                }
            ),
            Severity::High,
        ),
    }
}

/// Skip reason for tests that compare against published metadata.
pub(crate) fn without_published(context: &VerificationContext<'_>) -> Option<String> {
    context
        .published_for_entity()
        .is_none()
        .then(|| "no published metadata for this entity".to_string())
}

pub(crate) fn certificate_matches(context: &VerificationContext<'_>) -> TestResult {
    let (Some(certificate), Some(published)) = (
        context.configured().certificate(),
        context.published_for_entity(),
    ) else {
        return TestResult::success();
    };
    if published.has_certificate(certificate) {
        return TestResult::success();
    }
    TestResult::failed(
        "configured certificate is not published",
        &format!(
            "None of the {} certificate(s) in the published metadata equals the configured one.",
            published.certificates.len()
        ),
        Severity::Critical,
    )
}

pub(crate) fn skip_without_certificate(context: &VerificationContext<'_>) -> Option<String> {
    if context.configured().certificate().is_none() {
        return Some("no certificate configured".to_string());
    }
    without_published(context)
}

/// One line per item, as used in explanations.
pub(crate) fn bullet_list<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    items
        .into_iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}
