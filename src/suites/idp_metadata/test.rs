use crate::context::VerificationContext;
use crate::result::{Severity, TestResult};
use crate::suite::Test;
use crate::suites::{
    bullet_list, certificate_matches, configured_metadata_valid, published_metadata_available,
    skip_without_certificate, without_published,
};

#[derive(Debug, Default)]
pub struct ConfiguredMetadataValid;

impl Test for ConfiguredMetadataValid {
    fn verify(&self, context: &VerificationContext<'_>) -> TestResult {
        configured_metadata_valid(context)
    }
}

#[derive(Debug, Default)]
pub struct PublishedMetadataAvailable;

impl Test for PublishedMetadataAvailable {
    fn verify(&self, context: &VerificationContext<'_>) -> TestResult {
        published_metadata_available(context)
    }
}

#[derive(Debug, Default)]
pub struct SingleSignOnServicesMatch;

impl Test for SingleSignOnServicesMatch {
    fn verify(&self, context: &VerificationContext<'_>) -> TestResult {
        let Some(published) = context.published_for_entity() else {
            return TestResult::success();
        };
        let missing: Vec<_> = context
            .configured()
            .single_sign_on_services()
            .iter()
            .filter(|sso| !published.single_sign_on_services.contains(sso))
            .map(|sso| format!("{} ({})", sso.location, sso.binding))
            .collect();

        if missing.is_empty() {
            return TestResult::success();
        }
        TestResult::failed(
            &format!(
                "{} configured SingleSignOnService(s) not published",
                missing.len()
            ),
            &bullet_list(&missing),
            Severity::High,
        )
    }

    fn skip_reason(&self, context: &VerificationContext<'_>) -> Option<String> {
        without_published(context)
    }
}

#[derive(Debug, Default)]
pub struct CertificateMatches;

impl Test for CertificateMatches {
    fn verify(&self, context: &VerificationContext<'_>) -> TestResult {
        certificate_matches(context)
    }

    fn skip_reason(&self, context: &VerificationContext<'_>) -> Option<String> {
        skip_without_certificate(context)
    }
}

/// Attributes are only accepted within published scopes, so every
/// configured scope has to be there.
#[derive(Debug, Default)]
pub struct ScopesPublished;

impl Test for ScopesPublished {
    fn verify(&self, context: &VerificationContext<'_>) -> TestResult {
        let Some(published) = context.published_for_entity() else {
            return TestResult::success();
        };
        let missing: Vec<_> = context
            .configured()
            .scopes()
            .iter()
            .filter(|scope| !published.scopes.contains(scope))
            .collect();

        if missing.is_empty() {
            return TestResult::success();
        }
        TestResult::failed(
            &format!("{} configured scope(s) not published", missing.len()),
            &bullet_list(missing),
            Severity::High,
        )
    }

    fn skip_reason(&self, context: &VerificationContext<'_>) -> Option<String> {
        without_published(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::model::{Binding, PublishedMetadata, Scope, SingleSignOnService};
    use crate::testing::{context_ok, published_idp, valid_idp, CountingPublished};

    fn idp() -> Entity {
        Entity::identity_provider("https://idp.example.org")
    }

    fn verify_against(test: &dyn Test, published: PublishedMetadata) -> TestResult {
        let source = CountingPublished::with(published);
        let validation = context_ok();
        let context = VerificationContext::new(idp(), valid_idp().build(), &source, &validation);
        test.verify(&context)
    }

    #[test]
    fn valid_identity_provider_passes() {
        let source = CountingPublished::with(published_idp());
        let validation = context_ok();
        let context = VerificationContext::new(idp(), valid_idp().build(), &source, &validation);
        assert!(ConfiguredMetadataValid.verify(&context).passed());
        assert!(PublishedMetadataAvailable.verify(&context).passed());
        assert!(SingleSignOnServicesMatch.verify(&context).passed());
        assert!(ScopesPublished.verify(&context).passed());
    }

    #[test]
    fn unpublished_sso_is_listed() {
        let mut published = published_idp();
        published.single_sign_on_services = vec![SingleSignOnService::new(
            Binding::HttpPost,
            "https://idp.example.org/idp/profile/SAML2/POST/SSO",
        )];
        let TestResult::Failed(failure) = verify_against(&SingleSignOnServicesMatch, published)
        else {
            panic!("expected failure");
        };
        assert!(failure.explanation.contains("Redirect/SSO"));
    }

    #[test]
    fn unpublished_scope_fails() {
        let mut published = published_idp();
        published.scopes = vec![Scope::Regex("^.*\\.example\\.org$".to_string())];
        let TestResult::Failed(failure) = verify_against(&ScopesPublished, published) else {
            panic!("expected failure");
        };
        assert_eq!(failure.reason, "1 configured scope(s) not published");
        assert_eq!(failure.explanation, "- example.org");
    }

    #[test]
    fn service_provider_metadata_is_not_published_for_an_identity_provider() {
        let mut published = published_idp();
        published.single_sign_on_services.clear();
        let result = verify_against(&PublishedMetadataAvailable, published);
        let TestResult::Failed(failure) = result else {
            panic!("expected failure");
        };
        assert_eq!(
            failure.reason,
            "published metadata does not describe this identity provider"
        );
    }
}
