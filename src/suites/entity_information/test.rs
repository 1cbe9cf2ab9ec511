use crate::context::VerificationContext;
use crate::model::ContactType;
use crate::result::{Severity, TestResult};
use crate::suite::Test;
use crate::suites::without_published;

/// Users need somebody to turn to when login fails.
#[derive(Debug, Default)]
pub struct SupportContactPresent;

impl Test for SupportContactPresent {
    fn verify(&self, context: &VerificationContext<'_>) -> TestResult {
        let contacts = context.configured().contacts();
        let found = [ContactType::Support, ContactType::Technical]
            .into_iter()
            .any(|t| contacts.of_type(t).any(|c| c.email_address().is_some()));
        if found {
            return TestResult::success();
        }
        TestResult::failed(
            "no support or technical contact with an email address",
            "Add a support or technical contact so that users and other federation members can report problems.",
            Severity::Medium,
        )
    }
}

/// Published English display name equals the configured English name.
#[derive(Debug, Default)]
pub struct DisplayNameMatches;

impl Test for DisplayNameMatches {
    fn verify(&self, context: &VerificationContext<'_>) -> TestResult {
        let Some(published) = context.published_for_entity() else {
            return TestResult::success();
        };
        let configured = context.configured().name().get("en").map(str::trim);
        let displayed = published.display_names.get("en").map(str::trim);
        match (configured, displayed) {
            (Some(configured), Some(displayed)) if configured == displayed => {
                TestResult::success()
            }
            (None, _) => TestResult::success(),
            (Some(configured), Some(displayed)) => TestResult::failed(
                "published display name differs from the configured name",
                &format!("configured \"{}\", published \"{}\"", configured, displayed),
                Severity::Low,
            ),
            (Some(configured), None) => TestResult::failed(
                "no English display name published",
                &format!("expected \"{}\"", configured),
                Severity::Low,
            ),
        }
    }

    fn skip_reason(&self, context: &VerificationContext<'_>) -> Option<String> {
        without_published(context)
    }
}

/// Service providers say whether their redirect requests are signed.
#[derive(Debug, Default)]
pub struct RedirectSigningDeclared;

impl Test for RedirectSigningDeclared {
    fn verify(&self, context: &VerificationContext<'_>) -> TestResult {
        if context.configured().sign_redirects().is_some() {
            return TestResult::success();
        }
        TestResult::failed(
            "redirect signing is not declared",
            "Set sign_redirects to true or false for this service provider.",
            Severity::Trivial,
        )
    }

    fn skip_reason(&self, context: &VerificationContext<'_>) -> Option<String> {
        (!context.entity().is_service_provider())
            .then(|| "only applies to service providers".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EntityRole};
    use crate::model::{ConfiguredMetadata, Contact, LocalizedText};
    use crate::testing::{context_ok, published_sp, valid_idp, valid_sp, CountingPublished};

    fn sp() -> Entity {
        Entity::service_provider("https://sp.example.org")
    }

    fn check(test: &dyn Test, configured: ConfiguredMetadata) -> TestResult {
        let source = CountingPublished::with(published_sp());
        let validation = context_ok();
        let context = VerificationContext::new(sp(), configured, &source, &validation);
        test.verify(&context)
    }

    #[test]
    fn support_contact_is_required() {
        assert!(check(&SupportContactPresent, valid_sp().build()).passed());

        let bare = ConfiguredMetadata::builder(EntityRole::ServiceProvider).build();
        let TestResult::Failed(failure) = check(&SupportContactPresent, bare) else {
            panic!("expected failure");
        };
        assert_eq!(failure.severity, Severity::Medium);
    }

    #[test]
    fn blank_email_does_not_count_as_support_contact() {
        for email in ["", "mailto:"] {
            let configured = ConfiguredMetadata::builder(EntityRole::ServiceProvider)
                .contact(Contact::new(ContactType::Support).with_email(email))
                .build();
            assert!(!check(&SupportContactPresent, configured).passed(), "{:?}", email);
        }
    }

    #[test]
    fn display_name_is_compared_in_english() {
        assert!(check(&DisplayNameMatches, valid_sp().build()).passed());

        let renamed = valid_sp()
            .name(LocalizedText::new().with("en", "Team wiki"))
            .build();
        let TestResult::Failed(failure) = check(&DisplayNameMatches, renamed) else {
            panic!("expected failure");
        };
        assert!(failure.explanation.contains("Team wiki"));
    }

    #[test]
    fn redirect_signing_applies_to_service_providers_only() {
        assert!(!check(&RedirectSigningDeclared, valid_sp().build()).passed());
        assert!(check(&RedirectSigningDeclared, valid_sp().sign_redirects(Some(false)).build()).passed());

        let source = CountingPublished::empty();
        let validation = context_ok();
        let context = VerificationContext::new(
            Entity::identity_provider("https://idp.example.org"),
            valid_idp().build(),
            &source,
            &validation,
        );
        assert!(RedirectSigningDeclared.skip_reason(&context).is_some());
    }
}
