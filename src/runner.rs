use tracing::{debug, info, warn};

use crate::blacklist::Blacklist;
use crate::context::VerificationContext;
use crate::entity::Entity;
use crate::error::VerificationError;
use crate::output::Reporter;
use crate::result::{RunSummary, SuiteResult};
use crate::source::{ConfiguredMetadataSource, PublishedMetadataSource};
use crate::suite::NamedSuite;
use crate::validation::ValidationContext;

/// Drives every suite against every configured entity.
pub struct Runner<'a> {
    configured: &'a dyn ConfiguredMetadataSource,
    published: &'a dyn PublishedMetadataSource,
    suites: &'a [NamedSuite],
    blacklist: &'a Blacklist,
    validation: &'a ValidationContext,
}

impl<'a> Runner<'a> {
    pub fn new(
        configured: &'a dyn ConfiguredMetadataSource,
        published: &'a dyn PublishedMetadataSource,
        suites: &'a [NamedSuite],
        blacklist: &'a Blacklist,
        validation: &'a ValidationContext,
    ) -> Self {
        Self {
            configured,
            published,
            suites,
            blacklist,
            validation,
        }
    }

    /// Failing suites go to the reporter; defects in a suite abort the run.
    pub fn run(&self, reporter: &mut dyn Reporter) -> Result<RunSummary, VerificationError> {
        let mut summary = RunSummary::default();

        for entity in &self.configured.configured_entities() {
            self.run_entity(entity, reporter, &mut summary)?;
            summary.entities += 1;
        }

        info!(
            entities = summary.entities,
            suites_run = summary.suites_run,
            failures = summary.failures,
            "run complete"
        );
        reporter.finish(&summary);
        Ok(summary)
    }

    fn run_entity(
        &self,
        entity: &Entity,
        reporter: &mut dyn Reporter,
        summary: &mut RunSummary,
    ) -> Result<(), VerificationError> {
        let configured = self
            .configured
            .metadata_for(entity)
            .map_err(|source| VerificationError::ConfiguredMetadata {
                entity: entity.clone(),
                source: source.into(),
            })?;
        let context =
            VerificationContext::new(entity.clone(), configured, self.published, self.validation);
        let _guard = context.span().enter();

        for named in self.suites {
            if self.blacklist.is_blacklisted(entity, &named.name) {
                debug!(suite = %named.name, "skipped: entity is blacklisted");
                summary.suites_skipped += 1;
                continue;
            }
            if let Some(reason) = named.suite.skip_reason(&context) {
                debug!(suite = %named.name, "skipped: {}", reason);
                summary.suites_skipped += 1;
                continue;
            }

            let result = named.suite.verify(&named.tests, &context, self.blacklist)?;
            check_suite_result(named, &result)?;
            summary.suites_run += 1;

            if let SuiteResult::Failed { test, failure } = &result {
                warn!(suite = %named.name, test = %test, "{}", failure.reason);
                summary.failures += 1;
                reporter.report_failed_verification_for(entity, &named.name, &result);
            }
        }

        Ok(())
    }
}

fn check_suite_result(named: &NamedSuite, result: &SuiteResult) -> Result<(), VerificationError> {
    let SuiteResult::Failed { test, failure } = result else {
        return Ok(());
    };

    let problem = if !named.has_test(test) {
        Some(format!("failed test `{}` is not part of the suite", test))
    } else {
        failure.problem().map(str::to_string)
    };

    match problem {
        Some(problem) => Err(VerificationError::MalformedSuiteResult {
            suite: named.name.clone(),
            problem,
        }),
        None => Ok(()),
    }
}
