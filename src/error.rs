use thiserror::Error;

use crate::entity::Entity;
use crate::name::NameError;

/// Defects in a suite, a test or their configuration.
///
/// These abort the run. Policy failures of the entity under test are never
/// reported through this type; they are `TestResult::Failed` values.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("test `{test}` returned a malformed result: {problem}")]
    MalformedTestResult { test: String, problem: String },

    #[error("suite `{suite}` returned a malformed result: {problem}")]
    MalformedSuiteResult { suite: String, problem: String },

    #[error(transparent)]
    Name(#[from] NameError),

    #[error("configured metadata for {entity} is unavailable")]
    ConfiguredMetadata {
        entity: Entity,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
