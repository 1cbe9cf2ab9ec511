use serde::Serialize;

use super::Reporter;
use crate::entity::Entity;
use crate::result::{RunSummary, SuiteResult, TestFailure};

#[derive(Debug, Serialize)]
struct FailureEntry {
    entity: Entity,
    suite: String,
    test: String,
    #[serde(flatten)]
    failure: TestFailure,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    failures: &'a [FailureEntry],
    summary: &'a RunSummary,
}

/// Collects every failure and prints one JSON document at the end.
#[derive(Debug, Default)]
pub struct JsonReporter {
    failures: Vec<FailureEntry>,
}

impl JsonReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn render(&self, summary: &RunSummary) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&JsonReport {
            failures: &self.failures,
            summary,
        })
    }
}

impl Reporter for JsonReporter {
    fn report_failed_verification_for(&mut self, entity: &Entity, suite: &str, result: &SuiteResult) {
        if let SuiteResult::Failed { test, failure } = result {
            self.failures.push(FailureEntry {
                entity: entity.clone(),
                suite: suite.to_string(),
                test: test.clone(),
                failure: failure.clone(),
            });
        }
    }

    fn finish(&mut self, summary: &RunSummary) {
        match self.render(summary) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize JSON: {}", e),
        }
    }
}
