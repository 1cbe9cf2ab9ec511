pub mod console;
pub mod json;

use crate::entity::Entity;
use crate::result::{RunSummary, SuiteResult};

/// Receives failing suite results as the run progresses.
pub trait Reporter {
    /// Called once per failing suite per entity.
    fn report_failed_verification_for(&mut self, entity: &Entity, suite: &str, result: &SuiteResult);

    /// Called once after the last entity.
    fn finish(&mut self, _summary: &RunSummary) {}
}

/// Names accepted by `run-suites --reporter`.
pub const REPORTERS: &[&str] = &["console", "json"];

pub const DEFAULT_REPORTER: &str = "console";

pub fn reporter_for(name: &str) -> Option<Box<dyn Reporter>> {
    match name {
        "console" => Some(Box::new(console::ConsoleReporter::new())),
        "json" => Some(Box::new(json::JsonReporter::new())),
        _ => None,
    }
}
