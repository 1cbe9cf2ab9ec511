use colored::Colorize;

use super::Reporter;
use crate::entity::Entity;
use crate::result::{RunSummary, Severity, SuiteResult, TestFailure};

/// Human-readable output, grouped by entity as failures arrive.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    current: Option<Entity>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for ConsoleReporter {
    fn report_failed_verification_for(&mut self, entity: &Entity, suite: &str, result: &SuiteResult) {
        let SuiteResult::Failed { test, failure } = result else {
            return;
        };

        if self.current.as_ref() != Some(entity) {
            println!("\n{}", format!("── {} ──", entity).bold());
            self.current = Some(entity.clone());
        }
        print_failure(suite, test, failure);
    }

    fn finish(&mut self, summary: &RunSummary) {
        println!();
        print_summary(summary);
    }
}

fn severity_label(severity: Severity) -> colored::ColoredString {
    let label = format!("{:<8}", severity.to_string());
    match severity {
        Severity::Critical | Severity::High => label.red().bold(),
        Severity::Medium => label.yellow().bold(),
        Severity::Low | Severity::Trivial => label.blue().bold(),
    }
}

fn print_failure(suite: &str, test: &str, failure: &TestFailure) {
    let code = format!("[{}]", test).dimmed();
    println!("  {} {} {}", severity_label(failure.severity), code, failure.reason);

    for line in failure.explanation.lines().filter(|l| !l.trim().is_empty()) {
        println!("           {} {}", "→".dimmed(), line.dimmed());
    }
    println!("           {} {}", "suite:".dimmed(), suite.dimmed());
}

fn print_summary(summary: &RunSummary) {
    let line = format!(
        "Summary: {} entities | {} suites run | {} skipped | {} failures",
        summary.entities, summary.suites_run, summary.suites_skipped, summary.failures,
    );

    if summary.has_failures() {
        println!("{}", line.red().bold());
    } else {
        println!("{}", line.green().bold());
    }
}
