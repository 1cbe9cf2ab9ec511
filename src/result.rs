use serde::Serialize;
use thiserror::Error;

/// Impact of a failed test, on a fixed 1–5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trivial = 1,
    Low = 2,
    Medium = 3,
    High = 4,
    Critical = 5,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("severity {0} is outside the range 1..=5")]
pub struct InvalidSeverity(pub u8);

impl Severity {
    pub fn level(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Severity {
    type Error = InvalidSeverity;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Severity::Trivial),
            2 => Ok(Severity::Low),
            3 => Ok(Severity::Medium),
            4 => Ok(Severity::High),
            5 => Ok(Severity::Critical),
            other => Err(InvalidSeverity(other)),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Trivial => write!(f, "TRIVIAL"),
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestFailure {
    /// One line, shown in listings.
    pub reason: String,
    pub explanation: String,
    pub severity: Severity,
}

impl TestFailure {
    /// A failure must at least say what went wrong.
    pub fn problem(&self) -> Option<&'static str> {
        if self.reason.trim().is_empty() {
            Some("failure has an empty reason")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TestResult {
    Passed,
    Failed(TestFailure),
}

impl TestResult {
    pub fn success() -> Self {
        TestResult::Passed
    }

    pub fn failed(reason: &str, explanation: &str, severity: Severity) -> Self {
        TestResult::Failed(TestFailure {
            reason: reason.to_string(),
            explanation: explanation.to_string(),
            severity,
        })
    }

    pub fn passed(&self) -> bool {
        matches!(self, TestResult::Passed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SuiteResult {
    Passed,
    Failed {
        /// Dotted name of the first test that failed.
        test: String,
        failure: TestFailure,
    },
}

impl SuiteResult {
    pub fn success() -> Self {
        SuiteResult::Passed
    }

    pub fn failed(test: &str, failure: TestFailure) -> Self {
        SuiteResult::Failed {
            test: test.to_string(),
            failure,
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, SuiteResult::Passed)
    }

    pub fn failed_test(&self) -> Option<&str> {
        match self {
            SuiteResult::Passed => None,
            SuiteResult::Failed { test, .. } => Some(test),
        }
    }

    pub fn failure(&self) -> Option<&TestFailure> {
        match self {
            SuiteResult::Passed => None,
            SuiteResult::Failed { failure, .. } => Some(failure),
        }
    }
}

/// Totals for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub entities: usize,
    pub suites_run: usize,
    pub suites_skipped: usize,
    pub failures: usize,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.failures > 0
    }
}
