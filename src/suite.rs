use tracing::debug;

use crate::blacklist::Blacklist;
use crate::context::VerificationContext;
use crate::error::VerificationError;
use crate::name::{NameError, NameResolver};
use crate::result::{SuiteResult, TestResult};

/// A single pass/fail check against one entity.
pub trait Test: 'static {
    fn verify(&self, context: &VerificationContext<'_>) -> TestResult;

    /// When set, the test is not run for this context.
    fn skip_reason(&self, _context: &VerificationContext<'_>) -> Option<String> {
        None
    }
}

/// An ordered group of tests.
pub trait Suite: 'static {
    fn tests(&self, names: &NameResolver) -> Result<Vec<NamedTest>, NameError>;

    /// When set, the whole suite is not run for this context.
    fn skip_reason(&self, _context: &VerificationContext<'_>) -> Option<String> {
        None
    }

    fn verify(
        &self,
        tests: &[NamedTest],
        context: &VerificationContext<'_>,
        blacklist: &Blacklist,
    ) -> Result<SuiteResult, VerificationError> {
        verify_tests(tests, context, blacklist)
    }
}

pub struct NamedTest {
    pub name: String,
    pub test: Box<dyn Test>,
}

pub struct NamedSuite {
    pub name: String,
    pub suite: Box<dyn Suite>,
    pub tests: Vec<NamedTest>,
}

impl NamedSuite {
    pub fn has_test(&self, name: &str) -> bool {
        self.tests.iter().any(|t| t.name == name)
    }
}

/// Run tests in order, stopping at the first failure.
///
/// Blacklisted and self-skipped tests are not invoked.
pub fn verify_tests(
    tests: &[NamedTest],
    context: &VerificationContext<'_>,
    blacklist: &Blacklist,
) -> Result<SuiteResult, VerificationError> {
    let entity = context.entity();

    for NamedTest { name, test } in tests {
        if blacklist.is_blacklisted(entity, name) {
            debug!(test = %name, "skipped: entity is blacklisted");
            continue;
        }
        if let Some(reason) = test.skip_reason(context) {
            debug!(test = %name, "skipped: {}", reason);
            continue;
        }

        match test.verify(context) {
            TestResult::Passed => {
                debug!(test = %name, "passed");
            }
            TestResult::Failed(failure) => {
                if let Some(problem) = failure.problem() {
                    return Err(VerificationError::MalformedTestResult {
                        test: name.clone(),
                        problem: problem.to_string(),
                    });
                }
                debug!(test = %name, reason = %failure.reason, "failed");
                return Ok(SuiteResult::failed(name, failure));
            }
        }
    }

    Ok(SuiteResult::success())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    use super::*;
    use crate::entity::{Entity, EntitySet};
    use crate::result::Severity;
    use crate::testing::{context_ok, valid_sp, CountingPublished};

    /// Records how often it ran and returns a fixed result.
    struct Scripted {
        result: TestResult,
        calls: Rc<Cell<usize>>,
    }

    impl Test for Scripted {
        fn verify(&self, _context: &VerificationContext<'_>) -> TestResult {
            self.calls.set(self.calls.get() + 1);
            self.result.clone()
        }
    }

    struct Opinionated {
        calls: Rc<Cell<usize>>,
    }

    impl Test for Opinionated {
        fn verify(&self, _context: &VerificationContext<'_>) -> TestResult {
            self.calls.set(self.calls.get() + 1);
            TestResult::success()
        }

        fn skip_reason(&self, _context: &VerificationContext<'_>) -> Option<String> {
            Some("not applicable".into())
        }
    }

    fn scripted(name: &str, result: TestResult) -> (NamedTest, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let test = NamedTest {
            name: name.to_string(),
            test: Box::new(Scripted {
                result,
                calls: Rc::clone(&calls),
            }),
        };
        (test, calls)
    }

    fn fail() -> TestResult {
        TestResult::failed("broken", "it is broken", Severity::High)
    }

    fn sp() -> Entity {
        Entity::service_provider("https://sp.example.org")
    }

    fn run(tests: &[NamedTest], blacklist: &Blacklist) -> Result<SuiteResult, VerificationError> {
        let source = CountingPublished::empty();
        let validation = context_ok();
        let context = VerificationContext::new(sp(), valid_sp().build(), &source, &validation);
        verify_tests(tests, &context, blacklist)
    }

    #[test]
    fn all_passing_is_success() {
        let (a, _) = scripted("s.a", TestResult::success());
        let (b, _) = scripted("s.b", TestResult::success());
        assert_eq!(run(&[a, b], &Blacklist::default()).unwrap(), SuiteResult::Passed);
    }

    #[test]
    fn first_failure_stops_the_suite() {
        let (first, first_calls) = scripted("s.first", TestResult::success());
        let (second, second_calls) = scripted("s.second", fail());
        let (third, third_calls) = scripted("s.third", TestResult::success());

        let result = run(&[first, second, third], &Blacklist::default()).unwrap();

        assert_eq!(result.failed_test(), Some("s.second"));
        assert_eq!(result.failure().unwrap().severity, Severity::High);
        assert_eq!(first_calls.get(), 1);
        assert_eq!(second_calls.get(), 1);
        assert_eq!(third_calls.get(), 0);
    }

    #[test]
    fn blacklisted_test_is_not_invoked() {
        let (skipped, skipped_calls) = scripted("s.skipped", fail());
        let (ran, ran_calls) = scripted("s.ran", TestResult::success());
        let blacklist = Blacklist::new(
            EntitySet::new(),
            BTreeMap::from([("s.skipped".to_string(), [sp()].into_iter().collect())]),
        );

        let result = run(&[skipped, ran], &blacklist).unwrap();

        assert!(result.passed());
        assert_eq!(skipped_calls.get(), 0);
        assert_eq!(ran_calls.get(), 1);
    }

    #[test]
    fn self_skipping_test_is_not_invoked() {
        let calls = Rc::new(Cell::new(0));
        let tests = [NamedTest {
            name: "s.opinionated".into(),
            test: Box::new(Opinionated {
                calls: Rc::clone(&calls),
            }),
        }];
        assert!(run(&tests, &Blacklist::default()).unwrap().passed());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn empty_reason_aborts_with_test_name() {
        let (bad, _) = scripted("s.bad", TestResult::failed("", "", Severity::Low));
        let err = run(&[bad], &Blacklist::default()).unwrap_err();
        assert!(matches!(
            err,
            VerificationError::MalformedTestResult { ref test, .. } if test == "s.bad"
        ));
        assert!(err.to_string().contains("s.bad"));
    }

    thread_local! {
        static FIRST_CALLS: Cell<usize> = const { Cell::new(0) };
        static SECOND_CALLS: Cell<usize> = const { Cell::new(0) };
    }

    #[derive(Default)]
    struct FailsFirst;

    impl Test for FailsFirst {
        fn verify(&self, _context: &VerificationContext<'_>) -> TestResult {
            FIRST_CALLS.with(|c| c.set(c.get() + 1));
            fail()
        }
    }

    #[derive(Default)]
    struct PassesSecond;

    impl Test for PassesSecond {
        fn verify(&self, _context: &VerificationContext<'_>) -> TestResult {
            SECOND_CALLS.with(|c| c.set(c.get() + 1));
            TestResult::success()
        }
    }

    #[derive(Default)]
    struct Ordered;

    impl Suite for Ordered {
        fn tests(&self, names: &NameResolver) -> Result<Vec<NamedTest>, NameError> {
            Ok(vec![names.named(FailsFirst)?, names.named(PassesSecond)?])
        }
    }

    #[test]
    fn first_test_blacklisted_by_its_resolved_name_is_not_invoked() {
        let mut names = NameResolver::new();
        names
            .register_suite::<Ordered>()
            .unwrap()
            .register_test::<FailsFirst>()
            .unwrap()
            .register_test::<PassesSecond>()
            .unwrap();
        let suites = names.instantiate_suites().unwrap();
        let suite = &suites[0];

        let first = names.test_name::<FailsFirst>().unwrap();
        assert_eq!(suite.tests[0].name, first);
        assert_eq!(first, "fedcheck.suite.tests.fails_first");

        let blacklist = Blacklist::from_table(vec![(
            first.to_string(),
            [sp()].into_iter().collect::<EntitySet>(),
        )]);
        let result = run(&suite.tests, &blacklist).unwrap();

        assert!(result.passed());
        assert_eq!(FIRST_CALLS.with(Cell::get), 0);
        assert_eq!(SECOND_CALLS.with(Cell::get), 1);
    }
}
