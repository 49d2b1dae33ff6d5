//! A single behavior check and the assertion factory handed to its body.

use crate::assertion::Assertion;
use crate::report::{CaseOutcome, Failure, Reporter};
use crate::scope::Scope;
use std::cell::Cell;
use std::panic::Location;
use tracing::debug;

/// The assertion body of a case.
pub type Body<'b> = Box<dyn FnOnce(&Expect<'_>) + 'b>;

/// One `it` block: a description, the scope whose hooks surround it, and a body.
pub struct Case<'s, 'h, 'b> {
    description: String,
    scope: &'s Scope<'h>,
    body: Body<'b>,
}

impl<'s, 'h, 'b> Case<'s, 'h, 'b> {
    pub fn new(
        description: impl Into<String>,
        scope: &'s Scope<'h>,
        body: impl FnOnce(&Expect<'_>) + 'b,
    ) -> Self {
        Case {
            description: description.into(),
            scope,
            body: Box::new(body),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Run before hooks, the body, then after hooks.
    ///
    /// Failed expectations go to `reporter` and do not interrupt the body or
    /// the after hooks. A panic from a hook or the body propagates and skips
    /// whatever steps remain.
    pub fn run(self, reporter: &dyn Reporter) -> CaseOutcome {
        let Case {
            description,
            scope,
            body,
        } = self;
        debug!(case = %description, "running case");

        scope.run_before_hooks();
        let expect = Expect::new(&description, reporter);
        body(&expect);
        scope.run_after_hooks();

        let failures = expect.failures();
        debug!(case = %description, failures, "case finished");
        CaseOutcome {
            description,
            failures,
        }
    }
}

/// Creates assertions inside a case body.
///
/// ```rust
/// # use placid::{Case, Recorder, Scope};
/// let scope = Scope::new();
/// let recorder = Recorder::new();
/// Case::new("math adds", &scope, |expect| {
///     expect.that(2 + 3).to_equal(5);
/// })
/// .run(&recorder);
/// assert!(recorder.is_empty());
/// ```
pub struct Expect<'c> {
    description: &'c str,
    reporter: &'c dyn Reporter,
    failures: Cell<usize>,
}

impl<'c> Expect<'c> {
    pub fn new(description: &'c str, reporter: &'c dyn Reporter) -> Self {
        Expect {
            description,
            reporter,
            failures: Cell::new(0),
        }
    }

    /// Start an assertion about `subject`.
    pub fn that<T>(&self, subject: T) -> Assertion<'_, T> {
        Assertion::new(self, subject)
    }

    pub fn description(&self) -> &str {
        self.description
    }

    /// Failed expectations so far.
    pub fn failures(&self) -> usize {
        self.failures.get()
    }

    #[track_caller]
    pub(crate) fn fail(&self, message: String) {
        let failure = Failure::new(message, Some(Location::caller()));
        self.failures.set(self.failures.get() + 1);
        debug!(case = self.description, message = %failure.message, "expectation failed");
        self.reporter.report(self.description, &failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Recorder;
    use std::cell::RefCell;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn test_hooks_surround_body() {
        let log = RefCell::new(Vec::new());
        let mut scope = Scope::new();
        scope.before_each(|| log.borrow_mut().push("before"));
        scope.after_each(|| log.borrow_mut().push("after"));
        let recorder = Recorder::new();

        let outcome =
            Case::new("log order", &scope, |_| log.borrow_mut().push("body")).run(&recorder);

        assert_eq!(*log.borrow(), vec!["before", "body", "after"]);
        assert_eq!(outcome.failures, 0);
        assert_eq!(outcome.description, "log order");
    }

    #[test]
    fn test_failure_does_not_stop_body_or_after_hooks() {
        let log = RefCell::new(Vec::new());
        let mut scope = Scope::new();
        scope.after_each(|| log.borrow_mut().push("after"));
        let recorder = Recorder::new();

        let outcome = Case::new("keeps going", &scope, |expect| {
            expect.that(1).to_equal(2);
            log.borrow_mut().push("after failure");
            expect.that(true).to_be_false();
        })
        .run(&recorder);

        assert_eq!(*log.borrow(), vec!["after failure", "after"]);
        assert_eq!(outcome.failures, 2);
        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.failures()[0].0, "keeps going");
    }

    #[test]
    fn test_body_panic_skips_after_hooks() {
        let after = RefCell::new(0);
        let mut scope = Scope::new();
        scope.after_each(|| *after.borrow_mut() += 1);
        let recorder = Recorder::new();

        let result = catch_unwind(AssertUnwindSafe(|| {
            Case::new("explodes", &scope, |_| panic!("body failed")).run(&recorder)
        }));

        assert!(result.is_err());
        assert_eq!(*after.borrow(), 0);
    }

    #[test]
    fn test_failure_location_points_at_assertion() {
        let scope = Scope::new();
        let recorder = Recorder::new();
        let line = line!() + 2;
        Case::new("where", &scope, |expect| {
            expect.that("a").to_be_empty();
        })
        .run(&recorder);

        let failure = &recorder.failures()[0].1;
        let location = failure.location.unwrap();
        assert_eq!(location.line(), line);
        assert!(location.file().ends_with("case.rs"));
    }
}
