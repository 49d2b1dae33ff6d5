//! Describe blocks, the entry point a test author uses.

use crate::case::{Case, Expect};
use crate::report::{ConsoleReporter, Reporter, RunResult};
use crate::scope::{Hook, Scope};
use std::time::Instant;
use tracing::debug;

// ============================================================================
// Describe: the user-facing handle
// ============================================================================

/// Handle passed to a describe block for registering hooks and declaring cases.
///
/// Cases run as soon as they are declared, so hooks only apply to the cases
/// declared after them.
///
/// # Example
/// ```rust
/// let result = placid::describe_with("Counter", &placid::Recorder::new(), |ctx| {
///     ctx.it("starts at zero", |expect| {
///         expect.that(0u32).to_be_empty();
///     });
/// });
/// assert_eq!(result.passed, 1);
/// ```
pub struct Describe<'r, 'h> {
    description: String,
    scope: Scope<'h>,
    reporter: &'r dyn Reporter,
    result: RunResult,
}

impl<'r, 'h> Describe<'r, 'h> {
    fn new(description: &str, reporter: &'r dyn Reporter) -> Self {
        Describe {
            description: description.to_string(),
            scope: Scope::new(),
            reporter,
            result: RunResult::default(),
        }
    }

    // ---- Hooks ---------------------------------------------------------------

    pub fn before_each(&mut self, hook: impl Fn() + 'h) {
        self.scope.before_each(hook);
    }

    pub fn after_each(&mut self, hook: impl Fn() + 'h) {
        self.scope.after_each(hook);
    }

    /// Register an optional before-each hook; `None` is ignored.
    pub fn register_before(&mut self, hook: Option<Hook<'h>>) {
        self.scope.register_before(hook);
    }

    /// Register an optional after-each hook; `None` is ignored.
    pub fn register_after(&mut self, hook: Option<Hook<'h>>) {
        self.scope.register_after(hook);
    }

    pub fn scope(&self) -> &Scope<'h> {
        &self.scope
    }

    // ---- It ------------------------------------------------------------------

    /// Declare and immediately run a case described as `"{describe} {it}"`.
    pub fn it(&mut self, description: &str, body: impl FnOnce(&Expect<'_>)) {
        let full = format!("{} {}", self.description, description);
        let outcome = Case::new(full, &self.scope, body).run(self.reporter);
        self.result.record(outcome);
    }

    /// Results of the cases run so far.
    pub fn result(&self) -> &RunResult {
        &self.result
    }
}

// ============================================================================
// describe() entry points
// ============================================================================

/// Run a describe block against any reporter and return its results.
///
/// Failures are left to the reporter and the returned [`RunResult`]; this
/// never panics on a failed expectation.
pub fn describe_with<'h>(
    description: &str,
    reporter: &dyn Reporter,
    body: impl FnOnce(&mut Describe<'_, 'h>),
) -> RunResult {
    debug!(describe = description, "starting describe block");
    let mut ctx = Describe::new(description, reporter);
    body(&mut ctx);
    debug!(
        describe = description,
        passed = ctx.result.passed,
        failed = ctx.result.failed,
        "describe block finished"
    );
    ctx.result
}

/// Run a describe block, printing failures and a summary to stdout.
///
/// Panics after the block when any case had a failed expectation, so the
/// surrounding `#[test]` is marked failed. Output honors `NO_COLOR`,
/// `PLACID_EXCERPT` and `PLACID_CONTEXT_LINES`.
///
/// # Example
/// ```rust
/// placid::describe("Vec", |ctx| {
///     ctx.it("starts empty", |expect| {
///         expect.that(Vec::<u8>::new()).to_be_empty();
///     });
/// });
/// ```
pub fn describe<'h>(description: &str, body: impl FnOnce(&mut Describe<'_, 'h>)) -> RunResult {
    let reporter = ConsoleReporter::from_env();
    let start = Instant::now();
    let result = describe_with(description, &reporter, body);
    reporter.print_summary(&result, start.elapsed());

    if result.failed > 0 {
        panic!(
            "placid: {} of {} cases in `{description}` failed",
            result.failed,
            result.total()
        );
    }
    result
}
