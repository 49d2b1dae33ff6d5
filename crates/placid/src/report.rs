//! Reporting sinks for failed expectations.
//!
//! The console reporter prints one block per failure, grouped under the case
//! description:
//!
//! ```text
//!     Stack pop returns the last element
//!     Expected `1` to equal `2` stack_test.rs:14
//!         13. let stack = Stack::from([1, 2]);
//!         14. expect.that(stack.pop()).to_equal(2);
//!         15. });
//! ```

use crate::config::ReporterConfig;
use crate::source;
use std::cell::RefCell;
use std::fmt::Write as _;
use std::panic::Location;
use std::time::Duration;
use tracing::debug;

// ============================================================================
// Failure + Reporter
// ============================================================================

/// One failed predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    /// Where the assertion was written, when known.
    pub location: Option<&'static Location<'static>>,
}

impl Failure {
    pub fn new(message: impl Into<String>, location: Option<&'static Location<'static>>) -> Self {
        Failure {
            message: message.into(),
            location,
        }
    }
}

/// Receives every failed predicate, exactly once, and never a success.
pub trait Reporter {
    fn report(&self, description: &str, failure: &Failure);
}

// ============================================================================
// Recorder: in-memory sink
// ============================================================================

/// Collects failures instead of printing them.
#[derive(Debug, Default)]
pub struct Recorder {
    entries: RefCell<Vec<(String, Failure)>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(description, failure)` pairs in the order they were reported.
    pub fn failures(&self) -> Vec<(String, Failure)> {
        self.entries.borrow().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, failure)| failure.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl Reporter for Recorder {
    fn report(&self, description: &str, failure: &Failure) {
        self.entries
            .borrow_mut()
            .push((description.to_string(), failure.clone()));
    }
}

// ============================================================================
// ANSI color helpers
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Palette {
    enabled: bool,
}

impl Palette {
    fn paint(&self, code: &str, s: &str) -> String {
        if self.enabled {
            format!("{code}{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }

    fn green(&self, s: &str) -> String {
        self.paint("\x1b[32m", s)
    }

    fn red(&self, s: &str) -> String {
        self.paint("\x1b[31m\x1b[1m", s)
    }

    fn bold(&self, s: &str) -> String {
        self.paint("\x1b[37m\x1b[1m", s)
    }

    fn grey(&self, s: &str) -> String {
        self.paint("\x1b[90m", s)
    }
}

// ============================================================================
// Console reporter
// ============================================================================

/// Prints failures to stdout with an optional source excerpt.
///
/// The case description is printed once per run of consecutive failures from
/// the same case.
#[derive(Debug)]
pub struct ConsoleReporter {
    config: ReporterConfig,
    palette: Palette,
    last_description: RefCell<Option<String>>,
}

impl ConsoleReporter {
    pub fn new(config: ReporterConfig) -> Self {
        ConsoleReporter {
            palette: Palette {
                enabled: config.color,
            },
            config,
            last_description: RefCell::new(None),
        }
    }

    pub fn from_env() -> Self {
        Self::new(ReporterConfig::from_env())
    }

    /// Render one failure block, updating the last shown description.
    pub fn render(&self, description: &str, failure: &Failure) -> String {
        let p = self.palette;
        let mut out = String::new();

        let mut last = self.last_description.borrow_mut();
        if last.as_deref() != Some(description) {
            let _ = writeln!(out, "    {}", p.bold(description));
            *last = Some(description.to_string());
        }

        let location = match failure.location {
            Some(loc) => {
                let file = std::path::Path::new(loc.file())
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| loc.file().to_string());
                format!(" {}", p.grey(&format!("{file}:{}", loc.line())))
            }
            None => String::new(),
        };
        let _ = writeln!(out, "    {}{location}", p.red(&failure.message));

        if let Some(loc) = failure.location.filter(|_| self.config.excerpt) {
            match source::excerpt(loc, self.config.context_lines) {
                Ok(excerpt) => {
                    for (n, line) in &excerpt.lines {
                        let text = format!("{n}. {line}");
                        if *n == excerpt.focus {
                            let _ = writeln!(out, "        {}", p.bold(&text));
                        } else {
                            let _ = writeln!(out, "        {}", p.grey(&text));
                        }
                    }
                }
                Err(err) => debug!(error = %err, "source excerpt unavailable"),
            }
        }

        out.push('\n');
        out
    }

    /// Print the pass/fail summary for a finished describe block.
    pub fn print_summary(&self, result: &RunResult, elapsed: Duration) {
        print!("{}", self.render_summary(result, elapsed));
    }

    fn render_summary(&self, result: &RunResult, elapsed: Duration) -> String {
        let p = self.palette;
        let elapsed_str = format!("{:.3}s", elapsed.as_secs_f64());

        let parts: Vec<String> = [
            (result.passed > 0).then(|| p.green(&format!("{} passed", result.passed))),
            (result.failed > 0).then(|| p.red(&format!("{} failed", result.failed))),
        ]
        .into_iter()
        .flatten()
        .collect();

        let mut out = String::new();
        let summary = format!("{} ({})", parts.join(", "), p.grey(&elapsed_str));
        if result.failed > 0 {
            let _ = writeln!(out, "{}", p.red("FAIL"));
            let _ = writeln!(out, "{summary}");
            let _ = writeln!(out, "Failures:");
            for (i, failure) in result.failures.iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", i + 1, failure);
            }
        } else {
            let _ = writeln!(out, "{}", p.green("PASS"));
            let _ = writeln!(out, "{summary}");
        }
        out
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, description: &str, failure: &Failure) {
        print!("{}", self.render(description, failure));
    }
}

// ============================================================================
// Run results
// ============================================================================

/// Outcome of one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    pub description: String,
    pub failures: usize,
}

/// Aggregate results of a describe block.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub passed: usize,
    pub failed: usize,
    /// One line per failed case.
    pub failures: Vec<String>,
}

impl RunResult {
    pub fn record(&mut self, outcome: CaseOutcome) {
        if outcome.failures == 0 {
            self.passed += 1;
        } else {
            self.failed += 1;
            let noun = if outcome.failures == 1 {
                "expectation"
            } else {
                "expectations"
            };
            self.failures.push(format!(
                "{}: {} failed {noun}",
                outcome.description, outcome.failures
            ));
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}
