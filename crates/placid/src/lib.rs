//! # placid: describe/it blocks with assertions that don't abort
//!
//! Group related cases under a description, run hooks around each case, and
//! make fluent assertions about values. A failed assertion is reported and
//! the case keeps running; the describe block fails at the end.
//!
//! ## Quick example
//!
//! ```rust
//! use std::cell::Cell;
//!
//! let calls = Cell::new(0);
//! placid::describe("Counter", |ctx| {
//!     ctx.before_each(|| calls.set(calls.get() + 1));
//!
//!     ctx.it("sees the hook", |expect| {
//!         expect.that(calls.get()).to_equal(1);
//!         expect.that(5).to_equal(5.0);
//!         expect.that(5).to_not_be_the_same(5.0);
//!         expect.that(Vec::<u8>::new()).to_be_empty();
//!         expect.that(|| panic!("boom")).to_panic();
//!     });
//! });
//! ```
//!
//! ## Features
//!
//! - `macros` (default): `#[derive(Inspect)]` for your own types

// Lets derived code refer to `::placid` from inside this crate too.
extern crate self as placid;

mod assertion;
mod case;
pub mod compare;
mod config;
mod context;
mod error;
pub mod report;
mod scope;
pub mod source;
mod value;

pub use assertion::Assertion;
pub use case::{Body, Case, Expect};
pub use config::ReporterConfig;
pub use context::{describe, describe_with, Describe};
pub use error::{Error, Result};
pub use report::{CaseOutcome, ConsoleReporter, Failure, Recorder, Reporter, RunResult};
pub use scope::{Hook, Scope};
pub use value::{Inspect, Nil, Number, NumberKind, Value};

/// Derive [`Inspect`] for a struct or enum.
///
/// ```rust
/// use placid::Inspect;
///
/// #[derive(Inspect)]
/// struct Meters(f64);
///
/// #[derive(Inspect)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// assert_eq!(Point { x: 1, y: 2 }.to_value().to_string(), "Point { x: 1, y: 2 }");
/// assert_eq!(Meters(2.5).to_value().to_string(), "Meters(2.5)");
/// ```
#[cfg(feature = "macros")]
pub use placid_macros::Inspect;
