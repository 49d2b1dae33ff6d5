//! Equality, sameness, nil and emptiness checks over inspected values.
//!
//! Equality is layered:
//!
//! 1. `Nil` only equals `Nil`.
//! 2. Structural deep equality, type-strict at every level.
//! 3. At the top level only, the left value is converted to the right value's
//!    type (numeric widths, named types to their underlying value, strings to
//!    byte or char sequences) and compared again.

use crate::value::{Inspect, Number, NumberKind, Value};
use chrono::{DateTime, Utc};
use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Once;
use tracing::trace;

/// Whether `actual` and `expected` are equal, allowing a conversion of
/// `actual` into the type of `expected`.
pub fn are_equal(actual: &Value, expected: &Value) -> bool {
    if matches!(actual, Value::Nil) || matches!(expected, Value::Nil) {
        return matches!((actual, expected), (Value::Nil, Value::Nil));
    }
    deep_equal(actual, expected) || converted_equal(actual, expected)
}

/// Of the identical runtime type and structurally equal, with no conversion.
///
/// `5i32` and `5i64` are equal but not the same. Raw [`Value`]s share one
/// runtime type, so for them sameness is [`deep_equal`]: `Number::I32(5)` is
/// not the same as `Number::I64(5)`.
pub fn are_the_same<A, B>(actual: &A, expected: &B) -> bool
where
    A: Inspect + ?Sized,
    B: Inspect + ?Sized,
{
    actual.runtime_type() == expected.runtime_type()
        && deep_equal(&actual.to_value(), &expected.to_value())
}

/// Structural equality without any conversion.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Char(x), Value::Char(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Seq(x), Value::Seq(y)) | (Value::Tuple(x), Value::Tuple(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Map(x), Value::Map(y)) => maps_equal(x, y),
        (Value::Ref(x), Value::Ref(y)) => match (x, y) {
            (None, None) => true,
            (Some(x), Some(y)) => deep_equal(x, y),
            _ => false,
        },
        (Value::Callable { addr: Some(x) }, Value::Callable { addr: Some(y) }) => x == y,
        (Value::Time(x), Value::Time(y)) => x == y,
        (
            Value::Struct {
                name: n1,
                fields: f1,
            },
            Value::Struct {
                name: n2,
                fields: f2,
            },
        ) => {
            n1 == n2
                && f1.len() == f2.len()
                && f1
                    .iter()
                    .zip(f2)
                    .all(|((k1, v1), (k2, v2))| k1 == k2 && deep_equal(v1, v2))
        }
        (
            Value::Named {
                name: n1,
                inner: i1,
            },
            Value::Named {
                name: n2,
                inner: i2,
            },
        ) => n1 == n2 && deep_equal(i1, i2),
        (
            Value::Opaque {
                type_name: t1,
                repr: r1,
            },
            Value::Opaque {
                type_name: t2,
                repr: r2,
            },
        ) => t1 == t2 && r1 == r2,
        _ => false,
    }
}

fn maps_equal(x: &[(Value, Value)], y: &[(Value, Value)]) -> bool {
    x.len() == y.len()
        && x.iter().all(|(key, value)| {
            y.iter()
                .find(|(other, _)| deep_equal(key, other))
                .is_some_and(|(_, other)| deep_equal(value, other))
        })
}

/// Convert `actual` to the type of `expected` and compare by value.
fn converted_equal(actual: &Value, expected: &Value) -> bool {
    match (underlying(actual), underlying(expected)) {
        (Value::Number(x), Value::Number(y)) => x.cast(y.kind()) == *y,
        (Value::Char(c), Value::Number(y)) => Number::U32(u32::from(*c)).cast(y.kind()) == *y,
        (Value::Number(x), Value::Char(c)) => {
            let Number::U32(code) = x.cast(NumberKind::U32) else {
                return false;
            };
            char::from_u32(code) == Some(*c)
        }
        (Value::Str(s), Value::Seq(items)) | (Value::Seq(items), Value::Str(s)) => {
            string_matches(s, items)
        }
        (a, b) => deep_equal(a, b),
    }
}

/// A string converts to and from sequences of `u8` (UTF-8) or `char`.
///
/// An empty sequence carries no element type, so it never matches.
fn string_matches(s: &str, items: &[Value]) -> bool {
    if items.is_empty() {
        return false;
    }

    let bytes: Option<Vec<u8>> = items
        .iter()
        .map(|item| match item {
            Value::Number(Number::U8(b)) => Some(*b),
            _ => None,
        })
        .collect();
    if let Some(bytes) = bytes {
        return bytes == s.as_bytes();
    }

    let chars: Option<Vec<char>> = items
        .iter()
        .map(|item| match item {
            Value::Char(c) => Some(*c),
            _ => None,
        })
        .collect();
    chars.is_some_and(|chars| chars.into_iter().eq(s.chars()))
}

/// Peel named-type wrappers down to the underlying value.
fn underlying(value: &Value) -> &Value {
    match value {
        Value::Named { inner, .. } => underlying(inner),
        other => other,
    }
}

/// `Nil`, or a nilable pointer holding nothing.
pub fn is_nil(value: &Value) -> bool {
    matches!(underlying(value), Value::Nil | Value::Ref(None))
}

/// Whether a value counts as "empty".
///
/// Empty values are: nil, `""`, `false`, any number equal to zero (directly
/// or behind one pointer), zero-length sequences and maps, and a pointer to
/// the Unix epoch. Structs are never empty.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Nil | Value::Ref(None) => return true,
        Value::Str(s) if s.is_empty() => return true,
        Value::Bool(false) => return true,
        _ => {}
    }

    if as_f64(value).is_some_and(|f| f == 0.0) {
        return true;
    }

    match underlying(value) {
        Value::Seq(items) => items.is_empty(),
        Value::Map(entries) => entries.is_empty(),
        Value::Ref(Some(inner)) => matches!(inner.as_ref(), Value::Time(t) if is_zero_time(t)),
        _ => false,
    }
}

/// Numeric view of a value, following one pointer indirection.
pub fn as_f64(value: &Value) -> Option<f64> {
    let value = match underlying(value) {
        Value::Ref(Some(inner)) => underlying(inner),
        other => other,
    };
    match value {
        Value::Number(n) => Some(n.to_f64()),
        Value::Char(c) => Some(f64::from(u32::from(*c))),
        _ => None,
    }
}

fn is_zero_time(t: &DateTime<Utc>) -> bool {
    t.timestamp() == 0 && t.timestamp_subsec_nanos() == 0
}

static QUIET_HOOK_INIT: Once = Once::new();

thread_local! {
    static QUIET: Cell<bool> = const { Cell::new(false) };
}

/// Wrap the installed panic hook so it stays silent while [`panics`] runs on
/// the current thread.
fn install_quiet_hook() {
    QUIET_HOOK_INIT.call_once(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            if !QUIET.with(Cell::get) {
                default_hook(panic_info);
            }
        }));
    });
}

/// Call `f`, reporting whether it panicked. The panic payload is dropped and
/// the panic message is not printed.
pub fn panics(f: impl FnOnce()) -> bool {
    install_quiet_hook();
    let outer = QUIET.with(|quiet| quiet.replace(true));
    let result = catch_unwind(AssertUnwindSafe(f));
    QUIET.with(|quiet| quiet.set(outer));
    if result.is_err() {
        trace!("caught expected panic");
    }
    result.is_err()
}
