//! Dynamic value model: the runtime shape every subject is inspected into.
//!
//! Assertions compare arbitrary Rust values, so each value is first turned
//! into a [`Value`] through the [`Inspect`] trait. Numbers keep their width
//! so conversions and type-strict comparisons stay possible.

use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::time::SystemTime;

// ============================================================================
// Numbers
// ============================================================================

/// A number tagged with its Rust width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Usize(usize),
    F32(f32),
    F64(f64),
}

/// The width of a [`Number`], without its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
}

/// Lossless intermediate used while casting between widths.
enum Wide {
    Signed(i128),
    Unsigned(u128),
    Float(f64),
}

macro_rules! numbers {
    ($($variant:ident => $ty:ty, $wide:ident;)*) => {
        impl Number {
            pub fn kind(&self) -> NumberKind {
                match self {
                    $(Number::$variant(_) => NumberKind::$variant,)*
                }
            }

            fn widen(self) -> Wide {
                match self {
                    $(Number::$variant(v) => Wide::$wide(v as _),)*
                }
            }

            /// Convert to another width with `as` semantics (wrapping for
            /// integers, saturating for float-to-integer).
            pub fn cast(self, kind: NumberKind) -> Number {
                let wide = self.widen();
                match kind {
                    $(NumberKind::$variant => Number::$variant(match wide {
                        Wide::Signed(v) => v as $ty,
                        Wide::Unsigned(v) => v as $ty,
                        Wide::Float(v) => v as $ty,
                    }),)*
                }
            }

            pub fn to_f64(self) -> f64 {
                match self {
                    $(Number::$variant(v) => v as f64,)*
                }
            }
        }

        impl fmt::Display for Number {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Number::$variant(v) => write!(f, "{v:?}"),)*
                }
            }
        }

        $(
            impl Inspect for $ty {
                fn to_value(&self) -> Value {
                    Value::Number(Number::$variant(*self))
                }
            }
        )*
    };
}

numbers! {
    I8 => i8, Signed;
    I16 => i16, Signed;
    I32 => i32, Signed;
    I64 => i64, Signed;
    I128 => i128, Signed;
    Isize => isize, Signed;
    U8 => u8, Unsigned;
    U16 => u16, Unsigned;
    U32 => u32, Unsigned;
    U64 => u64, Unsigned;
    U128 => u128, Unsigned;
    Usize => usize, Unsigned;
    F32 => f32, Float;
    F64 => f64, Float;
}

// ============================================================================
// Value
// ============================================================================

/// The inspected form of a subject or comparison value.
#[derive(Debug, Clone)]
pub enum Value {
    /// An absent value; see [`Nil`].
    Nil,
    Bool(bool),
    Char(char),
    Number(Number),
    Str(String),
    /// An ordered sequence (`Vec`, slices, arrays, `VecDeque`).
    Seq(Vec<Value>),
    Tuple(Vec<Value>),
    /// Key/value entries; compared without regard to order.
    Map(Vec<(Value, Value)>),
    /// A nilable pointer: `Option`, `Box`, `Rc`, `Arc`.
    Ref(Option<Box<Value>>),
    /// A function pointer or boxed closure, identified by address.
    ///
    /// `addr` is `None` for a closure that captures nothing: every such
    /// closure shares one dangling address, so it has no identity and equals
    /// no callable, itself included.
    Callable { addr: Option<usize> },
    Time(DateTime<Utc>),
    Struct {
        name: String,
        fields: Vec<(String, Value)>,
    },
    /// A named type wrapping an underlying value (a newtype).
    Named { name: String, inner: Box<Value> },
    /// A value that can only be rendered, never taken apart.
    Opaque { type_name: String, repr: String },
}

impl Value {
    /// Wrap anything with a `Debug` representation.
    ///
    /// Two opaque values are equal when their type names and renderings match.
    pub fn opaque<T: fmt::Debug + ?Sized>(value: &T) -> Value {
        Value::Opaque {
            type_name: std::any::type_name::<T>().to_string(),
            repr: format!("{value:?}"),
        }
    }

    pub fn named(name: impl Into<String>, inner: Value) -> Value {
        Value::Named {
            name: name.into(),
            inner: Box::new(inner),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Char(c) => write!(f, "{c:?}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Seq(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_list(f, items)?;
                f.write_str(")")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Ref(None) => f.write_str("None"),
            Value::Ref(Some(inner)) => write!(f, "Some({inner})"),
            Value::Callable { addr: Some(addr) } => write!(f, "fn@{addr:#x}"),
            Value::Callable { addr: None } => f.write_str("fn"),
            Value::Time(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Struct { name, fields } if fields.is_empty() => f.write_str(name),
            Value::Struct { name, fields } => {
                write!(f, "{name} {{ ")?;
                for (i, (label, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{label}: {v}")?;
                }
                f.write_str(" }")
            }
            Value::Named { name, inner } => write!(f, "{name}({inner})"),
            Value::Opaque { repr, .. } => f.write_str(repr),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

// ============================================================================
// Inspect
// ============================================================================

/// Turns a Rust value into a [`Value`] and names its runtime type.
///
/// Implemented for the primitive, collection, pointer and time types of the
/// standard library and `chrono`. User types get it through
/// `#[derive(Inspect)]`.
pub trait Inspect {
    fn to_value(&self) -> Value;

    /// The type name used by sameness checks. Shared references forward to
    /// the referent, so `&5` and `5` share a runtime type.
    fn runtime_type(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// The absent value. `expect.that(Nil)` is the equivalent of asserting on null.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nil;

impl Inspect for Nil {
    fn to_value(&self) -> Value {
        Value::Nil
    }
}

impl Inspect for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl Inspect for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Inspect for char {
    fn to_value(&self) -> Value {
        Value::Char(*self)
    }
}

impl Inspect for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl Inspect for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl<T: Inspect + ?Sized> Inspect for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn runtime_type(&self) -> &'static str {
        (**self).runtime_type()
    }
}

impl<T: Inspect + ?Sized> Inspect for &mut T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn runtime_type(&self) -> &'static str {
        (**self).runtime_type()
    }
}

// ---- Sequences -------------------------------------------------------------

impl<T: Inspect> Inspect for [T] {
    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(Inspect::to_value).collect())
    }
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: Inspect> Inspect for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: Inspect> Inspect for VecDeque<T> {
    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(Inspect::to_value).collect())
    }
}

// ---- Maps and sets ---------------------------------------------------------

impl<K: Inspect, V: Inspect, S> Inspect for HashMap<K, V, S> {
    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect())
    }
}

impl<K: Inspect, V: Inspect> Inspect for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect())
    }
}

// Sets are maps from member to `true`.
impl<T: Inspect, S> Inspect for HashSet<T, S> {
    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|k| (k.to_value(), Value::Bool(true))).collect())
    }
}

impl<T: Inspect> Inspect for BTreeSet<T> {
    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|k| (k.to_value(), Value::Bool(true))).collect())
    }
}

// ---- Pointers --------------------------------------------------------------

impl<T: Inspect> Inspect for Option<T> {
    fn to_value(&self) -> Value {
        Value::Ref(self.as_ref().map(|v| Box::new(v.to_value())))
    }
}

impl<T: Inspect + ?Sized> Inspect for Box<T> {
    fn to_value(&self) -> Value {
        Value::Ref(Some(Box::new((**self).to_value())))
    }
}

impl<T: Inspect + ?Sized> Inspect for Rc<T> {
    fn to_value(&self) -> Value {
        Value::Ref(Some(Box::new((**self).to_value())))
    }
}

impl<T: Inspect + ?Sized> Inspect for Arc<T> {
    fn to_value(&self) -> Value {
        Value::Ref(Some(Box::new((**self).to_value())))
    }
}

// ---- Callables -------------------------------------------------------------

impl<'a> Inspect for dyn Fn() + 'a {
    fn to_value(&self) -> Value {
        if std::mem::size_of_val(self) == 0 {
            return Value::Callable { addr: None };
        }
        Value::Callable {
            addr: Some(self as *const Self as *const () as usize),
        }
    }
}

impl Inspect for fn() {
    fn to_value(&self) -> Value {
        Value::Callable {
            addr: Some(*self as usize),
        }
    }
}

// ---- Time ------------------------------------------------------------------

impl Inspect for DateTime<Utc> {
    fn to_value(&self) -> Value {
        Value::Time(*self)
    }
}

impl Inspect for SystemTime {
    fn to_value(&self) -> Value {
        Value::Time(DateTime::<Utc>::from(*self))
    }
}

// ---- Tuples ----------------------------------------------------------------

impl Inspect for () {
    fn to_value(&self) -> Value {
        Value::Tuple(Vec::new())
    }
}

macro_rules! tuples {
    ($(($($name:ident . $idx:tt),+))*) => {
        $(
            impl<$($name: Inspect),+> Inspect for ($($name,)+) {
                fn to_value(&self) -> Value {
                    Value::Tuple(vec![$(self.$idx.to_value()),+])
                }
            }
        )*
    };
}

tuples! {
    (A.0)
    (A.0, B.1)
    (A.0, B.1, C.2)
    (A.0, B.1, C.2, D.3)
    (A.0, B.1, C.2, D.3, E.4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cast_wraps_and_saturates() {
        assert_eq!(Number::I32(300).cast(NumberKind::U8), Number::U8(44));
        assert_eq!(Number::F64(5.9).cast(NumberKind::I32), Number::I32(5));
        assert_eq!(Number::F64(1e20).cast(NumberKind::I8), Number::I8(i8::MAX));
        assert_eq!(Number::U128(u128::MAX).cast(NumberKind::U128), Number::U128(u128::MAX));
        assert_eq!(Number::I8(-1).cast(NumberKind::F32), Number::F32(-1.0));
    }

    #[test]
    fn test_number_kind_matches_width() {
        assert_eq!(5u16.to_value().to_string(), "5");
        assert!(matches!(5u16.to_value(), Value::Number(n) if n.kind() == NumberKind::U16));
    }

    #[test]
    fn test_display() {
        assert_eq!(5.0f64.to_value().to_string(), "5.0");
        assert_eq!("hi".to_value().to_string(), "\"hi\"");
        assert_eq!(vec![1, 2].to_value().to_string(), "[1, 2]");
        assert_eq!(Some('x').to_value().to_string(), "Some('x')");
        assert_eq!(None::<i32>.to_value().to_string(), "None");
        assert_eq!((1, true).to_value().to_string(), "(1, true)");
        assert_eq!(Nil.to_value().to_string(), "nil");
        assert_eq!(Value::named("Meters", 3i32.to_value()).to_string(), "Meters(3)");
        let point = Value::Struct {
            name: "Point".into(),
            fields: vec![("x".into(), 1i32.to_value()), ("y".into(), 2i32.to_value())],
        };
        assert_eq!(point.to_string(), "Point { x: 1, y: 2 }");
    }

    #[test]
    fn test_references_are_transparent() {
        let n = 7i64;
        assert_eq!(<&i64 as Inspect>::runtime_type(&&n), "i64");
        assert!(matches!((&&n).to_value(), Value::Number(Number::I64(7))));
    }

    #[test]
    fn test_pointers_inspect_as_refs() {
        assert!(matches!(Box::new(1u8).to_value(), Value::Ref(Some(_))));
        assert!(matches!(None::<Vec<i32>>.to_value(), Value::Ref(None)));
        let f: Box<dyn Fn()> = Box::new(|| {});
        match f.to_value() {
            Value::Ref(Some(inner)) => assert!(matches!(*inner, Value::Callable { addr: None })),
            other => panic!("unexpected {other:?}"),
        }
        let n = 1u64;
        let g: Box<dyn Fn()> = Box::new(move || assert_eq!(n, 1));
        match g.to_value() {
            Value::Ref(Some(inner)) => assert!(matches!(*inner, Value::Callable { addr: Some(_) })),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_system_time_epoch() {
        match SystemTime::UNIX_EPOCH.to_value() {
            Value::Time(t) => assert_eq!(t.timestamp(), 0),
            other => panic!("unexpected {other:?}"),
        }
    }
}
