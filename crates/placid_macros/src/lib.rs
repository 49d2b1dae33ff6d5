//! Derive macros for the `placid` assertion library.

mod ast;
mod codegen;

/// Derive `placid::Inspect`, mapping a type onto `placid::Value`.
///
/// # Shapes
///
/// - named-field struct → `Value::Struct { name, fields }`
/// - single-field tuple struct → `Value::Named { name, inner }`, so a newtype
///   compares equal to its underlying value
/// - tuple struct with several fields → `Value::Struct` with fields `"0"`, `"1"`, ...
/// - unit struct → `Value::Struct` without fields
/// - enum variant → `Value::Struct` named `"Enum::Variant"`
///
/// Generic type parameters get an `Inspect` bound.
///
/// # Attributes
///
/// - `#[inspect(skip)]` on a field leaves it out of the inspected value
///
/// # Example
///
/// ```text
/// #[derive(Inspect)]
/// struct Account {
///     owner: String,
///     balance: i64,
///     #[inspect(skip)]
///     cache: RefCell<Option<Report>>,
/// }
/// ```
#[proc_macro_derive(Inspect, attributes(inspect))]
pub fn derive_inspect(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    match ast::Input::from_syn(&input) {
        Ok(input) => codegen::generate(&input).into(),
        Err(err) => err.to_compile_error().into(),
    }
}
