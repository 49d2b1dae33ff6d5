//! Code generation. Turns the derive model into an `Inspect` impl.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::parse_quote;

use crate::ast::{Body, Field, Fields, Input, Variant};

// ============================================================================
// Public entry point
// ============================================================================

pub fn generate(input: &Input) -> TokenStream {
    let ident = &input.ident;
    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::placid::Inspect));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let name = ident.to_string();
    let body = match &input.body {
        Body::Struct(fields) => inspect_struct(&name, fields),
        Body::Enum(variants) => inspect_enum(&name, variants),
    };

    quote! {
        #[automatically_derived]
        impl #impl_generics ::placid::Inspect for #ident #ty_generics #where_clause {
            fn to_value(&self) -> ::placid::Value {
                #body
            }
        }
    }
}

// ============================================================================
// Structs
// ============================================================================

fn inspect_struct(name: &str, fields: &Fields) -> TokenStream {
    match fields {
        // A newtype is a named type over its single field.
        Fields::Tuple(list) if list.len() == 1 && !list[0].skip => {
            let member = &list[0].member;
            quote! {
                ::placid::Value::Named {
                    name: ::std::string::ToString::to_string(#name),
                    inner: ::std::boxed::Box::new(::placid::Inspect::to_value(&self.#member)),
                }
            }
        }
        _ => {
            let entries = fields.iter().filter(|f| !f.skip).map(|f| {
                let member = &f.member;
                entry(&f.label, quote!(&self.#member))
            });
            record(name, entries)
        }
    }
}

// ============================================================================
// Enums
// ============================================================================

fn inspect_enum(name: &str, variants: &[Variant]) -> TokenStream {
    if variants.is_empty() {
        return quote! { match *self {} };
    }

    let arms = variants.iter().map(|variant| {
        let ident = &variant.ident;
        let full_name = format!("{name}::{ident}");
        match &variant.fields {
            Fields::Unit => {
                let value = record(&full_name, std::iter::empty());
                quote! { Self::#ident => #value }
            }
            Fields::Named(list) => {
                let bound: Vec<&Field> = list.iter().filter(|f| !f.skip).collect();
                let members = bound.iter().map(|f| &f.member);
                let entries = bound.iter().map(|f| {
                    let member = &f.member;
                    entry(&f.label, quote!(#member))
                });
                let value = record(&full_name, entries);
                quote! { Self::#ident { #(#members,)* .. } => #value }
            }
            Fields::Tuple(list) => {
                let patterns = list.iter().enumerate().map(|(i, f)| {
                    if f.skip {
                        quote!(_)
                    } else {
                        let binding = format_ident!("__field{}", i);
                        quote!(#binding)
                    }
                });
                let entries = list.iter().enumerate().filter(|(_, f)| !f.skip).map(|(i, f)| {
                    let binding = format_ident!("__field{}", i);
                    entry(&f.label, quote!(#binding))
                });
                let value = record(&full_name, entries);
                quote! { Self::#ident(#(#patterns),*) => #value }
            }
        }
    });

    quote! {
        match self {
            #(#arms,)*
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// `(label, Inspect::to_value(expr))` where `expr` is a reference.
fn entry(label: &str, expr: TokenStream) -> TokenStream {
    quote! {
        (::std::string::ToString::to_string(#label), ::placid::Inspect::to_value(#expr))
    }
}

fn record(name: &str, entries: impl Iterator<Item = TokenStream>) -> TokenStream {
    quote! {
        ::placid::Value::Struct {
            name: ::std::string::ToString::to_string(#name),
            fields: ::std::vec![#(#entries),*],
        }
    }
}
