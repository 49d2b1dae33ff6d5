//! Derive input model: the parts of a `syn::DeriveInput` that codegen needs.

use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Generics, Ident, Index, Member, Result};

// ============================================================================
// AST types
// ============================================================================

/// A type deriving `Inspect`.
#[derive(Debug)]
pub struct Input {
    pub ident: Ident,
    pub generics: Generics,
    pub body: Body,
}

#[derive(Debug)]
pub enum Body {
    Struct(Fields),
    Enum(Vec<Variant>),
}

#[derive(Debug)]
pub struct Variant {
    pub ident: Ident,
    pub fields: Fields,
}

#[derive(Debug)]
pub enum Fields {
    Named(Vec<Field>),
    Tuple(Vec<Field>),
    Unit,
}

/// One field; `label` is the name shown in the inspected value.
#[derive(Debug)]
pub struct Field {
    pub member: Member,
    pub label: String,
    pub skip: bool,
}

impl Fields {
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        match self {
            Fields::Named(fields) | Fields::Tuple(fields) => fields.iter(),
            Fields::Unit => <&[Field]>::default().iter(),
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

impl Input {
    pub fn from_syn(input: &DeriveInput) -> Result<Self> {
        let body = match &input.data {
            Data::Struct(data) => Body::Struct(parse_fields(&data.fields)?),
            Data::Enum(data) => Body::Enum(
                data.variants
                    .iter()
                    .map(|variant| {
                        Ok(Variant {
                            ident: variant.ident.clone(),
                            fields: parse_fields(&variant.fields)?,
                        })
                    })
                    .collect::<Result<_>>()?,
            ),
            Data::Union(_) => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Inspect cannot be derived for unions",
                ))
            }
        };

        Ok(Input {
            ident: input.ident.clone(),
            generics: input.generics.clone(),
            body,
        })
    }
}

fn parse_fields(fields: &syn::Fields) -> Result<Fields> {
    match fields {
        syn::Fields::Named(named) => Ok(Fields::Named(
            named
                .named
                .iter()
                .map(|field| {
                    // Named fields always carry an ident.
                    let ident = field.ident.clone().ok_or_else(|| {
                        syn::Error::new_spanned(field, "expected a named field")
                    })?;
                    Ok(Field {
                        label: ident.unraw().to_string(),
                        member: Member::Named(ident),
                        skip: is_skipped(&field.attrs)?,
                    })
                })
                .collect::<Result<_>>()?,
        )),
        syn::Fields::Unnamed(unnamed) => Ok(Fields::Tuple(
            unnamed
                .unnamed
                .iter()
                .enumerate()
                .map(|(i, field)| {
                    Ok(Field {
                        label: i.to_string(),
                        member: Member::Unnamed(Index::from(i)),
                        skip: is_skipped(&field.attrs)?,
                    })
                })
                .collect::<Result<_>>()?,
        )),
        syn::Fields::Unit => Ok(Fields::Unit),
    }
}

/// Parse `#[inspect(skip)]`; any other `inspect` option is an error.
fn is_skipped(attrs: &[Attribute]) -> Result<bool> {
    let mut skip = false;
    for attr in attrs {
        if !attr.path().is_ident("inspect") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported inspect attribute, expected `skip`"))
            }
        })?;
    }
    Ok(skip)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(tokens: proc_macro2::TokenStream) -> Result<Input> {
        Input::from_syn(&syn::parse2(tokens)?)
    }

    #[test]
    fn test_parses_named_fields_with_skip() {
        let input = parse(quote::quote! {
            struct Account {
                owner: String,
                #[inspect(skip)]
                cache: u8,
                r#type: u8,
            }
        })
        .unwrap();
        let Body::Struct(Fields::Named(fields)) = input.body else {
            panic!("expected named fields");
        };
        let labels: Vec<_> = fields.iter().map(|f| (f.label.as_str(), f.skip)).collect();
        assert_eq!(labels, vec![("owner", false), ("cache", true), ("type", false)]);
    }

    #[test]
    fn test_parses_enum_variants() {
        let input = parse(quote::quote! {
            enum Shape { Circle(f64), Rect { w: f64, h: f64 }, Empty }
        })
        .unwrap();
        let Body::Enum(variants) = input.body else {
            panic!("expected enum");
        };
        assert_eq!(variants.len(), 3);
        assert!(matches!(variants[0].fields, Fields::Tuple(ref f) if f.len() == 1));
        assert!(matches!(variants[2].fields, Fields::Unit));
    }

    #[test]
    fn test_rejects_unions_and_unknown_options() {
        assert!(parse(quote::quote! { union U { a: u8 } }).is_err());
        let err = parse(quote::quote! {
            struct S { #[inspect(rename = "x")] a: u8 }
        })
        .unwrap_err();
        assert!(err.to_string().contains("expected `skip`"));
    }
}
