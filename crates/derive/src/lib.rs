//! `#[derive(Schema)]` for strata-config.
//!
//! Responsibilities:
//! - Read `#[config(...)]` field attributes and emit a static `FieldSpec`
//!   table plus typed field accessors.
//! - Reject malformed paths and unsupported inputs at compile time.
//!
//! Does NOT handle:
//! - Any runtime behavior; binding and sanitizing live in `strata-config`.
//!
//! Invariants:
//! - Descriptor order is field declaration order; untagged fields are skipped.
//! - Accessor `i` always matches descriptor entry `i`.
//! - Generated code only names `::strata_config` paths.

#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{
    Data, DeriveInput, Fields, GenericArgument, Ident, LitBool, LitStr, PathArguments, Type,
    parse_macro_input,
};

/// Derive `strata_config::Schema` for a struct with named fields.
///
/// Field attributes:
///
/// - `#[config(path = "db.host")]`: bind this field from `db.host`.
/// - `required` / `required = true`: binding fails when the path is absent.
/// - `secret` / `secret = true`: redacted output shows `***`.
/// - `nested`: the field is itself a `Schema` (or `Option` of one).
///
/// Fields without `#[config(...)]` are ignored.
#[proc_macro_derive(Schema, attributes(config))]
pub fn derive_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// One tagged field.
struct FieldAttr {
    ident: Ident,
    ty: Type,
    path: LitStr,
    required: bool,
    secret: bool,
    nested: bool,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[derive(Schema)] does not support generic structs",
        ));
    }
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "#[derive(Schema)] requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "#[derive(Schema)] can only be used on structs",
            ));
        }
    };

    let mut tagged = Vec::new();
    for field in fields {
        if let Some(attr) = parse_field(field)? {
            tagged.push(attr);
        }
    }

    let count = tagged.len();
    let specs = tagged.iter().map(field_spec);
    let readers = tagged.iter().enumerate().map(|(index, attr)| {
        let ident = &attr.ident;
        let access = if !attr.nested {
            quote! { ::strata_config::FieldRef::Leaf(&self.#ident) }
        } else if option_inner(&attr.ty).is_some() {
            quote! {
                ::strata_config::FieldRef::OptionalRecord(
                    ::strata_config::schema::OptionalRecord::record(&self.#ident)
                )
            }
        } else {
            quote! { ::strata_config::FieldRef::Record(&self.#ident) }
        };
        quote! { #index => ::core::option::Option::Some(#access), }
    });
    let writers = tagged.iter().enumerate().map(|(index, attr)| {
        let ident = &attr.ident;
        let access = if !attr.nested {
            quote! { ::strata_config::FieldMut::Leaf(&mut self.#ident) }
        } else if option_inner(&attr.ty).is_some() {
            quote! { ::strata_config::FieldMut::OptionalRecord(&mut self.#ident) }
        } else {
            quote! { ::strata_config::FieldMut::Record(&mut self.#ident) }
        };
        quote! { #index => ::core::option::Option::Some(#access), }
    });
    let type_name = LitStr::new(&name.to_string(), Span::call_site());

    Ok(quote! {
        impl ::strata_config::Schema for #name {
            fn fields() -> &'static [::strata_config::FieldSpec] {
                static FIELDS: [::strata_config::FieldSpec; #count] = [#(#specs),*];
                &FIELDS
            }

            fn descriptor(&self) -> &'static [::strata_config::FieldSpec] {
                <Self as ::strata_config::Schema>::fields()
            }

            #[allow(clippy::match_single_binding)]
            fn field(&self, index: usize) -> ::core::option::Option<::strata_config::FieldRef<'_>> {
                match index {
                    #(#readers)*
                    _ => ::core::option::Option::None,
                }
            }

            #[allow(clippy::match_single_binding)]
            fn field_mut(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<::strata_config::FieldMut<'_>> {
                match index {
                    #(#writers)*
                    _ => ::core::option::Option::None,
                }
            }

            fn type_name(&self) -> &'static str {
                #type_name
            }
        }
    })
}

fn field_spec(attr: &FieldAttr) -> TokenStream2 {
    let name = LitStr::new(&attr.ident.to_string(), attr.ident.span());
    let path = &attr.path;
    let required = attr.required;
    let secret = attr.secret;
    let ty = &attr.ty;
    let kind = if !attr.nested {
        quote! { ::strata_config::FieldKind::scalar::<#ty>() }
    } else if option_inner(ty).is_some() {
        quote! { ::strata_config::FieldKind::OptionalRecord }
    } else {
        quote! { ::strata_config::FieldKind::Record }
    };
    quote! {
        ::strata_config::FieldSpec::new(#name, #path, #kind)
            .required(#required)
            .secret(#secret)
    }
}

fn parse_field(field: &syn::Field) -> syn::Result<Option<FieldAttr>> {
    let mut found = None;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("config")) {
        if found.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "duplicate #[config(...)] attribute",
            ));
        }

        let mut path: Option<LitStr> = None;
        let mut required = false;
        let mut secret = false;
        let mut nested = false;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("path") {
                let lit: LitStr = meta.value()?.parse()?;
                validate_path(&lit)?;
                path = Some(lit);
            } else if meta.path.is_ident("required") {
                required = flag_value(&meta)?;
            } else if meta.path.is_ident("secret") {
                secret = flag_value(&meta)?;
            } else if meta.path.is_ident("nested") {
                nested = flag_value(&meta)?;
            } else {
                return Err(meta.error("expected one of `path`, `required`, `secret`, `nested`"));
            }
            Ok(())
        })?;

        let Some(path) = path else {
            return Err(syn::Error::new_spanned(
                attr,
                "#[config(...)] requires `path = \"...\"`",
            ));
        };
        let Some(ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        found = Some(FieldAttr {
            ident,
            ty: field.ty.clone(),
            path,
            required,
            secret,
            nested,
        });
    }
    Ok(found)
}

/// `flag` or `flag = true|false`.
fn flag_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<bool> {
    if meta.input.peek(syn::Token![=]) {
        let lit: LitBool = meta.value()?.parse()?;
        Ok(lit.value)
    } else {
        Ok(true)
    }
}

fn validate_path(lit: &LitStr) -> syn::Result<()> {
    let path = lit.value();
    if path.is_empty() {
        return Err(syn::Error::new_spanned(lit, "config path must not be empty"));
    }
    if path.split('.').any(str::is_empty) {
        return Err(syn::Error::new_spanned(
            lit,
            "config path must not contain empty segments",
        ));
    }
    if path.chars().any(char::is_uppercase) {
        return Err(syn::Error::new_spanned(lit, "config path must be lowercase"));
    }
    Ok(())
}

/// The `T` of `Option<T>`, matched syntactically.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}
