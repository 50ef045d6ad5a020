//! Derive macros for the Recast transcoding engine
//!
//! This crate provides the compile-time half of the field plan builder:
//! `#[derive(Record)]` inspects a struct definition once, classifies every
//! field's declared type into the engine's closed category enumeration, and
//! emits the static field table plus positional accessors the runtime
//! drivers operate on.
//!
//! # Example
//!
//! ```ignore
//! use recast_macros::Record;
//!
//! #[derive(Record, Default)]
//! struct Login {
//!     #[recast(query = "email", form = "email")]
//!     email: String,
//!
//!     #[recast(cookie = "token", cookie_path = "/", cookie_secure)]
//!     token: String,
//!
//!     #[recast(query = "tags")]
//!     tags: Vec<String>,
//! }
//! ```
//!
//! Field attribute keys are either a namespace name (`header`, `query`,
//! `cookie`, `form`, `path`, `multipart`) carrying the field's source key
//! for that namespace, or `<namespace>_<attribute>` carrying a secondary
//! attribute consulted only by attribute-aware sinks (e.g. `cookie_path`,
//! `cookie_secure`, `cookie_same_site`, `cookie_expires`). A bare
//! `<namespace>_<attribute>` key is shorthand for the value `"true"`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, GenericArgument, LitStr, PathArguments, Type};

const NAMESPACES: &[(&str, &str)] = &[
    ("header", "Header"),
    ("query", "Query"),
    ("cookie", "Cookie"),
    ("form", "Form"),
    ("path", "Path"),
    ("multipart", "Multipart"),
];

/// Derive macro implementing the `Record` trait.
///
/// Classifies every field's declared type: integers, unsigned integers,
/// floats, booleans and `String` map to the corresponding scalar category;
/// `FilePart` maps to the opaque passthrough category; `Vec<T>` maps to a
/// sequence of `T`'s category; any other type is classified as
/// string-parseable and the generated accessor calls its `FromStr`
/// implementation, so a field type without one fails to compile at the
/// derive use site. Fields without any `#[recast(...)]` key simply
/// participate in no namespace.
///
/// # Panics
///
/// This macro produces compile errors (not runtime panics) when applied to
/// enums, unions, tuple or unit structs, generic structs, or fields with
/// malformed `#[recast(...)]` attributes.
#[proc_macro_derive(Record, attributes(recast))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(error) => error.to_compile_error().into(),
    }
}

/// How a field's value moves between `Value` and the concrete field type.
enum Access {
    /// Built-in type: convert via the engine's `FromValue`/`IntoValue`.
    Native,
    /// Custom type: parse via `FromStr`, render via `Display`.
    Parse,
    /// Sequence of custom types.
    ParseList,
}

struct FieldModel {
    ident: syn::Ident,
    name: String,
    index: usize,
    category: TokenStream2,
    access: Access,
    keys: Vec<(TokenStream2, String)>,
    attributes: Vec<(TokenStream2, String, String)>,
}

fn expand(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[derive(Record)] does not support generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "#[derive(Record)] only supports structs with named fields",
                ))
            },
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "#[derive(Record)] only supports structs",
            ))
        },
    };

    let mut models = Vec::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let (category, access) = classify(&field.ty)?;
        let (keys, attributes) = field_tags(field)?;
        models.push(FieldModel {
            name: ident.to_string(),
            ident,
            index,
            category,
            access,
            keys,
            attributes,
        });
    }

    let spec_entries = models.iter().map(spec_entry);
    let write_arms = models.iter().map(write_arm);
    let read_arms = models.iter().map(read_arm);

    Ok(quote! {
        #[automatically_derived]
        impl ::recast_core::Record for #name {
            fn field_specs() -> &'static [::recast_core::FieldSpec] {
                static SPECS: &[::recast_core::FieldSpec] = &[
                    #(#spec_entries),*
                ];
                SPECS
            }

            fn write_field(
                &mut self,
                index: usize,
                value: ::recast_core::Value,
            ) -> ::core::result::Result<(), ::recast_core::ConvertError> {
                match index {
                    #(#write_arms)*
                    other => ::core::result::Result::Err(
                        ::recast_core::ConvertError::UnknownField(other),
                    ),
                }
            }

            fn read_field(&self, index: usize) -> ::core::option::Option<::recast_core::Value> {
                match index {
                    #(#read_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}

fn spec_entry(model: &FieldModel) -> TokenStream2 {
    let FieldModel {
        name,
        index,
        category,
        keys,
        attributes,
        ..
    } = model;
    let key_entries = keys.iter().map(|(namespace, key)| {
        quote! { (#namespace, #key) }
    });
    let attribute_entries = attributes.iter().map(|(namespace, attr, value)| {
        quote! { (#namespace, #attr, #value) }
    });
    quote! {
        ::recast_core::FieldSpec {
            name: #name,
            index: #index,
            category: #category,
            keys: &[#(#key_entries),*],
            attributes: &[#(#attribute_entries),*],
        }
    }
}

fn write_arm(model: &FieldModel) -> TokenStream2 {
    let FieldModel { ident, index, .. } = model;
    match &model.access {
        Access::Native => quote! {
            #index => {
                self.#ident = ::recast_core::FromValue::from_value(value)?;
                ::core::result::Result::Ok(())
            },
        },
        Access::Parse => quote! {
            #index => {
                let text = value.into_text()?;
                self.#ident = text
                    .parse()
                    .map_err(::recast_core::ConvertError::parse_failure)?;
                ::core::result::Result::Ok(())
            },
        },
        Access::ParseList => quote! {
            #index => {
                let items = value.into_list()?;
                let mut parsed = ::std::vec::Vec::with_capacity(items.len());
                for item in items {
                    let text = item.into_text()?;
                    parsed.push(
                        text.parse()
                            .map_err(::recast_core::ConvertError::parse_failure)?,
                    );
                }
                self.#ident = parsed;
                ::core::result::Result::Ok(())
            },
        },
    }
}

fn read_arm(model: &FieldModel) -> TokenStream2 {
    let FieldModel { ident, index, .. } = model;
    match &model.access {
        Access::Native => quote! {
            #index => ::core::option::Option::Some(
                ::recast_core::IntoValue::into_value(self.#ident.clone()),
            ),
        },
        Access::Parse => quote! {
            #index => ::core::option::Option::Some(::recast_core::Value::Str(
                ::std::string::ToString::to_string(&self.#ident),
            )),
        },
        Access::ParseList => quote! {
            #index => ::core::option::Option::Some(::recast_core::Value::List(
                self.#ident
                    .iter()
                    .map(|item| ::recast_core::Value::Str(
                        ::std::string::ToString::to_string(item),
                    ))
                    .collect(),
            )),
        },
    }
}

/// Determine a field type's category tokens and accessor strategy.
fn classify(ty: &Type) -> Result<(TokenStream2, Access), syn::Error> {
    let Some(ident) = type_ident_name(ty) else {
        return Err(syn::Error::new_spanned(
            ty,
            "unsupported field type for #[derive(Record)]",
        ));
    };

    if let Some(scalar) = scalar_category(&ident) {
        let category = quote! { ::recast_core::TypeCategory::#scalar };
        return Ok((category, Access::Native));
    }

    match ident.as_str() {
        "String" => Ok((quote! { ::recast_core::TypeCategory::Str }, Access::Native)),
        "FilePart" => Ok((quote! { ::recast_core::TypeCategory::Blob }, Access::Native)),
        "Vec" => classify_sequence(ty),
        // Anything else participates through its own FromStr.
        _ => Ok((quote! { ::recast_core::TypeCategory::Parse }, Access::Parse)),
    }
}

fn classify_sequence(ty: &Type) -> Result<(TokenStream2, Access), syn::Error> {
    let element = sequence_element(ty).ok_or_else(|| {
        syn::Error::new_spanned(ty, "expected a single type parameter on Vec")
    })?;
    let Some(ident) = type_ident_name(element) else {
        return Err(syn::Error::new_spanned(
            element,
            "unsupported sequence element type for #[derive(Record)]",
        ));
    };

    if let Some(scalar) = scalar_category(&ident) {
        let category = quote! {
            ::recast_core::TypeCategory::List(::recast_core::ElementCategory::#scalar)
        };
        return Ok((category, Access::Native));
    }

    match ident.as_str() {
        "String" => Ok((
            quote! { ::recast_core::TypeCategory::List(::recast_core::ElementCategory::Str) },
            Access::Native,
        )),
        "Vec" => Err(syn::Error::new_spanned(
            element,
            "nested sequences are not transcodable",
        )),
        "FilePart" => Err(syn::Error::new_spanned(
            element,
            "sequences of file parts are not transcodable",
        )),
        _ => Ok((
            quote! { ::recast_core::TypeCategory::List(::recast_core::ElementCategory::Parse) },
            Access::ParseList,
        )),
    }
}

/// The scalar category variant name for a primitive type ident, shared by
/// `TypeCategory` and `ElementCategory`.
fn scalar_category(ident: &str) -> Option<syn::Ident> {
    let variant = match ident {
        "i8" | "i16" | "i32" | "i64" | "isize" => "Int",
        "u8" | "u16" | "u32" | "u64" | "usize" => "UInt",
        "f32" | "f64" => "Float",
        "bool" => "Bool",
        _ => return None,
    };
    Some(syn::Ident::new(variant, proc_macro2::Span::call_site()))
}

/// Extract the last path segment ident name from a type (e.g. `u64`,
/// `String`, `Vec`).
fn type_ident_name(ty: &Type) -> Option<String> {
    if let Type::Path(type_path) = ty {
        type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
    } else {
        None
    }
}

/// The element type of a `Vec<T>` field.
fn sequence_element(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return None;
    };
    if arguments.args.len() != 1 {
        return None;
    }
    match arguments.args.first()? {
        GenericArgument::Type(element) => Some(element),
        _ => None,
    }
}

/// Parse a field's `#[recast(...)]` attributes into namespace keys and
/// secondary attributes.
#[allow(clippy::type_complexity)]
fn field_tags(
    field: &syn::Field,
) -> Result<(Vec<(TokenStream2, String)>, Vec<(TokenStream2, String, String)>), syn::Error> {
    let mut keys: Vec<(TokenStream2, String)> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    let mut attributes = Vec::new();

    for attr in &field.attrs {
        if !attr.path().is_ident("recast") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let Some(ident) = meta.path.get_ident() else {
                return Err(meta.error("expected a namespace or attribute key"));
            };
            let key_name = ident.to_string();

            if let Some(namespace) = namespace_tokens(&key_name) {
                let value: LitStr = meta.value()?.parse()?;
                if seen.contains(&key_name) {
                    return Err(meta.error(format!("duplicate {key_name:?} key")));
                }
                seen.push(key_name);
                keys.push((namespace, value.value()));
                return Ok(());
            }

            if let Some((namespace, attribute)) = attribute_tokens(&key_name) {
                let value = if meta.input.peek(syn::Token![=]) {
                    let literal: LitStr = meta.value()?.parse()?;
                    literal.value()
                } else {
                    // Bare attribute keys are boolean flags.
                    "true".to_string()
                };
                attributes.push((namespace, attribute, value));
                return Ok(());
            }

            Err(meta.error(format!(
                "unknown recast key {key_name:?} (expected a namespace or <namespace>_<attribute>)"
            )))
        })?;
    }

    Ok((keys, attributes))
}

fn namespace_tokens(name: &str) -> Option<TokenStream2> {
    NAMESPACES.iter().find(|(tag, _)| *tag == name).map(|(_, variant)| {
        let variant = syn::Ident::new(variant, proc_macro2::Span::call_site());
        quote! { ::recast_core::Namespace::#variant }
    })
}

fn attribute_tokens(name: &str) -> Option<(TokenStream2, String)> {
    NAMESPACES.iter().find_map(|(tag, variant)| {
        let rest = name.strip_prefix(tag)?.strip_prefix('_')?;
        if rest.is_empty() {
            return None;
        }
        let variant = syn::Ident::new(variant, proc_macro2::Span::call_site());
        Some((quote! { ::recast_core::Namespace::#variant }, rest.to_string()))
    })
}
