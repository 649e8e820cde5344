//! `ArgSchema` implementation generation.
//!
//! The schema is declared inside a `OnceLock`, so it is built at most once
//! per type. Nested record fields only store a `SchemaRef`, which keeps
//! mutually referring records from initializing each other recursively.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;

use super::typed_value;
use crate::derive::parse::{
    DefaultAttr, FieldAttrs, Nargs, RecordField, RecordInput, StructAttrs, default_type,
    element_type,
};

/// Generates `ArgSchema`, `ArgType`, `FromValue` and `IntoValue` for a record.
pub(crate) fn record_impls(record: &RecordInput, krate: &TokenStream) -> TokenStream {
    let ident = &record.ident;
    let schema_name = ident.unraw().to_string();
    let about = record.attrs.about.as_ref().map(|about| quote! { .about(#about) });
    let descriptors = record
        .fields
        .iter()
        .map(|field| field_descriptor(field, krate));
    let from_record = from_record(record, krate);
    let into_value = into_value(record, &schema_name, krate);
    let build_options = build_options(&record.attrs, krate);
    let after_parse = record.attrs.post_parse_hook.then(|| {
        quote! {
            fn after_parse(
                &mut self,
                ctx: &#krate::PostParseContext,
            ) -> #krate::ArgsResult<()> {
                <Self as #krate::PostParseHook>::post_parse(self, ctx)
            }
        }
    });
    let expected = format!("{schema_name} record");

    quote! {
        impl #krate::ArgSchema for #ident {
            fn schema() -> ::core::result::Result<&'static #krate::Schema, #krate::SchemaError> {
                static SCHEMA: ::std::sync::OnceLock<
                    ::core::result::Result<#krate::Schema, #krate::SchemaError>,
                > = ::std::sync::OnceLock::new();
                SCHEMA
                    .get_or_init(|| {
                        #krate::Schema::builder(#schema_name)
                            #about
                            #( .field(#descriptors) )*
                            .build()
                    })
                    .as_ref()
                    .map_err(::core::clone::Clone::clone)
            }

            #from_record
            #build_options
            #after_parse
        }

        impl #krate::ArgType for #ident {
            fn type_expr() -> #krate::TypeExpr {
                #krate::TypeExpr::Nested(#krate::SchemaRef::of::<Self>())
            }
        }

        impl #krate::FromValue for #ident {
            fn from_value(
                value: #krate::Value,
            ) -> ::core::result::Result<Self, #krate::ConstructError> {
                match value {
                    #krate::Value::Record(record) => {
                        <Self as #krate::ArgSchema>::from_record(record)
                    }
                    other => ::core::result::Result::Err(
                        #krate::ConstructError::mismatch(#expected, &other),
                    ),
                }
            }
        }

        impl #krate::IntoValue for #ident {
            #into_value
        }
    }
}

fn from_record(record: &RecordInput, krate: &TokenStream) -> TokenStream {
    if record.fields.is_empty() {
        return quote! {
            fn from_record(
                record: #krate::Record,
            ) -> ::core::result::Result<Self, #krate::ConstructError> {
                let _ = record;
                ::core::result::Result::Ok(Self {})
            }
        };
    }
    let takes = record.fields.iter().map(|field| {
        let RecordField { ident, name, .. } = field;
        quote! { #ident: record.take(#name)? }
    });
    quote! {
        fn from_record(
            mut record: #krate::Record,
        ) -> ::core::result::Result<Self, #krate::ConstructError> {
            ::core::result::Result::Ok(Self { #( #takes, )* })
        }
    }
}

fn into_value(record: &RecordInput, schema_name: &str, krate: &TokenStream) -> TokenStream {
    if record.fields.is_empty() {
        return quote! {
            fn into_value(self) -> #krate::Value {
                let _ = self;
                #krate::Value::Record(#krate::Record::new(#schema_name))
            }
        };
    }
    let inserts = record.fields.iter().map(|field| {
        let RecordField { ident, name, .. } = field;
        quote! { record.insert(#name, #krate::IntoValue::into_value(self.#ident)); }
    });
    quote! {
        fn into_value(self) -> #krate::Value {
            let mut record = #krate::Record::new(#schema_name);
            #( #inserts )*
            #krate::Value::Record(record)
        }
    }
}

fn build_options(attrs: &StructAttrs, krate: &TokenStream) -> Option<TokenStream> {
    if attrs.name.is_none() && attrs.separator.is_none() {
        return None;
    }
    let name = attrs
        .name
        .as_ref()
        .map(|name| quote! { .with_program_name(#name) });
    let separator = attrs
        .separator
        .as_ref()
        .map(|separator| quote! { .with_separator(#separator) });
    Some(quote! {
        fn build_options() -> #krate::BuildOptions {
            #krate::BuildOptions::default() #name #separator
        }
    })
}

/// Builds the `FieldDescriptor` expression for one field.
pub(crate) fn field_descriptor(field: &RecordField, krate: &TokenStream) -> TokenStream {
    let RecordField { name, ty, attrs, .. } = field;
    let metadata = metadata_calls(attrs, ty, krate);
    let default = attrs.default.as_ref().map(|default| {
        let value = match default {
            DefaultAttr::Trait => quote! {
                #krate::IntoValue::into_value(<#ty as ::core::default::Default>::default())
            },
            DefaultAttr::Expr(expr) => typed_value(expr, default_type(ty), krate),
            DefaultAttr::Factory(factory) => quote! {
                #krate::DefaultValue::Factory(|| #krate::IntoValue::into_value(#factory()))
            },
        };
        quote! { .with_default(#value) }
    });
    quote! {
        #krate::FieldDescriptor::new(#name, <#ty as #krate::ArgType>::type_expr())
            .with_metadata(#krate::FieldMetadata::default() #( #metadata )*)
            #default
    }
}

fn metadata_calls(attrs: &FieldAttrs, ty: &syn::Type, krate: &TokenStream) -> Vec<TokenStream> {
    let mut calls = Vec::new();
    if let Some(long) = &attrs.cli_long {
        calls.push(quote! { .with_cli_long(#long) });
    }
    if let Some(short) = attrs.cli_short {
        calls.push(quote! { .with_cli_short(#short) });
    }
    if let Some(help) = &attrs.help {
        calls.push(quote! { .with_help(#help) });
    }
    if let Some(value_name) = &attrs.value_name {
        calls.push(quote! { .with_value_name(#value_name) });
    }
    if attrs.skip_cli {
        calls.push(quote! { .excluded_from_cli() });
    }
    if attrs.positional {
        calls.push(quote! { .as_positional() });
    }
    match attrs.nargs {
        Some(Nargs::Exactly(count)) => {
            calls.push(quote! { .with_nargs(#krate::Nargs::Exactly(#count)) });
        }
        Some(Nargs::AtLeastOne) => calls.push(quote! { .with_nargs(#krate::Nargs::AtLeastOne) }),
        None => {}
    }
    if let Some(convert) = &attrs.parse_with {
        calls.push(quote! {
            .with_converter(|token: &str| {
                #convert(token)
                    .map(#krate::IntoValue::into_value)
                    .map_err(|err| ::std::string::ToString::to_string(&err))
            })
        });
    }
    if let Some(choices) = &attrs.choices {
        let element = element_type(ty);
        let values = choices
            .iter()
            .map(|choice| typed_value(choice, element, krate));
        calls.push(quote! { .with_choices([ #( #values ),* ]) });
    }
    if attrs.count {
        calls.push(quote! { .with_behavior(#krate::BehaviorOverride::Count) });
    }
    calls
}
