//! Procedural macros for `ortho_args`.
//!
//! `#[derive(ArgSchema)]` turns a struct with named fields into an argument
//! schema: each field becomes a [`FieldDescriptor`] carrying its type,
//! default and `#[ortho_args(...)]` metadata, and the generated
//! `ArgSchema` implementation converts parsed records back into the struct.
//! `#[derive(ArgChoice)]` maps a fieldless enum onto a closed set of
//! kebab-case tokens.
//!
//! [`FieldDescriptor`]: https://docs.rs/ortho_args/latest/ortho_args/struct.FieldDescriptor.html

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derives `ortho_args::ArgSchema` for a struct with named fields.
///
/// Struct attributes: `name`, `about`, `separator`, `post_parse_hook` and
/// `crate`. Field attributes: `cli_long`, `cli_short`, `help`, `value_name`,
/// `skip_cli`, `positional`, `nargs`, `parse_with`, `choices(...)`, `count`,
/// `default [= expr]` and `default_factory`.
#[proc_macro_derive(ArgSchema, attributes(ortho_args))]
pub fn derive_arg_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::arg_schema(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derives the conversion traits that let a fieldless enum act as a choice.
///
/// Variants map to their kebab-case names unless renamed with
/// `#[ortho_args(rename = "...")]`.
#[proc_macro_derive(ArgChoice, attributes(ortho_args))]
pub fn derive_arg_choice(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::arg_choice(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
