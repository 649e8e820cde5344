//! Entry points shared by the derive macros.
//!
//! Input is parsed and validated in full before any tokens are generated, so
//! a malformed declaration fails with a spanned error rather than partially
//! expanded code.

use proc_macro2::TokenStream;
use syn::DeriveInput;

mod crate_path;
mod generate;
mod parse;

/// Expands `#[derive(ArgSchema)]`.
pub(crate) fn arg_schema(input: &DeriveInput) -> syn::Result<TokenStream> {
    let record = parse::parse_record(input)?;
    let krate = crate_path::resolve(record.attrs.crate_path.as_ref());
    Ok(generate::schema::record_impls(&record, &krate))
}

/// Expands `#[derive(ArgChoice)]`.
pub(crate) fn arg_choice(input: &DeriveInput) -> syn::Result<TokenStream> {
    let choice = parse::parse_choice(input)?;
    let krate = crate_path::resolve(choice.crate_path.as_ref());
    Ok(generate::choice::choice_impls(&choice, &krate))
}
