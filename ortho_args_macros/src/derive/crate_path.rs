//! Path through which generated code reaches the runtime crate.
//!
//! Expansions name runtime items as `ortho_args::Schema` and so on. A caller
//! that imports the runtime under another name (`use ortho_args as
//! cli_schema;`) or through a re-export passes that path with
//! `#[ortho_args(crate = "cli_schema")]` on the struct or enum.

use proc_macro2::TokenStream;
use quote::quote;

/// Prefix for runtime paths: the `crate = "..."` override or `ortho_args`.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ortho_args }, |path| quote! { #path })
}
