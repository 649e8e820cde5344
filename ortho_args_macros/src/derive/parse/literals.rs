//! Literal parsing helpers for `#[ortho_args(...)]` attributes.

use syn::meta::ParseNestedMeta;
use syn::{Lit, LitStr};

use super::Nargs;

/// Parses the literal after `key =` using `extractor`, reporting `expected`
/// when the literal has the wrong kind.
fn parse_lit<T, F>(meta: &ParseNestedMeta, key: &str, expected: &str, extractor: F) -> syn::Result<T>
where
    F: FnOnce(Lit) -> Option<T>,
{
    let literal = meta.value()?.parse::<Lit>()?;
    let span = literal.span();
    extractor(literal).ok_or_else(|| syn::Error::new(span, format!("{key} must be a {expected}")))
}

/// Parses a string literal from an attribute.
///
/// # Examples
///
/// ```rust,ignore
/// let attr: syn::Attribute = syn::parse_quote!(#[ortho_args(cli_long = "name")]);
/// attr.parse_nested_meta(|meta| {
///     assert_eq!(lit_str(&meta, "cli_long")?.value(), "name");
///     Ok(())
/// })?;
/// ```
pub(crate) fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    parse_lit(meta, key, "string", |lit| match lit {
        Lit::Str(s) => Some(s),
        _ => None,
    })
}

/// Parses a character literal from an attribute.
pub(crate) fn lit_char(meta: &ParseNestedMeta, key: &str) -> syn::Result<char> {
    parse_lit(meta, key, "character", |lit| match lit {
        Lit::Char(c) => Some(c.value()),
        _ => None,
    })
}

/// Parses a boolean that may be omitted: `key` alone means `true`.
pub(crate) fn lit_flag(meta: &ParseNestedMeta, key: &str) -> syn::Result<bool> {
    if !meta.input.peek(syn::Token![=]) {
        return Ok(true);
    }
    parse_lit(meta, key, "bool", |lit| match lit {
        Lit::Bool(b) => Some(b.value),
        _ => None,
    })
}

/// Parses a path written as a string literal, e.g. `crate = "my_alias"`.
pub(crate) fn lit_path(meta: &ParseNestedMeta, key: &str) -> syn::Result<syn::Path> {
    let s = lit_str(meta, key)?;
    s.parse::<syn::Path>()
        .map_err(|err| syn::Error::new(s.span(), format!("{key} must name a path: {err}")))
}

/// Parses the `nargs` value: a positive integer or the string `"+"`.
pub(crate) fn lit_nargs(meta: &ParseNestedMeta) -> syn::Result<Nargs> {
    let literal = meta.value()?.parse::<Lit>()?;
    match &literal {
        Lit::Int(n) => match n.base10_parse::<usize>()? {
            0 => Err(syn::Error::new(n.span(), "nargs must be at least 1")),
            count => Ok(Nargs::Exactly(count)),
        },
        Lit::Str(s) if s.value() == "+" => Ok(Nargs::AtLeastOne),
        other => Err(syn::Error::new(
            other.span(),
            "nargs must be a positive integer or \"+\"",
        )),
    }
}
