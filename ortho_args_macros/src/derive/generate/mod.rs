//! Code generation for the derive macros.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Expr, ExprLit, Lit, Type};

pub(crate) mod choice;
pub(crate) mod schema;

/// Converts an attribute expression into a runtime `Value`, checking it
/// against `ty` at compile time.
///
/// String literals go through `From<&str>` so that `default = "x"` works for
/// `String` and `PathBuf` fields alike.
pub(crate) fn typed_value(expr: &Expr, ty: &Type, krate: &TokenStream) -> TokenStream {
    if let Expr::Lit(ExprLit {
        lit: Lit::Str(_), ..
    }) = expr
    {
        return quote! {
            #krate::IntoValue::into_value(<#ty as ::core::convert::From<&str>>::from(#expr))
        };
    }
    quote! {
        {
            let value: #ty = #expr;
            #krate::IntoValue::into_value(value)
        }
    }
}
