//! Conversion trait generation for choice enums.

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive::parse::ChoiceInput;

/// Generates `ArgType`, `FromValue` and `IntoValue` for a fieldless enum.
pub(crate) fn choice_impls(choice: &ChoiceInput, krate: &TokenStream) -> TokenStream {
    let ident = &choice.ident;
    let idents: Vec<_> = choice.variants.iter().map(|variant| &variant.ident).collect();
    let tokens: Vec<&str> = choice
        .variants
        .iter()
        .map(|variant| variant.token.as_str())
        .collect();
    let expected = format!("one of {}", tokens.join(", "));

    quote! {
        impl #krate::ArgType for #ident {
            fn type_expr() -> #krate::TypeExpr {
                #krate::TypeExpr::Choice(#krate::ChoiceSet::strings([ #( #tokens ),* ]))
            }
        }

        impl #krate::IntoValue for #ident {
            fn into_value(self) -> #krate::Value {
                let token = match self {
                    #( Self::#idents => #tokens, )*
                };
                #krate::Value::Str(::std::string::String::from(token))
            }
        }

        impl #krate::FromValue for #ident {
            fn from_value(
                value: #krate::Value,
            ) -> ::core::result::Result<Self, #krate::ConstructError> {
                let matched = match &value {
                    #krate::Value::Str(text) => match text.as_str() {
                        #( #tokens => ::core::option::Option::Some(Self::#idents), )*
                        _ => ::core::option::Option::None,
                    },
                    _ => ::core::option::Option::None,
                };
                matched.ok_or_else(|| #krate::ConstructError::mismatch(#expected, &value))
            }
        }
    }
}
