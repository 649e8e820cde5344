//! Type introspection helpers.
//!
//! These utilities perform shallow inspection of `syn::Type` values to
//! recognise the `Option<T>` and `Vec<T>` wrappers that change how a field's
//! attribute values are typed.

use syn::{GenericArgument, PathArguments, Type};

/// Extract the first type argument from a `PathArguments` container.
fn first_type_argument(args: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(angle_args) = args else {
        return None;
    };
    match angle_args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

/// Returns the generic parameter if `ty` is the provided wrapper.
///
/// Only the final path segment is compared, so `std::option::Option<T>` and
/// `Option<T>` match alike. The check is not recursive.
fn type_inner<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(p) = ty else {
        return None;
    };
    if p.qself.is_some() {
        return None;
    }
    let last = p.path.segments.last()?;
    if last.ident != wrapper {
        return None;
    }
    first_type_argument(&last.arguments)
}

/// Returns the inner type if `ty` is `Option<T>`.
pub(crate) fn option_inner(ty: &Type) -> Option<&Type> {
    type_inner(ty, "Option")
}

/// Extracts the element type `T` if `ty` is `Vec<T>`.
pub(crate) fn vec_inner(ty: &Type) -> Option<&Type> {
    type_inner(ty, "Vec")
}

/// Type a `default = ...` expression is checked against: `T` for
/// `Option<T>`, otherwise the field type itself.
pub(crate) fn default_type(ty: &Type) -> &Type {
    option_inner(ty).unwrap_or(ty)
}

/// Type each `choices(...)` entry is checked against: the field type with
/// any `Option` and `Vec` wrappers removed.
pub(crate) fn element_type(ty: &Type) -> &Type {
    let base = default_type(ty);
    vec_inner(base).unwrap_or(base)
}
