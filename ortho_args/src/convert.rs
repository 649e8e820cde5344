//! Conversions between Rust field types and the dynamic schema model.
//!
//! [`ArgType`] maps a Rust type to its structural [`TypeExpr`], while
//! [`IntoValue`] and [`FromValue`] move data in and out of [`Value`]. The
//! derive macros implement all three for records and choice enums; the
//! implementations below cover the primitive field types.

use std::path::PathBuf;

use crate::{ConstructError, ScalarKind, TypeExpr, Value};

/// Types that can appear as a field of an argument schema.
pub trait ArgType {
    /// Structural description of the type.
    fn type_expr() -> TypeExpr;
}

/// Conversion of a Rust value into a dynamic [`Value`].
pub trait IntoValue {
    /// Performs the conversion.
    fn into_value(self) -> Value;
}

/// Conversion of a dynamic [`Value`] back into a Rust value.
pub trait FromValue: Sized {
    /// Performs the conversion.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError::TypeMismatch`] when the value has the wrong
    /// shape or does not fit the target type.
    fn from_value(value: Value) -> Result<Self, ConstructError>;
}

macro_rules! integer_impls {
    ($($ty:ty => $bits:literal, $signed:literal);* $(;)?) => {$(
        impl ArgType for $ty {
            fn type_expr() -> TypeExpr {
                TypeExpr::Scalar(ScalarKind::Integer { bits: $bits, signed: $signed })
            }
        }

        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self, ConstructError> {
                let converted = match &value {
                    Value::Int(v) => <$ty>::try_from(*v).ok(),
                    Value::UInt(v) => <$ty>::try_from(*v).ok(),
                    _ => None,
                };
                converted.ok_or_else(|| ConstructError::mismatch(stringify!($ty), &value))
            }
        }
    )*};
}

integer_impls! {
    i8 => 8, true;
    i16 => 16, true;
    i32 => 32, true;
    i64 => 64, true;
    isize => 64, true;
    u8 => 8, false;
    u16 => 16, false;
    u32 => 32, false;
    u64 => 64, false;
    usize => 64, false;
}

macro_rules! signed_into_value {
    ($($ty:ty),*) => {$(
        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::Int(i64::from(self))
            }
        }
    )*};
}

macro_rules! unsigned_into_value {
    ($($ty:ty),*) => {$(
        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::UInt(u64::from(self))
            }
        }
    )*};
}

signed_into_value!(i8, i16, i32, i64);
unsigned_into_value!(u8, u16, u32, u64);

impl IntoValue for isize {
    fn into_value(self) -> Value {
        i64::try_from(self).map_or(Value::Null, Value::Int)
    }
}

impl IntoValue for usize {
    fn into_value(self) -> Value {
        u64::try_from(self).map_or(Value::Null, Value::UInt)
    }
}

impl ArgType for f64 {
    fn type_expr() -> TypeExpr {
        TypeExpr::Scalar(ScalarKind::Float { bits: 64 })
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ConstructError> {
        match value {
            Value::Float(v) => Ok(v),
            other => Err(ConstructError::mismatch("f64", &other)),
        }
    }
}

impl ArgType for f32 {
    fn type_expr() -> TypeExpr {
        TypeExpr::Scalar(ScalarKind::Float { bits: 32 })
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl FromValue for f32 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "f32 fields only ever receive values coerced from f32 tokens"
    )]
    fn from_value(value: Value) -> Result<Self, ConstructError> {
        match value {
            Value::Float(v) => Ok(v as Self),
            other => Err(ConstructError::mismatch("f32", &other)),
        }
    }
}

impl ArgType for bool {
    fn type_expr() -> TypeExpr {
        TypeExpr::Scalar(ScalarKind::Bool)
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ConstructError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(ConstructError::mismatch("bool", &other)),
        }
    }
}

impl ArgType for char {
    fn type_expr() -> TypeExpr {
        TypeExpr::Scalar(ScalarKind::Char)
    }
}

impl IntoValue for char {
    fn into_value(self) -> Value {
        Value::Char(self)
    }
}

impl FromValue for char {
    fn from_value(value: Value) -> Result<Self, ConstructError> {
        match value {
            Value::Char(v) => Ok(v),
            other => Err(ConstructError::mismatch("char", &other)),
        }
    }
}

impl ArgType for String {
    fn type_expr() -> TypeExpr {
        TypeExpr::Scalar(ScalarKind::String)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Str(self.to_owned())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ConstructError> {
        match value {
            Value::Str(v) => Ok(v),
            other => Err(ConstructError::mismatch("string", &other)),
        }
    }
}

impl ArgType for PathBuf {
    fn type_expr() -> TypeExpr {
        TypeExpr::Scalar(ScalarKind::Path)
    }
}

impl IntoValue for PathBuf {
    fn into_value(self) -> Value {
        Value::Path(self)
    }
}

impl FromValue for PathBuf {
    fn from_value(value: Value) -> Result<Self, ConstructError> {
        match value {
            Value::Path(v) => Ok(v),
            Value::Str(v) => Ok(Self::from(v)),
            other => Err(ConstructError::mismatch("path", &other)),
        }
    }
}

impl<T: ArgType> ArgType for Option<T> {
    fn type_expr() -> TypeExpr {
        TypeExpr::optional(T::type_expr())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ConstructError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: ArgType> ArgType for Vec<T> {
    fn type_expr() -> TypeExpr {
        TypeExpr::list(T::type_expr())
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ConstructError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ConstructError::mismatch("list", &other)),
        }
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn integers_round_trip_through_values() {
        assert_eq!(i32::from_value((-5_i32).into_value()), Ok(-5));
        assert_eq!(u16::from_value(7_u16.into_value()), Ok(7));
    }

    #[rstest]
    #[case::overflow(Value::UInt(300))]
    #[case::negative(Value::Int(-1))]
    #[case::wrong_shape(Value::Str("1".to_owned()))]
    fn u8_rejects_out_of_range(#[case] value: Value) {
        assert!(u8::from_value(value).is_err());
    }

    #[test]
    fn option_maps_null_to_none() {
        assert_eq!(Option::<String>::from_value(Value::Null), Ok(None));
        assert_eq!(
            Option::<String>::from_value(Value::Str("x".to_owned())),
            Ok(Some("x".to_owned()))
        );
    }

    #[test]
    fn vec_converts_each_item() {
        let value = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(Vec::<i64>::from_value(value), Ok(vec![1, 2]));
    }

    #[test]
    fn option_of_vec_describes_nested_type() {
        let expr = <Option<Vec<String>> as ArgType>::type_expr();
        assert_eq!(expr.to_string(), "Option<Vec<string>>");
    }
}
