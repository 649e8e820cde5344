//! Dynamic values exchanged between the parser and the instance constructor.
//!
//! Tokens read from the command line are coerced into [`Value`]s according to
//! a [`ScalarKind`]. The constructor later converts those values back into the
//! concrete Rust types declared on the record.

use std::{fmt, path::PathBuf};

use serde::{Serialize, Serializer};

use crate::record::Record;

/// Scalar kinds understood by the canonical text-to-value coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// UTF-8 text taken verbatim.
    String,
    /// Decimal integer constrained to a fixed width.
    Integer {
        /// Width of the target integer in bits.
        bits: u8,
        /// Whether negative values are admitted.
        signed: bool,
    },
    /// Floating point number.
    Float {
        /// Width of the target float in bits.
        bits: u8,
    },
    /// `true` or `false`.
    Bool,
    /// Exactly one Unicode scalar value.
    Char,
    /// Filesystem path taken verbatim.
    Path,
}

const fn signed_bounds(bits: u8) -> (i64, i64) {
    if bits == 0 || bits >= 64 {
        (i64::MIN, i64::MAX)
    } else {
        let half = 1_i64 << (bits - 1);
        (-half, half - 1)
    }
}

const fn unsigned_max(bits: u8) -> u64 {
    if bits == 0 || bits >= 64 {
        u64::MAX
    } else {
        (1_u64 << bits) - 1
    }
}

impl ScalarKind {
    /// Coerces a single command-line token into a [`Value`] of this kind.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the token cannot be represented
    /// by this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use ortho_args::{ScalarKind, Value};
    ///
    /// let kind = ScalarKind::Integer { bits: 8, signed: false };
    /// assert_eq!(kind.coerce("42"), Ok(Value::UInt(42)));
    /// assert!(kind.coerce("300").is_err());
    /// ```
    pub fn coerce(self, token: &str) -> Result<Value, String> {
        match self {
            Self::String => Ok(Value::Str(token.to_owned())),
            Self::Path => Ok(Value::Path(PathBuf::from(token))),
            Self::Bool => match token {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(format!("'{token}' is not 'true' or 'false'")),
            },
            Self::Char => {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Ok(Value::Char(ch)),
                    _ => Err(format!("'{token}' is not a single character")),
                }
            }
            Self::Integer { bits, signed: true } => {
                let parsed: i64 = token.parse().map_err(|err| format!("{err}"))?;
                let (min, max) = signed_bounds(bits);
                if parsed < min || parsed > max {
                    return Err(format!("{parsed} is not in {min}..={max}"));
                }
                Ok(Value::Int(parsed))
            }
            Self::Integer {
                bits,
                signed: false,
            } => {
                let parsed: u64 = token.parse().map_err(|err| format!("{err}"))?;
                let max = unsigned_max(bits);
                if parsed > max {
                    return Err(format!("{parsed} is not in 0..={max}"));
                }
                Ok(Value::UInt(parsed))
            }
            Self::Float { bits: 32 } => token
                .parse::<f32>()
                .map(|parsed| Value::Float(f64::from(parsed)))
                .map_err(|err| format!("{err}")),
            Self::Float { .. } => token
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|err| format!("{err}")),
        }
    }

    /// Returns `true` when `value` could have been produced by this kind.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (Self::String, Value::Str(_))
            | (Self::Path, Value::Path(_) | Value::Str(_))
            | (Self::Bool, Value::Bool(_))
            | (Self::Char, Value::Char(_))
            | (Self::Float { .. }, Value::Float(_)) => true,
            (Self::Integer { bits, signed: true }, Value::Int(v)) => {
                let (min, max) = signed_bounds(bits);
                *v >= min && *v <= max
            }
            (Self::Integer { bits, signed: true }, Value::UInt(v)) => {
                let (_, max) = signed_bounds(bits);
                u64::try_from(max).is_ok_and(|limit| *v <= limit)
            }
            (Self::Integer { bits, signed: false }, Value::UInt(v)) => *v <= unsigned_max(bits),
            (Self::Integer { bits, signed: false }, Value::Int(v)) => {
                u64::try_from(*v).is_ok_and(|unsigned| unsigned <= unsigned_max(bits))
            }
            _ => false,
        }
    }

    /// Returns `true` for integer and float kinds.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer { .. } | Self::Float { .. })
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Integer { bits, signed: true } => write!(f, "i{bits}"),
            Self::Integer {
                bits,
                signed: false,
            } => write!(f, "u{bits}"),
            Self::Float { bits } => write!(f, "f{bits}"),
            Self::Bool => f.write_str("bool"),
            Self::Char => f.write_str("char"),
            Self::Path => f.write_str("path"),
        }
    }
}

/// A parsed or defaulted field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent optional value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// Single character.
    Char(char),
    /// Text.
    Str(String),
    /// Filesystem path.
    Path(PathBuf),
    /// Ordered sequence produced by repeated options.
    List(Vec<Value>),
    /// Nested record produced by a sub-schema.
    Record(Record),
}

impl Value {
    /// Short name of the value's variant, used in mismatch reports.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "nothing",
            Self::Bool(_) => "bool",
            Self::Int(_) => "signed integer",
            Self::UInt(_) => "unsigned integer",
            Self::Float(_) => "float",
            Self::Char(_) => "char",
            Self::Str(_) => "string",
            Self::Path(_) => "path",
            Self::List(_) => "list",
            Self::Record(_) => "record",
        }
    }

    /// Describes the value for diagnostics, e.g. `string 'abc'`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Null | Self::List(_) | Self::Record(_) => self.kind_name().to_owned(),
            other => format!("{} '{other}'", other.kind_name()),
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("none"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
            Self::Path(v) => write!(f, "{}", v.display()),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Self::Record(record) => write!(f, "{record}"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::UInt(v) => serializer.serialize_u64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Char(v) => serializer.serialize_char(*v),
            Self::Str(v) => serializer.serialize_str(v),
            Self::Path(v) => serializer.serialize_str(&v.to_string_lossy()),
            Self::List(items) => serializer.collect_seq(items),
            Self::Record(record) => record.serialize(serializer),
        }
    }
}
