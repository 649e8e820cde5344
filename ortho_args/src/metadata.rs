//! Per-field declarative overrides attached when a schema is declared.

use std::fmt;

use crate::{ScalarKind, ValueBehavior, Value};

/// Signature of a custom token converter.
pub type ConvertFn = fn(&str) -> Result<Value, String>;

/// Turns a single token into a [`Value`].
#[derive(Clone, Copy)]
pub enum Converter {
    /// Canonical coercion for the scalar kind.
    Scalar(ScalarKind),
    /// Caller-supplied conversion.
    Custom(ConvertFn),
}

impl Converter {
    /// Converts `token`.
    ///
    /// # Errors
    ///
    /// Returns the reason the token was rejected.
    pub fn convert(&self, token: &str) -> Result<Value, String> {
        match self {
            Self::Scalar(kind) => kind.coerce(token),
            Self::Custom(convert) => convert(token),
        }
    }

    /// Describes the accepted input for diagnostics.
    #[must_use]
    pub fn expected(&self) -> String {
        match self {
            Self::Scalar(kind) => kind.to_string(),
            Self::Custom(_) => "a value accepted by the field's converter".to_owned(),
        }
    }

    /// Whether `value` is something this converter could have produced.
    ///
    /// Custom converters are opaque, so every value is accepted.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Scalar(kind) => kind.accepts(value),
            Self::Custom(_) => true,
        }
    }

    /// Whether tokens that look like negative numbers are values.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Scalar(kind) if kind.is_numeric())
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => f.debug_tuple("Scalar").field(kind).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Number of tokens a single occurrence of a list option consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nargs {
    /// Exactly `n` tokens.
    Exactly(usize),
    /// One or more tokens.
    AtLeastOne,
}

/// Escape hatch replacing the type-driven behaviour of a field.
#[derive(Debug, Clone)]
pub enum BehaviorOverride {
    /// Presence sets the field to `true`; absence yields `default`.
    Flag {
        /// Value used when the flag is absent.
        default: bool,
    },
    /// Each occurrence of the flag increments an integer.
    Count,
    /// Fully specified value behaviour, used verbatim.
    Value(ValueBehavior),
}

/// Declarative overrides for one field.
///
/// # Examples
///
/// ```
/// use ortho_args::FieldMetadata;
///
/// let metadata = FieldMetadata::default()
///     .with_cli_long("dry-run")
///     .with_cli_short('n')
///     .with_help("Print actions without running them");
/// assert_eq!(metadata.cli_long(), Some("dry-run"));
/// assert!(!metadata.is_excluded());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldMetadata {
    cli_long: Option<String>,
    cli_short: Option<char>,
    help: Option<String>,
    value_name: Option<String>,
    excluded: bool,
    positional: bool,
    nargs: Option<Nargs>,
    converter: Option<Converter>,
    choices: Option<Vec<Value>>,
    behavior: Option<BehaviorOverride>,
}

impl FieldMetadata {
    /// Overrides the derived long flag. On nested records this replaces the
    /// prefix segment contributed by the field.
    #[must_use]
    pub fn with_cli_long(mut self, long: impl Into<String>) -> Self {
        self.cli_long = Some(long.into());
        self
    }

    /// Adds a short flag.
    #[must_use]
    pub const fn with_cli_short(mut self, short: char) -> Self {
        self.cli_short = Some(short);
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the placeholder shown for the option's value.
    #[must_use]
    pub fn with_value_name(mut self, name: impl Into<String>) -> Self {
        self.value_name = Some(name.into());
        self
    }

    /// Keeps the field out of the parser; it is populated from its default.
    #[must_use]
    pub const fn excluded_from_cli(mut self) -> Self {
        self.excluded = true;
        self
    }

    /// Binds the field by position rather than by flag.
    #[must_use]
    pub const fn as_positional(mut self) -> Self {
        self.positional = true;
        self
    }

    /// Sets how many tokens one occurrence of a list option consumes.
    #[must_use]
    pub const fn with_nargs(mut self, nargs: Nargs) -> Self {
        self.nargs = Some(nargs);
        self
    }

    /// Replaces the canonical token coercion.
    #[must_use]
    pub const fn with_converter(mut self, converter: ConvertFn) -> Self {
        self.converter = Some(Converter::Custom(converter));
        self
    }

    /// Restricts a scalar field to the given options.
    #[must_use]
    pub fn with_choices(mut self, choices: impl IntoIterator<Item = Value>) -> Self {
        self.choices = Some(choices.into_iter().collect());
        self
    }

    /// Replaces the type-driven behaviour entirely.
    #[must_use]
    pub fn with_behavior(mut self, behavior: BehaviorOverride) -> Self {
        self.behavior = Some(behavior);
        self
    }

    /// Long flag override.
    #[must_use]
    pub fn cli_long(&self) -> Option<&str> {
        self.cli_long.as_deref()
    }

    /// Short flag.
    #[must_use]
    pub const fn cli_short(&self) -> Option<char> {
        self.cli_short
    }

    /// Help text.
    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Value placeholder override.
    #[must_use]
    pub fn value_name(&self) -> Option<&str> {
        self.value_name.as_deref()
    }

    /// Whether the field is kept out of the parser.
    #[must_use]
    pub const fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// Whether the field is positional.
    #[must_use]
    pub const fn is_positional(&self) -> bool {
        self.positional
    }

    /// Tokens per occurrence for list fields.
    #[must_use]
    pub const fn nargs(&self) -> Option<Nargs> {
        self.nargs
    }

    /// Custom converter.
    #[must_use]
    pub const fn converter(&self) -> Option<Converter> {
        self.converter
    }

    /// Explicit options for a scalar field.
    #[must_use]
    pub fn choices(&self) -> Option<&[Value]> {
        self.choices.as_deref()
    }

    /// Behaviour override.
    #[must_use]
    pub const fn behavior(&self) -> Option<&BehaviorOverride> {
        self.behavior.as_ref()
    }
}
