//! Schema model: record declarations as ordered field descriptors.
//!
//! A [`Schema`] is the explicit, build-once description of a record type. It
//! is normally produced by `#[derive(ArgSchema)]`, but can be written by hand
//! through [`Schema::builder`]. Nested records are referenced lazily through
//! [`SchemaRef`] so that record graphs may be declared in any order.

mod builder;
mod reference;
#[cfg(test)]
mod tests;

use std::fmt;

pub use builder::SchemaBuilder;
pub use reference::{ResolveFn, SchemaRef};

use crate::{FieldMetadata, ScalarKind, Value};

/// Structural description of a field's declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// A single scalar value.
    Scalar(ScalarKind),
    /// A value that may be absent.
    Optional(Box<TypeExpr>),
    /// An ordered sequence of values.
    List(Box<TypeExpr>),
    /// A scalar restricted to an enumerated set.
    Choice(ChoiceSet),
    /// A nested record.
    Nested(SchemaRef),
}

impl TypeExpr {
    /// Wraps `inner` as optional.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Wraps `inner` as a list.
    #[must_use]
    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    /// Shorthand for `Scalar(ScalarKind::String)`.
    #[must_use]
    pub const fn string() -> Self {
        Self::Scalar(ScalarKind::String)
    }

    /// Shorthand for `Scalar(ScalarKind::Bool)`.
    #[must_use]
    pub const fn bool() -> Self {
        Self::Scalar(ScalarKind::Bool)
    }

    /// Shorthand for a signed 64-bit integer scalar.
    #[must_use]
    pub const fn int() -> Self {
        Self::Scalar(ScalarKind::Integer {
            bits: 64,
            signed: true,
        })
    }

    /// Strips a single `Optional` wrapper, if present.
    #[must_use]
    pub fn without_optional(&self) -> &Self {
        match self {
            Self::Optional(inner) => inner,
            other => other,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Optional(inner) => write!(f, "Option<{inner}>"),
            Self::List(inner) => write!(f, "Vec<{inner}>"),
            Self::Choice(set) => write!(f, "one of {{{}}}", set.render()),
            Self::Nested(reference) => f.write_str(reference.name()),
        }
    }
}

/// Enumerated options of a uniform scalar kind.
///
/// Tokens are coerced with `kind` and then matched against `options` by
/// equality, so string choices are case-sensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceSet {
    kind: ScalarKind,
    options: Vec<Value>,
}

impl ChoiceSet {
    /// Creates a choice set of the given kind.
    #[must_use]
    pub fn new(kind: ScalarKind, options: impl IntoIterator<Item = Value>) -> Self {
        Self {
            kind,
            options: options.into_iter().collect(),
        }
    }

    /// Creates a set of string options.
    ///
    /// # Examples
    ///
    /// ```
    /// use ortho_args::ChoiceSet;
    ///
    /// let set = ChoiceSet::strings(["fast", "safe"]);
    /// assert_eq!(set.render(), "fast, safe");
    /// ```
    #[must_use]
    pub fn strings<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            ScalarKind::String,
            options.into_iter().map(|option| Value::Str(option.into())),
        )
    }

    /// Scalar kind shared by every option.
    #[must_use]
    pub const fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// The options in declaration order.
    #[must_use]
    pub fn options(&self) -> &[Value] {
        &self.options
    }

    /// Comma-separated rendering of the options.
    #[must_use]
    pub fn render(&self) -> String {
        render_options(&self.options)
    }
}

pub(crate) fn render_options(options: &[Value]) -> String {
    options
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Default applied when a field is absent from the parsed input.
#[derive(Debug, Clone)]
pub enum DefaultValue {
    /// A fixed value, cloned for every construction.
    Value(Value),
    /// A factory invoked once per construction, only when the field is
    /// absent.
    Factory(fn() -> Value),
}

impl DefaultValue {
    /// Produces a fresh value for one construction.
    #[must_use]
    pub fn materialize(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Factory(factory) => factory(),
        }
    }

    /// Text shown in help output; factories have no static rendering.
    #[must_use]
    pub fn display(&self) -> Option<String> {
        match self {
            Self::Value(Value::Null) | Self::Factory(_) => None,
            Self::Value(Value::List(items)) if items.is_empty() => None,
            Self::Value(value) => Some(value.to_string()),
        }
    }
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// One declared field of a record.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    ty: TypeExpr,
    default: Option<DefaultValue>,
    metadata: FieldMetadata,
}

impl FieldDescriptor {
    /// Declares a field without a default or metadata.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            metadata: FieldMetadata::default(),
        }
    }

    /// Attaches a default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<DefaultValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Attaches declarative metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: FieldMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Field name as declared.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    #[must_use]
    pub const fn ty(&self) -> &TypeExpr {
        &self.ty
    }

    /// Declared default, if any.
    #[must_use]
    pub const fn default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    /// Whether a default was declared.
    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Declarative overrides attached to the field.
    #[must_use]
    pub const fn metadata(&self) -> &FieldMetadata {
        &self.metadata
    }
}

/// Ordered field declarations of one record type.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    about: Option<String>,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Starts declaring a schema called `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ortho_args::{FieldDescriptor, Schema, TypeExpr, Value};
    ///
    /// let schema = Schema::builder("Job")
    ///     .field(FieldDescriptor::new("name", TypeExpr::string()))
    ///     .field(FieldDescriptor::new("verbose", TypeExpr::bool()).with_default(Value::Bool(false)))
    ///     .build()?;
    /// assert_eq!(schema.fields().len(), 2);
    /// # Ok::<(), ortho_args::SchemaError>(())
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description used as the parser's about text.
    #[must_use]
    pub fn about(&self) -> Option<&str> {
        self.about.as_deref()
    }

    /// Field descriptors in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name() == name)
    }
}
