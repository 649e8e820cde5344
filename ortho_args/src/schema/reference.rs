//! Lazy references to nested schemas.

use std::fmt;

use crate::{ArgSchema, Schema, SchemaError};

/// Resolver signature for a memoized schema.
pub type ResolveFn = fn() -> Result<&'static Schema, SchemaError>;

/// Indirection to a schema that is only materialized on first use.
///
/// The referenced schema is not touched while the referring schema is
/// declared, so records may refer to each other regardless of declaration
/// order. Implementations of the resolver are expected to memoize, as the
/// derived `ArgSchema::schema` does with a `OnceLock`.
///
/// # Examples
///
/// ```
/// use std::sync::OnceLock;
/// use ortho_args::{FieldDescriptor, Schema, SchemaError, SchemaRef, TypeExpr};
///
/// fn limits() -> Result<&'static Schema, SchemaError> {
///     static SCHEMA: OnceLock<Result<Schema, SchemaError>> = OnceLock::new();
///     SCHEMA
///         .get_or_init(|| {
///             Schema::builder("Limits")
///                 .field(FieldDescriptor::new("cpu", TypeExpr::int()))
///                 .build()
///         })
///         .as_ref()
///         .map_err(Clone::clone)
/// }
///
/// let reference = SchemaRef::new("Limits", limits);
/// assert_eq!(reference.resolve()?.fields().len(), 1);
/// # Ok::<(), SchemaError>(())
/// ```
#[derive(Clone, Copy)]
pub struct SchemaRef {
    name: &'static str,
    resolve: ResolveFn,
}

impl SchemaRef {
    /// Creates a reference identified by `name`.
    ///
    /// `name` must be unique among the schemas reachable from one root; it
    /// is the identity used for cycle detection.
    #[must_use]
    pub const fn new(name: &'static str, resolve: ResolveFn) -> Self {
        Self { name, resolve }
    }

    /// Reference to the schema derived for `T`.
    #[must_use]
    pub fn of<T: ArgSchema>() -> Self {
        Self::new(std::any::type_name::<T>(), T::schema)
    }

    /// Identity of the referenced schema.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Materializes the referenced schema.
    ///
    /// # Errors
    ///
    /// Propagates any [`SchemaError`] raised while declaring the schema.
    pub fn resolve(&self) -> Result<&'static Schema, SchemaError> {
        (self.resolve)()
    }
}

impl fmt::Debug for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SchemaRef").field(&self.name).finish()
    }
}

impl PartialEq for SchemaRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
