//! Core crate for the `OrthoArgs` schema-to-parser bridge.
//!
//! A record type is described once, as a [`Schema`] of ordered
//! [`FieldDescriptor`]s, and the command-line parser is derived from it:
//!
//! 1. the [`Resolver`] maps each field's [`TypeExpr`] and [`FieldMetadata`] to
//!    a [`FieldBehavior`] (flag, counter, scalar, repeated or nested);
//! 2. the parser builder lowers the behaviours to [`ArgumentSpec`]s with
//!    unique flags;
//! 3. the [`Parser`] runs the specs over the command line and yields a
//!    [`RawResultMap`] of supplied values;
//! 4. construction applies defaults and yields a [`Record`], which derived
//!    types convert into themselves.
//!
//! Most users derive [`ArgSchema`] instead of writing schemas by hand:
//!
//! ```
//! use ortho_args::ArgSchema;
//!
//! /// Runs a batch job.
//! #[derive(Debug, ArgSchema)]
//! struct Job {
//!     /// Job name.
//!     name: String,
//!     #[ortho_args(default = 3)]
//!     retries: Option<u32>,
//!     verbose: bool,
//!     tags: Vec<String>,
//! }
//!
//! let job = Job::try_parse_from(["--name", "job1", "--tags", "a", "--tags", "b"])?;
//! assert_eq!(job.name, "job1");
//! assert_eq!(job.retries, Some(3));
//! assert!(!job.verbose);
//! assert_eq!(job.tags, ["a", "b"]);
//! # Ok::<(), ortho_args::ArgsError>(())
//! ```

extern crate self as ortho_args;

mod builder;
mod construct;
mod convert;
mod error;
mod hook;
mod metadata;
mod options;
mod parser;
mod raw;
mod record;
mod resolve;
mod schema;
mod value;

pub use builder::{ArgumentSpec, ParserSpec, build as build_spec};
pub use construct::{construct, construct_with};
pub use convert::{ArgType, FromValue, IntoValue};
pub use error::{
    ArgsError, ArgsResult, ConstructError, FlagCollisionError, SchemaError, UsageError, UsageIssue,
    UsageIssues, is_display_request,
};
pub use hook::{PostParseContext, PostParseHook};
pub use metadata::{BehaviorOverride, ConvertFn, Converter, FieldMetadata, Nargs};
pub use options::{BuildOptions, DEFAULT_SEPARATOR};
pub use ortho_args_macros::{ArgChoice, ArgSchema};
pub use parser::Parser;
pub use raw::RawResultMap;
pub use record::Record;
pub use resolve::{Arity, FieldBehavior, NestedBehavior, ResolvedField, Resolver, ValueBehavior};
pub use schema::{
    ChoiceSet, DefaultValue, FieldDescriptor, ResolveFn, Schema, SchemaBuilder, SchemaRef,
    TypeExpr,
};
pub use value::{ScalarKind, Value};

use std::ffi::OsString;

/// Record types whose command-line parser is derived from their schema.
///
/// Implemented by `#[derive(ArgSchema)]`; the provided methods synthesize the
/// parser, run it and convert the resulting [`Record`] into `Self`.
pub trait ArgSchema: Sized {
    /// The memoized schema describing `Self`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the declaration is invalid. The error is
    /// memoized along with the schema.
    fn schema() -> Result<&'static Schema, SchemaError>;

    /// Converts a constructed record into `Self`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError`] when a field is missing or has the wrong
    /// shape.
    fn from_record(record: Record) -> Result<Self, ConstructError>;

    /// Options used to synthesize the parser.
    #[must_use]
    fn build_options() -> BuildOptions {
        BuildOptions::default()
    }

    /// Runs after construction; derived types forward to
    /// [`PostParseHook::post_parse`] when opted in.
    ///
    /// # Errors
    ///
    /// Returns whatever error the hook reports.
    fn after_parse(&mut self, _ctx: &PostParseContext) -> ArgsResult<()> {
        Ok(())
    }

    /// Synthesizes the parser for `Self`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::Schema`] or [`ArgsError::FlagCollision`] when the
    /// declaration is broken.
    fn parser() -> ArgsResult<Parser> {
        Parser::for_ref(SchemaRef::of::<Self>(), &Self::build_options())
    }

    /// Builds `Self` from values already parsed by [`ArgSchema::parser`],
    /// applying defaults for everything absent.
    ///
    /// The post-parse hook is not run.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::Construct`] when a required value is missing or a
    /// value does not fit its field.
    fn from_parsed(raw: &RawResultMap) -> ArgsResult<Self> {
        let record = Self::parser()?.construct(raw)?;
        Ok(Self::from_record(record)?)
    }

    /// Parses `tokens`, which exclude the program name, into `Self`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::Usage`] when the command line is rejected,
    /// [`ArgsError::Validation`] when the post-parse hook rejects the value,
    /// and the developer-facing errors of [`ArgSchema::parser`].
    fn try_parse_from<I, T>(tokens: I) -> ArgsResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let parser = Self::parser()?;
        let raw = parser.parse(tokens)?;
        let record = parser.construct(&raw)?;
        let mut value = Self::from_record(record)?;
        value.after_parse(&PostParseContext::from_raw(parser.name(), &raw))?;
        Ok(value)
    }

    /// Parses the process arguments, exiting on invalid input.
    ///
    /// # Panics
    ///
    /// Panics when the schema itself is invalid or two fields claim the same
    /// flag; these are programming errors rather than bad input.
    #[must_use]
    fn parse() -> Self {
        match Self::try_parse_from(std::env::args_os().skip(1)) {
            Ok(value) => value,
            Err(err) if err.is_developer_error() => panic!(
                "invalid argument schema for {}: {err}",
                std::any::type_name::<Self>()
            ),
            Err(err) => err.exit(),
        }
    }
}

/// Returns the field descriptors of `T` in declaration order.
///
/// # Errors
///
/// Returns [`SchemaError`] when `T`'s declaration is invalid.
pub fn introspect<T: ArgSchema>() -> Result<&'static [FieldDescriptor], SchemaError> {
    T::schema().map(Schema::fields)
}

/// Parses `tokens` into `T`; equivalent to [`ArgSchema::try_parse_from`].
///
/// # Errors
///
/// As for [`ArgSchema::try_parse_from`].
pub fn try_parse_args<T, I, S>(tokens: I) -> ArgsResult<T>
where
    T: ArgSchema,
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    T::try_parse_from(tokens)
}

/// Parses the process arguments into `T`; equivalent to
/// [`ArgSchema::parse`].
///
/// # Panics
///
/// Panics when `T`'s schema is invalid.
#[must_use]
pub fn parse_args<T: ArgSchema>() -> T {
    T::parse()
}
