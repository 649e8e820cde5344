//! Error enums for each layer of the schema-to-parser pipeline.

use thiserror::Error;

use super::aggregate::UsageIssues;

/// A schema declaration that cannot be turned into a parser.
///
/// These errors describe a broken declaration rather than bad input and are
/// surfaced to the schema author.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// Two fields share a name.
    #[error("schema '{schema}' declares field '{field}' more than once")]
    DuplicateField {
        /// Schema containing the duplicate.
        schema: String,
        /// Repeated field name.
        field: String,
    },

    /// A field's type shape has no parsing behaviour.
    #[error("field '{field}' has an unsupported type: {detail}")]
    UnsupportedType {
        /// Offending field.
        field: String,
        /// Description of the unsupported shape.
        detail: String,
    },

    /// Choice options are empty or not of the declared kind.
    #[error("field '{field}' declares invalid choices: {detail}")]
    InvalidChoices {
        /// Offending field.
        field: String,
        /// Description of the problem.
        detail: String,
    },

    /// Field metadata contradicts the field's type or itself.
    #[error("field '{field}' has invalid metadata: {detail}")]
    InvalidMetadata {
        /// Offending field.
        field: String,
        /// Description of the contradiction.
        detail: String,
    },

    /// A record contains itself through a chain of nested fields.
    #[error("cyclic nesting detected: {cycle}")]
    CyclicNesting {
        /// Chain of schema names participating in the cycle.
        cycle: String,
    },
}

/// Two fields resolved to the same flag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("flag '{flag}' is claimed by both '{first}' and '{second}'")]
pub struct FlagCollisionError {
    /// The contested flag, including its dashes.
    pub flag: String,
    /// Field path that claimed the flag first.
    pub first: String,
    /// Field path that attempted to claim it again.
    pub second: String,
}

/// One problem found in the end user's command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum UsageIssue {
    /// A required option was not supplied.
    #[error("the required argument '{flag}' was not provided")]
    MissingRequiredField {
        /// Field path of the missing value.
        field: String,
        /// Flag or positional placeholder the user should supply.
        flag: String,
    },

    /// A token could not be converted to the option's type.
    #[error("invalid value '{token}' for '{flag}': {reason}")]
    TypeMismatch {
        /// Option that received the token.
        flag: String,
        /// Token as supplied.
        token: String,
        /// Why the conversion failed.
        reason: String,
    },

    /// A token is not among the option's enumerated values.
    #[error("invalid value '{token}' for '{flag}' [possible values: {choices}]")]
    InvalidChoice {
        /// Option that received the token.
        flag: String,
        /// Token as supplied.
        token: String,
        /// Rendered list of accepted values.
        choices: String,
    },
}

/// The end user's command line was rejected.
#[derive(Debug, Error)]
pub enum UsageError {
    /// Structural failure reported by clap, including help and version
    /// requests.
    #[error(transparent)]
    Clap(Box<clap::Error>),

    /// Values that failed conversion, choice or required checks.
    #[error("invalid command-line arguments:\n{issues}")]
    Invalid {
        /// Every problem found in one pass.
        issues: UsageIssues,
        /// Synthesized usage line.
        usage: String,
    },
}

/// A record could not be assembled from parsed values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstructError {
    /// A required field has neither a parsed value nor a default.
    #[error("missing required field '{field}'")]
    MissingRequiredField {
        /// Dotted path of the missing field.
        field: String,
    },

    /// A value does not fit the field's declared type.
    #[error("field '{field}' expected {expected}, found {found}")]
    TypeMismatch {
        /// Dotted path of the field.
        field: String,
        /// Description of the declared type.
        expected: String,
        /// Description of the value received.
        found: String,
    },
}

/// Umbrella error returned by the high-level entry points.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArgsError {
    /// The schema declaration is invalid.
    #[error("invalid argument schema: {0}")]
    Schema(#[from] SchemaError),

    /// Two fields claim the same flag.
    #[error("conflicting command-line flags: {0}")]
    FlagCollision(#[from] FlagCollisionError),

    /// The command line was rejected.
    #[error(transparent)]
    Usage(Box<UsageError>),

    /// Parsed values could not be assembled into a record.
    #[error("failed to construct record: {0}")]
    Construct(#[from] ConstructError),

    /// A post-parse hook rejected the constructed value.
    #[error("Validation failed for '{key}': {message}")]
    Validation {
        /// Field or key that failed validation.
        key: String,
        /// Human-readable explanation of the validation failure.
        message: String,
    },
}
