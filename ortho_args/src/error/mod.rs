//! Error types produced while declaring schemas, parsing and constructing.

mod aggregate;
mod constructors;
mod conversions;
mod helpers;
mod types;

pub use aggregate::UsageIssues;
pub use helpers::is_display_request;
pub use types::{
    ArgsError, ConstructError, FlagCollisionError, SchemaError, UsageError, UsageIssue,
};

/// Result alias used by the high-level entry points.
pub type ArgsResult<T> = Result<T, ArgsError>;

/// Exit status for rejected command lines, matching clap's usage errors.
pub(crate) const USAGE_EXIT_CODE: i32 = 2;
