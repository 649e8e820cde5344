//! Constructors and exit helpers for the crate's errors.

use super::{
    ArgsError, ConstructError, USAGE_EXIT_CODE, UsageError, UsageIssue, helpers::is_display_request,
};
use crate::Value;

impl ConstructError {
    /// Builds a type mismatch for `found`; the field path is filled in as
    /// the error propagates through [`Record::take`](crate::Record::take).
    #[must_use]
    pub fn mismatch(expected: impl Into<String>, found: &Value) -> Self {
        Self::TypeMismatch {
            field: String::new(),
            expected: expected.into(),
            found: found.describe(),
        }
    }

    /// Prefixes the field path with `name`.
    ///
    /// Typed conversion paths name struct fields, so they are always joined
    /// with `.` whatever separator the parser uses for its keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use ortho_args::ConstructError;
    /// let err = ConstructError::MissingRequiredField { field: "cpu".into() };
    /// assert_eq!(
    ///     err.at_field("limits"),
    ///     ConstructError::MissingRequiredField { field: "limits.cpu".into() },
    /// );
    /// ```
    #[must_use]
    pub fn at_field(self, name: &str) -> Self {
        let join = |inner: String| {
            if inner.is_empty() {
                name.to_owned()
            } else {
                format!("{name}.{inner}")
            }
        };
        match self {
            Self::MissingRequiredField { field } => Self::MissingRequiredField { field: join(field) },
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => Self::TypeMismatch {
                field: join(field),
                expected,
                found,
            },
        }
    }
}

impl UsageError {
    /// Issues found by the value checks; empty for clap errors.
    #[must_use]
    pub fn issues(&self) -> &[UsageIssue] {
        match self {
            Self::Clap(_) => &[],
            Self::Invalid { issues, .. } => issues.as_slice(),
        }
    }

    /// Returns `true` for `--help` and `--version` requests.
    #[must_use]
    pub fn is_display_request(&self) -> bool {
        matches!(self, Self::Clap(err) if is_display_request(err))
    }

    /// Process exit status for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Clap(err) => err.exit_code(),
            Self::Invalid { .. } => USAGE_EXIT_CODE,
        }
    }

    /// Full report: the issues followed by the synthesized usage.
    #[must_use]
    pub fn report(&self) -> String {
        match self {
            Self::Clap(err) => err.render().to_string(),
            Self::Invalid { usage, .. } => format!("error: {self}\n\n{usage}\n"),
        }
    }

    /// Prints the report and terminates the process.
    ///
    /// Help and version requests go to stdout with status zero; everything
    /// else goes to stderr with a non-zero status.
    #[expect(
        clippy::print_stderr,
        reason = "usage reports are the process's final output"
    )]
    pub fn exit(self) -> ! {
        match self {
            Self::Clap(err) => err.exit(),
            Self::Invalid { .. } => {
                eprint!("{}", self.report());
                std::process::exit(USAGE_EXIT_CODE)
            }
        }
    }
}

impl ArgsError {
    /// Construct a validation error for use in post-parse hooks.
    ///
    /// # Examples
    ///
    /// ```
    /// use ortho_args::ArgsError;
    /// let err = ArgsError::validation("retries", "must be below 10");
    /// assert_eq!(err.to_string(), "Validation failed for 'retries': must be below 10");
    /// ```
    #[must_use]
    pub fn validation(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Returns `true` when the error points at the schema declaration rather
    /// than the user's input.
    #[must_use]
    pub const fn is_developer_error(&self) -> bool {
        matches!(self, Self::Schema(_) | Self::FlagCollision(_))
    }

    /// Prints the error and terminates the process.
    ///
    /// Usage errors delegate to [`UsageError::exit`]; any other error is
    /// printed to stderr with status 2.
    #[expect(
        clippy::print_stderr,
        reason = "the error is the process's final output"
    )]
    pub fn exit(self) -> ! {
        match self {
            Self::Usage(err) => err.exit(),
            other => {
                eprintln!("error: {other}");
                std::process::exit(USAGE_EXIT_CODE)
            }
        }
    }
}
