//! Post-parse hook support for semantic validation of constructed records.
//!
//! Parsing only checks types, choices and required-ness. Rules that span
//! several fields belong in a [`PostParseHook`], which runs on the typed value
//! once construction has succeeded.

use crate::{ArgsResult, RawResultMap};

/// Hook invoked after a record has been constructed from the command line.
///
/// # Examples
///
/// ```rust
/// use ortho_args::{ArgSchema, ArgsError, ArgsResult, PostParseContext, PostParseHook};
///
/// #[derive(Debug, ArgSchema)]
/// #[ortho_args(post_parse_hook)]
/// struct Window {
///     #[ortho_args(default = 0)]
///     start: u32,
///     #[ortho_args(default = 10)]
///     end: u32,
/// }
///
/// impl PostParseHook for Window {
///     fn post_parse(&mut self, _ctx: &PostParseContext) -> ArgsResult<()> {
///         if self.start > self.end {
///             return Err(ArgsError::validation("start", "must not exceed end"));
///         }
///         Ok(())
///     }
/// }
///
/// let err = Window::try_parse_from(["--start", "20"]).expect_err("start > end");
/// assert!(matches!(err, ArgsError::Validation { .. }));
/// ```
pub trait PostParseHook: Sized {
    /// Validates or normalizes the constructed value.
    ///
    /// # Errors
    ///
    /// Returns an error, typically [`ArgsError::Validation`], to reject the
    /// command line. The error is propagated to the caller of
    /// `try_parse_from` unchanged.
    ///
    /// [`ArgsError::Validation`]: crate::ArgsError::Validation
    fn post_parse(&mut self, ctx: &PostParseContext) -> ArgsResult<()>;
}

/// Context provided to post-parse hooks.
///
/// Records which keys the user actually supplied so hooks can tell an
/// explicit value apart from a default.
#[derive(Debug, Clone, Default)]
pub struct PostParseContext {
    program_name: String,
    supplied: Vec<String>,
}

impl PostParseContext {
    /// Creates a context for `program_name` with no supplied keys.
    #[must_use]
    pub fn new(program_name: impl Into<String>) -> Self {
        Self {
            program_name: program_name.into(),
            supplied: Vec::new(),
        }
    }

    /// Creates a context listing every key present in `raw`.
    #[must_use]
    pub fn from_raw(program_name: impl Into<String>, raw: &RawResultMap) -> Self {
        Self {
            program_name: program_name.into(),
            supplied: raw.iter().map(|(key, _)| key.to_owned()).collect(),
        }
    }

    /// Program name of the parser that produced the value.
    #[must_use]
    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    /// Whether `key` was supplied on the command line rather than defaulted.
    ///
    /// Nested keys use the parser's separator, e.g. `limits.cpu`.
    #[must_use]
    pub fn was_supplied(&self, key: &str) -> bool {
        self.supplied.iter().any(|supplied| supplied == key)
    }

    /// Keys supplied on the command line, in declaration order.
    #[must_use]
    pub fn supplied(&self) -> &[String] {
        &self.supplied
    }
}
