//! Per-parser configuration.

/// Separator joining nested field names in result keys and flags.
pub const DEFAULT_SEPARATOR: &str = ".";

/// Settings that shape the synthesized parser.
///
/// # Examples
///
/// ```
/// use ortho_args::BuildOptions;
///
/// let options = BuildOptions::default()
///     .with_program_name("job-runner")
///     .with_separator("-");
/// assert_eq!(options.separator(), "-");
/// assert!(options.implicit_list_default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    program_name: Option<String>,
    about: Option<String>,
    separator: String,
    implicit_list_default: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            program_name: None,
            about: None,
            separator: DEFAULT_SEPARATOR.to_owned(),
            implicit_list_default: true,
        }
    }
}

impl BuildOptions {
    /// Overrides the program name shown in usage; defaults to the kebab-cased
    /// schema name.
    #[must_use]
    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = Some(name.into());
        self
    }

    /// Overrides the about text; defaults to the schema's description.
    #[must_use]
    pub fn with_about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Sets the separator between a nested field's prefix and its own name.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Chooses whether list fields without an explicit default or arity fall
    /// back to the empty list (`true`) or are required (`false`).
    #[must_use]
    pub const fn with_implicit_list_default(mut self, enabled: bool) -> Self {
        self.implicit_list_default = enabled;
        self
    }

    /// Program name override.
    #[must_use]
    pub fn program_name(&self) -> Option<&str> {
        self.program_name.as_deref()
    }

    /// About text override.
    #[must_use]
    pub fn about(&self) -> Option<&str> {
        self.about.as_deref()
    }

    /// Nested key separator.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Whether unadorned lists default to empty.
    #[must_use]
    pub const fn implicit_list_default(&self) -> bool {
        self.implicit_list_default
    }
}
