//! Aggregation container for the usage issues found in one parse.

use std::fmt;

use super::UsageIssue;

/// Every [`UsageIssue`] found while checking one command line.
///
/// # Examples
///
/// ```
/// use ortho_args::{UsageIssue, UsageIssues};
/// let issues = UsageIssues::new(vec![
///     UsageIssue::MissingRequiredField { field: "name".into(), flag: "--name".into() },
///     UsageIssue::TypeMismatch {
///         flag: "--retries".into(),
///         token: "many".into(),
///         reason: "invalid digit found in string".into(),
///     },
/// ]);
/// assert_eq!(issues.len(), 2);
/// assert!(issues.to_string().starts_with("1: the required argument '--name'"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageIssues(Vec<UsageIssue>);

impl UsageIssues {
    /// Wraps the collected issues.
    #[must_use]
    pub const fn new(issues: Vec<UsageIssue>) -> Self {
        Self(issues)
    }

    /// Iterate over the contained issues.
    #[must_use = "iterators should be consumed to inspect issues"]
    pub fn iter(&self) -> std::slice::Iter<'_, UsageIssue> {
        self.0.iter()
    }

    /// Number of issues.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when nothing was reported.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The issues as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[UsageIssue] {
        &self.0
    }
}

impl fmt::Display for UsageIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {issue}", i + 1)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a UsageIssues {
    type Item = &'a UsageIssue;
    type IntoIter = std::slice::Iter<'a, UsageIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for UsageIssues {
    type Item = UsageIssue;
    type IntoIter = std::vec::IntoIter<UsageIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<UsageIssue> for UsageIssues {
    fn from_iter<I: IntoIterator<Item = UsageIssue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
