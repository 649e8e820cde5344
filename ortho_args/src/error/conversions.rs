//! Conversions between external error types and the crate's errors.

use super::{ArgsError, UsageError};

impl From<clap::Error> for UsageError {
    fn from(e: clap::Error) -> Self {
        Self::Clap(Box::new(e))
    }
}

impl From<UsageError> for ArgsError {
    fn from(e: UsageError) -> Self {
        Self::Usage(Box::new(e))
    }
}

impl From<clap::Error> for ArgsError {
    fn from(e: clap::Error) -> Self {
        UsageError::from(e).into()
    }
}
