//! Flag derivation and collision tracking for the parser builder.

use std::collections::HashMap;

use heck::ToKebabCase;

use crate::FlagCollisionError;

const RESERVED_SHORTS: &[char] = &['h'];
const RESERVED_LONGS: &[&str] = &["help"];
const RESERVED_OWNER: &str = "<built-in help>";

/// Flag segment contributed by a field: its override or its kebab-cased name.
pub(super) fn segment(name: &str, long_override: Option<&str>) -> String {
    long_override.map_or_else(|| name.to_kebab_case(), str::to_owned)
}

/// Joins a parent path and a child segment with `separator`.
pub(super) fn join(prefix: Option<&str>, segment: &str, separator: &str) -> String {
    prefix.map_or_else(
        || segment.to_owned(),
        |parent| format!("{parent}{separator}{segment}"),
    )
}

/// Records which field path owns each long and short flag.
#[derive(Debug)]
pub(super) struct FlagClaims {
    longs: HashMap<String, String>,
    shorts: HashMap<char, String>,
}

impl FlagClaims {
    pub(super) fn with_reserved() -> Self {
        Self {
            longs: RESERVED_LONGS
                .iter()
                .map(|long| ((*long).to_owned(), RESERVED_OWNER.to_owned()))
                .collect(),
            shorts: RESERVED_SHORTS
                .iter()
                .map(|short| (*short, RESERVED_OWNER.to_owned()))
                .collect(),
        }
    }

    pub(super) fn claim_long(&mut self, long: &str, owner: &str) -> Result<(), FlagCollisionError> {
        if let Some(first) = self.longs.get(long) {
            return Err(FlagCollisionError {
                flag: format!("--{long}"),
                first: first.clone(),
                second: owner.to_owned(),
            });
        }
        self.longs.insert(long.to_owned(), owner.to_owned());
        Ok(())
    }

    pub(super) fn claim_short(&mut self, short: char, owner: &str) -> Result<(), FlagCollisionError> {
        if let Some(first) = self.shorts.get(&short) {
            return Err(FlagCollisionError {
                flag: format!("-{short}"),
                first: first.clone(),
                second: owner.to_owned(),
            });
        }
        self.shorts.insert(short, owner.to_owned());
        Ok(())
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests panic to surface parsing mistakes"
)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::snake("dry_run", None, "dry-run")]
    #[case::camel("maxRetries", None, "max-retries")]
    #[case::single("name", None, "name")]
    #[case::override_wins("dry_run", Some("simulate"), "simulate")]
    fn derives_segments(#[case] name: &str, #[case] long: Option<&str>, #[case] expected: &str) {
        assert_eq!(segment(name, long), expected);
    }

    #[test]
    fn joins_nested_paths() {
        assert_eq!(join(None, "cpu", "."), "cpu");
        assert_eq!(join(Some("limits"), "cpu", "."), "limits.cpu");
        assert_eq!(join(Some("limits"), "cpu", "-"), "limits-cpu");
    }

    #[test]
    fn reserved_flags_are_claimed() {
        let mut claims = FlagClaims::with_reserved();
        let err = claims.claim_long("help", "help").expect_err("help is reserved");
        assert_eq!(err.first, RESERVED_OWNER);
        assert!(claims.claim_short('h', "host").is_err());
        assert!(claims.claim_short('H', "host").is_ok());
    }

    #[test]
    fn second_claim_names_both_owners() {
        let mut claims = FlagClaims::with_reserved();
        claims.claim_long("count", "count").expect("first claim");
        let err = claims.claim_long("count", "n_count").expect_err("collision");
        assert_eq!(
            err,
            FlagCollisionError {
                flag: "--count".to_owned(),
                first: "count".to_owned(),
                second: "n_count".to_owned(),
            }
        );
    }
}
