//! End-to-end parsing of derived records.
//!
//! Each scenario declares a record with `#[derive(ArgSchema)]`, parses a
//! token list and checks the typed result or the usage error.
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface parsing mistakes"
)]

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow, ensure};
use ortho_args::{ArgSchema, ArgsError, UsageError, UsageIssue};
use rstest::rstest;

#[derive(Debug, ArgSchema)]
struct Basic {
    #[ortho_args(default = 42)]
    x: i32,
    y: bool,
}

#[derive(Debug, ArgSchema)]
struct NoDefaults {
    num_of_foo: u32,
    name: String,
}

#[derive(Debug, ArgSchema)]
struct Fellowship {
    name: String,
    #[ortho_args(nargs = 2)]
    friends: Vec<String>,
}

#[derive(Debug, ArgSchema)]
struct OpenFellowship {
    name: String,
    #[ortho_args(nargs = "+")]
    friends: Vec<String>,
}

#[derive(Debug, ArgSchema)]
struct Positional {
    #[ortho_args(cli_short = 'x', cli_long = "long-name")]
    x: i64,
    #[ortho_args(positional)]
    positional: String,
}

#[derive(Debug, ArgSchema)]
struct SmallInteger {
    #[ortho_args(choices(1, 2, 3))]
    small_integer: u8,
}

fn title_case(token: &str) -> Result<String, String> {
    Ok(token
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" "))
}

#[derive(Debug, ArgSchema)]
struct Titled {
    #[ortho_args(parse_with = title_case)]
    name: String,
}

static FACTORY_CALLS: AtomicUsize = AtomicUsize::new(0);

fn default_message() -> String {
    let call = FACTORY_CALLS.fetch_add(1, Ordering::SeqCst) + 1;
    format!("Default Message: {call}")
}

#[derive(Debug, ArgSchema)]
struct Message {
    #[ortho_args(default_factory = default_message)]
    message: String,
}

#[derive(Debug, ArgSchema)]
struct Extras {
    extra: Option<Vec<String>>,
}

fn usage_issues(err: ArgsError) -> Result<Vec<UsageIssue>> {
    match err {
        ArgsError::Usage(usage) => Ok(usage.issues().to_vec()),
        other => Err(anyhow!("expected a usage error, got {other}")),
    }
}

#[rstest]
fn basic_defaults_apply() -> Result<()> {
    let parsed = Basic::try_parse_from(Vec::<String>::new())?;
    ensure!(parsed.x == 42);
    ensure!(!parsed.y);
    Ok(())
}

#[rstest]
fn basic_values_override_defaults() -> Result<()> {
    let parsed = Basic::try_parse_from(["--x=10", "--y"])?;
    ensure!(parsed.x == 10);
    ensure!(parsed.y);
    Ok(())
}

#[rstest]
fn fields_without_defaults_are_read_from_flags() -> Result<()> {
    let parsed = NoDefaults::try_parse_from(["--num-of-foo=10", "--name", "Sam"])?;
    ensure!(parsed.num_of_foo == 10);
    ensure!(parsed.name == "Sam");
    Ok(())
}

#[rstest]
fn fields_without_defaults_are_required() -> Result<()> {
    let err = NoDefaults::try_parse_from(Vec::<String>::new()).expect_err("missing flags");
    let ArgsError::Usage(usage) = &err else {
        return Err(anyhow!("expected a usage error, got {err}"));
    };
    ensure!(usage.exit_code() == 2);
    let fields: Vec<&str> = usage
        .issues()
        .iter()
        .filter_map(|issue| match issue {
            UsageIssue::MissingRequiredField { field, .. } => Some(field.as_str()),
            _ => None,
        })
        .collect();
    ensure!(fields == ["num_of_foo", "name"]);
    Ok(())
}

#[rstest]
fn nargs_takes_an_exact_count() -> Result<()> {
    let parsed = Fellowship::try_parse_from(["--name", "Sam", "--friends", "pippin", "Frodo"])?;
    ensure!(parsed.name == "Sam");
    ensure!(parsed.friends == ["pippin", "Frodo"]);
    Ok(())
}

#[rstest]
fn nargs_rejects_the_wrong_count() {
    let err = Fellowship::try_parse_from(["--name", "Sam", "--friends", "pippin"])
        .expect_err("two friends are required");
    assert!(
        matches!(&err, ArgsError::Usage(usage) if matches!(usage.as_ref(), UsageError::Clap(_))),
        "unexpected error: {err:?}"
    );
}

#[rstest]
#[case(&["--name", "Sam", "--friends", "pippin", "Frodo"], &["pippin", "Frodo"])]
#[case(
    &["--name", "Sam", "--friends", "pippin", "Frodo", "Bilbo"],
    &["pippin", "Frodo", "Bilbo"]
)]
fn nargs_plus_takes_every_token(#[case] tokens: &[&str], #[case] friends: &[&str]) -> Result<()> {
    let parsed = OpenFellowship::try_parse_from(tokens.iter().copied())?;
    ensure!(parsed.name == "Sam");
    ensure!(parsed.friends == friends);
    Ok(())
}

#[rstest]
#[case::absent(&[], None)]
#[case::supplied(&["--extra", "a", "--extra", "b"], Some(vec!["a", "b"]))]
fn optional_lists_are_none_when_absent(
    #[case] tokens: &[&str],
    #[case] expected: Option<Vec<&str>>,
) -> Result<()> {
    let parsed = Extras::try_parse_from(tokens.iter().copied())?;
    let extra: Option<Vec<&str>> = parsed
        .extra
        .as_ref()
        .map(|values| values.iter().map(String::as_str).collect());
    ensure!(extra == expected, "{extra:?}");
    Ok(())
}

#[rstest]
fn positional_and_short_flags_combine() -> Result<()> {
    let parsed = Positional::try_parse_from(["-x", "0", "POS_VALUE"])?;
    ensure!(parsed.x == 0);
    ensure!(parsed.positional == "POS_VALUE");
    let long = Positional::try_parse_from(["--long-name", "-3", "other"])?;
    ensure!(long.x == -3);
    Ok(())
}

#[rstest]
fn choices_accept_listed_values() -> Result<()> {
    ensure!(SmallInteger::try_parse_from(["--small-integer", "2"])?.small_integer == 2);
    Ok(())
}

#[rstest]
fn choices_reject_other_values() -> Result<()> {
    let err = SmallInteger::try_parse_from(["--small-integer", "20"]).expect_err("not a choice");
    let issues = usage_issues(err)?;
    ensure!(matches!(
        issues.as_slice(),
        [UsageIssue::InvalidChoice { token, choices, .. }] if token == "20" && choices == "1, 2, 3"
    ));
    Ok(())
}

#[rstest]
fn custom_converters_transform_tokens() -> Result<()> {
    let parsed = Titled::try_parse_from(["--name", "john doe"])?;
    ensure!(parsed.name == "John Doe");
    Ok(())
}

#[rstest]
fn default_factories_run_once_per_absent_parse() -> Result<()> {
    let first = Message::try_parse_from(Vec::<String>::new())?;
    ensure!(first.message == "Default Message: 1");
    ensure!(FACTORY_CALLS.load(Ordering::SeqCst) == 1);

    let supplied = Message::try_parse_from(["--message", "User message"])?;
    ensure!(supplied.message == "User message");
    ensure!(FACTORY_CALLS.load(Ordering::SeqCst) == 1);

    let second = Message::try_parse_from(Vec::<String>::new())?;
    ensure!(second.message == "Default Message: 2");
    ensure!(FACTORY_CALLS.load(Ordering::SeqCst) == 2);
    Ok(())
}

#[rstest]
fn help_is_reported_as_a_display_request() -> Result<()> {
    let err = Basic::try_parse_from(["--help"]).expect_err("help short-circuits");
    let ArgsError::Usage(usage) = &err else {
        return Err(anyhow!("expected a usage error, got {err}"));
    };
    ensure!(usage.is_display_request());
    ensure!(usage.exit_code() == 0);
    Ok(())
}
