//! Unit tests for the clap-backed parser and its value checks.
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface parsing mistakes"
)]

use std::sync::OnceLock;

use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};

use super::*;
use crate::{ChoiceSet, FieldDescriptor, FieldMetadata, Nargs, TypeExpr};

#[fixture]
fn job_parser() -> Parser {
    let schema = Schema::builder("JobRunner")
        .about("Runs jobs")
        .field(
            FieldDescriptor::new("name", TypeExpr::string())
                .with_metadata(FieldMetadata::default().with_help("Job name")),
        )
        .field(
            FieldDescriptor::new("retries", TypeExpr::optional(TypeExpr::int()))
                .with_default(Value::Int(3)),
        )
        .field(FieldDescriptor::new("verbose", TypeExpr::bool()).with_default(Value::Bool(false)))
        .field(FieldDescriptor::new("tags", TypeExpr::list(TypeExpr::string())))
        .field(FieldDescriptor::new(
            "mode",
            TypeExpr::optional(TypeExpr::Choice(ChoiceSet::strings(["fast", "safe"]))),
        ))
        .build()
        .expect("valid schema");
    Parser::new(&schema, &BuildOptions::default()).expect("parser")
}

fn invalid_issues(err: UsageError) -> Result<Vec<UsageIssue>> {
    match err {
        UsageError::Invalid { issues, .. } => Ok(issues.into_iter().collect()),
        UsageError::Clap(err) => Err(anyhow!("expected value issues, got clap error: {err}")),
    }
}

#[rstest]
fn records_only_supplied_values(job_parser: Parser) -> Result<()> {
    let raw = job_parser.parse(["--name", "job1", "--tags", "a", "--tags", "b"])?;
    ensure!(raw.len() == 2);
    ensure!(raw.get("name") == Some(&Value::Str("job1".into())));
    ensure!(
        raw.get("tags")
            == Some(&Value::List(vec![
                Value::Str("a".into()),
                Value::Str("b".into())
            ]))
    );
    Ok(())
}

#[rstest]
fn constructs_with_defaults(job_parser: Parser) -> Result<()> {
    let raw = job_parser.parse(["--name", "job1", "--tags", "a", "--tags", "b"])?;
    let record = job_parser.construct(&raw)?;
    ensure!(record.get("retries") == Some(&Value::Int(3)));
    ensure!(record.get("verbose") == Some(&Value::Bool(false)));
    ensure!(record.get("mode") == Some(&Value::Null));
    Ok(())
}

#[rstest]
fn flag_presence_yields_true(job_parser: Parser) -> Result<()> {
    let raw = job_parser.parse(["--name", "x", "--verbose"])?;
    ensure!(raw.get("verbose") == Some(&Value::Bool(true)));
    Ok(())
}

#[rstest]
fn accepts_inline_values(job_parser: Parser) -> Result<()> {
    let raw = job_parser.parse(["--name=job1", "--retries=10"])?;
    ensure!(raw.get("retries") == Some(&Value::Int(10)));
    Ok(())
}

#[rstest]
fn last_occurrence_of_a_scalar_wins(job_parser: Parser) -> Result<()> {
    let raw = job_parser.parse(["--name", "a", "--name", "b"])?;
    ensure!(raw.get("name") == Some(&Value::Str("b".into())));
    Ok(())
}

#[rstest]
fn missing_required_flag_is_reported(job_parser: Parser) -> Result<()> {
    let err = job_parser.parse(["--verbose"]).expect_err("name is required");
    ensure!(err.exit_code() != 0);
    let issues = invalid_issues(err)?;
    ensure!(
        issues
            == [UsageIssue::MissingRequiredField {
                field: "name".into(),
                flag: "--name".into(),
            }]
    );
    Ok(())
}

#[rstest]
fn aggregates_every_issue(job_parser: Parser) -> Result<()> {
    let err = job_parser
        .parse(["--retries", "many", "--mode", "slow"])
        .expect_err("three problems");
    let usage = match &err {
        UsageError::Invalid { usage, .. } => usage.clone(),
        UsageError::Clap(_) => String::new(),
    };
    ensure!(usage.contains("job-runner"), "usage lacks program name: {usage}");
    let issues = invalid_issues(err)?;
    ensure!(issues.len() == 3, "unexpected issues: {issues:?}");
    ensure!(matches!(
        issues.first(),
        Some(UsageIssue::TypeMismatch { flag, token, .. }) if flag == "--retries" && token == "many"
    ));
    ensure!(matches!(
        issues.get(1),
        Some(UsageIssue::InvalidChoice { token, choices, .. })
            if token == "slow" && choices == "fast, safe"
    ));
    ensure!(matches!(
        issues.get(2),
        Some(UsageIssue::MissingRequiredField { field, .. }) if field == "name"
    ));
    Ok(())
}

#[rstest]
#[case("fast")]
#[case("safe")]
fn every_choice_round_trips(job_parser: Parser, #[case] choice: &str) -> Result<()> {
    let raw = job_parser.parse(["--name", "x", "--mode", choice])?;
    ensure!(raw.get("mode") == Some(&Value::Str(choice.to_owned())));
    Ok(())
}

#[rstest]
fn choices_are_case_sensitive(job_parser: Parser) -> Result<()> {
    let err = job_parser
        .parse(["--name", "x", "--mode", "FAST"])
        .expect_err("case mismatch");
    ensure!(matches!(
        invalid_issues(err)?.as_slice(),
        [UsageIssue::InvalidChoice { .. }]
    ));
    Ok(())
}

#[rstest]
fn unknown_flags_are_structural_errors(job_parser: Parser) -> Result<()> {
    let err = job_parser
        .parse(["--name", "x", "--bogus"])
        .expect_err("unknown flag");
    ensure!(matches!(err, UsageError::Clap(_)));
    ensure!(err.exit_code() == 2);
    Ok(())
}

#[rstest]
fn help_is_a_display_request(job_parser: Parser) -> Result<()> {
    let err = job_parser.parse(["--help"]).expect_err("help");
    ensure!(err.is_display_request());
    ensure!(err.exit_code() == 0);
    Ok(())
}

#[rstest]
fn help_lists_annotations(job_parser: Parser) -> Result<()> {
    let help = job_parser.render_help();
    ensure!(help.contains("Runs jobs"), "{help}");
    ensure!(help.contains("Job name [required]"), "{help}");
    ensure!(help.contains("[default: 3]"), "{help}");
    ensure!(help.contains("[choices: fast, safe]"), "{help}");
    ensure!(help.contains("--verbose"), "{help}");
    Ok(())
}

#[test]
fn negative_numbers_are_values() -> Result<()> {
    let schema = Schema::builder("Offset")
        .field(FieldDescriptor::new("delta", TypeExpr::int()))
        .build()?;
    let parser = Parser::new(&schema, &BuildOptions::default())?;
    let raw = parser.parse(["--delta", "-5"])?;
    ensure!(raw.get("delta") == Some(&Value::Int(-5)));
    Ok(())
}

#[test]
fn fixed_arity_lists_take_exact_token_counts() -> Result<()> {
    let schema = Schema::builder("Point")
        .field(
            FieldDescriptor::new("coords", TypeExpr::list(TypeExpr::int()))
                .with_metadata(FieldMetadata::default().with_nargs(Nargs::Exactly(2))),
        )
        .build()?;
    let parser = Parser::new(&schema, &BuildOptions::default())?;
    let raw = parser.parse(["--coords", "1", "2"])?;
    ensure!(raw.get("coords") == Some(&Value::List(vec![Value::Int(1), Value::Int(2)])));
    ensure!(matches!(
        parser.parse(["--coords", "1"]),
        Err(UsageError::Clap(_))
    ));
    ensure!(parser.parse(Vec::<String>::new()).is_err());
    Ok(())
}

#[test]
fn positional_arguments_bind_in_order() -> Result<()> {
    let schema = Schema::builder("Copy")
        .field(
            FieldDescriptor::new("source", TypeExpr::string())
                .with_metadata(FieldMetadata::default().as_positional()),
        )
        .field(
            FieldDescriptor::new("targets", TypeExpr::list(TypeExpr::string()))
                .with_metadata(FieldMetadata::default().as_positional()),
        )
        .build()?;
    let parser = Parser::new(&schema, &BuildOptions::default())?;
    let raw = parser.parse(["a.txt", "b.txt", "c.txt"])?;
    ensure!(raw.get("source") == Some(&Value::Str("a.txt".into())));
    ensure!(
        raw.get("targets")
            == Some(&Value::List(vec![
                Value::Str("b.txt".into()),
                Value::Str("c.txt".into())
            ]))
    );
    Ok(())
}

#[test]
fn variable_positional_must_be_last() -> Result<()> {
    let schema = Schema::builder("Copy")
        .field(
            FieldDescriptor::new("sources", TypeExpr::list(TypeExpr::string()))
                .with_metadata(FieldMetadata::default().as_positional()),
        )
        .field(
            FieldDescriptor::new("target", TypeExpr::string())
                .with_metadata(FieldMetadata::default().as_positional()),
        )
        .build()?;
    let err = Parser::new(&schema, &BuildOptions::default()).expect_err("ambiguous positionals");
    ensure!(err.is_developer_error());
    Ok(())
}

#[test]
fn counters_count_occurrences() -> Result<()> {
    let schema = Schema::builder("Chatty")
        .field(
            FieldDescriptor::new(
                "verbosity",
                TypeExpr::Scalar(crate::ScalarKind::Integer {
                    bits: 8,
                    signed: false,
                }),
            )
            .with_metadata(
                FieldMetadata::default()
                    .with_cli_short('v')
                    .with_behavior(crate::BehaviorOverride::Count),
            ),
        )
        .build()?;
    let parser = Parser::new(&schema, &BuildOptions::default())?;
    let raw = parser.parse(["-v", "-v", "--verbosity"])?;
    ensure!(raw.get("verbosity") == Some(&Value::UInt(3)));
    let record = parser.construct(&parser.parse(Vec::<String>::new())?)?;
    ensure!(record.get("verbosity") == Some(&Value::UInt(0)));
    Ok(())
}

fn limits() -> Result<&'static Schema, SchemaError> {
    static SCHEMA: OnceLock<Result<Schema, SchemaError>> = OnceLock::new();
    SCHEMA
        .get_or_init(|| {
            Schema::builder("Limits")
                .field(FieldDescriptor::new("cpu", TypeExpr::int()))
                .field(FieldDescriptor::new("memory", TypeExpr::int()).with_default(Value::Int(512)))
                .build()
        })
        .as_ref()
        .map_err(Clone::clone)
}

fn grouped_parser() -> Result<Parser> {
    let schema = Schema::builder("Job")
        .field(FieldDescriptor::new(
            "limits",
            TypeExpr::optional(TypeExpr::Nested(SchemaRef::new("Limits", limits))),
        ))
        .build()?;
    Ok(Parser::new(&schema, &BuildOptions::default())?)
}

#[test]
fn absent_optional_group_is_null() -> Result<()> {
    let parser = grouped_parser()?;
    let record = parser.construct(&parser.parse(Vec::<String>::new())?)?;
    ensure!(record.get("limits") == Some(&Value::Null));
    Ok(())
}

#[test]
fn partially_supplied_group_enforces_members() -> Result<()> {
    let parser = grouped_parser()?;
    let err = parser
        .parse(["--limits.memory", "1024"])
        .expect_err("cpu is required once the group is used");
    ensure!(matches!(
        invalid_issues(err)?.as_slice(),
        [UsageIssue::MissingRequiredField { field, flag }]
            if field == "limits.cpu" && flag == "--limits.cpu"
    ));
    Ok(())
}

#[test]
fn supplied_group_builds_nested_record() -> Result<()> {
    let parser = grouped_parser()?;
    let record = parser.construct(&parser.parse(["--limits.cpu", "2"])?)?;
    let Some(Value::Record(limits)) = record.get("limits") else {
        return Err(anyhow!("expected nested record, got {record}"));
    };
    ensure!(limits.name() == "Limits");
    ensure!(limits.get("cpu") == Some(&Value::Int(2)));
    ensure!(limits.get("memory") == Some(&Value::Int(512)));
    Ok(())
}
