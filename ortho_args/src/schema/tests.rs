//! Unit tests for schema declaration and validation.
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface parsing mistakes"
)]

use rstest::rstest;

use super::*;
use crate::{BehaviorOverride, Nargs, SchemaError};

fn build_one(field: FieldDescriptor) -> Result<Schema, SchemaError> {
    Schema::builder("Sample").field(field).build()
}

fn metadata_error(field: FieldDescriptor) -> String {
    match build_one(field) {
        Err(SchemaError::InvalidMetadata { detail, .. }) => detail,
        other => panic!("expected invalid metadata, got {other:?}"),
    }
}

#[test]
fn preserves_declaration_order() {
    let schema = Schema::builder("Job")
        .about("Runs a job")
        .field(FieldDescriptor::new("name", TypeExpr::string()))
        .field(FieldDescriptor::new("retries", TypeExpr::int()))
        .field(FieldDescriptor::new("verbose", TypeExpr::bool()))
        .build()
        .expect("valid schema");
    let names: Vec<&str> = schema.fields().iter().map(FieldDescriptor::name).collect();
    assert_eq!(names, ["name", "retries", "verbose"]);
    assert_eq!(schema.about(), Some("Runs a job"));
    assert!(schema.field("retries").is_some());
    assert!(schema.field("absent").is_none());
}

#[test]
fn rejects_duplicate_fields() {
    let err = Schema::builder("Job")
        .field(FieldDescriptor::new("name", TypeExpr::string()))
        .field(FieldDescriptor::new("name", TypeExpr::int()))
        .build()
        .expect_err("duplicate field");
    assert_eq!(
        err,
        SchemaError::DuplicateField {
            schema: "Job".to_owned(),
            field: "name".to_owned(),
        }
    );
}

#[rstest]
#[case::nested_option(TypeExpr::optional(TypeExpr::optional(TypeExpr::int())))]
#[case::list_of_lists(TypeExpr::list(TypeExpr::list(TypeExpr::int())))]
#[case::list_of_options(TypeExpr::list(TypeExpr::optional(TypeExpr::int())))]
fn rejects_unsupported_shapes(#[case] ty: TypeExpr) {
    let err = build_one(FieldDescriptor::new("value", ty)).expect_err("unsupported");
    assert!(
        matches!(err, SchemaError::UnsupportedType { .. }),
        "unexpected error: {err:?}"
    );
}

#[rstest]
#[case::empty(ChoiceSet::strings(Vec::<String>::new()))]
#[case::mixed(ChoiceSet::new(ScalarKind::String, [Value::Str("a".into()), Value::Int(1)]))]
fn rejects_invalid_choice_sets(#[case] set: ChoiceSet) {
    let err = build_one(FieldDescriptor::new("mode", TypeExpr::Choice(set))).expect_err("choices");
    assert!(
        matches!(err, SchemaError::InvalidChoices { .. }),
        "unexpected error: {err:?}"
    );
}

#[test]
fn skipped_fields_need_a_default() {
    let detail = metadata_error(
        FieldDescriptor::new("token", TypeExpr::string())
            .with_metadata(FieldMetadata::default().excluded_from_cli()),
    );
    assert!(detail.contains("need a default"), "{detail}");
}

#[rstest]
#[case::not_a_list(
    FieldDescriptor::new("value", TypeExpr::int())
        .with_metadata(FieldMetadata::default().with_nargs(Nargs::Exactly(2))),
    "nargs requires a list field"
)]
#[case::zero(
    FieldDescriptor::new("values", TypeExpr::list(TypeExpr::int()))
        .with_metadata(FieldMetadata::default().with_nargs(Nargs::Exactly(0))),
    "at least 1"
)]
#[case::bad_long(
    FieldDescriptor::new("value", TypeExpr::int())
        .with_metadata(FieldMetadata::default().with_cli_long("-value")),
    "must not start with"
)]
#[case::bad_short(
    FieldDescriptor::new("value", TypeExpr::int())
        .with_metadata(FieldMetadata::default().with_cli_short('?')),
    "ASCII alphanumeric"
)]
#[case::positional_flag(
    FieldDescriptor::new("verbose", TypeExpr::bool())
        .with_metadata(FieldMetadata::default().as_positional()),
    "cannot be positional"
)]
#[case::count_on_string(
    FieldDescriptor::new("level", TypeExpr::string())
        .with_metadata(FieldMetadata::default().with_behavior(BehaviorOverride::Count)),
    "counters require an integer field"
)]
#[case::choices_on_flag(
    FieldDescriptor::new("verbose", TypeExpr::bool())
        .with_metadata(FieldMetadata::default().with_choices([Value::Bool(true)])),
    "choices cannot apply to a flag"
)]
fn rejects_contradictory_metadata(#[case] field: FieldDescriptor, #[case] expected: &str) {
    let detail = metadata_error(field);
    assert!(detail.contains(expected), "'{detail}' lacks '{expected}'");
}

#[test]
fn rejects_defaults_that_do_not_fit() {
    let detail = metadata_error(
        FieldDescriptor::new("retries", TypeExpr::int()).with_default(Value::Str("three".into())),
    );
    assert!(detail.contains("does not fit"), "{detail}");
}

#[test]
fn accepts_choice_defaults_from_the_set() {
    let field = FieldDescriptor::new("mode", TypeExpr::Choice(ChoiceSet::strings(["fast", "safe"])))
        .with_default(Value::Str("safe".into()));
    assert!(build_one(field).is_ok());
}

#[test]
fn default_display_hides_empty_values() {
    assert_eq!(DefaultValue::Value(Value::Null).display(), None);
    assert_eq!(DefaultValue::Value(Value::List(Vec::new())).display(), None);
    assert_eq!(DefaultValue::Factory(|| Value::Int(1)).display(), None);
    assert_eq!(
        DefaultValue::Value(Value::Int(3)).display(),
        Some("3".to_owned())
    );
}

#[test]
fn type_expressions_render_structurally() {
    let ty = TypeExpr::optional(TypeExpr::list(TypeExpr::Choice(ChoiceSet::strings([
        "a", "b",
    ]))));
    assert_eq!(ty.to_string(), "Option<Vec<one of {a, b}>>");
}
