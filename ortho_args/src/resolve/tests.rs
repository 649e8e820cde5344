//! Unit tests for the coercion decision table and nested resolution.
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface parsing mistakes"
)]

use std::sync::OnceLock;

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;

use super::*;
use crate::FieldMetadata;

fn resolve_with(field: &FieldDescriptor, options: &BuildOptions) -> Result<FieldBehavior> {
    Ok(Resolver::new(options).resolve(field)?)
}

fn resolve_one(field: &FieldDescriptor) -> Result<FieldBehavior> {
    resolve_with(field, &BuildOptions::default())
}

fn value_behavior(behavior: FieldBehavior) -> Result<ValueBehavior> {
    match behavior {
        FieldBehavior::Scalar(value) | FieldBehavior::Repeated(value) => Ok(value),
        other => Err(anyhow!("expected a value behaviour, got {other:?}")),
    }
}

fn limits() -> Result<&'static Schema, SchemaError> {
    static SCHEMA: OnceLock<Result<Schema, SchemaError>> = OnceLock::new();
    SCHEMA
        .get_or_init(|| {
            Schema::builder("Limits")
                .field(FieldDescriptor::new("cpu", TypeExpr::int()))
                .build()
        })
        .as_ref()
        .map_err(Clone::clone)
}

fn left() -> Result<&'static Schema, SchemaError> {
    static SCHEMA: OnceLock<Result<Schema, SchemaError>> = OnceLock::new();
    SCHEMA
        .get_or_init(|| {
            Schema::builder("Left")
                .field(FieldDescriptor::new(
                    "right",
                    TypeExpr::Nested(SchemaRef::new("Right", right)),
                ))
                .build()
        })
        .as_ref()
        .map_err(Clone::clone)
}

fn right() -> Result<&'static Schema, SchemaError> {
    static SCHEMA: OnceLock<Result<Schema, SchemaError>> = OnceLock::new();
    SCHEMA
        .get_or_init(|| {
            Schema::builder("Right")
                .field(FieldDescriptor::new(
                    "left",
                    TypeExpr::Nested(SchemaRef::new("Left", left)),
                ))
                .build()
        })
        .as_ref()
        .map_err(Clone::clone)
}

#[test]
fn bool_resolves_to_flag_defaulting_false() -> Result<()> {
    let behavior = resolve_one(&FieldDescriptor::new("verbose", TypeExpr::bool()))?;
    ensure!(matches!(behavior, FieldBehavior::Flag { default: false }));
    Ok(())
}

#[test]
fn bool_flag_honours_declared_default() -> Result<()> {
    let field = FieldDescriptor::new("colour", TypeExpr::bool()).with_default(Value::Bool(true));
    ensure!(matches!(resolve_one(&field)?, FieldBehavior::Flag { default: true }));
    Ok(())
}

#[test]
fn plain_scalar_is_required_without_default() -> Result<()> {
    let value = value_behavior(resolve_one(&FieldDescriptor::new("name", TypeExpr::string()))?)?;
    ensure!(value.arity == Arity::One);
    ensure!(value.required);
    ensure!(value.default.is_none());
    ensure!(matches!(value.converter, Converter::Scalar(ScalarKind::String)));
    Ok(())
}

#[test]
fn optional_drops_required_and_widens_arity() -> Result<()> {
    let field = FieldDescriptor::new("retries", TypeExpr::optional(TypeExpr::int()));
    let value = value_behavior(resolve_one(&field)?)?;
    ensure!(value.arity == Arity::ZeroOrOne);
    ensure!(!value.required);
    Ok(())
}

#[test]
fn optional_bool_takes_a_token() -> Result<()> {
    let field = FieldDescriptor::new("colour", TypeExpr::optional(TypeExpr::bool()));
    let value = value_behavior(resolve_one(&field)?)?;
    ensure!(value.arity == Arity::ZeroOrOne);
    ensure!(matches!(value.converter, Converter::Scalar(ScalarKind::Bool)));
    Ok(())
}

#[rstest]
#[case::implicit(true, false, Some(Value::List(Vec::new())))]
#[case::explicit_only(false, true, None)]
fn list_default_policy_is_configurable(
    #[case] implicit: bool,
    #[case] required: bool,
    #[case] default: Option<Value>,
) -> Result<()> {
    let options = BuildOptions::default().with_implicit_list_default(implicit);
    let field = FieldDescriptor::new("tags", TypeExpr::list(TypeExpr::string()));
    let behavior = resolve_with(&field, &options)?;
    ensure!(matches!(behavior, FieldBehavior::Repeated(_)));
    let value = value_behavior(behavior)?;
    ensure!(value.arity == Arity::ZeroOrMore);
    ensure!(value.required == required);
    ensure!(value.default.as_ref().map(DefaultValue::materialize) == default);
    Ok(())
}

#[rstest]
#[case::implicit_dropped(None, None)]
#[case::declared_kept(
    Some(Value::List(vec![Value::Str("base".into())])),
    Some(Value::List(vec![Value::Str("base".into())]))
)]
fn optional_list_defaults_only_when_declared(
    #[case] declared: Option<Value>,
    #[case] expected: Option<Value>,
) -> Result<()> {
    let mut field = FieldDescriptor::new(
        "extra",
        TypeExpr::optional(TypeExpr::list(TypeExpr::string())),
    );
    if let Some(default) = declared {
        field = field.with_default(default);
    }
    let behavior = resolve_one(&field)?;
    ensure!(matches!(behavior, FieldBehavior::Repeated(_)));
    let value = value_behavior(behavior)?;
    ensure!(!value.required);
    ensure!(value.default.as_ref().map(DefaultValue::materialize) == expected);
    Ok(())
}

#[rstest]
#[case::exactly(Nargs::Exactly(2), Arity::Exactly(2))]
#[case::at_least_one(Nargs::AtLeastOne, Arity::OneOrMore)]
fn nargs_lists_are_required_without_default(
    #[case] nargs: Nargs,
    #[case] arity: Arity,
) -> Result<()> {
    let field = FieldDescriptor::new("values", TypeExpr::list(TypeExpr::int()))
        .with_metadata(FieldMetadata::default().with_nargs(nargs));
    let value = value_behavior(resolve_one(&field)?)?;
    ensure!(value.arity == arity);
    ensure!(value.required);
    Ok(())
}

#[test]
fn choice_populates_options() -> Result<()> {
    let field = FieldDescriptor::new("mode", TypeExpr::Choice(ChoiceSet::strings(["fast", "safe"])));
    let value = value_behavior(resolve_one(&field)?)?;
    ensure!(
        value.choices == Some(vec![Value::Str("fast".into()), Value::Str("safe".into())])
    );
    Ok(())
}

#[test]
fn override_is_used_verbatim() -> Result<()> {
    let field = FieldDescriptor::new("verbosity", TypeExpr::Scalar(ScalarKind::Integer {
        bits: 8,
        signed: false,
    }))
    .with_metadata(FieldMetadata::default().with_behavior(BehaviorOverride::Count));
    ensure!(matches!(resolve_one(&field)?, FieldBehavior::Count { default: None }));
    Ok(())
}

#[test]
fn custom_converter_replaces_canonical_coercion() -> Result<()> {
    fn shout(token: &str) -> Result<Value, String> {
        Ok(Value::Str(token.to_uppercase()))
    }
    let field = FieldDescriptor::new("name", TypeExpr::string())
        .with_metadata(FieldMetadata::default().with_converter(shout));
    let value = value_behavior(resolve_one(&field)?)?;
    ensure!(value.converter.convert("abc") == Ok(Value::Str("ABC".into())));
    Ok(())
}

#[test]
fn nested_schema_is_resolved_lazily() -> Result<()> {
    let field = FieldDescriptor::new("limits", TypeExpr::Nested(SchemaRef::new("Limits", limits)));
    let FieldBehavior::Nested(nested) = resolve_one(&field)? else {
        return Err(anyhow!("expected nested behaviour"));
    };
    ensure!(nested.schema_name == "Limits");
    ensure!(nested.fields.len() == 1);
    ensure!(!nested.is_optional_group());
    Ok(())
}

#[test]
fn optional_nested_forms_a_group() -> Result<()> {
    let field = FieldDescriptor::new(
        "limits",
        TypeExpr::optional(TypeExpr::Nested(SchemaRef::new("Limits", limits))),
    );
    let FieldBehavior::Nested(nested) = resolve_one(&field)? else {
        return Err(anyhow!("expected nested behaviour"));
    };
    ensure!(nested.is_optional_group());
    Ok(())
}

#[test]
fn cyclic_nesting_is_rejected() {
    let options = BuildOptions::default();
    let err = Resolver::new(&options)
        .resolve_ref(SchemaRef::new("Left", left))
        .expect_err("cycle");
    assert_eq!(
        err,
        SchemaError::CyclicNesting {
            cycle: "Left -> Right -> Left".to_owned(),
        }
    );
}
