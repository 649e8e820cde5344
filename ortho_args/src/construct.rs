//! Instance construction: parsed values plus defaults to a record.
//!
//! Construction is a pure function of the resolved fields and the raw map.
//! Defaults are materialized afresh for every call, so no two records share
//! a default value.

use crate::{
    ArgsResult, BuildOptions, ConstructError, DefaultValue, FieldBehavior, NestedBehavior,
    RawResultMap, Record, ResolvedField, Resolver, Schema, Value, ValueBehavior,
};

/// Builds a record for `schema` from `raw` using default build options.
///
/// # Errors
///
/// Returns [`ArgsError::Schema`] when a nested schema cannot be resolved and
/// [`ArgsError::Construct`] when a required field is missing or a value does
/// not fit its field.
///
/// [`ArgsError::Schema`]: crate::ArgsError::Schema
/// [`ArgsError::Construct`]: crate::ArgsError::Construct
///
/// # Examples
///
/// ```
/// use ortho_args::{FieldDescriptor, RawResultMap, Schema, TypeExpr, Value, construct};
///
/// let schema = Schema::builder("Job")
///     .field(FieldDescriptor::new("name", TypeExpr::string()))
///     .field(FieldDescriptor::new("retries", TypeExpr::int()).with_default(Value::Int(3)))
///     .build()?;
/// let raw: RawResultMap = [("name", Value::Str("job1".into()))].into_iter().collect();
/// let record = construct(&schema, &raw)?;
/// assert_eq!(record.get("retries"), Some(&Value::Int(3)));
/// # Ok::<(), ortho_args::ArgsError>(())
/// ```
pub fn construct(schema: &Schema, raw: &RawResultMap) -> ArgsResult<Record> {
    construct_with(schema, raw, &BuildOptions::default())
}

/// Builds a record for `schema` from `raw`, resolving behaviours with
/// `options`.
///
/// `options` must match those the raw map was parsed with, since they decide
/// the key separator and list defaults.
///
/// # Errors
///
/// As for [`construct`].
pub fn construct_with(
    schema: &Schema,
    raw: &RawResultMap,
    options: &BuildOptions,
) -> ArgsResult<Record> {
    let fields = Resolver::new(options).resolve_schema(schema)?;
    Ok(construct_record(
        schema.name(),
        &fields,
        raw,
        None,
        options.separator(),
    )?)
}

pub(crate) fn construct_record(
    schema_name: &str,
    fields: &[ResolvedField],
    raw: &RawResultMap,
    prefix: Option<&str>,
    separator: &str,
) -> Result<Record, ConstructError> {
    let mut record = Record::new(schema_name);
    for field in fields {
        let name = field.descriptor.name();
        let key = prefix.map_or_else(
            || name.to_owned(),
            |parent| format!("{parent}{separator}{name}"),
        );
        let value = if field.descriptor.metadata().is_excluded() {
            excluded_value(field, &key)?
        } else {
            field_value(field, &key, raw, separator)?
        };
        record.insert(name, value);
    }
    Ok(record)
}

fn excluded_value(field: &ResolvedField, key: &str) -> Result<Value, ConstructError> {
    field
        .descriptor
        .default()
        .map(DefaultValue::materialize)
        .ok_or_else(|| ConstructError::MissingRequiredField {
            field: key.to_owned(),
        })
}

fn field_value(
    field: &ResolvedField,
    key: &str,
    raw: &RawResultMap,
    separator: &str,
) -> Result<Value, ConstructError> {
    match &field.behavior {
        FieldBehavior::Flag { default } => Ok(raw
            .get(key)
            .cloned()
            .unwrap_or(Value::Bool(*default))),
        FieldBehavior::Count { default } => Ok(raw.get(key).cloned().unwrap_or_else(|| {
            default
                .as_ref()
                .map_or(Value::UInt(0), DefaultValue::materialize)
        })),
        FieldBehavior::Scalar(behavior) => scalar_value(behavior, key, raw, false),
        FieldBehavior::Repeated(behavior) => scalar_value(behavior, key, raw, true),
        FieldBehavior::Nested(nested) => nested_value(nested, key, raw, separator),
    }
}

fn scalar_value(
    behavior: &ValueBehavior,
    key: &str,
    raw: &RawResultMap,
    repeated: bool,
) -> Result<Value, ConstructError> {
    let Some(value) = raw.get(key) else {
        return match &behavior.default {
            Some(default) => {
                tracing::trace!(key, "applied default");
                Ok(default.materialize())
            }
            None if behavior.required => Err(ConstructError::MissingRequiredField {
                field: key.to_owned(),
            }),
            None => Ok(Value::Null),
        };
    };
    let fits = match value {
        Value::List(items) if repeated => items.iter().all(|item| behavior.converter.accepts(item)),
        _ if repeated => false,
        single => behavior.converter.accepts(single),
    };
    if !fits {
        let expected = if repeated {
            format!("list of {}", behavior.converter.expected())
        } else {
            behavior.converter.expected()
        };
        return Err(ConstructError::mismatch(expected, value).at_field(key));
    }
    Ok(value.clone())
}

fn nested_value(
    nested: &NestedBehavior,
    key: &str,
    raw: &RawResultMap,
    separator: &str,
) -> Result<Value, ConstructError> {
    if nested.is_optional_group() && !raw.has_prefix(key, separator) {
        tracing::trace!(key, "nested group absent");
        return Ok(nested
            .default
            .as_ref()
            .map_or(Value::Null, DefaultValue::materialize));
    }
    construct_record(&nested.schema_name, &nested.fields, raw, Some(key), separator)
        .map(Value::Record)
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests panic to surface parsing mistakes"
)]
mod tests {
    use super::*;
    use crate::{ChoiceSet, FieldDescriptor, FieldMetadata, TypeExpr};
    use anyhow::{Result, ensure};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn job_schema() -> Schema {
        Schema::builder("Job")
            .field(FieldDescriptor::new("name", TypeExpr::string()))
            .field(
                FieldDescriptor::new("retries", TypeExpr::optional(TypeExpr::int()))
                    .with_default(Value::Int(3)),
            )
            .field(FieldDescriptor::new("verbose", TypeExpr::bool()).with_default(Value::Bool(false)))
            .field(FieldDescriptor::new("tags", TypeExpr::list(TypeExpr::string())))
            .build()
            .expect("valid schema")
    }

    #[test]
    fn applies_defaults_for_absent_fields() -> Result<()> {
        let raw: RawResultMap = [("name", Value::Str("job1".into()))].into_iter().collect();
        let record = construct(&job_schema(), &raw)?;
        ensure!(record.get("retries") == Some(&Value::Int(3)));
        ensure!(record.get("verbose") == Some(&Value::Bool(false)));
        ensure!(record.get("tags") == Some(&Value::List(Vec::new())));
        let names: Vec<&str> = record.iter().map(|(field, _)| field).collect();
        ensure!(names == ["name", "retries", "verbose", "tags"]);
        Ok(())
    }

    #[test]
    fn missing_required_field_is_reported() {
        let err = construct(&job_schema(), &RawResultMap::new()).expect_err("name is required");
        assert!(
            matches!(
                &err,
                crate::ArgsError::Construct(ConstructError::MissingRequiredField { field }) if field == "name"
            ),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn rechecks_value_kinds() {
        let raw: RawResultMap = [
            ("name", Value::Str("job1".into())),
            ("retries", Value::Str("three".into())),
        ]
        .into_iter()
        .collect();
        let err = construct(&job_schema(), &raw).expect_err("mismatch");
        assert!(
            matches!(
                &err,
                crate::ArgsError::Construct(ConstructError::TypeMismatch { field, .. }) if field == "retries"
            ),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn construction_is_repeatable() -> Result<()> {
        let schema = job_schema();
        let raw: RawResultMap = [("name", Value::Str("job1".into()))].into_iter().collect();
        let first = construct(&schema, &raw)?;
        let second = construct(&schema, &raw)?;
        ensure!(first == second);
        Ok(())
    }

    static CALLS: AtomicUsize = AtomicUsize::new(0);

    fn counted_default() -> Value {
        CALLS.fetch_add(1, Ordering::SeqCst);
        Value::Str("generated".into())
    }

    #[test]
    fn factories_run_only_when_absent() -> Result<()> {
        let schema = Schema::builder("Labelled")
            .field(
                FieldDescriptor::new("label", TypeExpr::string())
                    .with_default(DefaultValue::Factory(counted_default)),
            )
            .build()?;
        let supplied: RawResultMap = [("label", Value::Str("given".into()))].into_iter().collect();
        construct(&schema, &supplied)?;
        ensure!(CALLS.load(Ordering::SeqCst) == 0);
        let record = construct(&schema, &RawResultMap::new())?;
        ensure!(CALLS.load(Ordering::SeqCst) == 1);
        ensure!(record.get("label") == Some(&Value::Str("generated".into())));
        Ok(())
    }

    #[test]
    fn excluded_fields_take_their_default() -> Result<()> {
        let schema = Schema::builder("Hidden")
            .field(
                FieldDescriptor::new("mode", TypeExpr::Choice(ChoiceSet::strings(["a", "b"])))
                    .with_default(Value::Str("b".into()))
                    .with_metadata(FieldMetadata::default().excluded_from_cli()),
            )
            .build()?;
        let record = construct(&schema, &RawResultMap::new())?;
        ensure!(record.get("mode") == Some(&Value::Str("b".into())));
        Ok(())
    }
}
