//! Declaration-time construction and validation of schemas.

use std::collections::HashSet;

use crate::{
    BehaviorOverride, ChoiceSet, DefaultValue, FieldDescriptor, Nargs, ScalarKind, Schema,
    SchemaError, TypeExpr, Value,
};

/// Accumulates field descriptors and validates them on [`build`].
///
/// [`build`]: SchemaBuilder::build
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    about: Option<String>,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    /// Starts a schema called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            fields: Vec::new(),
        }
    }

    /// Sets the description used as the parser's about text.
    #[must_use]
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Appends a field; declaration order is preserved.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Validates the declaration and produces the schema.
    ///
    /// Nested schemas are not resolved here; only the shape of each field is
    /// checked.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] for duplicate field names, unsupported type
    /// shapes, malformed choices, defaults that do not fit their field, and
    /// contradictory metadata.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !seen.insert(field.name()) {
                return Err(SchemaError::DuplicateField {
                    schema: self.name.clone(),
                    field: field.name().to_owned(),
                });
            }
            validate_field(field)?;
        }
        Ok(Schema {
            name: self.name,
            about: self.about,
            fields: self.fields,
        })
    }
}

fn invalid_metadata(field: &FieldDescriptor, detail: impl Into<String>) -> SchemaError {
    SchemaError::InvalidMetadata {
        field: field.name().to_owned(),
        detail: detail.into(),
    }
}

fn unsupported(field: &str, detail: impl Into<String>) -> SchemaError {
    SchemaError::UnsupportedType {
        field: field.to_owned(),
        detail: detail.into(),
    }
}

fn validate_field(field: &FieldDescriptor) -> Result<(), SchemaError> {
    validate_type(field.name(), field.ty())?;
    validate_flags(field)?;
    validate_shape_metadata(field)?;
    validate_default(field)
}

fn validate_type(field: &str, ty: &TypeExpr) -> Result<(), SchemaError> {
    match ty {
        TypeExpr::Optional(inner) => match inner.as_ref() {
            TypeExpr::Optional(_) => Err(unsupported(field, "Option<Option<_>> is ambiguous")),
            other => validate_type(field, other),
        },
        TypeExpr::List(inner) => match inner.as_ref() {
            TypeExpr::Scalar(_) => Ok(()),
            TypeExpr::Choice(set) => validate_choices(field, set),
            other => Err(unsupported(
                field,
                format!("lists of {other} are not supported"),
            )),
        },
        TypeExpr::Choice(set) => validate_choices(field, set),
        TypeExpr::Scalar(_) | TypeExpr::Nested(_) => Ok(()),
    }
}

fn validate_choices(field: &str, set: &ChoiceSet) -> Result<(), SchemaError> {
    if set.options().is_empty() {
        return Err(SchemaError::InvalidChoices {
            field: field.to_owned(),
            detail: "no options declared".to_owned(),
        });
    }
    if let Some(bad) = set.options().iter().find(|option| !set.kind().accepts(option)) {
        return Err(SchemaError::InvalidChoices {
            field: field.to_owned(),
            detail: format!("{} is not a {}", bad.describe(), set.kind()),
        });
    }
    Ok(())
}

/// Returns the long-flag validation failure, mirroring clap's constraints.
pub(crate) fn long_validation_error(long: &str) -> Option<String> {
    if long.is_empty() {
        Some("flag must be non-empty".to_owned())
    } else if long.starts_with(['-', '_']) {
        Some(format!("flag '{long}' must not start with '-' or '_'"))
    } else if !long.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        Some(format!(
            "flag '{long}' must contain only ASCII alphanumeric characters or '-'"
        ))
    } else {
        None
    }
}

fn validate_flags(field: &FieldDescriptor) -> Result<(), SchemaError> {
    let metadata = field.metadata();
    if let Some(message) = metadata.cli_long().and_then(long_validation_error) {
        return Err(invalid_metadata(field, message));
    }
    if let Some(short) = metadata.cli_short() {
        if !short.is_ascii_alphanumeric() {
            return Err(invalid_metadata(
                field,
                format!("short flag '{short}' must be ASCII alphanumeric"),
            ));
        }
        if matches!(field.ty().without_optional(), TypeExpr::Nested(_)) {
            return Err(invalid_metadata(field, "nested records cannot take a short flag"));
        }
    }
    if metadata.is_positional() {
        if metadata.cli_long().is_some() || metadata.cli_short().is_some() {
            return Err(invalid_metadata(field, "positional fields cannot declare flags"));
        }
        if metadata.is_excluded() {
            return Err(invalid_metadata(field, "a field cannot be both positional and skipped"));
        }
        if matches!(field.ty(), TypeExpr::Scalar(ScalarKind::Bool))
            || matches!(field.ty().without_optional(), TypeExpr::Nested(_))
            || matches!(
                metadata.behavior(),
                Some(BehaviorOverride::Flag { .. } | BehaviorOverride::Count)
            )
        {
            return Err(invalid_metadata(
                field,
                format!("{} fields cannot be positional", field.ty()),
            ));
        }
    }
    Ok(())
}

/// Innermost element type once `Option` and `Vec` wrappers are removed.
fn element(ty: &TypeExpr) -> &TypeExpr {
    match ty.without_optional() {
        TypeExpr::List(inner) => inner,
        other => other,
    }
}

fn validate_shape_metadata(field: &FieldDescriptor) -> Result<(), SchemaError> {
    let metadata = field.metadata();
    let base = field.ty().without_optional();
    match metadata.nargs() {
        Some(_) if !matches!(base, TypeExpr::List(_)) => {
            return Err(invalid_metadata(field, "nargs requires a list field"));
        }
        Some(Nargs::Exactly(0)) => {
            return Err(invalid_metadata(field, "nargs must be at least 1"));
        }
        _ => {}
    }
    if metadata.is_excluded() && !field.has_default() {
        return Err(invalid_metadata(field, "fields skipped from the CLI need a default"));
    }
    let is_flag = matches!(field.ty(), TypeExpr::Scalar(ScalarKind::Bool));
    if metadata.converter().is_some()
        && (is_flag || matches!(element(field.ty()), TypeExpr::Nested(_)))
    {
        return Err(invalid_metadata(
            field,
            format!("a converter cannot apply to {}", field.ty()),
        ));
    }
    if let Some(choices) = metadata.choices() {
        validate_metadata_choices(field, choices)?;
    }
    match metadata.behavior() {
        Some(BehaviorOverride::Count)
            if !matches!(base, TypeExpr::Scalar(ScalarKind::Integer { .. })) =>
        {
            Err(invalid_metadata(field, "counters require an integer field"))
        }
        Some(BehaviorOverride::Flag { .. }) if !is_flag => {
            Err(invalid_metadata(field, "flag behaviour requires a bool field"))
        }
        _ => Ok(()),
    }
}

fn validate_metadata_choices(field: &FieldDescriptor, choices: &[Value]) -> Result<(), SchemaError> {
    let TypeExpr::Scalar(kind) = element(field.ty()) else {
        return Err(invalid_metadata(
            field,
            format!("choices cannot apply to {}", field.ty()),
        ));
    };
    if *kind == ScalarKind::Bool && !matches!(field.ty(), TypeExpr::List(_)) {
        return Err(invalid_metadata(field, "choices cannot apply to a flag"));
    }
    let set = ChoiceSet::new(*kind, choices.iter().cloned());
    if field.metadata().converter().is_some() && !set.options().is_empty() {
        return Ok(());
    }
    validate_choices(field.name(), &set)
}

fn fits(ty: &TypeExpr, value: &Value) -> bool {
    match (ty, value) {
        (TypeExpr::Scalar(kind), v) => kind.accepts(v),
        (TypeExpr::Optional(_), Value::Null) => true,
        (TypeExpr::Optional(inner), v) => fits(inner, v),
        (TypeExpr::List(inner), Value::List(items)) => items.iter().all(|item| fits(inner, item)),
        (TypeExpr::Choice(set), v) => set.options().contains(v),
        (TypeExpr::Nested(_), Value::Record(_)) => true,
        _ => false,
    }
}

fn validate_default(field: &FieldDescriptor) -> Result<(), SchemaError> {
    let Some(DefaultValue::Value(value)) = field.default() else {
        return Ok(());
    };
    if field.metadata().converter().is_some() || field.metadata().behavior().is_some() {
        return Ok(());
    }
    if fits(field.ty(), value) {
        Ok(())
    } else {
        Err(invalid_metadata(
            field,
            format!("default {} does not fit {}", value.describe(), field.ty()),
        ))
    }
}
