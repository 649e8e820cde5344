//! Parser builder: lowers resolved field behaviours to argument specs.
//!
//! Each field that is not skipped produces exactly one [`ArgumentSpec`];
//! nested records contribute the specs of their own fields under a prefix
//! formed from the parent's flag segment and the separator, e.g.
//! `--limits.cpu`. Every long and short flag is claimed once; a second claim
//! is a [`FlagCollisionError`].

mod flags;

use heck::ToShoutySnakeCase;

use crate::{
    Arity, BuildOptions, Converter, DefaultValue, FieldBehavior, FlagCollisionError,
    ResolvedField, Value, ValueBehavior, schema::render_options,
};
use flags::{FlagClaims, join, segment};

/// Parsing contract for one command-line option or positional argument.
#[derive(Debug, Clone)]
pub struct ArgumentSpec {
    /// Key under which the parsed value is stored, e.g. `limits.cpu`.
    pub key: String,
    /// Long flag without dashes; `None` for positional arguments.
    pub long: Option<String>,
    /// Short flag.
    pub short: Option<char>,
    /// Whether the argument is bound by position.
    pub positional: bool,
    /// Token count.
    pub arity: Arity,
    /// Token converter; `None` for flags and counters.
    pub converter: Option<Converter>,
    /// Value applied when the argument is absent.
    pub default: Option<DefaultValue>,
    /// Whether the argument must be supplied.
    pub required: bool,
    /// Help text, including the choices annotation.
    pub help: Option<String>,
    /// Accepted values, if restricted.
    pub choices: Option<Vec<Value>>,
    /// Placeholder shown in usage.
    pub value_name: String,
    /// Key of the innermost optional nested record containing the argument.
    ///
    /// Required arguments inside such a group are only enforced once some
    /// argument of the group has been supplied.
    pub group: Option<String>,
}

impl ArgumentSpec {
    /// How the argument is named in diagnostics: `--flag` or `<VALUE>`.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.long {
            Some(long) => format!("--{long}"),
            None => format!("<{}>", self.value_name),
        }
    }
}

/// Ordered argument specs plus the resolved fields they came from.
#[derive(Debug, Clone)]
pub struct ParserSpec {
    args: Vec<ArgumentSpec>,
    fields: Vec<ResolvedField>,
    separator: String,
}

impl ParserSpec {
    /// Argument specs in declaration order.
    #[must_use]
    pub fn args(&self) -> &[ArgumentSpec] {
        &self.args
    }

    /// Looks up the spec stored under `key`.
    #[must_use]
    pub fn arg(&self, key: &str) -> Option<&ArgumentSpec> {
        self.args.iter().find(|arg| arg.key == key)
    }

    /// Resolved fields of the root schema.
    #[must_use]
    pub fn fields(&self) -> &[ResolvedField] {
        &self.fields
    }

    /// Separator joining nested keys.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }
}

/// Builds the parser specification for `fields`.
///
/// # Errors
///
/// Returns [`FlagCollisionError`] when two fields derive or declare the same
/// long or short flag, or when a field claims the reserved `--help`/`-h`.
pub fn build(
    fields: &[ResolvedField],
    options: &BuildOptions,
) -> Result<ParserSpec, FlagCollisionError> {
    let mut builder = SpecBuilder {
        separator: options.separator(),
        claims: FlagClaims::with_reserved(),
        args: Vec::with_capacity(fields.len()),
    };
    builder.walk(fields, &Scope::default())?;
    tracing::debug!(args = builder.args.len(), "built parser specification");
    Ok(ParserSpec {
        args: builder.args,
        fields: fields.to_vec(),
        separator: options.separator().to_owned(),
    })
}

#[derive(Debug, Default)]
struct Scope {
    key_prefix: Option<String>,
    flag_prefix: Option<String>,
    group: Option<String>,
}

struct SpecBuilder<'a> {
    separator: &'a str,
    claims: FlagClaims,
    args: Vec<ArgumentSpec>,
}

impl SpecBuilder<'_> {
    fn walk(&mut self, fields: &[ResolvedField], scope: &Scope) -> Result<(), FlagCollisionError> {
        for field in fields {
            let descriptor = &field.descriptor;
            let metadata = descriptor.metadata();
            if metadata.is_excluded() {
                continue;
            }
            let key = join(scope.key_prefix.as_deref(), descriptor.name(), self.separator);
            let flag = join(
                scope.flag_prefix.as_deref(),
                &segment(descriptor.name(), metadata.cli_long()),
                self.separator,
            );
            match &field.behavior {
                FieldBehavior::Nested(nested) => {
                    let group = if nested.is_optional_group() {
                        Some(key.clone())
                    } else {
                        scope.group.clone()
                    };
                    let inner = Scope {
                        key_prefix: Some(key),
                        flag_prefix: Some(flag),
                        group,
                    };
                    self.walk(&nested.fields, &inner)?;
                }
                behavior => {
                    let spec = leaf_spec(field, behavior, key, flag, scope.group.clone());
                    self.claim(&spec)?;
                    self.args.push(spec);
                }
            }
        }
        Ok(())
    }

    fn claim(&mut self, spec: &ArgumentSpec) -> Result<(), FlagCollisionError> {
        if let Some(long) = &spec.long {
            self.claims.claim_long(long, &spec.key)?;
        }
        if let Some(short) = spec.short {
            self.claims.claim_short(short, &spec.key)?;
        }
        Ok(())
    }
}

fn leaf_spec(
    field: &ResolvedField,
    behavior: &FieldBehavior,
    key: String,
    flag: String,
    group: Option<String>,
) -> ArgumentSpec {
    let descriptor = &field.descriptor;
    let metadata = descriptor.metadata();
    let positional = metadata.is_positional();
    let value_name = metadata
        .value_name()
        .map_or_else(|| descriptor.name().to_shouty_snake_case(), str::to_owned);
    let mut spec = ArgumentSpec {
        key,
        long: (!positional).then_some(flag),
        short: metadata.cli_short(),
        positional,
        arity: Arity::Flag,
        converter: None,
        default: None,
        required: false,
        help: metadata.help().map(str::to_owned),
        choices: None,
        value_name,
        group,
    };
    match behavior {
        FieldBehavior::Flag { default } => {
            spec.default = Some(DefaultValue::Value(Value::Bool(*default)));
        }
        FieldBehavior::Count { default } => {
            spec.arity = Arity::Count;
            spec.default = default.clone();
        }
        FieldBehavior::Scalar(value) | FieldBehavior::Repeated(value) => {
            apply_value(&mut spec, value);
        }
        // Nested records are expanded by the caller.
        FieldBehavior::Nested(_) => {}
    }
    spec
}

fn apply_value(spec: &mut ArgumentSpec, value: &ValueBehavior) {
    spec.arity = value.arity;
    spec.converter = Some(value.converter);
    spec.default.clone_from(&value.default);
    spec.required = value.required;
    spec.choices.clone_from(&value.choices);
    if let Some(choices) = &value.choices {
        let note = format!("[choices: {}]", render_options(choices));
        spec.help = Some(
            spec.help
                .take()
                .map_or_else(|| note.clone(), |help| format!("{help} {note}")),
        );
    }
}
