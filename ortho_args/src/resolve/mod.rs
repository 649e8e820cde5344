//! Type coercion resolution: from field descriptors to parsing behaviours.
//!
//! The decision table is applied in order, first match wins:
//!
//! 1. a [`BehaviorOverride`] in the field's metadata is used verbatim;
//! 2. `bool` becomes a presence flag;
//! 3. `Option<T>` resolves `T` and drops required-ness;
//! 4. `Vec<T>` becomes a repeated option;
//! 5. a choice becomes a scalar restricted to its options;
//! 6. a nested record resolves its own schema recursively;
//! 7. any other scalar takes one token through its canonical coercion.

use std::collections::HashMap;

use crate::{
    BehaviorOverride, BuildOptions, ChoiceSet, Converter, DefaultValue, FieldDescriptor, Nargs,
    ScalarKind, Schema, SchemaError, SchemaRef, TypeExpr, Value,
};

/// How many tokens an option consumes and how often it may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly one token.
    One,
    /// One token, and the option may be omitted.
    ZeroOrOne,
    /// Repeatable, one token per occurrence.
    ZeroOrMore,
    /// At least one token per occurrence.
    OneOrMore,
    /// A fixed number of tokens per occurrence.
    Exactly(usize),
    /// No token; presence sets a boolean.
    Flag,
    /// No token; occurrences are counted.
    Count,
}

impl Arity {
    /// Whether the option collects a list of values.
    #[must_use]
    pub const fn is_repeated(self) -> bool {
        matches!(self, Self::ZeroOrMore | Self::OneOrMore | Self::Exactly(_))
    }

    /// Whether the option consumes value tokens.
    #[must_use]
    pub const fn takes_value(self) -> bool {
        !matches!(self, Self::Flag | Self::Count)
    }
}

/// Parsing behaviour for options that consume tokens.
#[derive(Debug, Clone)]
pub struct ValueBehavior {
    /// Token converter.
    pub converter: Converter,
    /// Token count.
    pub arity: Arity,
    /// Whether the option must be supplied.
    pub required: bool,
    /// Value applied when the option is absent.
    pub default: Option<DefaultValue>,
    /// Accepted values, if restricted.
    pub choices: Option<Vec<Value>>,
}

/// Resolved parsing strategy for one field.
#[derive(Debug, Clone)]
pub enum FieldBehavior {
    /// Presence toggles a boolean.
    Flag {
        /// Value used when the flag is absent.
        default: bool,
    },
    /// Occurrences are counted.
    Count {
        /// Value used when the flag is absent.
        default: Option<DefaultValue>,
    },
    /// One token through a converter.
    Scalar(ValueBehavior),
    /// Repeated tokens collected into a list.
    Repeated(ValueBehavior),
    /// A sub-parser for a nested record.
    Nested(NestedBehavior),
}

/// Resolved sub-schema of a nested field.
#[derive(Debug, Clone)]
pub struct NestedBehavior {
    /// Name of the nested schema.
    pub schema_name: String,
    /// Resolved fields of the nested schema.
    pub fields: Vec<ResolvedField>,
    /// Whether the whole record may be absent.
    pub optional: bool,
    /// Record used when none of the nested options are supplied.
    pub default: Option<DefaultValue>,
}

impl NestedBehavior {
    /// Whether the group's members are only enforced when one is supplied.
    #[must_use]
    pub const fn is_optional_group(&self) -> bool {
        self.optional || self.default.is_some()
    }
}

/// A field descriptor paired with its resolved behaviour.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    /// The declared field.
    pub descriptor: FieldDescriptor,
    /// How the field is parsed.
    pub behavior: FieldBehavior,
}

/// Maps field descriptors to behaviours, resolving nested schemas on demand.
///
/// Nested schemas are resolved at most once per resolver and the chain of
/// schemas currently being resolved is tracked to reject cyclic nesting.
#[derive(Debug)]
pub struct Resolver<'a> {
    options: &'a BuildOptions,
    stack: Vec<&'static str>,
    cache: HashMap<&'static str, Vec<ResolvedField>>,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver honouring `options`.
    #[must_use]
    pub fn new(options: &'a BuildOptions) -> Self {
        Self {
            options,
            stack: Vec::new(),
            cache: HashMap::new(),
        }
    }

    /// Resolves every field of `schema` in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when a nested schema fails to resolve or the
    /// nesting is cyclic.
    pub fn resolve_schema(&mut self, schema: &Schema) -> Result<Vec<ResolvedField>, SchemaError> {
        schema
            .fields()
            .iter()
            .map(|descriptor| {
                Ok(ResolvedField {
                    descriptor: descriptor.clone(),
                    behavior: self.resolve(descriptor)?,
                })
            })
            .collect()
    }

    /// Resolves the schema behind `reference`, memoizing the result.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::CyclicNesting`] when `reference` is already
    /// being resolved further up the chain.
    pub fn resolve_ref(&mut self, reference: SchemaRef) -> Result<Vec<ResolvedField>, SchemaError> {
        let name = reference.name();
        if let Some(fields) = self.cache.get(name) {
            return Ok(fields.clone());
        }
        if let Some(pos) = self.stack.iter().position(|entry| *entry == name) {
            let mut chain: Vec<&str> = self.stack.iter().skip(pos).copied().collect();
            chain.push(name);
            return Err(SchemaError::CyclicNesting {
                cycle: chain.join(" -> "),
            });
        }
        self.stack.push(name);
        let outcome = reference
            .resolve()
            .and_then(|schema| self.resolve_schema(schema));
        self.stack.pop();
        let fields = outcome?;
        tracing::debug!(schema = name, fields = fields.len(), "resolved nested schema");
        self.cache.insert(name, fields.clone());
        Ok(fields)
    }

    /// Resolves the behaviour of a single field.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when a nested schema cannot be resolved or a
    /// flag default is not a boolean.
    pub fn resolve(&mut self, field: &FieldDescriptor) -> Result<FieldBehavior, SchemaError> {
        if let Some(behavior) = field.metadata().behavior() {
            return Ok(match behavior {
                BehaviorOverride::Flag { default } => FieldBehavior::Flag { default: *default },
                BehaviorOverride::Count => FieldBehavior::Count {
                    default: field.default().cloned(),
                },
                BehaviorOverride::Value(value) if value.arity.is_repeated() => {
                    FieldBehavior::Repeated(value.clone())
                }
                BehaviorOverride::Value(value) => FieldBehavior::Scalar(value.clone()),
            });
        }
        self.resolve_type(field, field.ty())
    }

    fn resolve_type(
        &mut self,
        field: &FieldDescriptor,
        ty: &TypeExpr,
    ) -> Result<FieldBehavior, SchemaError> {
        match ty {
            TypeExpr::Scalar(ScalarKind::Bool) => Ok(FieldBehavior::Flag {
                default: flag_default(field)?,
            }),
            TypeExpr::Optional(inner) => self.resolve_optional(field, inner),
            TypeExpr::List(inner) => Ok(FieldBehavior::Repeated(self.list_behavior(field, inner))),
            TypeExpr::Choice(set) => Ok(FieldBehavior::Scalar(choice_behavior(field, set))),
            TypeExpr::Nested(reference) => {
                let fields = self.resolve_ref(*reference)?;
                Ok(FieldBehavior::Nested(NestedBehavior {
                    schema_name: reference.resolve()?.name().to_owned(),
                    fields,
                    optional: false,
                    default: field.default().cloned(),
                }))
            }
            TypeExpr::Scalar(kind) => Ok(FieldBehavior::Scalar(scalar_behavior(field, *kind))),
        }
    }

    fn resolve_optional(
        &mut self,
        field: &FieldDescriptor,
        inner: &TypeExpr,
    ) -> Result<FieldBehavior, SchemaError> {
        // An optional bool is tri-state, so it takes an explicit token.
        let resolved = match inner {
            TypeExpr::Scalar(ScalarKind::Bool) => {
                FieldBehavior::Scalar(scalar_behavior(field, ScalarKind::Bool))
            }
            other => self.resolve_type(field, other)?,
        };
        Ok(match resolved {
            FieldBehavior::Scalar(mut value) => {
                value.required = false;
                if value.arity == Arity::One {
                    value.arity = Arity::ZeroOrOne;
                }
                FieldBehavior::Scalar(value)
            }
            FieldBehavior::Repeated(mut value) => {
                value.required = false;
                // Absence of an optional list is `Null`, not the implicit `[]`.
                if !field.has_default() {
                    value.default = None;
                }
                FieldBehavior::Repeated(value)
            }
            FieldBehavior::Nested(mut nested) => {
                nested.optional = true;
                FieldBehavior::Nested(nested)
            }
            other => other,
        })
    }

    fn list_behavior(&self, field: &FieldDescriptor, inner: &TypeExpr) -> ValueBehavior {
        let (kind, choices) = match inner {
            TypeExpr::Choice(set) => (set.kind(), Some(set.options().to_vec())),
            TypeExpr::Scalar(kind) => (*kind, None),
            // Rejected when the schema was built.
            _ => (ScalarKind::String, None),
        };
        let arity = match field.metadata().nargs() {
            None => Arity::ZeroOrMore,
            Some(Nargs::Exactly(n)) => Arity::Exactly(n),
            Some(Nargs::AtLeastOne) => Arity::OneOrMore,
        };
        let default = field.default().cloned().or_else(|| {
            (arity == Arity::ZeroOrMore && self.options.implicit_list_default())
                .then(|| DefaultValue::Value(Value::List(Vec::new())))
        });
        ValueBehavior {
            converter: converter_for(field, kind),
            arity,
            required: default.is_none(),
            default,
            choices: field.metadata().choices().map(<[Value]>::to_vec).or(choices),
        }
    }
}

fn converter_for(field: &FieldDescriptor, kind: ScalarKind) -> Converter {
    field
        .metadata()
        .converter()
        .unwrap_or(Converter::Scalar(kind))
}

fn scalar_behavior(field: &FieldDescriptor, kind: ScalarKind) -> ValueBehavior {
    ValueBehavior {
        converter: converter_for(field, kind),
        arity: Arity::One,
        required: !field.has_default(),
        default: field.default().cloned(),
        choices: field.metadata().choices().map(<[Value]>::to_vec),
    }
}

fn choice_behavior(field: &FieldDescriptor, set: &ChoiceSet) -> ValueBehavior {
    ValueBehavior {
        choices: Some(set.options().to_vec()),
        ..scalar_behavior(field, set.kind())
    }
}

fn flag_default(field: &FieldDescriptor) -> Result<bool, SchemaError> {
    match field.default().map(DefaultValue::materialize) {
        None => Ok(false),
        Some(Value::Bool(value)) => Ok(value),
        Some(other) => Err(SchemaError::InvalidMetadata {
            field: field.name().to_owned(),
            detail: format!("flag default must be a bool, found {}", other.describe()),
        }),
    }
}

#[cfg(test)]
mod tests;
