//! Parser engine: lowers a [`ParserSpec`] to clap and checks parsed values.
//!
//! clap enforces the structural grammar: unknown flags, token counts and
//! `--help`. Conversion, choice and required checks are done here instead so
//! that every problem in one command line is reported together.

use std::{collections::HashSet, ffi::OsString};

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use heck::ToKebabCase;

use crate::{
    ArgsResult, ArgumentSpec, Arity, BuildOptions, ConstructError, DefaultValue, ParserSpec,
    RawResultMap, Record, Resolver, Schema, SchemaError, SchemaRef, UsageError, UsageIssue,
    UsageIssues, Value, builder, construct::construct_record, schema::render_options,
};

/// A command-line parser synthesized from a schema.
///
/// # Examples
///
/// ```
/// use ortho_args::{BuildOptions, FieldDescriptor, Parser, Schema, TypeExpr, Value};
///
/// let schema = Schema::builder("Job")
///     .field(FieldDescriptor::new("name", TypeExpr::string()))
///     .field(FieldDescriptor::new("verbose", TypeExpr::bool()))
///     .build()?;
/// let parser = Parser::new(&schema, &BuildOptions::default())?;
/// let raw = parser.parse(["--name", "job1"])?;
/// let record = parser.construct(&raw)?;
/// assert_eq!(record.get("verbose"), Some(&Value::Bool(false)));
/// # Ok::<(), ortho_args::ArgsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    name: String,
    schema_name: String,
    spec: ParserSpec,
    command: Command,
}

impl Parser {
    /// Synthesizes a parser for `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::Schema`] when a nested schema fails to resolve
    /// and [`ArgsError::FlagCollision`] when two fields claim the same flag.
    ///
    /// [`ArgsError::Schema`]: crate::ArgsError::Schema
    /// [`ArgsError::FlagCollision`]: crate::ArgsError::FlagCollision
    pub fn new(schema: &Schema, options: &BuildOptions) -> ArgsResult<Self> {
        let fields = Resolver::new(options).resolve_schema(schema)?;
        let spec = builder::build(&fields, options)?;
        Self::from_spec(spec, schema, options)
    }

    /// Synthesizes a parser for the schema behind `reference`.
    ///
    /// Resolving through the reference lets cycle detection include the root
    /// schema itself.
    ///
    /// # Errors
    ///
    /// As for [`Parser::new`].
    pub fn for_ref(reference: SchemaRef, options: &BuildOptions) -> ArgsResult<Self> {
        let fields = Resolver::new(options).resolve_ref(reference)?;
        let spec = builder::build(&fields, options)?;
        Self::from_spec(spec, reference.resolve()?, options)
    }

    /// Wraps an already built specification.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::Schema`] when more than one positional argument
    /// takes a variable number of tokens, or one that does is not last.
    ///
    /// [`ArgsError::Schema`]: crate::ArgsError::Schema
    pub fn from_spec(spec: ParserSpec, schema: &Schema, options: &BuildOptions) -> ArgsResult<Self> {
        check_positionals(&spec)?;
        let name = options
            .program_name()
            .map_or_else(|| schema.name().to_kebab_case(), str::to_owned);
        let about = options.about().or_else(|| schema.about()).map(str::to_owned);
        let command = lower(&name, about, &spec);
        tracing::debug!(program = %name, args = spec.args().len(), "synthesized parser");
        Ok(Self {
            name,
            schema_name: schema.name().to_owned(),
            spec,
            command,
        })
    }

    /// Program name shown in usage.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The argument specification the parser honours.
    #[must_use]
    pub const fn spec(&self) -> &ParserSpec {
        &self.spec
    }

    /// The underlying clap command.
    #[must_use]
    pub const fn command(&self) -> &Command {
        &self.command
    }

    /// Renders the full help text.
    #[must_use]
    pub fn render_help(&self) -> String {
        self.command.clone().render_help().to_string()
    }

    /// Renders the usage line.
    #[must_use]
    pub fn render_usage(&self) -> String {
        self.command.clone().render_usage().to_string()
    }

    /// Parses argument tokens, excluding the program name.
    ///
    /// Only supplied values are recorded; defaults are applied by
    /// [`Parser::construct`].
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::Clap`] for structural failures and help
    /// requests, and [`UsageError::Invalid`] listing every conversion, choice
    /// and missing-argument problem found.
    pub fn parse<I, T>(&self, tokens: I) -> Result<RawResultMap, UsageError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().try_get_matches_from(tokens)?;
        let mut checker = Checker::default();
        for arg in self.spec.args() {
            checker.collect(arg, &matches);
        }
        checker.check_required(self.spec.args(), self.spec.separator());
        let Checker { raw, issues, .. } = checker;
        tracing::debug!(
            program = %self.name,
            supplied = raw.len(),
            issues = issues.len(),
            "parsed command line"
        );
        if issues.is_empty() {
            Ok(raw)
        } else {
            Err(UsageError::Invalid {
                issues: UsageIssues::new(issues),
                usage: self.render_usage(),
            })
        }
    }

    /// Builds a record from parsed values, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError`] when a required value is missing or a value
    /// does not fit its field.
    pub fn construct(&self, raw: &RawResultMap) -> Result<Record, ConstructError> {
        construct_record(
            &self.schema_name,
            self.spec.fields(),
            raw,
            None,
            self.spec.separator(),
        )
    }
}

fn check_positionals(spec: &ParserSpec) -> Result<(), SchemaError> {
    let positionals: Vec<&ArgumentSpec> = spec.args().iter().filter(|arg| arg.positional).collect();
    let Some((last, rest)) = positionals.split_last() else {
        return Ok(());
    };
    let variable = |arg: &ArgumentSpec| matches!(arg.arity, Arity::ZeroOrMore | Arity::OneOrMore);
    if let Some(arg) = rest.iter().find(|arg| variable(arg)) {
        return Err(SchemaError::InvalidMetadata {
            field: arg.key.clone(),
            detail: format!(
                "only the last positional argument may take a variable number of values, \
                 but '{}' follows it",
                last.key
            ),
        });
    }
    Ok(())
}

fn lower(name: &str, about: Option<String>, spec: &ParserSpec) -> Command {
    let mut command = Command::new(name.to_owned())
        .no_binary_name(true)
        .args_override_self(true);
    if let Some(text) = about {
        command = command.about(text);
    }
    spec.args()
        .iter()
        .fold(command, |cmd, arg| cmd.arg(lower_arg(arg)))
}

fn lower_arg(spec: &ArgumentSpec) -> Arg {
    let mut arg = Arg::new(spec.key.clone());
    if let Some(long) = &spec.long {
        arg = arg.long(long.clone());
    }
    if let Some(short) = spec.short {
        arg = arg.short(short);
    }
    if let Some(help) = help_text(spec) {
        arg = arg.help(help);
    }
    match spec.arity {
        Arity::Flag => return arg.action(ArgAction::SetTrue),
        Arity::Count => return arg.action(ArgAction::Count),
        Arity::One | Arity::ZeroOrOne => arg = arg.action(ArgAction::Set).num_args(1),
        Arity::ZeroOrMore if spec.positional => arg = arg.action(ArgAction::Append).num_args(1..),
        Arity::ZeroOrMore => arg = arg.action(ArgAction::Append).num_args(1),
        Arity::OneOrMore => arg = arg.action(ArgAction::Set).num_args(1..),
        Arity::Exactly(n) => arg = arg.action(ArgAction::Set).num_args(n),
    }
    if spec.converter.is_some_and(|converter| converter.is_numeric()) {
        arg = arg.allow_negative_numbers(true);
    }
    arg.value_name(spec.value_name.clone())
        .value_parser(value_parser!(String))
}

fn help_text(spec: &ArgumentSpec) -> Option<String> {
    let mut parts: Vec<String> = spec.help.iter().cloned().collect();
    let default = spec
        .default
        .as_ref()
        .filter(|_| spec.arity.takes_value())
        .and_then(DefaultValue::display);
    if let Some(default) = default {
        parts.push(format!("[default: {default}]"));
    }
    if spec.required {
        parts.push("[required]".to_owned());
    }
    (!parts.is_empty()).then(|| parts.join(" "))
}

#[derive(Default)]
struct Checker {
    raw: RawResultMap,
    issues: Vec<UsageIssue>,
    present: HashSet<String>,
}

impl Checker {
    fn collect(&mut self, arg: &ArgumentSpec, matches: &ArgMatches) {
        match arg.arity {
            Arity::Flag => {
                if matches.get_flag(&arg.key) {
                    self.present.insert(arg.key.clone());
                    self.raw.insert(arg.key.clone(), Value::Bool(true));
                }
            }
            Arity::Count => {
                let count = matches.get_count(&arg.key);
                if count > 0 {
                    self.present.insert(arg.key.clone());
                    self.raw.insert(arg.key.clone(), Value::UInt(u64::from(count)));
                }
            }
            arity => {
                let Some(tokens) = matches.try_get_many::<String>(&arg.key).ok().flatten() else {
                    return;
                };
                self.present.insert(arg.key.clone());
                let converted: Vec<Option<Value>> =
                    tokens.map(|token| self.convert(arg, token)).collect();
                let Some(values) = converted.into_iter().collect::<Option<Vec<Value>>>() else {
                    return;
                };
                let value = if arity.is_repeated() {
                    Value::List(values)
                } else {
                    let Some(last) = values.into_iter().next_back() else {
                        return;
                    };
                    last
                };
                tracing::trace!(key = %arg.key, value = %value, "accepted value");
                self.raw.insert(arg.key.clone(), value);
            }
        }
    }

    fn convert(&mut self, arg: &ArgumentSpec, token: &str) -> Option<Value> {
        let converter = arg.converter?;
        let value = match converter.convert(token) {
            Ok(value) => value,
            Err(reason) => {
                self.issues.push(UsageIssue::TypeMismatch {
                    flag: arg.display_name(),
                    token: token.to_owned(),
                    reason,
                });
                return None;
            }
        };
        match &arg.choices {
            Some(choices) if !choices.contains(&value) => {
                self.issues.push(UsageIssue::InvalidChoice {
                    flag: arg.display_name(),
                    token: token.to_owned(),
                    choices: render_options(choices),
                });
                None
            }
            _ => Some(value),
        }
    }

    fn check_required(&mut self, args: &[ArgumentSpec], separator: &str) {
        for arg in args.iter().filter(|arg| arg.required) {
            if self.present.contains(&arg.key) {
                continue;
            }
            let group_active = arg
                .group
                .as_deref()
                .is_none_or(|group| self.group_present(group, separator));
            if group_active {
                self.issues.push(UsageIssue::MissingRequiredField {
                    field: arg.key.clone(),
                    flag: arg.display_name(),
                });
            }
        }
    }

    fn group_present(&self, group: &str, separator: &str) -> bool {
        self.present.iter().any(|key| {
            key.strip_prefix(group)
                .is_some_and(|rest| rest.starts_with(separator))
        })
    }
}

#[cfg(test)]
mod tests;
