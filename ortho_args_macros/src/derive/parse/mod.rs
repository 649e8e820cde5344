//! Parsing of derive input and `#[ortho_args(...)]` attributes.
//!
//! Unknown attribute keys are rejected so that a misspelt key fails the
//! build instead of being silently ignored.

use heck::ToKebabCase;
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::{Attribute, Data, DeriveInput, Expr, Fields, Ident, Token, Type, parenthesized};

mod docs;
mod literals;
mod type_utils;

use docs::doc_text;
use literals::{lit_char, lit_flag, lit_nargs, lit_path, lit_str};
pub(crate) use type_utils::{default_type, element_type};

/// Token count requested with `nargs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Nargs {
    Exactly(usize),
    AtLeastOne,
}

/// Source of a field's default.
#[derive(Clone)]
pub(crate) enum DefaultAttr {
    /// Bare `default`: the field type's `Default` implementation.
    Trait,
    /// `default = expr`, typed as the field's value type.
    Expr(Expr),
    /// `default_factory = path`, called each time the field is absent.
    Factory(syn::Path),
}

/// Struct-level attributes recognised by `#[derive(ArgSchema)]`.
#[derive(Default, Clone)]
pub(crate) struct StructAttrs {
    /// Program name shown in usage; defaults to the kebab-case struct name.
    pub name: Option<String>,
    /// About text; falls back to the struct's doc comment.
    pub about: Option<String>,
    /// Separator between nested field names in flags and keys.
    pub separator: Option<String>,
    /// Forward `after_parse` to the struct's `PostParseHook` impl.
    pub post_parse_hook: bool,
    /// Overrides the generated crate path for dependency aliasing.
    pub crate_path: Option<syn::Path>,
}

/// Field-level attributes recognised by `#[derive(ArgSchema)]`.
#[derive(Default, Clone)]
pub(crate) struct FieldAttrs {
    pub cli_long: Option<String>,
    pub cli_short: Option<char>,
    /// Help text; falls back to the field's doc comment.
    pub help: Option<String>,
    pub value_name: Option<String>,
    pub skip_cli: bool,
    pub positional: bool,
    pub nargs: Option<Nargs>,
    pub parse_with: Option<syn::Path>,
    pub choices: Option<Vec<Expr>>,
    pub count: bool,
    pub default: Option<DefaultAttr>,
}

/// A named struct field with its parsed attributes.
pub(crate) struct RecordField {
    pub ident: Ident,
    /// Field name as seen by the schema, without any `r#` prefix.
    pub name: String,
    pub ty: Type,
    pub attrs: FieldAttrs,
}

/// Validated input of `#[derive(ArgSchema)]`.
pub(crate) struct RecordInput {
    pub ident: Ident,
    pub fields: Vec<RecordField>,
    pub attrs: StructAttrs,
}

/// A unit variant and the token that selects it.
pub(crate) struct ChoiceVariant {
    pub ident: Ident,
    pub token: String,
}

/// Validated input of `#[derive(ArgChoice)]`.
pub(crate) struct ChoiceInput {
    pub ident: Ident,
    pub variants: Vec<ChoiceVariant>,
    pub crate_path: Option<syn::Path>,
}

/// Iterate all `#[ortho_args(...)]` attributes once and apply a callback.
fn parse_ortho_args<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("ortho_args")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

fn meta_key(meta: &ParseNestedMeta) -> String {
    meta.path
        .get_ident()
        .map_or_else(String::new, ToString::to_string)
}

fn unknown(meta: &ParseNestedMeta, allowed: &str) -> syn::Error {
    meta.error(format!(
        "unknown ortho_args attribute; expected one of {allowed}"
    ))
}

fn reject_generics(input: &DeriveInput, derive: &str) -> syn::Result<()> {
    if input.generics.params.is_empty() {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(
            &input.generics,
            format!("{derive} cannot be derived for generic types"),
        ))
    }
}

/// Extracts `#[ortho_args(...)]` metadata applied to a struct.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_ortho_args(attrs, |meta| {
        match meta_key(meta).as_str() {
            "name" => out.name = Some(lit_str(meta, "name")?.value()),
            "about" => out.about = Some(lit_str(meta, "about")?.value()),
            "separator" => {
                let separator = lit_str(meta, "separator")?;
                if separator.value().is_empty() {
                    return Err(syn::Error::new(separator.span(), "separator must not be empty"));
                }
                out.separator = Some(separator.value());
            }
            "post_parse_hook" => out.post_parse_hook = lit_flag(meta, "post_parse_hook")?,
            "crate" => out.crate_path = Some(lit_path(meta, "crate")?),
            _ => {
                return Err(unknown(
                    meta,
                    "`name`, `about`, `separator`, `post_parse_hook`, `crate`",
                ));
            }
        }
        Ok(())
    })?;
    if out.about.is_none() {
        out.about = doc_text(attrs);
    }
    Ok(out)
}

fn parse_choices(meta: &ParseNestedMeta) -> syn::Result<Vec<Expr>> {
    let content;
    parenthesized!(content in meta.input);
    let choices: Punctuated<Expr, Token![,]> = Punctuated::parse_terminated(&content)?;
    if choices.is_empty() {
        return Err(meta.error("choices(...) needs at least one value"));
    }
    Ok(choices.into_iter().collect())
}

fn set_default(meta: &ParseNestedMeta, out: &mut FieldAttrs, default: DefaultAttr) -> syn::Result<()> {
    if out.default.is_some() {
        return Err(meta.error("only one of `default` and `default_factory` may be given"));
    }
    out.default = Some(default);
    Ok(())
}

/// Applies one field attribute key.
fn apply_field_attr(meta: &ParseNestedMeta, out: &mut FieldAttrs) -> syn::Result<()> {
    match meta_key(meta).as_str() {
        "cli_long" => out.cli_long = Some(lit_str(meta, "cli_long")?.value()),
        "cli_short" => out.cli_short = Some(lit_char(meta, "cli_short")?),
        "help" => out.help = Some(lit_str(meta, "help")?.value()),
        "value_name" => out.value_name = Some(lit_str(meta, "value_name")?.value()),
        "skip_cli" => out.skip_cli = lit_flag(meta, "skip_cli")?,
        "positional" => out.positional = lit_flag(meta, "positional")?,
        "count" => out.count = lit_flag(meta, "count")?,
        "nargs" => out.nargs = Some(lit_nargs(meta)?),
        "parse_with" => out.parse_with = Some(meta.value()?.parse()?),
        "choices" => out.choices = Some(parse_choices(meta)?),
        "default" => {
            let default = if meta.input.peek(Token![=]) {
                DefaultAttr::Expr(meta.value()?.parse()?)
            } else {
                DefaultAttr::Trait
            };
            set_default(meta, out, default)?;
        }
        "default_factory" => {
            let factory = meta.value()?.parse()?;
            set_default(meta, out, DefaultAttr::Factory(factory))?;
        }
        _ => {
            return Err(unknown(
                meta,
                "`cli_long`, `cli_short`, `help`, `value_name`, `skip_cli`, `positional`, \
                 `nargs`, `parse_with`, `choices`, `count`, `default`, `default_factory`",
            ));
        }
    }
    Ok(())
}

/// Parses field-level `#[ortho_args(...)]` attributes.
pub(crate) fn parse_field_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_ortho_args(&field.attrs, |meta| apply_field_attr(meta, &mut out))?;
    if out.help.is_none() {
        out.help = doc_text(&field.attrs);
    }
    if out.positional && (out.cli_long.is_some() || out.cli_short.is_some()) {
        return Err(syn::Error::new_spanned(
            field,
            "positional fields cannot declare `cli_long` or `cli_short`",
        ));
    }
    Ok(out)
}

/// Gathers and validates the input of `#[derive(ArgSchema)]`.
pub(crate) fn parse_record(input: &DeriveInput) -> syn::Result<RecordInput> {
    reject_generics(input, "ArgSchema")?;
    let attrs = parse_struct_attrs(&input.attrs)?;
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "ArgSchema requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "ArgSchema can only be derived for structs",
            ));
        }
    };
    let fields = named
        .iter()
        .map(|field| {
            let ident = field
                .ident
                .clone()
                .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
            Ok(RecordField {
                name: ident.unraw().to_string(),
                ident,
                ty: field.ty.clone(),
                attrs: parse_field_attrs(field)?,
            })
        })
        .collect::<syn::Result<Vec<_>>>()?;
    Ok(RecordInput {
        ident: input.ident.clone(),
        fields,
        attrs,
    })
}

fn parse_variant_token(variant: &syn::Variant) -> syn::Result<String> {
    let mut rename = None;
    parse_ortho_args(&variant.attrs, |meta| match meta_key(meta).as_str() {
        "rename" => {
            rename = Some(lit_str(meta, "rename")?.value());
            Ok(())
        }
        _ => Err(unknown(meta, "`rename`")),
    })?;
    Ok(rename.unwrap_or_else(|| variant.ident.unraw().to_string().to_kebab_case()))
}

/// Gathers and validates the input of `#[derive(ArgChoice)]`.
pub(crate) fn parse_choice(input: &DeriveInput) -> syn::Result<ChoiceInput> {
    reject_generics(input, "ArgChoice")?;
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "ArgChoice can only be derived for enums",
        ));
    };
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "ArgChoice requires at least one variant",
        ));
    }
    let mut crate_path = None;
    parse_ortho_args(&input.attrs, |meta| match meta_key(meta).as_str() {
        "crate" => {
            crate_path = Some(lit_path(meta, "crate")?);
            Ok(())
        }
        _ => Err(unknown(meta, "`crate`")),
    })?;
    let mut variants: Vec<ChoiceVariant> = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "ArgChoice variants must not carry data",
            ));
        }
        let token = parse_variant_token(variant)?;
        if variants.iter().any(|existing| existing.token == token) {
            return Err(syn::Error::new_spanned(
                variant,
                format!("choice '{token}' is declared more than once"),
            ));
        }
        variants.push(ChoiceVariant {
            ident: variant.ident.clone(),
            token,
        });
    }
    Ok(ChoiceInput {
        ident: input.ident.clone(),
        variants,
        crate_path,
    })
}
