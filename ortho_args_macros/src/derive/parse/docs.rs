//! Doc comment extraction for help and about text.

use syn::{Attribute, Expr, ExprLit, Lit, Meta};

/// Collects `///` comments into plain text.
///
/// Lines within a paragraph are joined with single spaces; paragraphs are
/// separated by a blank line. Returns `None` when there is no documentation.
pub(crate) fn doc_text(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs.iter().filter_map(doc_line).collect();
    let paragraphs: Vec<String> = lines
        .split(String::is_empty)
        .filter(|paragraph| !paragraph.is_empty())
        .map(|paragraph| paragraph.join(" "))
        .collect();
    (!paragraphs.is_empty()).then(|| paragraphs.join("\n\n"))
}

fn doc_line(attr: &Attribute) -> Option<String> {
    let Meta::NameValue(name_value) = &attr.meta else {
        return None;
    };
    if !name_value.path.is_ident("doc") {
        return None;
    }
    match &name_value.value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Some(s.value().trim().to_owned()),
        _ => None,
    }
}
