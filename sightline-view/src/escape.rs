//! HTML escaping and the escaped projection of a result.
//!
//! Raw field values MUST be escaped before they are injected as HTML
//! content; snippets are already rendered by the service and pass through
//! verbatim. The projection is recomputed on every call — the source result
//! may change between renders (pagination) and nothing here is cached.

use tracing::trace;

use crate::result::{FieldValue, FieldWrapper, SearchResult};

/// Escape the five characters that matter for HTML content injection.
///
/// Single pass, so entities produced for one character are never re-escaped
/// by a later substitution (the classic ampersand-ordering bug).
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Which side of the field-value envelope to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldVariant {
    Raw,
    Snippet,
}

/// Read one variant of a named field, unescaped.
///
/// `None` when the field is absent, is not a field-value wrapper, or does
/// not carry that variant. Arrays collapse to `", "`-joined text.
pub fn extract_field(
    result: &SearchResult,
    field: &str,
    variant: FieldVariant,
) -> Option<String> {
    let wrapper = result.get(field)?.as_wrapper()?;
    match variant {
        FieldVariant::Raw => wrapper.raw_text(),
        FieldVariant::Snippet => wrapper.snippet.as_ref().map(|s| s.text()),
    }
}

/// Display-safe text for one wrapped field: the snippet verbatim when it
/// has content, otherwise the raw value escaped. Empty when neither side
/// has anything to show.
pub fn escape_wrapper(wrapper: &FieldWrapper) -> String {
    if let Some(snippet) = wrapper.display_snippet() {
        return snippet;
    }
    wrapper
        .raw_text()
        .map(|raw| html_escape(&raw))
        .unwrap_or_default()
}

/// Display-safe text for a named field, or `None` when the field is not a
/// wrapper at all.
pub fn escaped_field(result: &SearchResult, field: &str) -> Option<String> {
    result.get(field)?.as_wrapper().map(escape_wrapper)
}

/// Project every wrapped field of a result to display-safe text, in field
/// order. Opaque values are silently excluded — they are metadata the
/// renderer does not understand, not an error.
pub fn project(result: &SearchResult) -> Vec<(String, String)> {
    result
        .iter()
        .filter_map(|(name, value)| match value {
            FieldValue::Wrapped(wrapper) => Some((name.to_string(), escape_wrapper(wrapper))),
            FieldValue::Opaque(_) => {
                trace!(field = name, "excluding non-wrapper field from projection");
                None
            }
        })
        .collect()
}
