//! Typed model of a search result.
//!
//! A result arrives as a JSON object whose values are either *field-value
//! wrappers* (`{"raw": ..., "snippet": ...}`) carrying actual search data,
//! or arbitrary companion values (internal identifiers, scoring metadata)
//! that must never be rendered as if they were search content. The
//! classification happens once, at the deserialization boundary: anything
//! that is not an object carrying a `raw` or `snippet` key becomes
//! [`FieldValue::Opaque`] and is invisible to the display pipeline.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single scalar inside a `raw` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// The verbatim value of a field: one scalar or an array of scalars.
///
/// Anything else (objects, nested arrays, null) is outside the wrapper
/// contract and is treated as absent rather than rejected loudly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    One(Scalar),
    Many(Vec<Scalar>),
}

impl RawValue {
    fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    /// Collapse to display text. Arrays join with `", "`; the separator is
    /// literal text supplied here, not user data, so joining happens before
    /// escaping.
    pub fn to_text(&self) -> String {
        match self {
            RawValue::One(s) => s.to_string(),
            RawValue::Many(items) => items
                .iter()
                .map(Scalar::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// A service-supplied highlight snippet: pre-rendered HTML, trusted for
/// direct display. Some services return several fragments per field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Snippet {
    One(String),
    Many(Vec<String>),
}

impl Snippet {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Snippet::One(s)),
            Value::Array(items) => Some(Snippet::Many(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            )),
            _ => None,
        }
    }

    /// Joined fragment text; same separator as raw arrays.
    pub fn text(&self) -> String {
        match self {
            Snippet::One(s) => s.clone(),
            Snippet::Many(items) => items.join(", "),
        }
    }
}

/// The `{raw, snippet}` envelope around one field of a result.
///
/// A wrapper may carry only `raw`, only `snippet`, or both. When both are
/// present the snippet wins for display because it carries highlighting the
/// raw value lacks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldWrapper {
    pub raw: Option<RawValue>,
    pub snippet: Option<Snippet>,
}

impl FieldWrapper {
    /// The snippet, but only when it has visible content. An empty snippet
    /// falls back to the raw value, mirroring the service's own fallback
    /// behavior.
    pub fn display_snippet(&self) -> Option<String> {
        self.snippet
            .as_ref()
            .map(Snippet::text)
            .filter(|t| !t.is_empty())
    }

    /// Raw payload collapsed to text, if any.
    pub fn raw_text(&self) -> Option<String> {
        self.raw.as_ref().map(RawValue::to_text)
    }
}

/// One value of a [`SearchResult`]: either genuine search data or an
/// arbitrary companion value the renderer does not understand.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Wrapped(FieldWrapper),
    Opaque(Value),
}

impl FieldValue {
    /// Classify a JSON value. The wrapper test is structural: an object
    /// carrying a `raw` or `snippet` key is a wrapper even if the payloads
    /// turn out to be malformed (those degrade to `None` individually); any
    /// other shape is opaque metadata, even when its name collides with a
    /// display field.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map)
                if map.contains_key("raw") || map.contains_key("snippet") =>
            {
                let mut wrapper = FieldWrapper::default();
                for (key, payload) in map {
                    match key.as_str() {
                        "raw" => wrapper.raw = RawValue::from_value(payload),
                        "snippet" => wrapper.snippet = Snippet::from_value(payload),
                        _ => {}
                    }
                }
                FieldValue::Wrapped(wrapper)
            }
            other => FieldValue::Opaque(other),
        }
    }

    pub fn as_wrapper(&self) -> Option<&FieldWrapper> {
        match self {
            FieldValue::Wrapped(w) => Some(w),
            FieldValue::Opaque(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(FieldValue::from_value(Value::deserialize(deserializer)?))
    }
}

/// One result from the remote service: an ordered mapping from field name
/// to [`FieldValue`].
///
/// Field order is not semantically meaningful but is preserved so repeated
/// renders stay stable. The core only ever reads a result; the
/// query/response collaborator owns it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResult {
    entries: Vec<(String, FieldValue)>,
}

impl SearchResult {
    /// Build from an already-parsed JSON value. Anything that is not an
    /// object yields an empty result rather than an error: an unexpected
    /// response shape is data we do not understand, not a fatal condition.
    ///
    /// A pre-parsed `Value` has already lost document order (its object map
    /// sorts keys); deserializing straight from the response body is the
    /// order-preserving path.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => map
                .into_iter()
                .map(|(name, v)| (name, FieldValue::from_value(v)))
                .collect(),
            _ => SearchResult::default(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for SearchResult {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        SearchResult {
            entries: iter.into_iter().collect(),
        }
    }
}

// Manual visitor rather than a map derive: `serde_json::Map` does not keep
// key order, and order must survive for stable rendering.
impl<'de> Deserialize<'de> for SearchResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ResultVisitor;

        impl<'de> Visitor<'de> for ResultVisitor {
            type Value = SearchResult;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to field values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, FieldValue>()? {
                    entries.push(entry);
                }
                Ok(SearchResult { entries })
            }
        }

        deserializer.deserialize_map(ResultVisitor)
    }
}
