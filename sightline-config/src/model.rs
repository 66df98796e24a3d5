//! Typed configuration model and its shape validation.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sightline_common::SortDirection;

/// Request options for the `raw` side of a result field. Currently carries
/// no knobs; its presence alone asks the service for the raw value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRequest {}

/// Request options for the `snippet` side of a result field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnippetRequest {
    /// Maximum snippet length, in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// Whether the service should fall back to the raw value when no
    /// highlight matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
}

/// Which representations to request for one result field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultFieldSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<RawRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<SnippetRequest>,
}

/// One edge of a range bucket: numeric, or a string such as an ISO date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Number(f64),
    Text(String),
}

impl Bound {
    /// Ordering between two bounds, when one exists. Numbers compare
    /// numerically, strings lexicographically (ISO dates order correctly
    /// that way); there is no defensible ordering across the two.
    fn try_cmp(&self, other: &Bound) -> Option<Ordering> {
        match (self, other) {
            (Bound::Number(a), Bound::Number(b)) => a.partial_cmp(b),
            (Bound::Text(a), Bound::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// A numeric bound must be an actual number; NaN and the infinities
    /// cannot delimit a bucket (an open side already expresses "unbounded").
    fn is_finite(&self) -> bool {
        match self {
            Bound::Number(n) => n.is_finite(),
            Bound::Text(_) => true,
        }
    }
}

/// One bucket of a range facet. Open-ended on either side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeBucket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Bound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Bound>,
}

impl RangeBucket {
    fn label(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("#{index}"))
    }
}

/// The tag is `type`; `value` facets count discrete terms, `range` facets
/// count ordered buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FacetSpec {
    Value {
        /// Maximum number of terms to return.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<u32>,
    },
    Range { ranges: Vec<RangeBucket> },
}

/// One tie-break-ordered sort field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    pub direction: SortDirection,
}

/// A named sort option. An empty `value` sequence means relevance order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortOption {
    pub name: String,
    #[serde(default)]
    pub value: Vec<SortField>,
}

impl SortOption {
    /// Relevance order is spelled as an empty field sequence.
    pub fn is_relevance(&self) -> bool {
        self.value.is_empty()
    }
}

/// Suggestion source for one autocomplete document type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionType {
    #[serde(default)]
    pub fields: Vec<String>,
}

/// Autocomplete result-list request options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_per_page: Option<u32>,
    #[serde(default)]
    pub result_fields: BTreeMap<String, ResultFieldSpec>,
}

/// Autocomplete suggestion request options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteSuggestions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default)]
    pub types: BTreeMap<String, SuggestionType>,
}

/// Optional autocomplete block of a search configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<AutocompleteResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<AutocompleteSuggestions>,
}

/// A validation failure in a declarative search configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("range bucket {bucket} on facet {facet:?} needs at least one of `from`/`to`")]
    EmptyBucket { facet: String, bucket: String },

    #[error("range bucket {bucket} on facet {facet:?} is inverted: `from` exceeds `to`")]
    InvertedBucket { facet: String, bucket: String },

    #[error("range bucket {bucket} on facet {facet:?} mixes numeric and string bounds")]
    MixedBoundTypes { facet: String, bucket: String },

    #[error("range bucket {bucket} on facet {facet:?} has a non-finite numeric bound")]
    NonFiniteBound { facet: String, bucket: String },

    #[error("disjunctive facet {0:?} does not name a configured facet")]
    UnknownDisjunctiveFacet(String),

    #[error("snippet size for result field {0:?} must be nonzero")]
    ZeroSnippetSize(String),
}

/// Declarative description of how a query is built: result fields, facets,
/// disjunctive facet names, sort option sets, and autocomplete behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub result_fields: BTreeMap<String, ResultFieldSpec>,
    #[serde(default)]
    pub facets: BTreeMap<String, FacetSpec>,
    /// Facets whose counts ignore filters already applied on that same
    /// field. Each entry must name a configured facet.
    #[serde(default)]
    pub disjunctive_facets: Vec<String>,
    #[serde(default)]
    pub sort_options: Vec<SortOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<AutocompleteConfig>,
}

impl SearchConfig {
    /// Validate shape. Stops at the first problem; callers treat any
    /// failure as a setup fault, not a render-time condition.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (facet, spec) in &self.facets {
            if let FacetSpec::Range { ranges } = spec {
                for (index, bucket) in ranges.iter().enumerate() {
                    validate_bucket(facet, index, bucket)?;
                }
            }
        }

        for name in &self.disjunctive_facets {
            if !self.facets.contains_key(name) {
                return Err(ValidationError::UnknownDisjunctiveFacet(name.clone()));
            }
        }

        validate_result_fields(&self.result_fields)?;
        if let Some(results) = self
            .autocomplete
            .as_ref()
            .and_then(|a| a.results.as_ref())
        {
            validate_result_fields(&results.result_fields)?;
        }

        Ok(())
    }
}

fn validate_bucket(
    facet: &str,
    index: usize,
    bucket: &RangeBucket,
) -> Result<(), ValidationError> {
    let label = bucket.label(index);
    for bound in [&bucket.from, &bucket.to].into_iter().flatten() {
        if !bound.is_finite() {
            return Err(ValidationError::NonFiniteBound {
                facet: facet.to_string(),
                bucket: label,
            });
        }
    }
    match (&bucket.from, &bucket.to) {
        (None, None) => Err(ValidationError::EmptyBucket {
            facet: facet.to_string(),
            bucket: label,
        }),
        (Some(from), Some(to)) => match from.try_cmp(to) {
            Some(Ordering::Greater) => Err(ValidationError::InvertedBucket {
                facet: facet.to_string(),
                bucket: label,
            }),
            Some(_) => Ok(()),
            None => Err(ValidationError::MixedBoundTypes {
                facet: facet.to_string(),
                bucket: label,
            }),
        },
        // Open-ended on one side is fine.
        _ => Ok(()),
    }
}

fn validate_result_fields(
    fields: &BTreeMap<String, ResultFieldSpec>,
) -> Result<(), ValidationError> {
    for (name, spec) in fields {
        if let Some(snippet) = &spec.snippet {
            if snippet.size == Some(0) {
                return Err(ValidationError::ZeroSnippetSize(name.clone()));
            }
        }
    }
    Ok(())
}
