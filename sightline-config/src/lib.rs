//! Declarative query/facet/sort configuration for the search surface.
//!
//! The model here is pure data: it describes which fields a query should
//! return, how facets are bucketed, and which sort option sets exist.
//! Query execution belongs to the external connector; this crate's only
//! obligations are shape validation ([`SearchConfig::validate`]) and
//! loading the model from files plus `SIGHTLINE_`-prefixed environment
//! overrides with `${VAR}` expansion ([`SearchConfigLoader`]).

mod loader;
mod model;

pub use loader::SearchConfigLoader;
pub use model::{
    AutocompleteConfig, AutocompleteResults, AutocompleteSuggestions, Bound, FacetSpec,
    RangeBucket, RawRequest, ResultFieldSpec, SearchConfig, SnippetRequest, SortField,
    SortOption, SuggestionType, ValidationError,
};

pub use sightline_common::{Result, SightlineError, SortDirection};
