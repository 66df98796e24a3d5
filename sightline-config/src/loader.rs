//! Loader for search configuration with file + environment overlays.

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde_json::Value;
use sightline_common::{Result, SightlineError};

use crate::model::SearchConfig;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Expand `${VAR}` placeholders in every string of a JSON tree.
///
/// Expansion is re-applied until the value stops changing, capped at
/// [`MAXIMUM_ENV_EXPANSION_DEPTH`] hops so cyclic variables terminate.
/// Unknown variables are left as-is.
fn expand_env_in_value(value: &mut Value) {
    match value {
        Value::String(s) => {
            if !s.contains('$') {
                return;
            }
            let mut current = std::mem::take(s);
            for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                let expanded = match shellexpand::env(&current) {
                    Ok(cow) => cow.into_owned(),
                    Err(_) => current.clone(),
                };
                if expanded == current {
                    break;
                }
                current = expanded;
            }
            *s = current;
        }
        Value::Array(items) => items.iter_mut().for_each(expand_env_in_value),
        Value::Object(map) => map.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (file + `SIGHTLINE_` env
/// overrides). The merged sources are deserialized into [`SearchConfig`]
/// and shape-validated before being handed back.
pub struct SearchConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for SearchConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchConfigLoader {
    /// Start with sensible defaults: `SIGHTLINE_` env overrides on top of
    /// whatever files/snippets get attached.
    ///
    /// ```
    /// use sightline_config::SearchConfigLoader;
    ///
    /// let config = SearchConfigLoader::new()
    ///     .with_yaml_str("result_fields:\n  title:\n    raw: {}")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert!(config.result_fields.contains_key("title"));
    /// ```
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("SIGHTLINE").separator("__"));
        Self { builder }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by
    /// suffix. A missing file is a load-time error.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Consume the builder: merge sources, expand `${VAR}` placeholders,
    /// deserialize into the typed model, and run shape validation.
    ///
    /// Source and deserialization problems come back as
    /// [`SightlineError::Config`]; a well-formed file that fails shape
    /// validation comes back as [`SightlineError::Validation`].
    ///
    /// ```
    /// use sightline_config::{FacetSpec, SearchConfigLoader};
    ///
    /// let config = SearchConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// facets:
    ///   index:
    ///     type: value
    /// disjunctive_facets: ["index"]
    /// sort_options:
    ///   - name: Relevance
    ///     value: []
    ///   - name: Date
    ///     value:
    ///       - field: created_at
    ///         direction: desc
    /// "#,
    ///     )
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert!(matches!(config.facets["index"], FacetSpec::Value { .. }));
    /// assert!(config.sort_options[0].is_relevance());
    /// ```
    pub fn load(self) -> Result<SearchConfig> {
        let merged = self
            .builder
            .build()
            .map_err(|e| SightlineError::Config(e.to_string()))?;

        let mut value: Value = merged
            .try_deserialize()
            .map_err(|e| SightlineError::Config(e.to_string()))?;
        expand_env_in_value(&mut value);

        let typed: SearchConfig =
            serde_json::from_value(value).map_err(|e| SightlineError::Config(e.to_string()))?;

        typed
            .validate()
            .map_err(|e| SightlineError::Validation(e.to_string()))?;

        Ok(typed)
    }
}
