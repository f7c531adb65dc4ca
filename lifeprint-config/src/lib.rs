//! Settings loader for the index tool: YAML file + `LIFEPRINT_` environment overlay.
//!
//! Precedence, lowest to highest: built-in defaults, YAML file(s) in the order
//! they were attached, then `LIFEPRINT_`-prefixed environment variables. String
//! values have `${VAR}` and `~/` expanded after merging. CLI flags are applied
//! on top of the result by the binary.
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use lifeprint_common::{
    DEFAULT_CONTAINER_ID, DEFAULT_PREVIEW_LIMIT, DEFAULT_SOURCE_LABEL, ExtractStrategy,
};
use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

pub use config::ConfigError;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "LIFEPRINT";

/// Name of the settings file picked up from the working directory when present.
pub const DEFAULT_SETTINGS_FILE: &str = "lifeprint.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// `id` of the `<ul>` whose anchors are indexed.
    #[serde(deserialize_with = "scalar_string")]
    pub container_id: String,
    /// Written to each item's `source` field.
    #[serde(deserialize_with = "scalar_string")]
    pub source_label: String,
    /// Items shown when no output path is given.
    #[serde(deserialize_with = "count")]
    pub preview_limit: usize,
    pub strategy: ExtractStrategy,
    /// Extra copies of the index written alongside the primary output.
    #[serde(deserialize_with = "path_list")]
    pub mirrors: Vec<PathBuf>,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            source_label: DEFAULT_SOURCE_LABEL.to_string(),
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            strategy: ExtractStrategy::Auto,
            mirrors: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Flag(bool),
}

/// YAML reads `source_label: 2024` as a number; ids and labels keep it as text.
fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Signed(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Flag(b) => b.to_string(),
    })
}

/// Environment values arrive as text, file values as numbers.
fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    match Scalar::deserialize(deserializer)? {
        Scalar::Unsigned(n) => usize::try_from(n).map_err(de::Error::custom),
        Scalar::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected a non-negative count, got `{s}`"))),
        Scalar::Signed(n) => Err(de::Error::custom(format!(
            "expected a non-negative count, got `{n}`"
        ))),
        Scalar::Float(_) | Scalar::Flag(_) => {
            Err(de::Error::custom("expected a non-negative count"))
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PathList {
    Many(Vec<PathBuf>),
    Joined(String),
}

/// A YAML list, or the comma separated form `LIFEPRINT_MIRRORS` arrives in.
fn path_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<PathBuf>, D::Error> {
    Ok(match PathList::deserialize(deserializer)? {
        PathList::Many(paths) => paths,
        PathList::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect(),
    })
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') || s.starts_with('~') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::full(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring.
pub struct IndexSettingsLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for IndexSettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexSettingsLoader {
    /// Start from defaults only; the environment overlay is applied in [`load`](Self::load).
    ///
    /// ```
    /// use lifeprint_config::IndexSettingsLoader;
    ///
    /// let settings = IndexSettingsLoader::new()
    ///     .with_yaml_str("container_id: signList\npreview_limit: 3")
    ///     .load()
    ///     .expect("valid settings");
    ///
    /// assert_eq!(settings.container_id, "signList");
    /// assert_eq!(settings.preview_limit, 3);
    /// assert_eq!(settings.source_label, "Lifeprint");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a settings file that must exist; format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a settings file that is skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use lifeprint_common::ExtractStrategy;
    /// use lifeprint_config::IndexSettingsLoader;
    ///
    /// let settings = IndexSettingsLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// strategy: pattern
    /// mirrors:
    ///   - api/_data/lifeprint-index.json
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(settings.strategy, ExtractStrategy::Pattern);
    /// assert_eq!(settings.mirrors.len(), 1);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Apply the environment overlay and deserialize into [`IndexSettings`].
    ///
    /// `LIFEPRINT_CONTAINER_ID`, `LIFEPRINT_SOURCE_LABEL`,
    /// `LIFEPRINT_PREVIEW_LIMIT`, `LIFEPRINT_STRATEGY` and the comma separated
    /// `LIFEPRINT_MIRRORS` override file values. Environment values are taken
    /// as text, so `LIFEPRINT_CONTAINER_ID=007` keeps its leading zeros.
    pub fn load(self) -> Result<IndexSettings, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_mirror_paths_from_env() {
        temp_env::with_var("LP_ROOT", Some("/srv/site"), || {
            let mut v = json!("${LP_ROOT}/client/public/lifeprint-index.json");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("/srv/site/client/public/lifeprint-index.json"));
        });
    }

    #[test]
    fn expands_inside_lists_and_maps() {
        temp_env::with_vars([("LP_CLIENT", Some("client")), ("LP_API", Some("api"))], || {
            let mut v = json!({
                "mirrors": ["$LP_CLIENT/index.json", "${LP_API}/_data/index.json"],
                "preview_limit": 4,
                "container_id": "myUL"
            });
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!({
                    "mirrors": ["client/index.json", "api/_data/index.json"],
                    "preview_limit": 4,
                    "container_id": "myUL"
                })
            );
        });
    }

    #[test]
    fn cyclic_references_terminate() {
        temp_env::with_vars([("LP_A", Some("${LP_B}")), ("LP_B", Some("${LP_A}"))], || {
            let mut v = json!("out/${LP_A}.json");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("out/") && s.ends_with(".json"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("${LP_DOES_NOT_EXIST}/index.json");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("${LP_DOES_NOT_EXIST}/index.json"));
    }

    #[test]
    fn numeric_scalars_are_kept_as_text() {
        let s: IndexSettings = serde_json::from_value(json!({
            "container_id": 12345,
            "source_label": 2024,
            "preview_limit": "3"
        }))
        .unwrap();
        assert_eq!(s.container_id, "12345");
        assert_eq!(s.source_label, "2024");
        assert_eq!(s.preview_limit, 3);
    }

    #[test]
    fn mirrors_accept_list_or_joined_text() {
        let listed: IndexSettings =
            serde_json::from_value(json!({ "mirrors": ["a.json", "b/c.json"] })).unwrap();
        let joined: IndexSettings =
            serde_json::from_value(json!({ "mirrors": "a.json, b/c.json," })).unwrap();
        assert_eq!(listed.mirrors, joined.mirrors);
        assert_eq!(joined.mirrors, vec![PathBuf::from("a.json"), PathBuf::from("b/c.json")]);
    }

    #[test]
    fn preview_limit_rejects_negative_and_non_numeric() {
        assert!(serde_json::from_value::<IndexSettings>(json!({ "preview_limit": -1 })).is_err());
        assert!(serde_json::from_value::<IndexSettings>(json!({ "preview_limit": "many" })).is_err());
    }

    #[test]
    fn defaults_match_saved_lifeprint_page() {
        let s = IndexSettings::default();
        assert_eq!(s.container_id, "myUL");
        assert_eq!(s.source_label, "Lifeprint");
        assert_eq!(s.preview_limit, 10);
        assert_eq!(s.strategy, ExtractStrategy::Auto);
        assert!(s.mirrors.is_empty());
    }
}
