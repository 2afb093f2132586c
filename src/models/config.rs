use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Plugin;

/// Raw plugin-key → value mapping, as parsed from a syntax file
pub type ConfigMap = IndexMap<String, Value>;

/// Where the file configuration of a run came from.
///
/// Determined once per run by the resolver and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--syntax`
    Explicit(Utf8PathBuf),

    /// Found by walking up from the start directory
    Discovered(Utf8PathBuf),

    /// No file configuration
    None,
}

impl ConfigSource {
    /// Path of the syntax file, if any
    pub fn path(&self) -> Option<&Utf8Path> {
        match self {
            Self::Explicit(path) | Self::Discovered(path) => Some(path),
            Self::None => None,
        }
    }
}

/// Plugin values given directly on the command line. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideMap(ConfigMap);

impl OverrideMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value for a plugin key, replacing any earlier value
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Set the value for one of the known plugins
    pub fn set(&mut self, plugin: Plugin, value: Value) {
        self.insert(plugin.name(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for OverrideMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// The merged configuration used for every file of a run.
///
/// Built once before traversal starts. Read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectiveConfig(ConfigMap);

impl EffectiveConfig {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Value configured for one of the known plugins
    pub fn plugin(&self, plugin: Plugin) -> Option<&Value> {
        self.get(plugin.name())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &ConfigMap {
        &self.0
    }
}

impl From<ConfigMap> for EffectiveConfig {
    fn from(map: ConfigMap) -> Self {
        Self(map)
    }
}

/// Merge a file configuration with command line overrides.
///
/// Shallow and key-by-key: every key of `overrides` replaces the file value of
/// the same key; keys only present in the file are kept. Nested objects are
/// not merged. With neither input the result is empty.
pub fn merge_config(file: Option<ConfigMap>, overrides: &OverrideMap) -> EffectiveConfig {
    let mut merged = file.unwrap_or_default();
    for (key, value) in overrides.iter() {
        merged.insert(key.clone(), value.clone());
    }
    EffectiveConfig(merged)
}
