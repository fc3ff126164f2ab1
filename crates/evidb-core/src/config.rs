//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys use `__`, e.g. `APP_SEARCH__DEFAULT_K=10`). Provides helpers to
//! expand `~` and `${VAR}` and to resolve relative paths against a known base
//! directory.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    /// Wrap an already-assembled figment (used by tests and embedders).
    pub fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn has(&self, key: &str) -> bool {
        self.figment.contains(key)
    }

    /// Typed view of the whole configuration; every missing key takes its default.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))?;
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let settings = self.settings()?;
        if settings.search.default_k == 0 {
            return Err(Error::InvalidConfig("search.default_k must be >= 1".to_string()).into());
        }
        if settings.index.ngram_max == 0 {
            return Err(Error::InvalidConfig("index.ngram_max must be >= 1".to_string()).into());
        }
        if settings.index.max_df <= 0.0 || settings.index.max_df > 1.0 {
            return Err(Error::InvalidConfig(format!("index.max_df must be in (0, 1], got {}", settings.index.max_df)).into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub search: SearchSettings,
    pub index: IndexSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Base directory for relative artifact paths.
    pub root: String,
    pub corpus_path: String,
    pub index_path: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
            corpus_path: "data/corpus.json".to_string(),
            index_path: "data/indexes/tfidf.json".to_string(),
        }
    }
}

impl DataSettings {
    pub fn corpus_file(&self) -> PathBuf {
        resolve_with_base(&expand_path(&self.root), &self.corpus_path)
    }

    pub fn index_file(&self) -> PathBuf {
        resolve_with_base(&expand_path(&self.root), &self.index_path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub default_k: usize,
    pub confirm: ConfirmPolicy,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { default_k: 5, confirm: ConfirmPolicy::Prompt }
    }
}

/// How inferred filters get approved before they narrow a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmPolicy {
    /// Ask the operator on the terminal.
    #[default]
    Prompt,
    Always,
    Never,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    pub min_df: usize,
    pub max_df: f32,
    pub ngram_max: usize,
    pub stop_words: bool,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self { min_df: 2, max_df: 0.9, ngram_max: 2, stop_words: true }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
