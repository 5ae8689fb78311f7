//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`__` separates nesting, e.g. `APP_INGEST__COLLECTION`). Typed sections
//! carry the defaults used when a key is absent.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

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

    pub fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extract a whole section, falling back to its defaults when absent.
    pub fn section<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: DeserializeOwned + Default,
    {
        if self.figment.find_value(key).is_err() {
            return Ok(T::default());
        }
        self.get(key)
    }

    pub fn server(&self) -> anyhow::Result<ServerSettings> { self.section("server") }

    pub fn ingest(&self) -> anyhow::Result<IngestSettings> { self.section("ingest") }

    fn validate(&self) -> anyhow::Result<()> {
        let ingest = self.ingest()?;
        if ingest.collection.trim().is_empty() {
            return Err(Error::InvalidConfig("ingest.collection must not be empty".into()).into());
        }
        if ingest.http_timeout_secs == 0 {
            return Err(Error::InvalidConfig("ingest.http_timeout_secs must be > 0".into()).into());
        }
        let server = self.server()?;
        if server.max_tokens == 0 {
            return Err(Error::InvalidConfig("server.max_tokens must be > 0".into()).into());
        }
        Ok(())
    }
}

/// `[server]` section: the embedding service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    pub model_dir: String,
    pub max_tokens: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            model_dir: "models/ko-sbert-nli".to_string(),
            max_tokens: 128,
        }
    }
}

/// Which columns drive the embedding text and duplicate check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    /// Article body text (`카테고리` + `내용`).
    #[default]
    Content,
    /// Headline pair (`제목` + `부제목`).
    Title,
}

/// What to do with a row when the duplicate-check query itself fails.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DedupFailurePolicy {
    /// Treat the row as new and keep going.
    #[default]
    FailOpen,
    /// Skip the row.
    FailClosed,
}

/// `[ingest]` section: the ingestion pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IngestSettings {
    pub store_url: String,
    pub collection: String,
    pub embed_url: String,
    pub input_path: String,
    pub profile: ProfileKind,
    /// Overrides the profile's blank-row check when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_blank: Option<bool>,
    pub on_dedup_error: DedupFailurePolicy,
    pub throttle_ms: u64,
    pub http_timeout_secs: u64,
    pub provenance: String,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            store_url: "http://localhost:6333".to_string(),
            collection: "phishing_cases".to_string(),
            embed_url: "http://localhost:8000/v1/embed".to_string(),
            input_path: "articles.csv".to_string(),
            profile: ProfileKind::Content,
            skip_blank: None,
            on_dedup_error: DedupFailurePolicy::FailOpen,
            throttle_ms: 10,
            http_timeout_secs: 30,
            provenance: "csv-upload".to_string(),
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
