//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_KEY_LENGTH, DEFAULT_MAX_KEY_ATTEMPTS, DEFAULT_MAX_LENGTH, DEFAULT_PORT,
    DEFAULT_STATIC_DOCUMENT, DEFAULT_SWEEP_INTERVAL_SECS,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Storage backend selected at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Embedded redb file under `data_path`.
    #[default]
    Redb,
    /// Process-local map; contents are lost on exit.
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redb" | "file" => Ok(Self::Redb),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store type '{}'", other)),
        }
    }
}

/// Key generator selected at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyGeneratorKind {
    #[default]
    Random,
    Phonetic,
}

impl FromStr for KeyGeneratorKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "phonetic" => Ok(Self::Phonetic),
            other => Err(format!("unknown key generator '{}'", other)),
        }
    }
}

/// Runtime configuration, read once at startup and never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data_path: String,
    pub port: u16,
    pub max_length: usize,
    pub key_length: usize,
    pub max_key_attempts: usize,
    pub store: StoreKind,
    pub key_generator: KeyGeneratorKind,
    /// Lifetime of user documents; `None` keeps them forever.
    pub expire_after_secs: Option<u64>,
    pub sweep_interval_secs: u64,
    /// Static documents: key name to source file.
    pub documents: BTreeMap<String, PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            port: DEFAULT_PORT,
            max_length: DEFAULT_MAX_LENGTH,
            key_length: DEFAULT_KEY_LENGTH,
            max_key_attempts: DEFAULT_MAX_KEY_ATTEMPTS,
            store: StoreKind::default(),
            key_generator: KeyGeneratorKind::default(),
            expire_after_secs: None,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            documents: BTreeMap::new(),
        }
    }
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    // Windows USERPROFILE
    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

fn default_data_path() -> String {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache")
        .join("hastebin")
        .join("data")
        .to_string_lossy()
        .to_string()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

/// Parse a `name=path,name=path` list of static documents.
///
/// Entries without `=` or with an empty name or path are skipped with a
/// warning; later duplicates replace earlier ones.
pub fn parse_static_documents(value: &str) -> BTreeMap<String, PathBuf> {
    let mut documents = BTreeMap::new();
    for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match entry.split_once('=') {
            Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
                documents.insert(
                    name.trim().to_string(),
                    PathBuf::from(expand_tilde(path.trim().to_string())),
                );
            }
            _ => tracing::warn!("Ignoring malformed static document entry '{}'", entry),
        }
    }
    documents
}

fn parse_positive<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + PartialOrd + Default + Copy,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => value,
        _ => {
            tracing::warn!("Invalid {}='{}'; using default", name, raw);
            default
        }
    }
}

fn parse_choice<T: FromStr<Err = String> + Default>(name: &str, raw: Option<String>) -> T {
    match raw {
        Some(raw) => raw.parse().unwrap_or_else(|err| {
            tracing::warn!("Invalid {}: {}; using default", name, err);
            T::default()
        }),
        None => T::default(),
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Arguments
    /// - `lookup`: Returns the raw value for a variable name, if set.
    ///
    /// # Returns
    /// A populated [`Config`]; invalid values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let documents = match lookup("STATIC_DOCUMENTS") {
            Some(value) => parse_static_documents(&value),
            None => default_static_documents(),
        };
        let expire_after_secs = lookup("EXPIRE_SECONDS")
            .map(|raw| parse_positive("EXPIRE_SECONDS", Some(raw), 0u64))
            .filter(|secs| *secs > 0);

        Self {
            data_path: lookup("DATA_PATH")
                .map(expand_tilde)
                .unwrap_or_else(default_data_path),
            port: parse_positive("PORT", lookup("PORT"), DEFAULT_PORT),
            max_length: parse_positive("MAX_LENGTH", lookup("MAX_LENGTH"), DEFAULT_MAX_LENGTH),
            key_length: parse_positive("KEY_LENGTH", lookup("KEY_LENGTH"), DEFAULT_KEY_LENGTH),
            max_key_attempts: parse_positive(
                "MAX_KEY_ATTEMPTS",
                lookup("MAX_KEY_ATTEMPTS"),
                DEFAULT_MAX_KEY_ATTEMPTS,
            ),
            store: parse_choice("STORE_TYPE", lookup("STORE_TYPE")),
            key_generator: parse_choice("KEY_GENERATOR", lookup("KEY_GENERATOR")),
            expire_after_secs,
            sweep_interval_secs: parse_positive(
                "SWEEP_INTERVAL_SECONDS",
                lookup("SWEEP_INTERVAL_SECONDS"),
                DEFAULT_SWEEP_INTERVAL_SECS,
            ),
            documents,
        }
    }

    /// Whether `key` names a configured static document.
    ///
    /// Reads of static documents skip the store's expiration check.
    pub fn is_static_document(&self, key: &str) -> bool {
        self.documents.contains_key(key)
    }
}

fn default_static_documents() -> BTreeMap<String, PathBuf> {
    let (name, path) = DEFAULT_STATIC_DOCUMENT;
    let path = PathBuf::from(path);
    let mut documents = BTreeMap::new();
    if path.is_file() {
        documents.insert(name.to_string(), path);
    }
    documents
}
