use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Trace patterns, each looked up as `regex.<field>`.
///
/// Absent keys stay absent: the engine reports them instead of guessing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegexSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_discard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedded_xml: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applying_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applying_rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    /// Select a found match as well as scrolling to it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_match: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trace opened when none is given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_path: Option<PathBuf>,
    pub regex: RegexSettings,
    pub navigation: NavigationSettings,
}

impl Config {
    /// The stock patterns for DirXML-style engine traces.
    pub fn with_defaults() -> Self {
        let some = |s: &str| Some(s.to_string());
        Self {
            trace_path: None,
            regex: RegexSettings {
                transaction_start: some("Start transaction"),
                transaction_end: some("End transaction"),
                transaction_discard: some("Discard transaction"),
                trace_timestamp: some(r"(\d{2}/\d{2}/\d{2} \d{2}:\d{2}:\d{2}\.\d{3})"),
                embedded_xml: some(r"(?s)<Event\b[^>]*>.*?</Event>"),
                policy_name: some(r"Applying policy: %\+C%14C(.*?)%-C"),
                applying_policy: some("Applying policy"),
                applying_rule: some("Applying rule"),
                query_result: some("from policy result|Read result"),
                subscriber_result: some("Submitting document to subscriber shim"),
                trace_date: some(r"\[(.*)\]:"),
                error: some("error"),
            },
            navigation: NavigationSettings {
                select_match: Some(true),
            },
        }
    }

    /// String setting by dotted key, e.g. `regex.transaction_start`.
    pub fn string(&self, key: &str) -> Option<&str> {
        let regex = &self.regex;
        let value = match key {
            "regex.transaction_start" => &regex.transaction_start,
            "regex.transaction_end" => &regex.transaction_end,
            "regex.transaction_discard" => &regex.transaction_discard,
            "regex.trace_timestamp" => &regex.trace_timestamp,
            "regex.embedded_xml" => &regex.embedded_xml,
            "regex.policy_name" => &regex.policy_name,
            "regex.applying_policy" => &regex.applying_policy,
            "regex.applying_rule" => &regex.applying_rule,
            "regex.query_result" => &regex.query_result,
            "regex.subscriber_result" => &regex.subscriber_result,
            "regex.trace_date" => &regex.trace_date,
            "regex.error" => &regex.error,
            _ => return None,
        };
        value.as_deref()
    }

    /// Boolean setting by dotted key.
    pub fn flag(&self, key: &str) -> Option<bool> {
        match key {
            "navigation.select_match" => self.navigation.select_match,
            _ => None,
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the trace path
        config.trace_path = config
            .trace_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/tracenav");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
