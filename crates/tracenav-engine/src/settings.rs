//! Read-only settings lookup.
//!
//! Settings are looked up by dotted key. A missing required key is a hard
//! error ([`TraceError::MissingSetting`]); nothing here falls back to a
//! built-in default.

use std::collections::HashMap;

use crate::error::TraceError;
use crate::patterns::Pattern;

/// Setting keys understood by the engine.
pub mod keys {
    pub const TRANSACTION_START: &str = "regex.transaction_start";
    pub const TRANSACTION_END: &str = "regex.transaction_end";
    /// Optional: an end marker for transactions that were discarded.
    pub const TRANSACTION_DISCARD: &str = "regex.transaction_discard";
    pub const TRACE_TIMESTAMP: &str = "regex.trace_timestamp";
    pub const EMBEDDED_XML: &str = "regex.embedded_xml";
    pub const POLICY_NAME: &str = "regex.policy_name";
    pub const APPLYING_POLICY: &str = "regex.applying_policy";
    pub const APPLYING_RULE: &str = "regex.applying_rule";
    pub const QUERY_RESULT: &str = "regex.query_result";
    pub const SUBSCRIBER_RESULT: &str = "regex.subscriber_result";
    pub const TRACE_DATE: &str = "regex.trace_date";
    pub const ERROR: &str = "regex.error";
    pub const SELECT_MATCH: &str = "navigation.select_match";
}

pub trait Settings {
    fn string(&self, key: &str) -> Option<&str>;

    fn flag(&self, key: &str) -> Option<bool>;
}

pub fn require<'s>(settings: &'s dyn Settings, key: &str) -> Result<&'s str, TraceError> {
    settings
        .string(key)
        .ok_or_else(|| TraceError::MissingSetting(key.to_string()))
}

pub fn require_flag(settings: &dyn Settings, key: &str) -> Result<bool, TraceError> {
    settings
        .flag(key)
        .ok_or_else(|| TraceError::MissingSetting(key.to_string()))
}

pub fn require_pattern(settings: &dyn Settings, key: &str) -> Result<Pattern, TraceError> {
    Pattern::new(require(settings, key)?)
}

/// A plain in-memory [`Settings`] store.
#[derive(Debug, Clone, Default)]
pub struct SettingsMap {
    strings: HashMap<String, String>,
    flags: HashMap<String, bool>,
}

impl SettingsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_string(mut self, key: &str, value: &str) -> Self {
        self.set_string(key, value);
        self
    }

    pub fn with_flag(mut self, key: &str, value: bool) -> Self {
        self.set_flag(key, value);
        self
    }

    pub fn set_string(&mut self, key: &str, value: &str) {
        self.strings.insert(key.to_string(), value.to_string());
    }

    pub fn set_flag(&mut self, key: &str, value: bool) {
        self.flags.insert(key.to_string(), value);
    }

    pub fn remove(&mut self, key: &str) {
        self.strings.remove(key);
        self.flags.remove(key);
    }
}

impl Settings for SettingsMap {
    fn string(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    fn flag(&self, key: &str) -> Option<bool> {
        self.flags.get(key).copied()
    }
}

/// Patterns used to derive transaction metadata, compiled once per derivation.
#[derive(Debug, Clone)]
pub struct TracePatterns {
    /// Group 1, when present, is the timestamp value.
    pub timestamp: Pattern,
    pub embedded_xml: Pattern,
    /// Group 1 is the policy name.
    pub policy_name: Pattern,
}

impl TracePatterns {
    pub fn from_settings(settings: &dyn Settings) -> Result<Self, TraceError> {
        Ok(Self {
            timestamp: require_pattern(settings, keys::TRACE_TIMESTAMP)?,
            embedded_xml: require_pattern(settings, keys::EMBEDDED_XML)?,
            policy_name: require_pattern(settings, keys::POLICY_NAME)?,
        })
    }
}
