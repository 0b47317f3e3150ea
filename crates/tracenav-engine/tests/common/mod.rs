// Shared by several integration test binaries; each uses a different subset.
#![allow(dead_code)]

use std::path::Path;

use tracenav_engine::io::read_trace;
use tracenav_engine::settings::keys;
use tracenav_engine::{BufferEditor, Session, SettingsMap};

/// The stock trace patterns, as shipped in the default configuration.
pub fn stock_settings() -> SettingsMap {
    SettingsMap::new()
        .with_string(keys::TRANSACTION_START, "Start transaction")
        .with_string(keys::TRANSACTION_END, "End transaction")
        .with_string(keys::TRANSACTION_DISCARD, "Discard transaction")
        .with_string(
            keys::TRACE_TIMESTAMP,
            r"(\d{2}/\d{2}/\d{2} \d{2}:\d{2}:\d{2}\.\d{3})",
        )
        .with_string(keys::EMBEDDED_XML, r"(?s)<Event\b[^>]*>.*?</Event>")
        .with_string(keys::POLICY_NAME, r"Applying policy: %\+C%14C(.*?)%-C")
        .with_string(keys::APPLYING_POLICY, "Applying policy")
        .with_string(keys::APPLYING_RULE, "Applying rule")
        .with_string(keys::QUERY_RESULT, "from policy result|Read result")
        .with_string(keys::SUBSCRIBER_RESULT, "Submitting document to subscriber shim")
        .with_string(keys::TRACE_DATE, r"\[(.*)\]:")
        .with_string(keys::ERROR, "error")
        .with_flag(keys::SELECT_MATCH, true)
}

pub fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(format!("{name}.log"));
    read_trace(&path).unwrap()
}

pub fn session(name: &str) -> Session<BufferEditor> {
    Session::new(BufferEditor::from_text(&fixture(name)), stock_settings())
}
