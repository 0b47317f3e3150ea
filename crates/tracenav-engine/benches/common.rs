// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use tracenav_engine::SettingsMap;
use tracenav_engine::settings::keys;

#[allow(dead_code)]
pub fn generate_trace(transactions: usize, depth: usize) -> String {
    let mut trace = String::new();
    for t in 0..transactions {
        for d in 0..depth {
            trace.push_str(&format!(
                "[21/03/24 10:{:02}:{:02}.{:03}]: Start transaction\n",
                t / 60 % 60,
                t % 60,
                d
            ));
            trace.push_str("<Event type=\"modify\"><modify class-name=\"User\"/></Event>\n");
            trace.push_str("[21/03/24 10:00:00.000]: Applying policy: %+C%14Cvalidate-user%-C\n");
            trace.push_str("[21/03/24 10:00:00.000]: Applying rule: Veto missing surname\n");
        }
        for _ in 0..depth {
            trace.push_str("[21/03/24 10:00:00.000]: End transaction\n");
        }
    }
    trace
}

#[allow(dead_code)]
pub fn settings() -> SettingsMap {
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
        .with_flag(keys::SELECT_MATCH, true)
}
