pub mod error;
pub mod find;
pub mod host;
pub mod io;
pub mod navigation;
pub mod parsing;
pub mod patterns;
pub mod session;
pub mod settings;
pub mod stats;
pub mod views;

// Re-export key types for easier usage
pub use error::TraceError;
pub use find::{FindResults, find_literal};
pub use host::{BufferEditor, Editor, LineOffsets, Message, RevealMode};
pub use navigation::{NavOutcome, Navigator};
pub use parsing::{BoundaryPattern, Transaction, TransactionView, build_transactions};
pub use patterns::{Match, Pattern};
pub use session::Session;
pub use settings::{Settings, SettingsMap, TracePatterns};
pub use stats::TraceStats;
pub use views::{TreeItem, TreeProvider};
