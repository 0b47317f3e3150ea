use regex::{Captures, Regex};

use crate::error::TraceError;
use crate::settings::{Settings, keys, require};

use super::types::{Edge, EdgeKind};

/// The combined boundary pattern classifying matches as start, end or
/// discard-end edges.
///
/// The configured markers are wrapped in the named groups `start`, `end` and
/// `discard`; whichever group participated decides the edge kind.
#[derive(Debug, Clone)]
pub struct BoundaryPattern {
    regex: Regex,
}

impl BoundaryPattern {
    pub fn new(start: &str, end: &str, discard: Option<&str>) -> Result<Self, TraceError> {
        let mut source = format!("(?P<start>{start})|(?P<end>{end})");
        if let Some(discard) = discard {
            source.push_str(&format!("|(?P<discard>{discard})"));
        }
        Regex::new(&source)
            .map(|regex| Self { regex })
            .map_err(|err| TraceError::invalid_pattern(&source, err))
    }

    /// Start and end markers are required; the discard marker is optional.
    pub fn from_settings(settings: &dyn Settings) -> Result<Self, TraceError> {
        Self::new(
            require(settings, keys::TRANSACTION_START)?,
            require(settings, keys::TRANSACTION_END)?,
            settings.string(keys::TRANSACTION_DISCARD),
        )
    }

    /// Classified edges in ascending document order.
    pub fn edges<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Edge> + 'a {
        self.regex.captures_iter(text).filter_map(|caps| classify(&caps))
    }
}

fn classify(caps: &Captures<'_>) -> Option<Edge> {
    let index = caps.get(0)?.start();
    let kind = if caps.name("start").is_some() {
        EdgeKind::Start
    } else if caps.name("end").is_some() {
        EdgeKind::End
    } else if caps.name("discard").is_some() {
        EdgeKind::DiscardEnd
    } else {
        return None;
    };
    Some(Edge { kind, index })
}
