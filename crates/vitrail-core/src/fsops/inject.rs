//! Anchor-based text injection

use crate::plan::Position;

/// Result of attempting an injection against a file's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectResult {
    /// New contents with the payload inserted.
    Injected(String),
    /// The anchor does not occur; contents untouched.
    AnchorMissing,
    /// The payload is already present; a rerun must not duplicate it.
    PayloadPresent,
}

/// Insert `payload` immediately before or after the first occurrence of
/// `anchor`. Idempotent: contents that already contain the payload are
/// left alone, so re-running a whole plan never duplicates injected
/// text.
pub fn inject(contents: &str, anchor: &str, payload: &str, position: Position) -> InjectResult {
    if contents.contains(payload) {
        return InjectResult::PayloadPresent;
    }
    let Some(index) = contents.find(anchor) else {
        return InjectResult::AnchorMissing;
    };
    let at = match position {
        Position::Before => index,
        Position::After => index + anchor.len(),
    };
    let mut out = String::with_capacity(contents.len() + payload.len());
    out.push_str(&contents[..at]);
    out.push_str(payload);
    out.push_str(&contents[at..]);
    InjectResult::Injected(out)
}
