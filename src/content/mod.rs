//! Static content: wall patterns and level command tapes
//!
//! Everything here is immutable once loaded. Runtime state built on top of it
//! (placed patterns, live threats, the script cursor's side effects) lives in
//! `sim`.

pub mod level;
pub mod pattern;

pub use level::{FloatParam, LevelCommand, ParsedLevel, Placement};
pub use pattern::{Pattern, PatternStore, Wall};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Permissive boolean used for optional document flags.
///
/// Accepts `true`/`false`, `"true"`/`"false"`, `"1"`/`"0"` and `1`/`0`.
/// Anything else reads as `false` rather than failing the document.
pub(crate) fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1"),
        _ => false,
    })
}
