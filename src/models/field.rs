use serde::Deserialize;
use serde_json::Value;

/// A loosely typed JSON field (id, name or code) as the Pulse API may send it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    Other(Value),
}

impl FieldValue {
    /// Text form of the field. Blank strings and non-scalar values have none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            FieldValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// First candidate, in order, that has a usable text value.
pub fn first_text<const N: usize>(candidates: [&Option<FieldValue>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find_map(FieldValue::as_text)
}
