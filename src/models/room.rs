use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::field::{first_text, FieldValue};

/// Keys probed, in order, when the room list arrives wrapped in an object.
pub const ROOM_LIST_KEYS: [&str; 3] = ["rooms", "data", "items"];

/// Name given to a room record that carries no usable name.
pub const UNKNOWN_ROOM_NAME: &str = "Unknown";

/// A room as reported by the Pulse API, normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: String,
    pub name: String,
}

impl Room {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Normalize one element of the room list. `None` when no identifier can be found.
    pub fn from_entry(entry: &Value) -> Option<Self> {
        match entry {
            Value::String(id) => {
                let id = id.trim();
                if id.is_empty() {
                    return None;
                }
                Some(Self::new(id, format!("Room {}", id)))
            }
            Value::Object(_) => {
                let record = RoomRecord::deserialize(entry).ok()?;
                let id = record.id()?;
                let name = record
                    .name()
                    .unwrap_or_else(|| UNKNOWN_ROOM_NAME.to_string());
                Some(Self { id, name })
            }
            _ => None,
        }
    }
}

/// Room record as the API may shape it; every field is optional
#[derive(Debug, Default, Deserialize)]
struct RoomRecord {
    #[serde(default)]
    id: Option<FieldValue>,
    #[serde(default, rename = "roomId")]
    room_id: Option<FieldValue>,
    #[serde(default)]
    name: Option<FieldValue>,
    #[serde(default, rename = "roomName")]
    room_name: Option<FieldValue>,
}

impl RoomRecord {
    fn id(&self) -> Option<String> {
        first_text([&self.id, &self.room_id])
    }

    fn name(&self) -> Option<String> {
        first_text([&self.name, &self.room_name])
    }
}

/// Parse a room listing body.
///
/// Accepts a bare array or an object holding the array under one of
/// [`ROOM_LIST_KEYS`]; the first key with a non-empty array wins. Entries
/// without an identifier are dropped. Any other shape is a
/// [`AppError::MalformedResponse`].
pub fn parse_room_list(body: &str) -> Result<Vec<Room>> {
    let value: Value = serde_json::from_str(body)?;

    let entries = match &value {
        Value::Array(entries) => entries,
        Value::Object(map) => {
            let found = ROOM_LIST_KEYS
                .iter()
                .filter_map(|key| map.get(*key).and_then(Value::as_array))
                .find(|entries| !entries.is_empty());

            match found {
                Some(entries) => entries,
                None if ROOM_LIST_KEYS
                    .iter()
                    .any(|key| map.get(*key).is_some_and(Value::is_array)) =>
                {
                    return Ok(Vec::new());
                }
                None => {
                    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                    return Err(AppError::MalformedResponse(format!(
                        "no room list under {:?}; available keys: {:?}",
                        ROOM_LIST_KEYS, keys
                    )));
                }
            }
        }
        other => {
            return Err(AppError::MalformedResponse(format!(
                "unexpected room list type: {}",
                json_type_name(other)
            )));
        }
    };

    let mut rooms = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match Room::from_entry(entry) {
            Some(room) => rooms.push(room),
            None => {
                tracing::warn!(entry = index + 1, value = %entry, "Room has no ID, skipping");
            }
        }
    }

    Ok(rooms)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn expected() -> Vec<Room> {
        vec![Room::new("r1", "Room r1"), Room::new("r2", "Lobby")]
    }

    #[test]
    fn test_all_list_shapes_normalize_alike() {
        let entries = json!(["r1", {"id": "r2", "name": "Lobby"}]);

        for body in [
            entries.clone(),
            json!({ "rooms": entries.clone() }),
            json!({ "data": entries.clone() }),
            json!({ "items": entries.clone() }),
        ] {
            let rooms = parse_room_list(&body.to_string()).expect("Should parse");
            assert_eq!(rooms, expected(), "shape: {}", body);
        }
    }

    #[test]
    fn test_entry_normalization() {
        assert_eq!(
            Room::from_entry(&json!("r1")),
            Some(Room::new("r1", "Room r1"))
        );
        assert_eq!(
            Room::from_entry(&json!({"id": "r2", "name": "Lobby"})),
            Some(Room::new("r2", "Lobby"))
        );
        assert_eq!(
            Room::from_entry(&json!({"roomId": "r3"})),
            Some(Room::new("r3", "Unknown"))
        );
        assert_eq!(
            Room::from_entry(&json!({"roomId": "r4", "roomName": "Boardroom"})),
            Some(Room::new("r4", "Boardroom"))
        );
        assert_eq!(
            Room::from_entry(&json!({"id": 42, "name": "Numbered"})),
            Some(Room::new("42", "Numbered"))
        );
    }

    #[test]
    fn test_id_preference_order() {
        assert_eq!(
            Room::from_entry(&json!({"id": "a", "roomId": "b"})),
            Some(Room::new("a", "Unknown"))
        );
        assert_eq!(
            Room::from_entry(&json!({"id": "", "roomId": "b", "name": "", "roomName": "B"})),
            Some(Room::new("b", "B"))
        );
    }

    #[test]
    fn test_entries_without_id_are_dropped() {
        assert_eq!(Room::from_entry(&json!({"name": "Nameless"})), None);
        assert_eq!(Room::from_entry(&json!({"id": null})), None);
        assert_eq!(Room::from_entry(&json!("")), None);
        assert_eq!(Room::from_entry(&json!(7)), None);
        assert_eq!(Room::from_entry(&json!(["r1"])), None);

        let rooms = parse_room_list(r#"[{"name": "Nameless"}, "r1", null]"#).expect("Should parse");
        assert_eq!(rooms, vec![Room::new("r1", "Room r1")]);
    }

    #[test]
    fn test_envelope_key_preference() {
        let body = json!({
            "rooms": ["from-rooms"],
            "data": ["from-data"],
            "items": ["from-items"]
        });
        let rooms = parse_room_list(&body.to_string()).expect("Should parse");
        assert_eq!(rooms, vec![Room::new("from-rooms", "Room from-rooms")]);

        let body = json!({ "rooms": [], "data": ["from-data"] });
        let rooms = parse_room_list(&body.to_string()).expect("Should parse");
        assert_eq!(rooms, vec![Room::new("from-data", "Room from-data")]);
    }

    #[test]
    fn test_empty_envelope_is_empty_list() {
        let rooms = parse_room_list(r#"{"rooms": []}"#).expect("Should parse");
        assert!(rooms.is_empty());
    }

    #[test]
    fn test_unexpected_shapes_are_malformed() {
        assert_matches!(
            parse_room_list(r#"{"total": 3}"#),
            Err(AppError::MalformedResponse(msg)) if msg.contains("total")
        );
        assert_matches!(
            parse_room_list(r#""rooms""#),
            Err(AppError::MalformedResponse(_))
        );
        assert_matches!(
            parse_room_list("<html>oops</html>"),
            Err(AppError::MalformedResponse(_))
        );
    }
}
