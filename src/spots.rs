//! Lenient decoding of parking spot payloads.
//!
//! The backend has changed the spot schema over time (`available` went from a
//! boolean to a count, ids moved between `id`, `_id` and `spotId`) and older
//! endpoints still emit the old shapes. Every spot the client reads goes
//! through [`decode_spot`], which resolves each field through a fallback chain
//! and only fails when the payload is not a JSON object.

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::{Map, Value};

use crate::models::ParkingSpot;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpotDecodeError {
    #[error("parking spot payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

pub fn decode_spot(value: &Value) -> Result<ParkingSpot, SpotDecodeError> {
    let obj = value
        .as_object()
        .ok_or_else(|| SpotDecodeError::NotAnObject(json_kind(value)))?;

    let spot_code = string_field(obj, "spotId");
    let id = string_field(obj, "id")
        .or_else(|| string_field(obj, "_id"))
        .or_else(|| spot_code.clone())
        .unwrap_or_default();
    let lot_id = string_field(obj, "lotId").unwrap_or_default();
    let capacity = obj.get("capacity").and_then(integer).unwrap_or(0);
    let available = available_count(obj.get("available"));

    let status = match obj.get("status") {
        Some(Value::String(s)) => s.clone(),
        _ if available > 0 => "available".to_string(),
        _ => "unavailable".to_string(),
    };

    Ok(ParkingSpot {
        id,
        lot_id,
        lot_name: string_field(obj, "lotName"),
        spot_code,
        name: string_field(obj, "name"),
        zone_name: string_field(obj, "zoneName"),
        capacity,
        available,
        status,
    })
}

/// Decodes a JSON array of spots, failing only on entries that are not objects.
pub fn decode_spots(value: &Value) -> Result<Vec<ParkingSpot>, SpotDecodeError> {
    match value {
        Value::Array(items) => items.iter().map(decode_spot).collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(SpotDecodeError::NotAnObject(json_kind(other))),
    }
}

impl<'de> Deserialize<'de> for ParkingSpot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        decode_spot(&value).map_err(D::Error::custom)
    }
}

fn available_count(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Bool(true)) => 1,
        Some(Value::Bool(false)) => 0,
        Some(v @ Value::Number(_)) => integer(v).unwrap_or(0),
        _ => 0,
    }
}

// Missing and null both fall through to the next candidate.
fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
