//! Tolerant access to loosely shaped JSON payloads
//!
//! The data server answers the same query either as a GeoJSON `features` list or as a nested
//! `{entity: {data: [...]}}` table, and field names drift between the two. These helpers try
//! both shapes and a prioritized list of keys so callers never repeat that lookup logic.

use serde_json::{Map, Value};

/// One row of a payload, whatever shape it came in
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    /// Attribute object: `properties` for features, the row itself for tables
    pub properties: &'a Map<String, Value>,
    /// The raw row, used for geometry lookups
    pub item: &'a Value,
}

impl<'a> Record<'a> {
    /// First present text value among `keys`
    #[must_use]
    pub fn text(&self, keys: &[&str]) -> Option<String> {
        first_text(self.properties, keys)
    }

    /// First value among `keys` that reads as a number
    #[must_use]
    pub fn number(&self, keys: &[&str]) -> Option<f64> {
        first_number(self.properties, keys)
    }

    /// GeoJSON point as `(longitude, latitude)`, each independently optional
    #[must_use]
    pub fn geometry_point(&self) -> (Option<f64>, Option<f64>) {
        let coordinates = self
            .item
            .get("geometry")
            .and_then(|geometry| geometry.get("coordinates"))
            .and_then(Value::as_array);

        match coordinates {
            Some(pair) if pair.len() >= 2 => (as_number(&pair[0]), as_number(&pair[1])),
            _ => (None, None),
        }
    }
}

/// Rows of a payload: non-empty `features`, else `{entity}.data`, else a bare top-level array
#[must_use]
pub fn records<'a>(payload: &'a Value, entity: &str) -> Vec<Record<'a>> {
    let rows = payload
        .get("features")
        .and_then(Value::as_array)
        .filter(|features| !features.is_empty())
        .or_else(|| {
            payload
                .get(entity)
                .and_then(|nested| nested.get("data"))
                .and_then(Value::as_array)
        })
        .or_else(|| payload.as_array());

    rows.map(|rows| rows.iter().filter_map(record).collect())
        .unwrap_or_default()
}

fn record(item: &Value) -> Option<Record<'_>> {
    let properties = item
        .get("properties")
        .and_then(Value::as_object)
        .or_else(|| item.as_object())?;
    Some(Record { properties, item })
}

/// First value among `keys` that is present, non-null and not a blank string
#[must_use]
pub fn first_present<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        })
}

/// Like [`first_present`], restricted to string values
#[must_use]
pub fn first_text(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Like [`first_present`], for values that read as numbers; unparsable values are skipped
#[must_use]
pub fn first_number(record: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(as_number)
}

/// Numeric value of a JSON number or numeric string
#[must_use]
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}
