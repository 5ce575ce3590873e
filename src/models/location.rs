//! Check-in coordinates and map projection.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::attendance::DisplayRecord;

/// Coordinate pair captured at check-in. Either side may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    /// Both coordinates present and finite.
    pub fn is_valid(&self) -> bool {
        matches!(
            (self.latitude, self.longitude),
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite()
        )
    }

    /// The pair, only when valid.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        if self.is_valid() {
            Some((self.latitude?, self.longitude?))
        } else {
            None
        }
    }
}

/// Accept numbers or numeric strings; anything else reads as absent.
fn coordinate(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Decode a location without ever failing the surrounding record.
///
/// Accepts `{latitude, longitude}`, `{lat, lng}` and `[lat, lng]`.
pub fn lenient_location<'de, D>(deserializer: D) -> Result<Option<Location>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| location_from_value(&v)))
}

fn location_from_value(value: &Value) -> Option<Location> {
    let (latitude, longitude) = match value {
        Value::Object(map) => (
            coordinate(map.get("latitude").or_else(|| map.get("lat"))),
            coordinate(
                map.get("longitude")
                    .or_else(|| map.get("lng"))
                    .or_else(|| map.get("lon")),
            ),
        ),
        Value::Array(items) if items.len() == 2 => (coordinate(items.first()), coordinate(items.get(1))),
        _ => return None,
    };

    if latitude.is_none() && longitude.is_none() {
        return None;
    }

    Some(Location { latitude, longitude })
}

/// One marker for the location viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub record_id: String,
    pub date: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: String,
}

impl MapPoint {
    /// OpenStreetMap link centred on the point.
    pub fn map_url(&self) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={lat:.6}&mlon={lng:.6}#map=17/{lat:.6}/{lng:.6}",
            lat = self.latitude,
            lng = self.longitude
        )
    }
}

/// Map markers for every record with a usable location, in input order.
pub fn map_points(records: &[DisplayRecord]) -> Vec<MapPoint> {
    records
        .iter()
        .filter_map(|r| {
            let (latitude, longitude) = r.record.location.as_ref()?.coordinates()?;
            Some(MapPoint {
                record_id: r.id().to_string(),
                date: r.date().to_string(),
                latitude,
                longitude,
                status: r.final_status.clone(),
            })
        })
        .collect()
}
