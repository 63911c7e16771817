//! Station autocomplete wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validate::{ValidationError, json_type_name};

/// A station suggestion returned by the autocomplete endpoint.
///
/// Beyond its shape the record is opaque payload: it is handed to the
/// presentation layer as-is, so no numeric bounds are enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationRecord {
    pub name: String,
    pub translated_name: String,
    pub country_code: String,
    pub code: String,
    pub score: f64,
    pub longitude: f64,
    pub latitude: f64,
    pub extra_info: ExtraInfo,
    pub location_type: String,
    pub default_language: String,
    pub timezone: String,
    pub connections: Vec<Value>,
}

/// Attribute bag attached to a station record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraInfo {
    pub attributes: Vec<String>,
}

/// Wrapper for the autocomplete response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationResponse {
    pub search_locations: Vec<StationRecord>,
}

/// Validate and parse an autocomplete response body.
///
/// The body must be an object whose `searchLocations` field is an array of
/// station records. An empty array is valid; a missing, null or non-array
/// `searchLocations` is not.
pub fn parse_station_response(body: Value) -> Result<Vec<StationRecord>, ValidationError> {
    let mut object = match body {
        Value::Object(map) => map,
        other => {
            return Err(ValidationError::Shape {
                path: "searchLocations".to_string(),
                message: format!("expected object response, got {}", json_type_name(&other)),
            });
        }
    };

    let locations = object
        .remove("searchLocations")
        .ok_or_else(|| ValidationError::Shape {
            path: "searchLocations".to_string(),
            message: "missing field".to_string(),
        })?;

    if !locations.is_array() {
        return Err(ValidationError::Shape {
            path: "searchLocations".to_string(),
            message: format!("expected array, got {}", json_type_name(&locations)),
        });
    }

    serde_json::from_value(locations).map_err(|e| ValidationError::Shape {
        path: "searchLocations".to_string(),
        message: e.to_string(),
    })
}
