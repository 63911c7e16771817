//! Connection search wire types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validate::{
    FieldViolation, ValidationError, require_in_range, require_non_empty, require_positive,
};

/// A purchasable fare on a connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fare {
    pub name: String,
    /// Price in minor currency units. Must be a positive integer.
    pub price_in_cents: i64,
    pub currency: String,
    /// 1 = first class, 2 = second class.
    pub comfort_class: u8,
}

impl Fare {
    fn check(&self, path: &str, violations: &mut Vec<FieldViolation>) {
        require_positive(
            self.price_in_cents,
            &format!("{path}.price_in_cents"),
            violations,
        );
        require_in_range(
            i64::from(self.comfort_class),
            1,
            2,
            &format!("{path}.comfort_class"),
            violations,
        );
    }
}

/// A single connection between two stations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub departure_station: String,
    pub departure_at: NaiveDateTime,
    pub arrival_station: String,
    pub arrival_at: NaiveDateTime,
    pub duration_in_minutes: i64,
    pub changeovers: u32,
    pub products: Vec<String>,
    /// Every connection carries at least one fare.
    pub fares: Vec<Fare>,
}

impl ConnectionRecord {
    fn check(&self, path: &str, violations: &mut Vec<FieldViolation>) {
        require_positive(
            self.duration_in_minutes,
            &format!("{path}.duration_in_minutes"),
            violations,
        );
        require_non_empty(self.fares.len(), &format!("{path}.fares"), violations);
        for (i, fare) in self.fares.iter().enumerate() {
            fare.check(&format!("{path}.fares[{i}]"), violations);
        }
    }
}

/// Search criteria submitted by the user.
///
/// Serialized as the POST body with camelCase keys; the optional filters
/// are omitted entirely when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub from: String,
    pub to: String,
    pub departure_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_direct: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_changeovers: Option<u32>,
}

impl SearchCriteria {
    /// Create criteria for a search from one station to another.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        departure_at: NaiveDateTime,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            departure_at,
            only_direct: None,
            max_changeovers: None,
        }
    }

    /// Only return direct connections.
    pub fn direct_only(mut self) -> Self {
        self.only_direct = Some(true);
        self
    }

    /// Cap the number of changeovers.
    pub fn with_max_changeovers(mut self, max: u32) -> Self {
        self.max_changeovers = Some(max);
        self
    }
}

/// Validate and parse a connection search response body.
///
/// The body must be a JSON array of connection records; each record's fare
/// list must be non-empty and its numeric fields within bounds.
pub fn parse_connections_response(body: Value) -> Result<Vec<ConnectionRecord>, ValidationError> {
    if !body.is_array() {
        return Err(ValidationError::ExpectedArray);
    }

    let records: Vec<ConnectionRecord> =
        serde_json::from_value(body).map_err(|e| ValidationError::Shape {
            path: "[]".to_string(),
            message: e.to_string(),
        })?;

    let mut violations = Vec::new();
    for (i, record) in records.iter().enumerate() {
        record.check(&format!("[{i}]"), &mut violations);
    }

    if violations.is_empty() {
        Ok(records)
    } else {
        Err(ValidationError::Bounds(violations))
    }
}
