use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position report posted by an operator's device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub operator_id: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if self.operator_id.trim().is_empty() {
            return Err("operator_id is required".into());
        }
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude)
        {
            return Err("Coordinates out of range".into());
        }
        Ok(())
    }
}

/// Last known position of an operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorLocation {
    pub operator_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: DateTime<Utc>,
}
