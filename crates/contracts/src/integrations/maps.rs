use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Business discovery search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceSearchQuery {
    pub query: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Meters
    pub radius: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
}

/// Sequence one operator's planned visits for a day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteOptimizeRequest {
    pub operator_id: String,
    pub date: NaiveDate,
    /// Start/end point; defaults to the first stop
    pub origin_latitude: Option<f64>,
    pub origin_longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub visit_id: String,
    pub branch_id: String,
    pub branch_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteOptimizeResponse {
    /// Stops in driving order
    pub ordered: Vec<RouteStop>,
    /// Stops whose branch has no coordinates
    pub unrouted: Vec<RouteStop>,
}
