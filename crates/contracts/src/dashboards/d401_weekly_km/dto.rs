use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyKmSummaryRequest {
    /// Weeks starting on or after this date
    pub date_from: NaiveDate,
    /// Weeks starting on or before this date
    pub date_to: NaiveDate,
    pub operator_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyKmSummaryRow {
    pub operator_id: String,
    pub operator_name: String,
    pub entries: u32,
    pub total_km: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyKmSummaryResponse {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub rows: Vec<WeeklyKmSummaryRow>,
    pub total_km: i64,
}
