use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Request for the operator performance dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorPerformanceRequest {
    /// Inclusive start date "YYYY-MM-DD"
    pub date_from: NaiveDate,
    /// Inclusive end date "YYYY-MM-DD"
    pub date_to: NaiveDate,
    /// Restrict the report to a single operator
    pub operator_id: Option<String>,
}

/// Revenue and visit counts of one operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorPerformanceRow {
    pub operator_id: String,
    pub operator_name: String,
    /// Sum of paid material sales on the operator's visits
    pub material_revenue: f64,
    /// Visit count × unit price, summed per branch
    pub visit_revenue: f64,
    pub total_revenue: f64,
    /// Completed visits in the period
    pub total_visits: u32,
    /// Visits that received a non-zero unit price
    pub paid_visits: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatorPerformanceTotals {
    pub material_revenue: f64,
    pub visit_revenue: f64,
    pub total_revenue: f64,
    pub total_visits: u32,
    pub paid_visits: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorPerformanceResponse {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    /// Sorted by total revenue, highest first
    pub rows: Vec<OperatorPerformanceRow>,
    pub totals: OperatorPerformanceTotals,
    /// Sales whose visit is outside the report window or filter
    pub unattributed_material_revenue: f64,
}
