use axum::{extract::Query, Json};
use contracts::dashboards::d401_weekly_km::dto::{WeeklyKmSummaryRequest, WeeklyKmSummaryResponse};

use crate::dashboards::d401_weekly_km::service;
use crate::shared::error::{from_service, ApiResult};

/// GET /api/d401/weekly_km?date_from=2025-01-01&date_to=2025-03-31
pub async fn get_weekly_km(
    Query(request): Query<WeeklyKmSummaryRequest>,
) -> ApiResult<Json<WeeklyKmSummaryResponse>> {
    let response = service::get_weekly_km_summary(request)
        .await
        .map_err(from_service)?;
    Ok(Json(response))
}
