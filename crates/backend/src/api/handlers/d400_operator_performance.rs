use axum::{extract::Query, Json};
use contracts::dashboards::d400_operator_performance::dto::{
    OperatorPerformanceRequest, OperatorPerformanceResponse,
};

use crate::dashboards::d400_operator_performance::service;
use crate::shared::error::{from_service, ApiResult};

/// GET /api/d400/operator_performance?date_from=2025-03-01&date_to=2025-03-31&operator_id=...
pub async fn get_operator_performance(
    Query(request): Query<OperatorPerformanceRequest>,
) -> ApiResult<Json<OperatorPerformanceResponse>> {
    tracing::info!(
        "D400 Dashboard: operator performance {}..{}",
        request.date_from,
        request.date_to
    );

    let response = service::get_operator_performance(request)
        .await
        .map_err(from_service)?;
    Ok(Json(response))
}
