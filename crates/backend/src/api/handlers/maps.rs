use axum::{extract::Query, Json};
use contracts::integrations::maps::{
    Place, PlaceSearchQuery, RouteOptimizeRequest, RouteOptimizeResponse,
};

use crate::integrations::maps;
use crate::shared::error::{from_service, ApiResult};

/// GET /api/maps/places?query=bakery&latitude=41.0&longitude=29.0&radius=3000
pub async fn search_places(Query(query): Query<PlaceSearchQuery>) -> ApiResult<Json<Vec<Place>>> {
    let places = maps::search_places(&query).await.map_err(from_service)?;
    Ok(Json(places))
}

/// POST /api/maps/route
pub async fn optimize_route(
    Json(request): Json<RouteOptimizeRequest>,
) -> ApiResult<Json<RouteOptimizeResponse>> {
    let route = maps::optimize_route(&request).await.map_err(from_service)?;
    Ok(Json(route))
}
