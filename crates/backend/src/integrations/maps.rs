use anyhow::{Context, Result};
use contracts::domain::a004_visit::aggregate::{VisitListQuery, VisitStatus};
use contracts::integrations::maps::{
    Place, PlaceSearchQuery, RouteOptimizeRequest, RouteOptimizeResponse, RouteStop,
};
use serde::Deserialize;
use std::collections::HashMap;

use crate::domain::{a002_branch, a004_visit};
use crate::shared::config::{self, MapsConfig};
use crate::shared::error::validation_error;

/// Client of the mapping provider (place search and directions)
pub struct MapsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    place_id: String,
    name: String,
    formatted_address: Option<String>,
    geometry: Option<Geometry>,
    rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PlaceSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    waypoint_order: Vec<usize>,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
    error_message: Option<String>,
}

fn check_status(status: &str, message: Option<&str>) -> Result<()> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        other => anyhow::bail!(
            "Maps API returned {}: {}",
            other,
            message.unwrap_or("no details")
        ),
    }
}

fn parse_places(body: &str) -> Result<Vec<Place>> {
    let parsed: PlaceSearchResponse =
        serde_json::from_str(body).context("Failed to parse place search response")?;
    check_status(&parsed.status, parsed.error_message.as_deref())?;

    Ok(parsed
        .results
        .into_iter()
        .map(|r| Place {
            place_id: r.place_id,
            name: r.name,
            address: r.formatted_address,
            latitude: r.geometry.as_ref().map(|g| g.location.lat),
            longitude: r.geometry.as_ref().map(|g| g.location.lng),
            rating: r.rating,
        })
        .collect())
}

fn parse_waypoint_order(body: &str) -> Result<Vec<usize>> {
    let parsed: DirectionsResponse =
        serde_json::from_str(body).context("Failed to parse directions response")?;
    check_status(&parsed.status, parsed.error_message.as_deref())?;

    parsed
        .routes
        .into_iter()
        .next()
        .map(|r| r.waypoint_order)
        .ok_or_else(|| anyhow::anyhow!("Maps API returned no route"))
}

/// Reorder `stops` by the provider's waypoint order.
/// The order must be a permutation of the stop indexes.
pub fn apply_waypoint_order(stops: Vec<RouteStop>, order: &[usize]) -> Result<Vec<RouteStop>> {
    if order.len() != stops.len() {
        anyhow::bail!(
            "Waypoint order has {} entries for {} stops",
            order.len(),
            stops.len()
        );
    }

    let mut slots: Vec<Option<RouteStop>> = stops.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(slots.len());
    for &idx in order {
        let stop = slots
            .get_mut(idx)
            .and_then(Option::take)
            .ok_or_else(|| anyhow::anyhow!("Invalid or repeated waypoint index {}", idx))?;
        ordered.push(stop);
    }
    Ok(ordered)
}

fn coords(stop: &RouteStop) -> Option<String> {
    match (stop.latitude, stop.longitude) {
        (Some(lat), Some(lng)) => Some(format!("{},{}", lat, lng)),
        _ => None,
    }
}

impl MapsClient {
    pub fn from_config(cfg: &MapsConfig) -> Result<Self> {
        let api_key = cfg
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Maps API key is not configured"))?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: cfg.api_base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Request to {} failed", path))?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            anyhow::bail!("Maps API {} failed with status {}: {}", path, status, body);
        }
        Ok(body)
    }

    pub async fn search_places(&self, query: &PlaceSearchQuery) -> Result<Vec<Place>> {
        let mut params = vec![("query", query.query.clone())];
        if let (Some(lat), Some(lng)) = (query.latitude, query.longitude) {
            params.push(("location", format!("{},{}", lat, lng)));
            params.push(("radius", query.radius.unwrap_or(5000).to_string()));
        }

        let body = self.get("place/textsearch/json", &params).await?;
        parse_places(&body)
    }

    /// Driving order for `stops` (all with coordinates), round trip from `origin`
    pub async fn optimize(&self, origin: &str, stops: Vec<RouteStop>) -> Result<Vec<RouteStop>> {
        let waypoints = stops
            .iter()
            .filter_map(coords)
            .collect::<Vec<_>>()
            .join("|");

        let params = vec![
            ("origin", origin.to_string()),
            ("destination", origin.to_string()),
            ("waypoints", format!("optimize:true|{}", waypoints)),
        ];
        let body = self.get("directions/json", &params).await?;
        let order = parse_waypoint_order(&body)?;
        apply_waypoint_order(stops, &order)
    }
}

pub async fn search_places(query: &PlaceSearchQuery) -> Result<Vec<Place>> {
    if query.query.trim().is_empty() {
        return Err(validation_error("query cannot be empty"));
    }
    MapsClient::from_config(&config::get().maps)?
        .search_places(query)
        .await
}

/// Sequence an operator's planned visits for one day
pub async fn optimize_route(request: &RouteOptimizeRequest) -> Result<RouteOptimizeResponse> {
    let visits = a004_visit::service::list(&VisitListQuery {
        date_from: Some(request.date),
        date_to: Some(request.date),
        operator_id: Some(request.operator_id.clone()),
        status: Some(VisitStatus::Planned),
    })
    .await?;

    let branch_ids: Vec<String> = visits.iter().map(|v| v.branch_id.clone()).collect();
    let branches: HashMap<String, _> = a002_branch::repository::list_by_ids(&branch_ids)
        .await?
        .into_iter()
        .map(|b| (b.base.id.value().to_string(), b))
        .collect();

    let (routable, unrouted): (Vec<RouteStop>, Vec<RouteStop>) = visits
        .iter()
        .map(|v| {
            let branch = branches.get(&v.branch_id);
            let position = branch.and_then(|b| b.coordinates());
            RouteStop {
                visit_id: v.base.id.value().to_string(),
                branch_id: v.branch_id.clone(),
                branch_name: branch
                    .map(|b| b.base.description.clone())
                    .unwrap_or_else(|| v.branch_id.clone()),
                latitude: position.map(|p| p.0),
                longitude: position.map(|p| p.1),
            }
        })
        .partition(|s| coords(s).is_some());

    if routable.len() < 2 {
        return Ok(RouteOptimizeResponse {
            ordered: routable,
            unrouted,
        });
    }

    let origin = match (request.origin_latitude, request.origin_longitude) {
        (Some(lat), Some(lng)) => format!("{},{}", lat, lng),
        _ => coords(&routable[0]).unwrap_or_default(),
    };

    let stop_count = routable.len();
    let ordered = MapsClient::from_config(&config::get().maps)?
        .optimize(&origin, routable)
        .await?;

    tracing::info!(
        "Route for operator {} on {}: {} stops ordered, {} without coordinates",
        request.operator_id,
        request.date,
        stop_count,
        unrouted.len()
    );

    Ok(RouteOptimizeResponse { ordered, unrouted })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(id: &str, lat: Option<f64>) -> RouteStop {
        RouteStop {
            visit_id: id.into(),
            branch_id: format!("b-{}", id),
            branch_name: id.to_uppercase(),
            latitude: lat,
            longitude: lat.map(|l| l + 1.0),
        }
    }

    #[test]
    fn test_apply_waypoint_order() {
        let stops = vec![stop("a", Some(1.0)), stop("b", Some(2.0)), stop("c", Some(3.0))];
        let ordered = apply_waypoint_order(stops, &[2, 0, 1]).unwrap();
        let ids: Vec<&str> = ordered.iter().map(|s| s.visit_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_apply_waypoint_order_rejects_bad_order() {
        let stops = || vec![stop("a", Some(1.0)), stop("b", Some(2.0))];
        assert!(apply_waypoint_order(stops(), &[0]).is_err());
        assert!(apply_waypoint_order(stops(), &[0, 0]).is_err());
        assert!(apply_waypoint_order(stops(), &[0, 5]).is_err());
    }

    #[test]
    fn test_coords_require_both_values() {
        assert_eq!(coords(&stop("a", Some(41.0))), Some("41,42".to_string()));
        assert_eq!(coords(&stop("a", None)), None);
    }

    #[test]
    fn test_parse_directions() {
        let body = r#"{"status":"OK","routes":[{"waypoint_order":[1,0]}]}"#;
        assert_eq!(parse_waypoint_order(body).unwrap(), vec![1, 0]);

        let denied = r#"{"status":"REQUEST_DENIED","routes":[],"error_message":"bad key"}"#;
        let err = parse_waypoint_order(denied).unwrap_err().to_string();
        assert!(err.contains("REQUEST_DENIED"));
    }

    #[test]
    fn test_parse_places() {
        let body = r#"{
            "status": "OK",
            "results": [{
                "place_id": "p1",
                "name": "Bakery",
                "formatted_address": "Main St 1",
                "geometry": {"location": {"lat": 41.01, "lng": 28.97}},
                "rating": 4.5
            }, {
                "place_id": "p2",
                "name": "Kiosk"
            }]
        }"#;
        let places = parse_places(body).unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].latitude, Some(41.01));
        assert_eq!(places[1].address, None);

        let empty = r#"{"status":"ZERO_RESULTS","results":[]}"#;
        assert!(parse_places(empty).unwrap().is_empty());
    }
}
