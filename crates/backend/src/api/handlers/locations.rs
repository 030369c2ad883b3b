use std::convert::Infallible;
use std::time::Duration;

use axum::{
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use contracts::integrations::locations::{LocationUpdate, OperatorLocation};
use futures::stream::{Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;

use crate::integrations::locations::board;
use crate::shared::error::{ApiError, ApiResult};

/// POST /api/locations
pub async fn publish(Json(update): Json<LocationUpdate>) -> ApiResult<Json<OperatorLocation>> {
    let location = board()
        .publish(update)
        .await
        .map_err(ApiError::BadRequest)?;
    Ok(Json(location))
}

/// GET /api/locations
pub async fn snapshot() -> Json<Vec<OperatorLocation>> {
    Json(board().snapshot().await)
}

/// GET /api/locations/stream (Server-Sent Events, one `location` event per update)
pub async fn stream() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = BroadcastStream::new(board().subscribe()).filter_map(|msg| async move {
        match msg {
            Ok(location) => Event::default()
                .event("location")
                .json_data(&location)
                .ok()
                .map(Ok),
            // Lagged receivers just skip what they missed
            Err(_) => None,
        }
    });

    Sse::new(events).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
