//! Live operator positions: last write wins per operator, every update is
//! broadcast to stream subscribers.

use chrono::Utc;
use contracts::integrations::locations::{LocationUpdate, OperatorLocation};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};

const CHANNEL_CAPACITY: usize = 256;

pub struct LocationBoard {
    positions: RwLock<HashMap<String, OperatorLocation>>,
    sender: broadcast::Sender<OperatorLocation>,
}

impl LocationBoard {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            positions: RwLock::new(HashMap::new()),
            sender,
        }
    }

    /// Store the position and notify subscribers
    pub async fn publish(&self, update: LocationUpdate) -> Result<OperatorLocation, String> {
        update.validate()?;

        let location = OperatorLocation {
            operator_id: update.operator_id.trim().to_string(),
            latitude: update.latitude,
            longitude: update.longitude,
            recorded_at: Utc::now(),
        };
        self.positions
            .write()
            .await
            .insert(location.operator_id.clone(), location.clone());

        // No subscribers is fine
        let _ = self.sender.send(location.clone());
        Ok(location)
    }

    pub async fn snapshot(&self) -> Vec<OperatorLocation> {
        let mut all: Vec<OperatorLocation> = self.positions.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.operator_id.cmp(&b.operator_id));
        all
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OperatorLocation> {
        self.sender.subscribe()
    }
}

impl Default for LocationBoard {
    fn default() -> Self {
        Self::new()
    }
}

static BOARD: Lazy<LocationBoard> = Lazy::new(LocationBoard::new);

pub fn board() -> &'static LocationBoard {
    &BOARD
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(operator_id: &str, lat: f64) -> LocationUpdate {
        LocationUpdate {
            operator_id: operator_id.into(),
            latitude: lat,
            longitude: 29.0,
        }
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let board = LocationBoard::new();
        board.publish(update("op-1", 41.0)).await.unwrap();
        board.publish(update("op-2", 40.0)).await.unwrap();
        board.publish(update("op-1", 41.5)).await.unwrap();

        let snapshot = board.snapshot().await;
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].operator_id, "op-1");
        assert_eq!(snapshot[0].latitude, 41.5);
    }

    #[tokio::test]
    async fn test_subscribers_receive_updates() {
        let board = LocationBoard::new();
        let mut rx = board.subscribe();

        board.publish(update("op-1", 41.0)).await.unwrap();
        let received = rx.recv().await.unwrap();
        assert_eq!(received.operator_id, "op-1");
    }

    #[tokio::test]
    async fn test_invalid_update_rejected() {
        let board = LocationBoard::new();
        assert!(board.publish(update("op-1", 123.0)).await.is_err());
        assert!(board.publish(update("  ", 41.0)).await.is_err());
        assert!(board.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_events() {
        let board = LocationBoard::new();
        let mut rx = board.subscribe();
        for i in 0..(CHANNEL_CAPACITY + 10) {
            board.publish(update("op-1", (i % 80) as f64)).await.unwrap();
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
    }
}
