//! Shared DTOs and aggregates for the pest-control backend and its clients.

pub mod dashboards;
pub mod domain;
pub mod integrations;
pub mod system;
