pub mod api;
pub mod dashboards;
pub mod domain;
pub mod integrations;
pub mod routes;
pub mod shared;
pub mod system;
