pub mod blob_storage;
pub mod db;
pub mod schema;
