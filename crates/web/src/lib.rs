pub mod config;
pub mod error;
pub mod mjpeg;
pub mod routes;
pub mod state;
pub mod upload_storage;
