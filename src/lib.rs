//! In-memory configuration store served over HTTP.
//!
//! Clients create, fetch, replace, delete and search named configuration
//! records, each carrying an arbitrarily nested metadata tree.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod store;

pub use config::schema::StoreConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::{ConfigRecord, ConfigStore, StoreError};
