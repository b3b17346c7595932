//! Configuration store subsystem.
//!
//! # Data Flow
//! ```text
//! RequestAdapter (http::handlers)
//!     → config_store.rs (store-wide lock, insert/replace/remove)
//!     → matcher.rs (dotted-path walk, search only)
//!     → Vec<ConfigRecord> / ConfigRecord / StoreError
//! ```
//!
//! # Design Decisions
//! - One coarse mutex guards the whole map; reads lock too
//! - The store is an owned value handed to the HTTP layer, never a global
//! - Errors are typed kinds; the HTTP layer picks status codes

pub mod config_store;
pub mod error;
pub mod matcher;
pub mod record;

pub use config_store::ConfigStore;
pub use error::StoreError;
pub use matcher::{MetadataMatcher, SearchQuery};
pub use record::{ConfigRecord, Metadata, MetadataValue, Scalar};
