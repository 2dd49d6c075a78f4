pub mod classify;
pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod metrics;
pub mod shutdown;
pub mod snapshot;
pub mod stats;
pub mod store;

pub use classify::*;
pub use config::*;
pub use domain::*;
pub use error::*;
pub use filter::{matches_query, search, Searchable, Selection};
pub use grouping::{group_by, Groups};
pub use metrics::Metrics;
pub use snapshot::{LoadTicket, SnapshotCell};
pub use stats::*;
pub use store::{load_seed_file, MemoryStore, SeedData, Shelf};
