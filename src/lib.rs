//! Concurrent seed-search service: scans ranges of world seeds for ones whose
//! structures satisfy spatial and biome constraints, answering over plain HTTP
//! or a streamed upgrade connection.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod oracle;
pub mod rate_limit;
pub mod request;
pub mod server;
pub mod state;
pub mod transport;

pub use config::{Args, Limits};
pub use engine::{SearchEngine, SearchResult, StreamOutcome};
pub use request::{SearchRequest, StructureQuery, parse_request};
pub use state::AppState;
