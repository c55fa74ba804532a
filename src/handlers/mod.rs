mod catalog;
mod health;
mod metrics;
mod search;
mod stream;

pub use catalog::{biomes_handler, structures_handler};
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use search::search_handler;
pub use stream::{run_session, stream_handler};
