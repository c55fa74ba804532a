use clap::Parser;
use std::time::Duration;
use tracing::Level;

use crate::engine;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "seedscan-gateway")]
#[command(about = "Concurrent seed-search service with batch and streaming delivery")]
pub struct Args {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Rate limit max requests per window
    #[arg(long, default_value_t = 10)]
    pub rate_limit: u32,

    /// Rate limit window in seconds
    #[arg(long, default_value_t = 60)]
    pub rate_window: u64,

    /// Number of slots in the admission table
    #[arg(long, default_value_t = 1024)]
    pub rate_table_size: usize,

    /// Max structure constraints per request
    #[arg(long, default_value_t = 16)]
    pub max_structures: usize,

    /// Hard ceiling on returned seeds; max_results is clamped to this
    #[arg(long, default_value_t = 10)]
    pub max_results: usize,

    /// Worker threads per search
    #[arg(long, default_value_t = 16)]
    pub max_workers: usize,

    /// Max width of seed_end - seed_start
    #[arg(long, default_value_t = 1_000_000_000)]
    pub max_range: i64,

    /// Largest accepted max_distance, in blocks
    #[arg(long, default_value_t = 30_000_000)]
    pub max_distance: i64,

    /// Seeds scanned between checks of the shared match count
    #[arg(long, default_value_t = 4096)]
    pub check_interval: u64,

    /// Matches buffered per stream before workers block
    #[arg(long, default_value_t = 64)]
    pub stream_queue: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn limits(&self) -> Limits {
        Limits {
            rate_limit: self.rate_limit,
            rate_window: Duration::from_secs(self.rate_window),
            rate_table_size: self.rate_table_size.max(1),
            max_structures: self.max_structures.max(1),
            max_results: self.max_results.max(1),
            max_workers: self.max_workers.max(1),
            max_range: self.max_range.max(0),
            max_distance: self.max_distance.max(1),
            check_interval: engine::clamp_interval(self.check_interval),
            stream_queue: self.stream_queue.max(1),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    // unknown names fall back to INFO
    pub fn tracing_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Tunables shared by the admission table, the parser and the engine.
#[derive(Debug, Clone)]
pub struct Limits {
    pub rate_limit: u32,
    pub rate_window: Duration,
    pub rate_table_size: usize,
    pub max_structures: usize,
    pub max_results: usize,
    pub max_workers: usize,
    pub max_range: i64,
    pub max_distance: i64,
    /// Always a power of two so the check can mask instead of divide.
    pub check_interval: u64,
    pub stream_queue: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            rate_limit: 10,
            rate_window: Duration::from_secs(60),
            rate_table_size: 1024,
            max_structures: 16,
            max_results: 10,
            max_workers: 16,
            max_range: 1_000_000_000,
            max_distance: 30_000_000,
            check_interval: 4096,
            stream_queue: 64,
        }
    }
}
