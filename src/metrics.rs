use lazy_static::lazy_static;
use prometheus::{
    Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram,
};

// registered once, on first touch
lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("seedscan_requests_total", "Total number of requests")
            .expect("register seedscan_requests_total");
    pub static ref RATE_LIMITED: Counter =
        register_counter!("seedscan_rate_limited_total", "Requests rejected by admission")
            .expect("register seedscan_rate_limited_total");
    pub static ref SEARCHES: Counter =
        register_counter!("seedscan_searches_total", "Searches run, batch and streamed")
            .expect("register seedscan_searches_total");
    pub static ref SEEDS_SCANNED: Counter =
        register_counter!("seedscan_seeds_scanned_total", "Seeds evaluated across all searches")
            .expect("register seedscan_seeds_scanned_total");
    pub static ref SEEDS_MATCHED: Counter =
        register_counter!("seedscan_seeds_matched_total", "Seeds that satisfied every constraint")
            .expect("register seedscan_seeds_matched_total");
    pub static ref SEARCH_LATENCY: Histogram = register_histogram!(
        "seedscan_search_latency_seconds",
        "Search wall-clock time in seconds"
    )
    .expect("register seedscan_search_latency_seconds");
    pub static ref ACTIVE_STREAMS: Gauge =
        register_gauge!("seedscan_active_streams", "Currently open streaming sessions")
            .expect("register seedscan_active_streams");
}

/// Record one finished search.
pub fn observe_search(found: usize, scanned: u64, elapsed_secs: f64) {
    SEARCHES.inc();
    SEEDS_SCANNED.inc_by(scanned as f64);
    SEEDS_MATCHED.inc_by(found as f64);
    SEARCH_LATENCY.observe(elapsed_secs);
}

/// Touch every metric so `/metrics` lists them before first use.
pub fn init() {
    lazy_static::initialize(&REQUEST_TOTAL);
    lazy_static::initialize(&RATE_LIMITED);
    lazy_static::initialize(&SEARCHES);
    lazy_static::initialize(&SEEDS_SCANNED);
    lazy_static::initialize(&SEEDS_MATCHED);
    lazy_static::initialize(&SEARCH_LATENCY);
    lazy_static::initialize(&ACTIVE_STREAMS);
}
