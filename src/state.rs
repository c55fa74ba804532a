use crate::config::Limits;
use crate::engine::SearchEngine;
use crate::oracle::SyntheticOracle;
use crate::rate_limit::RateLimiter;

// app's shared state, one per process
pub struct AppState {
    pub engine: SearchEngine<SyntheticOracle>,
    pub rate_limiter: RateLimiter,
    pub limits: Limits,
}

impl AppState {
    pub fn new(limits: Limits) -> Self {
        Self {
            engine: SearchEngine::new(SyntheticOracle::new(), &limits),
            rate_limiter: RateLimiter::new(
                limits.rate_table_size,
                limits.rate_limit,
                limits.rate_window,
            ),
            limits,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}
