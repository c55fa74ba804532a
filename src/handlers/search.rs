use axum::{Json, extract::State};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::error::ApiError;
use crate::metrics;
use crate::models::SearchResponse;
use crate::request::parse_request;
use crate::state::AppState;

// POST /search: whole body, validate, scan on the blocking pool
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<SearchResponse>, ApiError> {
    let request = parse_request(&body, &state.limits)
        .inspect_err(|e| debug!(error = %e, "rejected search request"))?;

    let version = request.version;
    let width = request.width();
    let start_time = Instant::now();

    let worker_state = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || worker_state.engine.search(&request))
        .await
        .map_err(|e| {
            error!(error = %e, "search task failed");
            ApiError::internal("search failed")
        })?;

    let elapsed = start_time.elapsed();
    metrics::observe_search(result.seeds.len(), result.scanned, elapsed.as_secs_f64());
    info!(
        %version,
        width,
        found = result.seeds.len(),
        scanned = result.scanned,
        elapsed_ms = elapsed.as_millis() as u64,
        "search complete"
    );

    Ok(Json(SearchResponse {
        seeds: result.seeds,
        scanned: result.scanned,
    }))
}
