use axum::{
    Router,
    extract::{ConnectInfo, Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::warn;

use crate::error::{ApiError, ServerError};
use crate::handlers::{
    biomes_handler, health_handler, metrics_handler, search_handler, stream_handler,
    structures_handler,
};
use crate::metrics::{RATE_LIMITED, REQUEST_TOTAL};
use crate::state::AppState;

/// Key used when the peer address is not known.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Serves until the listener fails.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<(), ServerError> {
    serve_with_shutdown(listener, state, std::future::pending()).await
}

/// Serves until `shutdown` resolves, then drains in-flight requests.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state).into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/structures", get(structures_handler).fallback(use_get))
        .route("/biomes", get(biomes_handler).fallback(use_get))
        .route("/health", get(health_handler).fallback(use_get))
        .route("/metrics", get(metrics_handler).fallback(use_get))
        .route("/search", post(search_handler).fallback(use_post))
        .route("/search/stream", get(stream_handler).fallback(use_upgrade))
        .fallback(not_found)
        // after the routes and fallback so it covers all of them
        .layer(middleware::from_fn_with_state(Arc::clone(&state), admission))
        .with_state(state)
}

// admission runs before any dispatch, upgrade path included
async fn admission(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    REQUEST_TOTAL.inc();
    let client = client_key(&request);
    if !state.rate_limiter.check(&client) {
        RATE_LIMITED.inc();
        warn!(%client, path = %request.uri().path(), "rate limit exceeded");
        return ApiError::rate_limited().into_response();
    }
    next.run(request).await
}

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

async fn not_found() -> ApiError {
    ApiError::not_found()
}

async fn use_get() -> ApiError {
    ApiError::method_not_allowed("use GET")
}

async fn use_post() -> ApiError {
    ApiError::method_not_allowed("use POST")
}

async fn use_upgrade() -> ApiError {
    ApiError::method_not_allowed("use GET with a WebSocket upgrade")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn client_key_is_the_peer_ip() {
        let mut request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        assert_eq!(client_key(&request), UNKNOWN_CLIENT);

        let addr: SocketAddr = "203.0.113.9:51234".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        assert_eq!(client_key(&request), "203.0.113.9");
    }
}
