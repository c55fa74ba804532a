use axum::{
    body::Body,
    extract::{Request, State},
    http::{StatusCode, header},
    response::Response,
};
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::Limits;
use crate::error::{ApiError, SessionError};
use crate::metrics::{self, ACTIVE_STREAMS};
use crate::models::{DoneMessage, ErrorBody, SeedMessage};
use crate::request::{SearchRequest, parse_request};
use crate::state::AppState;
use crate::transport::{
    CLOSE_INTERNAL, CLOSE_NORMAL, CLOSE_UNSUPPORTED, StreamSession, accept_token,
};

// GET /search/stream: answer the upgrade, run the session on its own task
pub async fn stream_handler(
    State(state): State<Arc<AppState>>,
    mut request: Request,
) -> Result<Response, ApiError> {
    let accept = request
        .headers()
        .get(header::SEC_WEBSOCKET_KEY)
        .and_then(|value| value.to_str().ok())
        .map(accept_token)
        .ok_or_else(|| {
            ApiError::new(StatusCode::BAD_REQUEST, "missing Sec-WebSocket-Key header")
        })?;

    let on_upgrade = hyper::upgrade::on(&mut request);
    tokio::spawn(async move {
        match on_upgrade.await {
            Ok(upgraded) => run_session(TokioIo::new(upgraded), state).await,
            Err(e) => warn!(error = %e, "stream upgrade failed"),
        }
    });

    Response::builder()
        .status(StatusCode::SWITCHING_PROTOCOLS)
        .header(header::UPGRADE, "websocket")
        .header(header::CONNECTION, "Upgrade")
        .header(header::SEC_WEBSOCKET_ACCEPT, accept)
        .body(Body::empty())
        .map_err(|e| ApiError::internal(format!("failed to build upgrade response: {e}")))
}

/// Drives one upgraded connection from its request frame to the close frame.
pub async fn run_session<S>(io: S, state: Arc<AppState>)
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let mut session = StreamSession::new(io);
    if let Err(e) = session.open() {
        warn!(error = %e, "stream session could not open");
        return;
    }
    ACTIVE_STREAMS.inc();
    info!("stream opened");

    let code = stream_search(&mut session, &state).await;
    session.close(code).await;

    ACTIVE_STREAMS.dec();
    info!(code, "stream closed");
}

async fn stream_search<S>(session: &mut StreamSession<S>, state: &Arc<AppState>) -> u16
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request = match read_search(session, &state.limits).await {
        Ok(request) => request,
        Err(SessionError::Request(e)) => {
            debug!(error = %e, "rejected stream request");
            let _ = session.send_json(&ErrorBody { error: e.to_string() }).await;
            return CLOSE_UNSUPPORTED;
        }
        Err(e) => {
            debug!(error = %e, "stream request unreadable");
            return CLOSE_UNSUPPORTED;
        }
    };

    // workers enqueue under the engine lock; this task owns the socket
    let (tx, mut rx) = mpsc::channel::<i64>(state.limits.stream_queue.max(1));
    let start_time = Instant::now();
    let worker_state = Arc::clone(state);
    let search = tokio::task::spawn_blocking(move || {
        worker_state
            .engine
            .search_stream(&request, |seed| tx.blocking_send(seed).is_ok())
    });

    let mut delivered = true;
    while let Some(seed) = rx.recv().await {
        if let Err(e) = session.send_json(&SeedMessage { seed }).await {
            warn!(error = %e, "stream write failed, cancelling search");
            delivered = false;
            break;
        }
    }
    // a closed queue makes the next enqueue fail, which cancels the workers
    drop(rx);

    let outcome = match search.await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "stream search task failed");
            return CLOSE_INTERNAL;
        }
    };

    let elapsed = start_time.elapsed();
    metrics::observe_search(outcome.found, outcome.scanned, elapsed.as_secs_f64());
    info!(
        found = outcome.found,
        scanned = outcome.scanned,
        cancelled = outcome.cancelled,
        elapsed_ms = elapsed.as_millis() as u64,
        "stream search complete"
    );

    if !delivered {
        return CLOSE_NORMAL;
    }
    if let Err(e) = session.send_json(&DoneMessage::new(outcome.scanned)).await {
        warn!(error = %e, "failed to send done message");
    }
    CLOSE_NORMAL
}

async fn read_search<S>(
    session: &mut StreamSession<S>,
    limits: &Limits,
) -> Result<SearchRequest, SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let text = session.read_request().await?;
    Ok(parse_request(&text, limits)?)
}
