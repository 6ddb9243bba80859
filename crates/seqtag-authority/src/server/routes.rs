//! HTTP handlers for the authority protocol.
//!
//! Three endpoints, all JSON:
//!
//! - `GET  /api/sequence` - current counter value.
//! - `POST /api/sequence/reserve` - atomic contiguous range reservation.
//! - `POST /api/records` - batch persistence.
//!
//! Domain rejections (bad counts, duplicate identifiers) answer HTTP 200
//! with `success: false` so clients can distinguish them from transport
//! failures; only malformed requests and persistence failures surface as
//! HTTP errors.

use crate::server::config::ServerConfig;
use crate::server::state::AuthorityState;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use seqtag_wire::{
    Error, ReserveRequest, ReserveResponse, SequenceResponse, SubmitRequest, SubmitResponse,
};

/// Handler context: shared state plus the validated configuration.
#[derive(Clone)]
pub struct AppContext {
    pub state: AuthorityState,
    pub config: ServerConfig,
}

/// Builds the authority router.
pub fn router(state: AuthorityState, config: ServerConfig) -> Router {
    Router::new()
        .route("/api/sequence", get(get_sequence))
        .route("/api/sequence/reserve", post(reserve))
        .route("/api/records", post(submit_records))
        .with_state(AppContext { state, config })
}

/// Returns the current counter value.
#[tracing::instrument(skip_all)]
async fn get_sequence(State(ctx): State<AppContext>) -> Json<SequenceResponse> {
    Json(SequenceResponse {
        success: true,
        data: ctx.state.counter(),
    })
}

/// Atomically reserves a contiguous identifier range.
#[tracing::instrument(skip_all, fields(count = req.count))]
async fn reserve(
    State(ctx): State<AppContext>,
    Json(req): Json<ReserveRequest>,
) -> Result<Json<ReserveResponse>, Error> {
    if req.count == 0 {
        return Ok(Json(rejected_range("count must be greater than 0")));
    }
    if req.count > ctx.config.max_reserve {
        return Ok(Json(rejected_range(format!(
            "count {} exceeds maximum allowed ({})",
            req.count, ctx.config.max_reserve
        ))));
    }

    let (start, end) = ctx.state.reserve(req.count)?;
    tracing::debug!(start, end, "reserved identifier range");
    Ok(Json(ReserveResponse {
        success: true,
        start,
        end,
        description: None,
    }))
}

/// Persists a submitted batch to the ledger.
#[tracing::instrument(skip_all, fields(records = req.data.len()))]
async fn submit_records(
    State(ctx): State<AppContext>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, Error> {
    if req.data.is_empty() {
        return Ok(Json(SubmitResponse::rejected("empty batch")));
    }
    if req.data.len() > ctx.config.max_batch {
        return Ok(Json(SubmitResponse::rejected(format!(
            "batch of {} exceeds maximum allowed ({})",
            req.data.len(),
            ctx.config.max_batch
        ))));
    }

    match ctx.state.submit(req.data) {
        Ok(()) => Ok(Json(SubmitResponse::ok())),
        Err(e @ Error::DuplicateIdentifier { .. }) => {
            tracing::warn!("rejected submission: {e}");
            Ok(Json(SubmitResponse::rejected(e.to_string())))
        }
        Err(e) => Err(e),
    }
}

fn rejected_range(description: impl Into<String>) -> ReserveResponse {
    ReserveResponse {
        success: false,
        start: 0,
        end: 0,
        description: Some(description.into()),
    }
}
