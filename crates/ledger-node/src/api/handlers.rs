//! Route handlers
//!
//! Ledger calls are short and lock-guarded inside the service, so handlers
//! call them directly rather than through a blocking pool.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{MatchedPath, Path, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use dpos_ledger::{
    Ballot, Block, DelegateId, ElectionResult, GovernanceApi, LedgerApi, Record,
    RotationSnapshot, SchedulingApi, Token, TokenMinter, VoterId,
};
use ledger_telemetry::{
    encode_metrics, CHAIN_HEIGHT, ELECTIONS, HTTP_REQUESTS, HTTP_REQUEST_DURATION,
};
use serde::Deserialize;
use tracing::info;

use super::{ApiError, AppState};

/// Body of `POST /`
#[derive(Debug, Deserialize)]
pub struct WriteBlockRequest {
    /// Submitting delegate; required under the enforced proposer policy
    #[serde(default)]
    pub proposer: Option<DelegateId>,
    pub payload: Record,
}

/// Body of `POST /new`
#[derive(Debug, Deserialize)]
pub struct MintRequest {
    pub name: String,
    pub owner: String,
    /// Defaults to the current time
    #[serde(default)]
    pub created_on: Option<String>,
    pub metadata: String,
}

/// Body of `POST /votes`
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub voter: VoterId,
    pub delegate: DelegateId,
}

/// `GET /`: the full chain as indented JSON
pub async fn get_chain(State(state): State<AppState>) -> Result<Response, ApiError> {
    let chain = state.ledger.snapshot();
    let body =
        serde_json::to_string_pretty(&chain).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// `POST /`: append a block carrying the given record
pub async fn write_block(
    State(state): State<AppState>,
    body: Result<Json<WriteBlockRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Block>), ApiError> {
    let Json(request) = body?;
    let block = state
        .ledger
        .add_block(request.proposer.as_ref(), request.payload)?;
    CHAIN_HEIGHT.set(i64::try_from(block.position).unwrap_or(i64::MAX));
    state.schedule.after_append(&state.ledger, &block);

    Ok((StatusCode::CREATED, Json(block)))
}

/// `POST /new`: mint a token with a content-hash identifier
pub async fn mint_token(
    State(state): State<AppState>,
    body: Result<Json<MintRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Token>), ApiError> {
    let Json(request) = body?;
    let token = state.minter.mint(Token {
        token_id: String::new(),
        name: request.name,
        owner: request.owner,
        created_on: request
            .created_on
            .unwrap_or_else(|| Utc::now().to_rfc3339()),
        metadata: request.metadata,
    });

    info!(token_id = %token.token_id, owner = %token.owner, "Token minted");
    Ok((StatusCode::CREATED, Json(token)))
}

/// `POST /votes`
pub async fn cast_vote(
    State(state): State<AppState>,
    body: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<Ballot>, ApiError> {
    let Json(request) = body?;
    let ballot = state.ledger.cast_vote(&request.voter, &request.delegate)?;
    Ok(Json(ballot))
}

/// `DELETE /votes/:voter`
pub async fn retract_vote(
    State(state): State<AppState>,
    Path(voter): Path<String>,
) -> Result<Json<Ballot>, ApiError> {
    let ballot = state.ledger.retract_vote(&VoterId::new(voter))?;
    Ok(Json(ballot))
}

/// `POST /election`
pub async fn run_election(State(state): State<AppState>) -> Json<ElectionResult> {
    let committee = state.ledger.run_election();
    ELECTIONS.with_label_values(&["on_demand"]).inc();
    Json(committee)
}

/// `GET /committee`
pub async fn get_committee(State(state): State<AppState>) -> Json<ElectionResult> {
    Json(state.ledger.committee())
}

/// `GET /rotation`
pub async fn get_rotation(State(state): State<AppState>) -> Json<RotationSnapshot> {
    Json(state.ledger.rotation())
}

/// `GET /metrics`: Prometheus text exposition
pub async fn get_metrics() -> Result<Response, ApiError> {
    let body = encode_metrics().map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}

/// Count and time every routed request
pub async fn track_requests(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| format!("{} {}", request.method(), path.as_str()))
        .unwrap_or_else(|| "unmatched".to_string());

    let started = Instant::now();
    let response = next.run(request).await;

    HTTP_REQUEST_DURATION
        .with_label_values(&[route.as_str()])
        .observe(started.elapsed().as_secs_f64());
    HTTP_REQUESTS
        .with_label_values(&[route.as_str(), response.status().as_str()])
        .inc();
    response
}
