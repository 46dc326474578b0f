//! HTTP API
//!
//! | Method | Path | Action |
//! |--------|------|--------|
//! | GET | `/` | Full chain |
//! | POST | `/` | Append a block |
//! | POST | `/new` | Mint a token |
//! | POST | `/votes` | Cast a vote |
//! | DELETE | `/votes/:voter` | Retract a vote |
//! | POST | `/election` | Run an election now |
//! | GET | `/committee` | Current committee |
//! | GET | `/rotation` | Proposer rotation |
//! | GET | `/metrics` | Prometheus metrics |

mod error;
mod handlers;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use dpos_ledger::{LedgerService, TokenMinter};

use crate::scheduler::ElectionSchedule;

pub use error::ApiError;
pub use handlers::{MintRequest, VoteRequest, WriteBlockRequest};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<LedgerService>,
    pub schedule: ElectionSchedule,
    pub minter: Arc<dyn TokenMinter>,
}

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::get_chain).post(handlers::write_block))
        .route("/new", post(handlers::mint_token))
        .route("/votes", post(handlers::cast_vote))
        .route("/votes/:voter", delete(handlers::retract_vote))
        .route("/election", post(handlers::run_election))
        .route("/committee", get(handlers::get_committee))
        .route("/rotation", get(handlers::get_rotation))
        .route("/metrics", get(handlers::get_metrics))
        .route_layer(middleware::from_fn(handlers::track_requests))
        .with_state(state)
}
