//! HTTP error mapping

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dpos_ledger::{ChainError, LedgerError, RotationError, VotingError};
use serde_json::json;
use thiserror::Error;

/// Errors returned by the HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Ledger(err) => ledger_status(err),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Stale submissions are conflicts the caller can retry; corruption is ours.
fn ledger_status(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::Chain(chain) => match chain {
            ChainError::InvalidLinkage { .. } | ChainError::InvalidPosition { .. } => {
                StatusCode::CONFLICT
            }
            ChainError::HashMismatch { .. }
            | ChainError::TimestampRegression { .. }
            | ChainError::InvalidGenesis(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ChainError::ReservedGenesisMarker { .. } => StatusCode::BAD_REQUEST,
            ChainError::UnauthorizedProposer { .. } => StatusCode::FORBIDDEN,
        },
        LedgerError::Voting(voting) => match voting {
            VotingError::UnknownVoter(_) | VotingError::UnknownDelegate(_) => {
                StatusCode::NOT_FOUND
            }
            VotingError::NoActiveVote(_)
            | VotingError::DuplicateVoter(_)
            | VotingError::DuplicateDelegate(_) => StatusCode::CONFLICT,
        },
        LedgerError::Rotation(RotationError::NoActiveDelegates) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        LedgerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        let mut body = json!({ "error": self.to_string() });
        if let ApiError::Ledger(LedgerError::Chain(chain)) = &self {
            body["retryable"] = json!(chain.is_retryable());
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpos_ledger::{BlockHash, DelegateId, VoterId};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                LedgerError::from(ChainError::InvalidPosition {
                    expected: 2,
                    actual: 1,
                }),
                StatusCode::CONFLICT,
            ),
            (
                LedgerError::from(ChainError::HashMismatch {
                    position: 1,
                    stored: BlockHash::zero(),
                    recomputed: BlockHash::zero(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                LedgerError::from(ChainError::TimestampRegression {
                    position: 1,
                    previous: 10,
                    actual: 5,
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                LedgerError::from(ChainError::ReservedGenesisMarker { position: 1 }),
                StatusCode::BAD_REQUEST,
            ),
            (
                LedgerError::from(ChainError::UnauthorizedProposer {
                    expected: DelegateId::new("A"),
                    submitted: None,
                }),
                StatusCode::FORBIDDEN,
            ),
            (
                LedgerError::from(VotingError::UnknownVoter(VoterId::new("x"))),
                StatusCode::NOT_FOUND,
            ),
            (
                LedgerError::from(VotingError::NoActiveVote(VoterId::new("x"))),
                StatusCode::CONFLICT,
            ),
            (
                LedgerError::from(RotationError::NoActiveDelegates),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
