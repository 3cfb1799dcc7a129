use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::builder::ClaimBusy;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing required fields: pool, feeClaimer, and payer are required")]
    MissingFields,
    #[error("Creator address is required")]
    MissingCreator,
    #[error("Invalid public key format")]
    InvalidAddress,
    #[error("Invalid creator address format")]
    InvalidCreator,
    #[error("Invalid amount: `{0}` is not an unsigned integer")]
    InvalidAmount(String),
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("Pool account does not exist")]
    PoolNotFound,
    #[error("Failed to validate pool account")]
    PoolLookup(eyre::Report),
    #[error("A claim for this pool and fee claimer is already in progress")]
    ClaimInFlight,
    #[error("A claim transaction was issued recently for this pool and fee claimer; retry in {0}s")]
    ClaimIssuedRecently(u64),
    #[error("{0}")]
    Upstream(eyre::Report),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ClaimInFlight | ApiError::ClaimIssuedRecently(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ClaimBusy> for ApiError {
    fn from(busy: ClaimBusy) -> Self {
        match busy {
            ClaimBusy::Building => ApiError::ClaimInFlight,
            ClaimBusy::IssuedRecently { retry_in } => {
                ApiError::ClaimIssuedRecently(retry_in.as_secs().max(1))
            }
        }
    }
}

impl From<eyre::Report> for ApiError {
    fn from(report: eyre::Report) -> Self {
        ApiError::Upstream(report)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Upstream(report) => {
                tracing::error!("Claim API failure: {report:?}");
                json!({ "error": report.to_string(), "details": format!("{report:?}") })
            }
            ApiError::PoolLookup(report) => {
                tracing::warn!("Pool lookup failed: {report}");
                json!({ "error": self.to_string() })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
