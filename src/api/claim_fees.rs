use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::{error::ApiError, AppState};
use crate::claim_api::schemas::{ClaimFeesBody, ClaimFeesResponse};

/// `POST /api/claim-fees`
pub async fn claim_fees(
    State(state): State<AppState>,
    payload: Result<Json<ClaimFeesBody>, JsonRejection>,
) -> Result<Json<ClaimFeesResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;

    let response = state.builder.build(&body).await?;

    Ok(Json(response))
}
