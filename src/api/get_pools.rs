use std::str::FromStr;

use axum::{
    extract::{Query, State},
    Json,
};
use solana_sdk::pubkey::Pubkey;

use super::{error::ApiError, AppState};
use crate::{
    claim_api::schemas::{GetPoolsQuery, GetPoolsResponse, PoolAccount, PoolInfo},
    onchain::dbc::PoolFees,
};

impl From<PoolFees> for PoolInfo {
    fn from(pool: PoolFees) -> Self {
        let state = pool.state;

        PoolInfo {
            public_key: pool.address.to_string(),
            account: PoolAccount {
                creator: state.creator.to_string(),
                base_mint: state.base_mint.to_string(),
                config: state.config.to_string(),
                partner_base_fee: state.partner_base_fee.to_string(),
                partner_quote_fee: state.partner_quote_fee.to_string(),
                protocol_base_fee: state.protocol_base_fee.to_string(),
                protocol_quote_fee: state.protocol_quote_fee.to_string(),
                creator_base_fee: state.creator_base_fee.to_string(),
                creator_quote_fee: state.creator_quote_fee.to_string(),
            },
        }
    }
}

/// `GET /api/get-pools?creator=<address>`
pub async fn get_pools(
    State(state): State<AppState>,
    Query(query): Query<GetPoolsQuery>,
) -> Result<Json<GetPoolsResponse>, ApiError> {
    let creator = query
        .creator
        .filter(|c| !c.is_empty())
        .ok_or(ApiError::MissingCreator)?;
    let creator = Pubkey::from_str(&creator).map_err(|_| ApiError::InvalidCreator)?;

    let pools: Vec<PoolInfo> = state
        .curve
        .pools_by_creator(&creator)
        .await?
        .into_iter()
        .map(PoolInfo::from)
        .collect();

    tracing::info!("Found {} pool(s) for creator `{creator}`", pools.len());

    Ok(Json(GetPoolsResponse {
        success: true,
        count: pools.len(),
        pools,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use solana_sdk::pubkey::Pubkey;

    use crate::{
        api::tests::{app, send},
        builder::tests::{MockCurve, MockLedger},
        onchain::dbc::{PoolFees, VirtualPoolState},
    };

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn pool(creator: Pubkey) -> PoolFees {
        PoolFees {
            address: Pubkey::new_unique(),
            state: VirtualPoolState {
                config: Pubkey::new_unique(),
                creator,
                base_mint: Pubkey::new_unique(),
                base_vault: Pubkey::new_unique(),
                quote_vault: Pubkey::new_unique(),
                protocol_base_fee: 0,
                protocol_quote_fee: 12,
                partner_base_fee: 0,
                partner_quote_fee: 1_500_000_000,
                creator_base_fee: 7,
                creator_quote_fee: 250_000_000,
            },
        }
    }

    #[tokio::test]
    async fn lists_pools_with_fees_as_strings() {
        let creator = Pubkey::new_unique();
        let curve = Arc::new(MockCurve {
            pools: vec![pool(creator), pool(creator)],
            ..Default::default()
        });

        let (status, body) = send(
            app(Arc::new(MockLedger::with_pool(true)), curve),
            get(&format!("/api/get-pools?creator={creator}")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["pools"][0]["account"]["creator"], creator.to_string());
        assert_eq!(body["pools"][0]["account"]["partnerQuoteFee"], "1500000000");
        assert_eq!(body["pools"][0]["account"]["creatorBaseFee"], "7");
        assert_eq!(body["pools"][0]["account"]["creatorQuoteFee"], "250000000");
    }

    #[tokio::test]
    async fn creator_is_required_and_validated() {
        let app = app(
            Arc::new(MockLedger::with_pool(true)),
            Arc::new(MockCurve::default()),
        );

        let (status, body) = send(app.clone(), get("/api/get-pools")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Creator address is required");

        let (status, body) = send(app, get("/api/get-pools?creator=nope")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid creator address format");
    }

    #[tokio::test]
    async fn lookup_failure_is_a_server_error_with_details() {
        let curve = Arc::new(MockCurve {
            error: Some("getProgramAccounts timed out".to_string()),
            ..Default::default()
        });

        let (status, body) = send(
            app(Arc::new(MockLedger::with_pool(true)), curve),
            get(&format!("/api/get-pools?creator={}", Pubkey::new_unique())),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "getProgramAccounts timed out");
        assert!(body["details"].is_string());
    }
}
