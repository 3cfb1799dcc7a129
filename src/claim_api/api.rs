use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::utils::fetch::{send_http_request, FetchError, RequestParams};

use super::schemas::{ClaimFeesBody, ClaimFeesResponse, GetPoolsResponse, PoolInfo};

const CLAIM_FEES_PATH: &str = "/api/claim-fees";
const GET_POOLS_PATH: &str = "/api/get-pools";

/// Client side of the claim API.
#[async_trait]
pub trait ClaimApi: Send + Sync {
    async fn claim_fees(&self, body: &ClaimFeesBody) -> eyre::Result<ClaimFeesResponse>;

    async fn get_pools(&self, creator: &str) -> eyre::Result<Vec<PoolInfo>>;
}

pub struct HttpClaimApi {
    base_url: String,
    client: Client,
}

impl HttpClaimApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Prefers the API's own `error` text over the transport error.
fn api_error(e: FetchError, fallback: &str) -> eyre::Report {
    match e {
        FetchError::Status {
            message: Some(message),
            ..
        } => eyre::eyre!(message),
        FetchError::Status { .. } => eyre::eyre!("{fallback}"),
        other => eyre::eyre!(other),
    }
}

#[async_trait]
impl ClaimApi for HttpClaimApi {
    async fn claim_fees(&self, body: &ClaimFeesBody) -> eyre::Result<ClaimFeesResponse> {
        let url = self.url(CLAIM_FEES_PATH);

        let request_params = RequestParams {
            url: &url,
            method: Method::POST,
            body: Some(body),
            query_args: None,
        };

        send_http_request::<ClaimFeesResponse>(&self.client, request_params)
            .await
            .map_err(|e| api_error(e, "Failed to claim fees"))
    }

    async fn get_pools(&self, creator: &str) -> eyre::Result<Vec<PoolInfo>> {
        let url = self.url(GET_POOLS_PATH);
        let query_args = [("creator", creator)].into_iter().collect();

        let request_params = RequestParams {
            url: &url,
            method: Method::GET,
            body: None::<serde_json::Value>,
            query_args: Some(query_args),
        };

        let response = send_http_request::<GetPoolsResponse>(&self.client, request_params)
            .await
            .map_err(|e| api_error(e, "Failed to fetch pools"))?;

        Ok(response.pools)
    }
}
