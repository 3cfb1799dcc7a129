use serde::{Deserialize, Serialize};

pub const NOT_SPECIFIED: &str = "Not specified";

/// Body of `POST /api/claim-fees`. Every field is optional on the wire so that
/// missing fields are reported by the handler, not the JSON extractor.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClaimFeesBody {
    #[serde(default)]
    pub pool: Option<String>,
    #[serde(default)]
    pub fee_claimer: Option<String>,
    #[serde(default)]
    pub payer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_base_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_quote_amount: Option<String>,
    #[serde(default)]
    pub receiver: Option<String>,
    #[serde(default)]
    pub temp_w_sol_acc: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EchoedParams {
    pub pool: String,
    pub fee_claimer: String,
    pub payer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_base_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_quote_amount: Option<String>,
    pub receiver: String,
    pub temp_w_sol_acc: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClaimFeesResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub transaction: Option<String>,
    pub params: EchoedParams,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PoolAccount {
    pub creator: String,
    pub base_mint: String,
    pub config: String,
    pub partner_base_fee: String,
    pub partner_quote_fee: String,
    pub protocol_base_fee: String,
    pub protocol_quote_fee: String,
    pub creator_base_fee: String,
    pub creator_quote_fee: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PoolInfo {
    pub public_key: String,
    pub account: PoolAccount,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GetPoolsResponse {
    pub success: bool,
    pub pools: Vec<PoolInfo>,
    pub count: usize,
}

#[derive(Deserialize, Debug, Default)]
pub struct GetPoolsQuery {
    pub creator: Option<String>,
}
