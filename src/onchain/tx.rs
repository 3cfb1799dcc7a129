use base64::{engine::general_purpose::STANDARD, Engine};
use solana_client::{
    nonblocking::rpc_client::RpcClient, rpc_client::SerializableTransaction,
    rpc_config::RpcSendTransactionConfig,
};
use solana_sdk::{
    commitment_config::CommitmentLevel, signature::Signature, transaction::Transaction,
};
use solana_transaction_status::UiTransactionEncoding;

use crate::utils::constants::SOLANA_EXPLORER_URL;

/// Serializes `tx` as-is, without requiring or checking signatures.
pub fn encode_tx(tx: &Transaction) -> eyre::Result<String> {
    let bytes = bincode::serialize(tx)?;
    Ok(STANDARD.encode(bytes))
}

pub fn decode_tx(encoded: &str) -> eyre::Result<Transaction> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| eyre::eyre!("Transaction is not valid base64: {e}"))?;

    Ok(bincode::deserialize::<Transaction>(&bytes)?)
}

pub fn explorer_url(signature: &str) -> String {
    format!("{SOLANA_EXPLORER_URL}{signature}")
}

/// Submits without waiting for confirmation.
pub async fn send_tx(
    provider: &RpcClient,
    tx: &impl SerializableTransaction,
) -> eyre::Result<Signature> {
    let tx_config = RpcSendTransactionConfig {
        skip_preflight: false,
        preflight_commitment: Some(CommitmentLevel::Confirmed),
        encoding: Some(UiTransactionEncoding::Base64),
        max_retries: None,
        min_context_slot: None,
    };

    let signature = provider
        .send_transaction_with_config(tx, tx_config)
        .await
        .map_err(|e| eyre::eyre!("Failed to send tx: {e}"))?;

    tracing::info!("Sent transaction: {}", explorer_url(&signature.to_string()));

    Ok(signature)
}
