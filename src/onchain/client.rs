use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use std::{sync::Arc, time::Duration};

/// One client per process, shared by the claim API and the orchestrator.
pub fn init_solana_rpc_client(rpc_url: &str, timeout: Duration) -> Arc<RpcClient> {
    let client = RpcClient::new_with_timeout_and_commitment(
        rpc_url.to_string(),
        timeout,
        CommitmentConfig::confirmed(),
    );

    Arc::new(client)
}
