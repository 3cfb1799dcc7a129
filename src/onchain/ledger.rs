use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
};

/// Read-only ledger queries needed by the fee-claim workflow.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn account_exists(&self, address: &Pubkey) -> eyre::Result<bool>;

    async fn latest_blockhash(&self) -> eyre::Result<Hash>;

    /// Resolves once `signature` reaches `confirmed`, or fails when the
    /// blockhash it was built against expires.
    async fn confirm_transaction(
        &self,
        signature: &Signature,
        recent_blockhash: &Hash,
    ) -> eyre::Result<()>;
}

#[async_trait]
impl Ledger for RpcClient {
    async fn account_exists(&self, address: &Pubkey) -> eyre::Result<bool> {
        let account = self
            .get_account_with_commitment(address, CommitmentConfig::confirmed())
            .await?
            .value;

        if let Some(account) = &account {
            tracing::debug!("Account `{address}` found, owner: `{}`", account.owner);
        }

        Ok(account.is_some())
    }

    async fn latest_blockhash(&self) -> eyre::Result<Hash> {
        let (blockhash, _) = self
            .get_latest_blockhash_with_commitment(CommitmentConfig::confirmed())
            .await?;

        Ok(blockhash)
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        recent_blockhash: &Hash,
    ) -> eyre::Result<()> {
        self.confirm_transaction_with_spinner(
            signature,
            recent_blockhash,
            CommitmentConfig::confirmed(),
        )
        .await
        .map_err(|e| eyre::eyre!("Transaction failed: {e}"))
    }
}
