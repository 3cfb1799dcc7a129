use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer, transaction::Transaction};

use super::{SignatureOutput, Wallet};
use crate::{
    onchain::{crypto::get_wallet, tx::send_tx},
    utils::files::read_file_lines,
};

/// Wallet backed by a local keypair, submitting through the shared RPC client.
pub struct KeypairWallet {
    keypair: Keypair,
    provider: Arc<RpcClient>,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair, provider: Arc<RpcClient>) -> Self {
        Self { keypair, provider }
    }
}

#[async_trait]
impl Wallet for KeypairWallet {
    fn address(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_and_send_transaction(
        &self,
        chain: &str,
        transaction: &[u8],
    ) -> eyre::Result<SignatureOutput> {
        let mut tx = bincode::deserialize::<Transaction>(transaction)?;
        let recent_blockhash = tx.message.recent_blockhash;

        tx.try_partial_sign(&[&self.keypair], recent_blockhash)
            .map_err(|e| eyre::eyre!("Wallet cannot sign this transaction: {e}"))?;

        tracing::info!("Submitting to `{chain}` as `{}`", self.address());

        let signature = send_tx(&self.provider, &tx).await?;

        Ok(SignatureOutput::Bytes(signature.as_ref().to_vec()))
    }
}

/// One secret per line: base58 keypair or BIP39 mnemonic.
pub async fn load_wallets(
    path: impl AsRef<Path>,
    provider: Arc<RpcClient>,
) -> eyre::Result<Vec<Arc<dyn Wallet>>> {
    let secrets = read_file_lines(path).await?;

    secrets
        .iter()
        .enumerate()
        .map(|(i, secret)| {
            let keypair =
                get_wallet(secret).map_err(|e| eyre::eyre!("Secret #{}: {e}", i + 1))?;
            Ok(Arc::new(KeypairWallet::new(keypair, provider.clone())) as Arc<dyn Wallet>)
        })
        .collect()
}
