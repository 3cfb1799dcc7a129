mod keypair;

pub use keypair::{load_wallets, KeypairWallet};

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

/// Signature as handed back by a wallet: some return base58 text, others the
/// raw 64 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureOutput {
    Text(String),
    Bytes(Vec<u8>),
}

impl SignatureOutput {
    /// Canonical base58 form.
    pub fn normalize(self) -> String {
        match self {
            SignatureOutput::Text(text) => text,
            SignatureOutput::Bytes(bytes) => solana_sdk::bs58::encode(bytes).into_string(),
        }
    }
}

/// A connected wallet able to sign and submit a serialized transaction.
#[async_trait]
pub trait Wallet: Send + Sync {
    fn address(&self) -> Pubkey;

    async fn sign_and_send_transaction(
        &self,
        chain: &str,
        transaction: &[u8],
    ) -> eyre::Result<SignatureOutput>;
}
