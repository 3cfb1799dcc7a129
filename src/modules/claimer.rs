//! Client side of the fee claim: asks the claim API for an unsigned
//! transaction, has a connected wallet sign and submit it, and waits for
//! confirmation.

use std::{str::FromStr, sync::Arc};

use solana_sdk::{pubkey::Pubkey, signature::Signature};

use crate::{
    claim_api::{api::ClaimApi, schemas::ClaimFeesBody},
    onchain::{ledger::Ledger, tx::decode_tx, tx::explorer_url},
    utils::misc::non_empty,
    wallet::Wallet,
};

const DEFAULT_ERROR: &str = "An error occurred";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimState {
    Idle,
    Validating,
    Requesting,
    Signing,
    Confirming,
    Succeeded {
        signature: String,
        explorer_url: String,
    },
    Failed {
        message: String,
    },
}

/// What the user typed. Optional addresses are `None` when left blank.
#[derive(Debug, Clone, Default)]
pub struct ClaimInput {
    pub pool: String,
    pub max_base_amount: String,
    pub max_quote_amount: String,
    pub receiver: Option<String>,
    pub temp_wsol_acc: Option<String>,
}

impl ClaimInput {
    /// Claim everything the pool has accrued.
    pub fn whole_pool(pool: &str) -> Self {
        Self {
            pool: pool.to_string(),
            ..Default::default()
        }
    }
}

pub struct ClaimOrchestrator {
    api: Arc<dyn ClaimApi>,
    ledger: Arc<dyn Ledger>,
    wallets: Vec<Arc<dyn Wallet>>,
    user: Option<Pubkey>,
    chain: String,
    state: ClaimState,
    loading: bool,
}

fn check_address(value: &str, message: &str) -> eyre::Result<()> {
    Pubkey::from_str(value).map_err(|_| eyre::eyre!("{message}"))?;
    Ok(())
}

fn amount_or_zero(value: &str) -> String {
    if value.is_empty() {
        "0".to_string()
    } else {
        value.to_string()
    }
}

impl ClaimOrchestrator {
    /// `user` is the authenticated account claiming fees; it acts as both the
    /// fee claimer and the payer.
    pub fn new(
        api: Arc<dyn ClaimApi>,
        ledger: Arc<dyn Ledger>,
        wallets: Vec<Arc<dyn Wallet>>,
        user: Option<Pubkey>,
        chain: &str,
    ) -> Self {
        Self {
            api,
            ledger,
            wallets,
            user,
            chain: chain.to_string(),
            state: ClaimState::Idle,
            loading: false,
        }
    }

    pub fn state(&self) -> &ClaimState {
        &self.state
    }

    pub fn user(&self) -> Option<Pubkey> {
        self.user
    }

    fn transition(&mut self, state: ClaimState) {
        tracing::debug!("Claim state: {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    /// Runs one claim to a terminal state. Never retries; the first failure
    /// ends the attempt.
    pub async fn claim(&mut self, input: &ClaimInput) -> &ClaimState {
        if self.loading {
            return &self.state;
        }

        let Some(user) = self.user else {
            self.transition(ClaimState::Failed {
                message: "Please connect your wallet first".to_string(),
            });
            return &self.state;
        };

        self.loading = true;

        let outcome = match self.run(user, input).await {
            Ok(signature) => {
                let url = explorer_url(&signature);
                tracing::info!("Fees claimed successfully: {url}");
                ClaimState::Succeeded {
                    signature,
                    explorer_url: url,
                }
            }
            Err(e) => {
                let message = match e.to_string() {
                    m if m.is_empty() => DEFAULT_ERROR.to_string(),
                    m => m,
                };
                tracing::error!("Claim failed: {message}");
                ClaimState::Failed { message }
            }
        };

        self.transition(outcome);
        self.loading = false;

        &self.state
    }

    /// Claims a project's fee pool on behalf of its creator. Only the creator
    /// may claim, and only the first pool found for them is used.
    pub async fn claim_project(&mut self, creator: &str) -> &ClaimState {
        if self.loading {
            return &self.state;
        }

        match self.project_pool(creator).await {
            Ok(pool) => self.claim(&ClaimInput::whole_pool(&pool)).await,
            Err(e) => {
                tracing::warn!("Project claim refused: {e}");
                self.transition(ClaimState::Failed {
                    message: e.to_string(),
                });
                &self.state
            }
        }
    }

    async fn project_pool(&self, creator: &str) -> eyre::Result<String> {
        let user = self
            .user
            .ok_or_else(|| eyre::eyre!("Please connect your wallet first"))?;

        if user.to_string() != creator {
            eyre::bail!(
                "You are not authorized to claim fees. Only the project creator can claim the prize pool."
            );
        }

        let pools = self.api.get_pools(creator).await?;

        pools
            .into_iter()
            .next()
            .map(|pool| pool.public_key)
            .ok_or_else(|| eyre::eyre!("No pool found for this project"))
    }

    async fn run(&mut self, user: Pubkey, input: &ClaimInput) -> eyre::Result<String> {
        self.transition(ClaimState::Validating);

        check_address(&input.pool, "Invalid pool address")?;
        if let Some(receiver) = non_empty(&input.receiver) {
            check_address(receiver, "Invalid receiver address")?;
        }
        if let Some(temp) = non_empty(&input.temp_wsol_acc) {
            check_address(temp, "Invalid temporary WSOL address")?;
        }

        self.transition(ClaimState::Requesting);

        let body = ClaimFeesBody {
            pool: Some(input.pool.clone()),
            fee_claimer: Some(user.to_string()),
            payer: Some(user.to_string()),
            max_base_amount: Some(amount_or_zero(&input.max_base_amount)),
            max_quote_amount: Some(amount_or_zero(&input.max_quote_amount)),
            receiver: non_empty(&input.receiver).map(String::from),
            temp_w_sol_acc: non_empty(&input.temp_wsol_acc).map(String::from),
        };

        let response = self.api.claim_fees(&body).await?;
        if !response.success {
            eyre::bail!("Failed to claim fees");
        }
        let encoded = response
            .transaction
            .ok_or_else(|| eyre::eyre!("No transaction returned from API"))?;

        self.transition(ClaimState::Signing);

        let wallet = self
            .wallets
            .first()
            .cloned()
            .ok_or_else(|| eyre::eyre!("No Solana wallet connected!"))?;

        let tx = decode_tx(&encoded)?;
        let serialized = bincode::serialize(&tx)?;

        let output = wallet
            .sign_and_send_transaction(&self.chain, &serialized)
            .await?;

        self.transition(ClaimState::Confirming);

        let signature = output.normalize();
        let parsed = Signature::from_str(&signature)
            .map_err(|e| eyre::eyre!("Wallet returned a malformed signature: {e}"))?;

        self.ledger
            .confirm_transaction(&parsed, &tx.message.recent_blockhash)
            .await?;

        Ok(signature)
    }
}
