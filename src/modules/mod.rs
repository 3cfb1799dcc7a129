mod claimer;
mod pools;

use std::sync::Arc;

use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::{
    api::{self, AppState},
    builder::{InFlightClaims, TransactionBuilder},
    claim_api::api::HttpClaimApi,
    config::Config,
    onchain::{client::init_solana_rpc_client, dbc::DbcClient},
    wallet::load_wallets,
};

use claimer::{ClaimInput, ClaimOrchestrator, ClaimState};
use pools::list_pools;

const SECRETS_FILE_PATH: &str = "data/secrets.txt";

fn prompt(theme: &ColorfulTheme, label: &str, optional: bool) -> eyre::Result<String> {
    let value = Input::<String>::with_theme(theme)
        .with_prompt(label)
        .allow_empty(optional)
        .interact_text()?;

    Ok(value.trim().to_string())
}

fn optional(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn report(state: &ClaimState) {
    match state {
        ClaimState::Succeeded {
            signature,
            explorer_url,
        } => tracing::info!("Fees claimed successfully! TX: {signature} ({explorer_url})"),
        ClaimState::Failed { message } => tracing::error!("{message}"),
        other => tracing::warn!("Claim stopped in state {other:?}"),
    }
}

pub async fn menu() -> eyre::Result<()> {
    let config = Config::read_default().await?;
    let theme = ColorfulTheme::default();

    let provider = init_solana_rpc_client(&config.solana_rpc_url, config.rpc_timeout());
    let claim_api = Arc::new(HttpClaimApi::new(&config.claim_api_url));

    let wallets = load_wallets(SECRETS_FILE_PATH, provider.clone()).await?;
    let user = wallets.first().map(|wallet| wallet.address());
    match user {
        Some(address) => tracing::info!("Connected wallet: `{address}`"),
        None => tracing::warn!("No wallets found in `{SECRETS_FILE_PATH}`"),
    }

    let mut orchestrator = ClaimOrchestrator::new(
        claim_api.clone(),
        provider.clone(),
        wallets,
        user,
        &config.wallet_chain,
    );

    loop {
        let options = vec![
            "Start claim fees API server",
            "Claim fees for a pool",
            "Claim fees for my project",
            "List pools by creator",
            "Exit",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt("Choice:")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                let curve = Arc::new(DbcClient::new(provider.clone()));
                let builder = TransactionBuilder::new(
                    provider.clone(),
                    curve.clone(),
                    InFlightClaims::new(config.claim_dedup_window()),
                );

                let state = AppState {
                    builder: Arc::new(builder),
                    curve,
                };

                return api::serve(config.server_addr, state).await;
            }
            1 => {
                let input = ClaimInput {
                    pool: prompt(&theme, "Pool address", false)?,
                    max_base_amount: prompt(&theme, "Max base amount (0 = all)", true)?,
                    max_quote_amount: prompt(&theme, "Max quote amount (0 = all)", true)?,
                    receiver: optional(prompt(&theme, "Receiver (optional)", true)?),
                    temp_wsol_acc: optional(prompt(
                        &theme,
                        "Temporary WSOL account (optional)",
                        true,
                    )?),
                };

                orchestrator.claim(&input).await;
                report(orchestrator.state());
            }
            2 => {
                let Some(user) = orchestrator.user() else {
                    tracing::error!("Please connect your wallet first");
                    continue;
                };

                report(orchestrator.claim_project(&user.to_string()).await);
            }
            3 => {
                let creator = prompt(&theme, "Creator address", false)?;

                if let Err(e) = list_pools(claim_api.as_ref(), &creator).await {
                    tracing::error!("{e}");
                }
            }
            4 => {
                return Ok(());
            }
            _ => tracing::error!("Invalid selection"),
        }
    }
}
