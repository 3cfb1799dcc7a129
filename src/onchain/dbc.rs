//! Client for the Meteora dynamic bonding curve program: decodes pool state
//! and assembles partner fee claims.

use std::sync::Arc;

use async_trait::async_trait;
use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::{Memcmp, RpcFilterType},
};
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, instruction::Instruction,
    pubkey::Pubkey,
};

use super::{
    constants::{
        CREATE_ATA_IDEMPOTENT, DBC_PROGRAM_ID, NATIVE_MINT, POOL_CONFIG_DISCRIMINATOR,
        TOKEN_2022_PROGRAM_ID, TOKEN_PROGRAM_ID, VIRTUAL_POOL_DISCRIMINATOR,
    },
    derive::derive_ata,
    ixs::Instructions,
    typedefs::{ClaimTradingFeeAccounts, CreateAtaArgs},
};

const POOL_CONFIG_OFFSET: usize = 72;
const POOL_CREATOR_OFFSET: usize = 104;
const POOL_BASE_MINT_OFFSET: usize = 136;
const POOL_BASE_VAULT_OFFSET: usize = 168;
const POOL_QUOTE_VAULT_OFFSET: usize = 200;
const POOL_PROTOCOL_BASE_FEE_OFFSET: usize = 248;
const POOL_PROTOCOL_QUOTE_FEE_OFFSET: usize = 256;
const POOL_PARTNER_BASE_FEE_OFFSET: usize = 264;
const POOL_PARTNER_QUOTE_FEE_OFFSET: usize = 272;
const POOL_CREATOR_BASE_FEE_OFFSET: usize = 352;
const POOL_CREATOR_QUOTE_FEE_OFFSET: usize = 360;
const POOL_MIN_LEN: usize = 280;

const CONFIG_QUOTE_MINT_OFFSET: usize = 8;
const CONFIG_FEE_CLAIMER_OFFSET: usize = 40;
const CONFIG_MIN_LEN: usize = 72;

/// Parameters of a partner trading fee claim. Zero amounts are passed through
/// untouched; the program decides what they mean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimTradingFeeParams {
    pub pool: Pubkey,
    pub fee_claimer: Pubkey,
    pub payer: Pubkey,
    pub max_base_amount: u64,
    pub max_quote_amount: u64,
    pub receiver: Option<Pubkey>,
    pub temp_wsol_acc: Option<Pubkey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualPoolState {
    pub config: Pubkey,
    pub creator: Pubkey,
    pub base_mint: Pubkey,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub protocol_base_fee: u64,
    pub protocol_quote_fee: u64,
    pub partner_base_fee: u64,
    pub partner_quote_fee: u64,
    pub creator_base_fee: u64,
    pub creator_quote_fee: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfigState {
    pub quote_mint: Pubkey,
    pub fee_claimer: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolFees {
    pub address: Pubkey,
    pub state: VirtualPoolState,
}

fn read_pubkey(data: &[u8], offset: usize) -> Pubkey {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&data[offset..offset + 32]);
    Pubkey::new_from_array(bytes)
}

fn read_u64(data: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}

/// Creator fee fields trail the partner ones; accounts too short to carry
/// them have accrued none.
fn read_u64_or_zero(data: &[u8], offset: usize) -> u64 {
    if data.len() < offset + 8 {
        return 0;
    }
    read_u64(data, offset)
}

impl VirtualPoolState {
    pub fn decode(data: &[u8]) -> eyre::Result<Self> {
        if data.len() < POOL_MIN_LEN || data[..8] != VIRTUAL_POOL_DISCRIMINATOR {
            eyre::bail!("Account is not a bonding curve pool");
        }

        Ok(Self {
            config: read_pubkey(data, POOL_CONFIG_OFFSET),
            creator: read_pubkey(data, POOL_CREATOR_OFFSET),
            base_mint: read_pubkey(data, POOL_BASE_MINT_OFFSET),
            base_vault: read_pubkey(data, POOL_BASE_VAULT_OFFSET),
            quote_vault: read_pubkey(data, POOL_QUOTE_VAULT_OFFSET),
            protocol_base_fee: read_u64(data, POOL_PROTOCOL_BASE_FEE_OFFSET),
            protocol_quote_fee: read_u64(data, POOL_PROTOCOL_QUOTE_FEE_OFFSET),
            partner_base_fee: read_u64(data, POOL_PARTNER_BASE_FEE_OFFSET),
            partner_quote_fee: read_u64(data, POOL_PARTNER_QUOTE_FEE_OFFSET),
            creator_base_fee: read_u64_or_zero(data, POOL_CREATOR_BASE_FEE_OFFSET),
            creator_quote_fee: read_u64_or_zero(data, POOL_CREATOR_QUOTE_FEE_OFFSET),
        })
    }
}

impl PoolConfigState {
    pub fn decode(data: &[u8]) -> eyre::Result<Self> {
        if data.len() < CONFIG_MIN_LEN || data[..8] != POOL_CONFIG_DISCRIMINATOR {
            eyre::bail!("Account is not a bonding curve config");
        }

        Ok(Self {
            quote_mint: read_pubkey(data, CONFIG_QUOTE_MINT_OFFSET),
            fee_claimer: read_pubkey(data, CONFIG_FEE_CLAIMER_OFFSET),
        })
    }
}

/// The bonding curve protocol as seen by the claim workflow.
#[async_trait]
pub trait BondingCurve: Send + Sync {
    /// Instructions that claim the partner's accrued trading fees. The fee
    /// claimer must sign; nothing is signed here.
    async fn claim_partner_trading_fee(
        &self,
        params: &ClaimTradingFeeParams,
    ) -> eyre::Result<Vec<Instruction>>;

    async fn pools_by_creator(&self, creator: &Pubkey) -> eyre::Result<Vec<PoolFees>>;
}

pub struct DbcClient {
    provider: Arc<RpcClient>,
}

impl DbcClient {
    pub fn new(provider: Arc<RpcClient>) -> Self {
        Self { provider }
    }

    async fn fetch_account(&self, address: &Pubkey, what: &str) -> eyre::Result<Account> {
        self.provider
            .get_account_with_commitment(address, CommitmentConfig::confirmed())
            .await?
            .value
            .ok_or_else(|| eyre::eyre!("{what} account `{address}` not found"))
    }

    async fn token_program_of(&self, mint: &Pubkey) -> eyre::Result<Pubkey> {
        let owner = self.fetch_account(mint, "Mint").await?.owner;

        if owner != TOKEN_PROGRAM_ID && owner != TOKEN_2022_PROGRAM_ID {
            eyre::bail!("Mint `{mint}` is not owned by a token program");
        }

        Ok(owner)
    }
}

/// Token accounts that receive the claimed fees, plus the instructions that
/// create them up front and unwrap WSOL afterwards.
struct FeeDestination {
    token_base_account: Pubkey,
    token_quote_account: Pubkey,
    pre_ixs: Vec<Instruction>,
    post_ixs: Vec<Instruction>,
}

fn fee_destination(
    params: &ClaimTradingFeeParams,
    pool: &VirtualPoolState,
    config: &PoolConfigState,
    token_base_program: &Pubkey,
    token_quote_program: &Pubkey,
) -> eyre::Result<FeeDestination> {
    let fee_receiver = params.receiver.unwrap_or(params.fee_claimer);

    // A SOL quote is claimed into a WSOL account first, then unwrapped to the
    // receiver. Only the fee claimer's ATA or a caller-provided temp account
    // can hold it.
    let quote_owner = if config.quote_mint == NATIVE_MINT && fee_receiver != params.fee_claimer {
        params.temp_wsol_acc.ok_or_else(|| {
            eyre::eyre!("tempWSolAcc is required when claiming SOL fees to another receiver")
        })?
    } else if config.quote_mint == NATIVE_MINT {
        params.fee_claimer
    } else {
        fee_receiver
    };

    let (token_base_account, _) = derive_ata(&fee_receiver, &pool.base_mint, token_base_program);
    let (token_quote_account, _) =
        derive_ata(&quote_owner, &config.quote_mint, token_quote_program);

    let pre_ixs = vec![
        Instructions::create_ata(CreateAtaArgs {
            funding_address: params.payer,
            associated_account_address: token_base_account,
            wallet_address: fee_receiver,
            token_mint_address: pool.base_mint,
            token_program_id: *token_base_program,
            instruction: CREATE_ATA_IDEMPOTENT,
        }),
        Instructions::create_ata(CreateAtaArgs {
            funding_address: params.payer,
            associated_account_address: token_quote_account,
            wallet_address: quote_owner,
            token_mint_address: config.quote_mint,
            token_program_id: *token_quote_program,
            instruction: CREATE_ATA_IDEMPOTENT,
        }),
    ];

    let mut post_ixs = vec![];
    if config.quote_mint == NATIVE_MINT {
        post_ixs.push(spl_token::instruction::close_account(
            token_quote_program,
            &token_quote_account,
            &fee_receiver,
            &quote_owner,
            &[],
        )?);
    }

    Ok(FeeDestination {
        token_base_account,
        token_quote_account,
        pre_ixs,
        post_ixs,
    })
}

fn build_claim_ixs(
    params: &ClaimTradingFeeParams,
    pool: &VirtualPoolState,
    config: &PoolConfigState,
    token_base_program: Pubkey,
    token_quote_program: Pubkey,
) -> eyre::Result<Vec<Instruction>> {
    if config.fee_claimer != params.fee_claimer {
        eyre::bail!(
            "Fee claimer `{}` does not match the pool's fee claimer `{}`",
            params.fee_claimer,
            config.fee_claimer
        );
    }

    let FeeDestination {
        token_base_account,
        token_quote_account,
        pre_ixs,
        post_ixs,
    } = fee_destination(
        params,
        pool,
        config,
        &token_base_program,
        &token_quote_program,
    )?;

    let claim_ix = Instructions::claim_trading_fee(
        ClaimTradingFeeAccounts {
            config: pool.config,
            pool: params.pool,
            token_base_account,
            token_quote_account,
            base_vault: pool.base_vault,
            quote_vault: pool.quote_vault,
            base_mint: pool.base_mint,
            quote_mint: config.quote_mint,
            fee_claimer: params.fee_claimer,
            token_base_program,
            token_quote_program,
        },
        params.max_base_amount,
        params.max_quote_amount,
    );

    let mut ixs = pre_ixs;
    ixs.push(claim_ix);
    ixs.extend(post_ixs);

    Ok(ixs)
}

#[async_trait]
impl BondingCurve for DbcClient {
    async fn claim_partner_trading_fee(
        &self,
        params: &ClaimTradingFeeParams,
    ) -> eyre::Result<Vec<Instruction>> {
        let pool_account = self.fetch_account(&params.pool, "Pool").await?;
        if pool_account.owner != DBC_PROGRAM_ID {
            eyre::bail!(
                "Pool account is owned by `{}`, not the bonding curve program",
                pool_account.owner
            );
        }

        let pool = VirtualPoolState::decode(&pool_account.data)?;
        let config_account = self.fetch_account(&pool.config, "Pool config").await?;
        let config = PoolConfigState::decode(&config_account.data)?;

        let token_base_program = self.token_program_of(&pool.base_mint).await?;
        let token_quote_program = self.token_program_of(&config.quote_mint).await?;

        build_claim_ixs(
            params,
            &pool,
            &config,
            token_base_program,
            token_quote_program,
        )
    }

    async fn pools_by_creator(&self, creator: &Pubkey) -> eyre::Result<Vec<PoolFees>> {
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![
                RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
                    0,
                    &VIRTUAL_POOL_DISCRIMINATOR,
                )),
                RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
                    POOL_CREATOR_OFFSET,
                    creator.as_ref(),
                )),
            ]),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(CommitmentConfig::confirmed()),
                ..Default::default()
            },
            ..Default::default()
        };

        let accounts = self
            .provider
            .get_program_accounts_with_config(&DBC_PROGRAM_ID, config)
            .await?;

        accounts
            .into_iter()
            .map(|(address, account)| {
                Ok(PoolFees {
                    address,
                    state: VirtualPoolState::decode(&account.data)?,
                })
            })
            .collect()
    }
}
