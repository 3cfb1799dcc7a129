use solana_program::instruction::{AccountMeta, Instruction};
use solana_program::pubkey::Pubkey;

use super::constants::{
    ASSOCIATED_TOKEN_PROGRAM_ID, CLAIM_TRADING_FEE_DISCRIMINATOR, DBC_POOL_AUTHORITY,
    DBC_PROGRAM_ID, SYSTEM_PROGRAM_ID,
};
use super::derive::derive_event_authority;
use super::typedefs::{ClaimTradingFeeAccounts, CreateAtaArgs};

pub struct Instructions {}

impl Instructions {
    pub fn create_ata(args: CreateAtaArgs) -> Instruction {
        Instruction {
            program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
            accounts: vec![
                AccountMeta::new(args.funding_address, true),
                AccountMeta::new(args.associated_account_address, false),
                AccountMeta::new_readonly(args.wallet_address, false),
                AccountMeta::new_readonly(args.token_mint_address, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
                AccountMeta::new_readonly(args.token_program_id, false),
            ],
            data: vec![args.instruction],
        }
    }

    /// Partner-side `claim_trading_fee` of the bonding curve program.
    pub fn claim_trading_fee(
        accounts: ClaimTradingFeeAccounts,
        max_base_amount: u64,
        max_quote_amount: u64,
    ) -> Instruction {
        let (event_authority, _) = derive_event_authority();

        let mut data = Vec::with_capacity(24);
        data.extend_from_slice(&CLAIM_TRADING_FEE_DISCRIMINATOR);
        data.extend_from_slice(&max_base_amount.to_le_bytes());
        data.extend_from_slice(&max_quote_amount.to_le_bytes());

        Instruction {
            program_id: DBC_PROGRAM_ID,
            accounts: vec![
                AccountMeta::new_readonly(DBC_POOL_AUTHORITY, false),
                AccountMeta::new_readonly(accounts.config, false),
                AccountMeta::new(accounts.pool, false),
                AccountMeta::new(accounts.token_base_account, false),
                AccountMeta::new(accounts.token_quote_account, false),
                AccountMeta::new(accounts.base_vault, false),
                AccountMeta::new(accounts.quote_vault, false),
                AccountMeta::new_readonly(accounts.base_mint, false),
                AccountMeta::new_readonly(accounts.quote_mint, false),
                AccountMeta::new_readonly(accounts.fee_claimer, true),
                AccountMeta::new_readonly(accounts.token_base_program, false),
                AccountMeta::new_readonly(accounts.token_quote_program, false),
                AccountMeta::new_readonly(event_authority, false),
                AccountMeta::new_readonly(DBC_PROGRAM_ID, false),
            ],
            data,
        }
    }
}
