use solana_sdk::pubkey::Pubkey;

pub struct CreateAtaArgs {
    pub funding_address: Pubkey,
    pub associated_account_address: Pubkey,
    pub wallet_address: Pubkey,
    pub token_mint_address: Pubkey,
    pub token_program_id: Pubkey,
    pub instruction: u8,
}

pub struct ClaimTradingFeeAccounts {
    pub config: Pubkey,
    pub pool: Pubkey,
    pub token_base_account: Pubkey,
    pub token_quote_account: Pubkey,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub fee_claimer: Pubkey,
    pub token_base_program: Pubkey,
    pub token_quote_program: Pubkey,
}
