pub const SOLANA_EXPLORER_URL: &str = "https://solscan.io/tx/";

pub const LOGS_DIR: &str = "logs";

pub const LOG_FILE_PREFIX: &str = "gitshare-claimer.log";
