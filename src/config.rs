use serde::Deserialize;
use std::{net::SocketAddr, path::Path, time::Duration};

const CONFIG_FILE_PATH: &str = "data/config.toml";

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Config {
    pub solana_rpc_url: String,
    #[serde(default = "default_server_addr")]
    pub server_addr: SocketAddr,
    #[serde(default = "default_claim_api_url")]
    pub claim_api_url: String,
    #[serde(default = "default_wallet_chain")]
    pub wallet_chain: String,
    #[serde(default = "default_rpc_timeout_secs")]
    pub rpc_timeout_secs: u64,
    #[serde(default = "default_claim_dedup_window_secs")]
    pub claim_dedup_window_secs: u64,
}

fn default_server_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_claim_api_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_wallet_chain() -> String {
    "solana:mainnet".to_string()
}

fn default_rpc_timeout_secs() -> u64 {
    60
}

fn default_claim_dedup_window_secs() -> u64 {
    30
}

impl Config {
    async fn read_from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let cfg_str = tokio::fs::read_to_string(path).await?;
        Self::parse(&cfg_str)
    }

    fn parse(cfg_str: &str) -> eyre::Result<Self> {
        Ok(toml::from_str(cfg_str)?)
    }

    pub async fn read_default() -> eyre::Result<Self> {
        Self::read_from_file(CONFIG_FILE_PATH)
            .await
            .map_err(|e| eyre::eyre!("Failed to read `{CONFIG_FILE_PATH}`: {e}"))
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn claim_dedup_window(&self) -> Duration {
        Duration::from_secs(self.claim_dedup_window_secs)
    }
}
