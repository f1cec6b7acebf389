/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed application configuration
[POS]:    Configuration layer - wallet, contract, storage and auth setup
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use docpress_adapter::Address;
use serde::{Deserialize, Serialize};

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Upper bound for `contract.confirmations`
pub const MAX_CONFIRMATIONS: u64 = 1_000;

/// Top-level configuration for the DocPress console
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub contract: ContractConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Block explorer used for profile links
    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,
}

/// Wallet provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WalletConfig {
    /// JSON-RPC endpoint of a wallet-backed node; no provider when absent
    #[serde(default)]
    pub rpc_url: Option<String>,
    /// Use the in-memory wallet and registry instead of a node
    #[serde(default)]
    pub demo: bool,
    #[serde(default = "default_account_poll_interval_ms")]
    pub account_poll_interval_ms: u64,
}

/// Certificate contract configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContractConfig {
    #[serde(default = "default_contract_address")]
    pub address: String,
    #[serde(default = "default_confirmations")]
    pub confirmations: u64,
    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,
}

/// Mock session store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Artificial delay applied to login/register
    #[serde(default = "default_simulated_latency_ms")]
    pub simulated_latency_ms: u64,
}

/// Local persisted state configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Defaults to `<data dir>/docpress`
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            wallet: WalletConfig::default(),
            contract: ContractConfig::default(),
            auth: AuthConfig::default(),
            storage: StorageConfig::default(),
            explorer_url: default_explorer_url(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            demo: false,
            account_poll_interval_ms: default_account_poll_interval_ms(),
        }
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: default_contract_address(),
            confirmations: default_confirmations(),
            receipt_poll_interval_ms: default_receipt_poll_interval_ms(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: default_simulated_latency_ms(),
        }
    }
}

fn default_explorer_url() -> String {
    "https://etherscan.io".to_string()
}

fn default_account_poll_interval_ms() -> u64 {
    2_000
}

fn default_contract_address() -> String {
    ZERO_ADDRESS.to_string()
}

fn default_confirmations() -> u64 {
    1
}

fn default_receipt_poll_interval_ms() -> u64 {
    1_000
}

fn default_simulated_latency_ms() -> u64 {
    1_000
}

impl AppConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Check values that serde alone cannot
    pub fn validate(&self) -> Result<()> {
        self.contract_address()?;
        if self.contract.confirmations == 0 {
            return Err(anyhow!("contract.confirmations must be at least 1"));
        }
        if self.contract.confirmations > MAX_CONFIRMATIONS {
            return Err(anyhow!(
                "contract.confirmations must be at most {MAX_CONFIRMATIONS}"
            ));
        }
        if self.contract.receipt_poll_interval_ms == 0 {
            return Err(anyhow!("contract.receipt_poll_interval_ms must be positive"));
        }
        if self.wallet.account_poll_interval_ms == 0 {
            return Err(anyhow!("wallet.account_poll_interval_ms must be positive"));
        }
        if let Some(url) = &self.wallet.rpc_url {
            url.parse::<url::Url>()
                .with_context(|| format!("invalid wallet.rpc_url {url}"))?;
        }
        Ok(())
    }

    pub fn contract_address(&self) -> Result<Address> {
        self.contract
            .address
            .parse::<Address>()
            .with_context(|| format!("invalid contract.address {}", self.contract.address))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(dirs::data_dir()
                .ok_or_else(|| anyhow!("Could not determine data directory"))?
                .join("docpress")),
        }
    }

    pub fn account_poll_interval(&self) -> Duration {
        Duration::from_millis(self.wallet.account_poll_interval_ms)
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.contract.receipt_poll_interval_ms)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.auth.simulated_latency_ms)
    }
}
