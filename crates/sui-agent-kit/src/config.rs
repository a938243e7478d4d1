use serde::{Deserialize, Serialize};

pub const SUI_MAINNET_RPC_URL: &str = "https://fullnode.mainnet.sui.io:443";
pub const SUI_TESTNET_RPC_URL: &str = "https://fullnode.testnet.sui.io:443";
pub const SUI_DEVNET_RPC_URL: &str = "https://fullnode.devnet.sui.io:443";
pub const SUI_LOCALNET_RPC_URL: &str = "http://127.0.0.1:9000";

pub const PYTH_HERMES_URL: &str = "https://hermes.pyth.network";
pub const SUIVISION_TX_URL: &str = "https://suivision.xyz/txblock/";

/// Upper bound the protocol accepts for a single transaction's gas budget (50 SUI).
pub const MAX_GAS_BUDGET: u64 = 50_000_000_000;
pub const MAX_GAS_PAYMENT_OBJECTS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
}

impl Network {
    pub const fn default_rpc_url(self) -> &'static str {
        match self {
            Self::Mainnet => SUI_MAINNET_RPC_URL,
            Self::Testnet => SUI_TESTNET_RPC_URL,
            Self::Devnet => SUI_DEVNET_RPC_URL,
            Self::Localnet => SUI_LOCALNET_RPC_URL,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "main" => Some(Self::Mainnet),
            "testnet" | "test" => Some(Self::Testnet),
            "devnet" | "dev" => Some(Self::Devnet),
            "localnet" | "local" => Some(Self::Localnet),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Fullnode JSON-RPC URL. Falls back to the network's public fullnode when unset.
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GasConfig {
    /// Skip the dry run and use this budget (MIST).
    pub fixed_budget: Option<u64>,
    /// Budget used while dry-running to estimate the real one.
    pub max_budget: u64,
    pub max_payment_objects: usize,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            fixed_budget: None,
            max_budget: MAX_GAS_BUDGET,
            max_payment_objects: MAX_GAS_PAYMENT_OBJECTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PythConfig {
    pub hermes_url: String,
}

impl Default for PythConfig {
    fn default() -> Self {
        Self {
            hermes_url: PYTH_HERMES_URL.into(),
        }
    }
}

/// One liquid staking token served by the `SpringSui` package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LstConfig {
    pub coin_type: String,
    /// Shared `LiquidStakingInfo` object for this token.
    pub info_object_id: String,
    pub info_initial_shared_version: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpringSuiConfig {
    pub package: String,
    /// The first entry is the default token when none is requested.
    pub lst: Vec<LstConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KitConfig {
    pub network: Network,
    pub rpc: RpcConfig,
    pub gas: GasConfig,
    pub pyth: PythConfig,
    /// Prefix for transaction links in success messages.
    pub explorer_tx_url: String,
    pub springsui: Option<SpringSuiConfig>,
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            rpc: RpcConfig::default(),
            gas: GasConfig::default(),
            pyth: PythConfig::default(),
            explorer_tx_url: SUIVISION_TX_URL.into(),
            springsui: None,
        }
    }
}

impl KitConfig {
    pub fn rpc_url(&self) -> &str {
        self.rpc
            .url
            .as_deref()
            .unwrap_or_else(|| self.network.default_rpc_url())
    }
}
