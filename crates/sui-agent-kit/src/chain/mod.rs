//! Outbound interface to a Sui fullnode.

pub mod cached;
pub mod rpc;

use crate::types::{CoinRef, SuiAddress};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoinMetadata {
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
}

/// One page of owned coins, in the order the node returned them.
#[derive(Debug, Clone, Default)]
pub struct CoinPage {
    pub data: Vec<CoinRef>,
    pub next_cursor: Option<String>,
    pub has_next_page: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub coin_type: String,
    pub total_balance: u128,
    pub coin_object_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    Failure { error: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GasCostSummary {
    pub computation_cost: u64,
    pub storage_cost: u64,
    pub storage_rebate: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunResult {
    pub status: ExecutionStatus,
    pub gas_used: GasCostSummary,
}

#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub digest: String,
    pub status: ExecutionStatus,
    /// Raw effects and events as reported by the node.
    pub effects: Value,
    pub events: Value,
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// `None` when the node knows no metadata for `coin_type`.
    async fn coin_metadata(&self, coin_type: &str) -> eyre::Result<Option<CoinMetadata>>;

    async fn coins_page(
        &self,
        owner: SuiAddress,
        coin_type: &str,
        cursor: Option<&str>,
    ) -> eyre::Result<CoinPage>;

    async fn balance(&self, owner: SuiAddress, coin_type: &str) -> eyre::Result<Balance>;

    async fn reference_gas_price(&self) -> eyre::Result<u64>;

    async fn dry_run(&self, tx_bytes: &[u8]) -> eyre::Result<DryRunResult>;

    async fn execute(&self, tx_bytes: &[u8], signatures: &[String])
        -> eyre::Result<ExecutionResult>;
}
