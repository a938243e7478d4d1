use super::{
    Balance, ChainClient, CoinMetadata, CoinPage, DryRunResult, ExecutionResult,
    ExecutionStatus, GasCostSummary,
};
use crate::types::{CoinRef, ObjectDigest, ObjectRef, SuiAddress};
use async_trait::async_trait;
use base64::Engine as _;
use eyre::Context as _;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Sui fullnode JSON-RPC client.
#[derive(Debug)]
pub struct SuiRpcClient {
    url: String,
    http: Client,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// Sui encodes 64-bit and larger integers as JSON strings; some nodes send plain numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Num(u64),
    Str(String),
}

impl NumOrStr {
    fn to_u128(&self) -> eyre::Result<u128> {
        match self {
            Self::Num(n) => Ok(u128::from(*n)),
            Self::Str(s) => s.trim().parse().with_context(|| format!("parse integer {s:?}")),
        }
    }

    fn to_u64(&self) -> eyre::Result<u64> {
        match self {
            Self::Num(n) => Ok(*n),
            Self::Str(s) => s.trim().parse().with_context(|| format!("parse integer {s:?}")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CoinMetadataWire {
    decimals: u8,
    #[serde(default)]
    symbol: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinWire {
    coin_object_id: String,
    version: NumOrStr,
    digest: String,
    balance: NumOrStr,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinPageWire {
    data: Vec<CoinWire>,
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceWire {
    coin_type: String,
    coin_object_count: u64,
    total_balance: NumOrStr,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GasUsedWire {
    computation_cost: NumOrStr,
    storage_cost: NumOrStr,
    storage_rebate: NumOrStr,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EffectsWire {
    status: Value,
    gas_used: GasUsedWire,
}

#[derive(Debug, Deserialize)]
struct DryRunWire {
    effects: EffectsWire,
}

#[derive(Debug, Deserialize)]
struct ExecuteWire {
    digest: String,
    #[serde(default)]
    effects: Value,
    #[serde(default)]
    events: Value,
}

fn parse_status(v: &Value) -> ExecutionStatus {
    match v.get("status").and_then(Value::as_str) {
        Some("success") => ExecutionStatus::Success,
        _ => ExecutionStatus::Failure {
            error: v
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown execution failure")
                .to_owned(),
        },
    }
}

fn coin_ref_from_wire(c: &CoinWire) -> eyre::Result<CoinRef> {
    Ok(CoinRef {
        object_ref: ObjectRef {
            object_id: SuiAddress::from_hex_literal(&c.coin_object_id)?,
            version: c.version.to_u64().context("coin version")?,
            digest: ObjectDigest::from_base58(&c.digest)?,
        },
        balance: c.balance.to_u64().context("coin balance")?,
    })
}

fn gas_from_wire(g: &GasUsedWire) -> eyre::Result<GasCostSummary> {
    Ok(GasCostSummary {
        computation_cost: g.computation_cost.to_u64()?,
        storage_cost: g.storage_cost.to_u64()?,
        storage_rebate: g.storage_rebate.to_u64()?,
    })
}

impl SuiRpcClient {
    pub fn new(url: &str) -> eyre::Result<Self> {
        crate::http::ensure_https_or_loopback(url, "rpc url")?;
        Ok(Self {
            url: url.trim().to_owned(),
            http: crate::http::client(crate::http::DEFAULT_TIMEOUT)?,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> eyre::Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, "sui rpc call");
        let body = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
        let resp = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("send {method}"))?;
        if !resp.status().is_success() {
            eyre::bail!("{method}: fullnode returned http {}", resp.status());
        }
        let r: RpcResponse = resp
            .json()
            .await
            .with_context(|| format!("decode {method} response"))?;
        if let Some(e) = r.error {
            eyre::bail!("{method} failed ({}): {}", e.code, e.message);
        }
        serde_json::from_value(r.result).with_context(|| format!("decode {method} result"))
    }
}

#[async_trait]
impl ChainClient for SuiRpcClient {
    async fn coin_metadata(&self, coin_type: &str) -> eyre::Result<Option<CoinMetadata>> {
        let v: Option<CoinMetadataWire> = self
            .call("suix_getCoinMetadata", json!([coin_type]))
            .await?;
        Ok(v.map(|m| CoinMetadata {
            decimals: m.decimals,
            symbol: m.symbol,
            name: m.name,
        }))
    }

    async fn coins_page(
        &self,
        owner: SuiAddress,
        coin_type: &str,
        cursor: Option<&str>,
    ) -> eyre::Result<CoinPage> {
        let page: CoinPageWire = self
            .call(
                "suix_getCoins",
                json!([owner.to_string(), coin_type, cursor, Value::Null]),
            )
            .await?;
        let data = page
            .data
            .iter()
            .map(coin_ref_from_wire)
            .collect::<eyre::Result<Vec<_>>>()?;
        Ok(CoinPage {
            data,
            next_cursor: page.next_cursor,
            has_next_page: page.has_next_page,
        })
    }

    async fn balance(&self, owner: SuiAddress, coin_type: &str) -> eyre::Result<Balance> {
        let b: BalanceWire = self
            .call("suix_getBalance", json!([owner.to_string(), coin_type]))
            .await?;
        Ok(Balance {
            total_balance: b.total_balance.to_u128()?,
            coin_type: b.coin_type,
            coin_object_count: b.coin_object_count,
        })
    }

    async fn reference_gas_price(&self) -> eyre::Result<u64> {
        let p: NumOrStr = self.call("suix_getReferenceGasPrice", json!([])).await?;
        p.to_u64()
    }

    async fn dry_run(&self, tx_bytes: &[u8]) -> eyre::Result<DryRunResult> {
        let b64 = base64::engine::general_purpose::STANDARD.encode(tx_bytes);
        let r: DryRunWire = self
            .call("sui_dryRunTransactionBlock", json!([b64]))
            .await?;
        Ok(DryRunResult {
            status: parse_status(&r.effects.status),
            gas_used: gas_from_wire(&r.effects.gas_used)?,
        })
    }

    async fn execute(
        &self,
        tx_bytes: &[u8],
        signatures: &[String],
    ) -> eyre::Result<ExecutionResult> {
        let b64 = base64::engine::general_purpose::STANDARD.encode(tx_bytes);
        let r: ExecuteWire = self
            .call(
                "sui_executeTransactionBlock",
                json!([
                    b64,
                    signatures,
                    { "showEffects": true, "showEvents": true },
                    "WaitForLocalExecution"
                ]),
            )
            .await?;
        let status = r
            .effects
            .get("status")
            .map_or(ExecutionStatus::Success, parse_status);
        Ok(ExecutionResult {
            digest: r.digest,
            status,
            effects: r.effects,
            events: r.events,
        })
    }
}
