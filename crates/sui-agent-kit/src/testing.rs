//! In-memory chain used by unit tests.

use crate::chain::{
    Balance, ChainClient, CoinMetadata, CoinPage, DryRunResult, ExecutionResult,
    ExecutionStatus, GasCostSummary,
};
use crate::types::{CoinRef, ObjectDigest, ObjectRef, SuiAddress};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Wormhole USDC, a realistic non-native coin type.
pub const USDC: &str =
    "0x5d4b302506645c37ff133b98c4b50a5ae14841659738d6d733d59d0d217a93bf::coin::COIN";
pub const SPRING_SUI: &str =
    "0x83556891f4a0f233ce7b05cfe7f957d4020492a34f5405b2cb9377d060bef4bf::spring_sui::SPRING_SUI";

pub fn coin(id: u8, balance: u64) -> CoinRef {
    CoinRef {
        object_ref: ObjectRef {
            object_id: SuiAddress::new([id; 32]),
            version: 1,
            digest: ObjectDigest::new([id; 32]),
        },
        balance,
    }
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub tx_bytes: Vec<u8>,
    pub signatures: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MockChain {
    metadata: HashMap<String, CoinMetadata>,
    metadata_error: Option<String>,
    pages: HashMap<String, Vec<Vec<CoinRef>>>,
    next_coin_id: u8,
    gas_price: u64,
    dry_run: Option<GasCostSummary>,
    dry_run_error: Option<String>,
    execute_error: Option<String>,
    gas_price_error: Option<String>,
    page_error: Option<String>,
    cursorless_after: Option<usize>,
    cursors: Mutex<Vec<Option<String>>>,
    metadata_calls: AtomicUsize,
    page_calls: AtomicUsize,
    dry_run_calls: AtomicUsize,
    submissions: Mutex<Vec<Submission>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            next_coin_id: 1,
            gas_price: 1_000,
            dry_run: Some(GasCostSummary {
                computation_cost: 1_000_000,
                storage_cost: 2_000_000,
                storage_rebate: 500_000,
            }),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, coin_type: &str, decimals: u8) -> Self {
        self.metadata.insert(
            coin_type.to_owned(),
            CoinMetadata {
                decimals,
                symbol: "TKN".into(),
                name: "Token".into(),
            },
        );
        self
    }

    #[must_use]
    pub fn with_metadata_error(mut self, msg: &str) -> Self {
        self.metadata_error = Some(msg.to_owned());
        self
    }

    /// Each inner vec is one page of coin balances; object ids are assigned in order.
    #[must_use]
    pub fn with_pages(mut self, coin_type: &str, pages: &[&[u64]]) -> Self {
        let mut out = vec![];
        for page in pages {
            let mut coins = vec![];
            for b in *page {
                coins.push(coin(self.next_coin_id, *b));
                self.next_coin_id = self.next_coin_id.wrapping_add(1);
            }
            out.push(coins);
        }
        self.pages.insert(coin_type.to_owned(), out);
        self
    }

    #[must_use]
    pub fn with_gas_costs(mut self, computation: u64, storage: u64, rebate: u64) -> Self {
        self.dry_run = Some(GasCostSummary {
            computation_cost: computation,
            storage_cost: storage,
            storage_rebate: rebate,
        });
        self
    }

    #[must_use]
    pub fn with_dry_run_error(mut self, msg: &str) -> Self {
        self.dry_run_error = Some(msg.to_owned());
        self
    }

    #[must_use]
    pub fn with_execute_error(mut self, msg: &str) -> Self {
        self.execute_error = Some(msg.to_owned());
        self
    }

    #[must_use]
    pub fn with_gas_price_error(mut self, msg: &str) -> Self {
        self.gas_price_error = Some(msg.to_owned());
        self
    }

    #[must_use]
    pub fn with_page_error(mut self, msg: &str) -> Self {
        self.page_error = Some(msg.to_owned());
        self
    }

    /// From page `idx` on, report more pages but hand out no cursor.
    #[must_use]
    pub fn with_cursorless_page(mut self, idx: usize) -> Self {
        self.cursorless_after = Some(idx);
        self
    }

    /// Cursors passed to `coins_page`, in call order.
    pub async fn cursors(&self) -> Vec<Option<String>> {
        self.cursors.lock().await.clone()
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn dry_run_calls(&self) -> usize {
        self.dry_run_calls.load(Ordering::SeqCst)
    }

    pub async fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().await.clone()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn coin_metadata(&self, coin_type: &str) -> eyre::Result<Option<CoinMetadata>> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = &self.metadata_error {
            eyre::bail!("{e}");
        }
        Ok(self.metadata.get(coin_type).cloned())
    }

    async fn coins_page(
        &self,
        _owner: SuiAddress,
        coin_type: &str,
        cursor: Option<&str>,
    ) -> eyre::Result<CoinPage> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.cursors.lock().await.push(cursor.map(str::to_owned));
        if let Some(e) = &self.page_error {
            eyre::bail!("{e}");
        }
        let idx: usize = match cursor {
            None => 0,
            Some(c) => c
                .strip_prefix("page-")
                .ok_or_else(|| eyre::eyre!("foreign cursor {c}"))?
                .parse()?,
        };
        let pages = self.pages.get(coin_type).map(Vec::as_slice).unwrap_or_default();
        let has_next_page = idx.saturating_add(1) < pages.len();
        let cursorless = self.cursorless_after.is_some_and(|after| idx >= after);
        Ok(CoinPage {
            data: pages.get(idx).cloned().unwrap_or_default(),
            next_cursor: (has_next_page && !cursorless)
                .then(|| format!("page-{}", idx.saturating_add(1))),
            has_next_page,
        })
    }

    async fn balance(&self, _owner: SuiAddress, coin_type: &str) -> eyre::Result<Balance> {
        let coins: Vec<&CoinRef> = self.pages.get(coin_type).into_iter().flatten().flatten().collect();
        Ok(Balance {
            coin_type: coin_type.to_owned(),
            total_balance: coins.iter().map(|c| u128::from(c.balance)).sum(),
            coin_object_count: u64::try_from(coins.len())?,
        })
    }

    async fn reference_gas_price(&self) -> eyre::Result<u64> {
        if let Some(e) = &self.gas_price_error {
            eyre::bail!("{e}");
        }
        Ok(self.gas_price)
    }

    async fn dry_run(&self, _tx_bytes: &[u8]) -> eyre::Result<DryRunResult> {
        self.dry_run_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = &self.dry_run_error {
            return Ok(DryRunResult {
                status: ExecutionStatus::Failure { error: e.clone() },
                gas_used: GasCostSummary::default(),
            });
        }
        let gas_used = self.dry_run.unwrap_or_default();
        Ok(DryRunResult {
            status: ExecutionStatus::Success,
            gas_used,
        })
    }

    async fn execute(
        &self,
        tx_bytes: &[u8],
        signatures: &[String],
    ) -> eyre::Result<ExecutionResult> {
        if let Some(e) = &self.execute_error {
            eyre::bail!("{e}");
        }
        self.submissions.lock().await.push(Submission {
            tx_bytes: tx_bytes.to_vec(),
            signatures: signatures.to_vec(),
        });
        Ok(ExecutionResult {
            digest: "mockdigest".into(),
            status: ExecutionStatus::Success,
            effects: json!({ "status": { "status": "success" } }),
            events: Value::Array(vec![]),
        })
    }
}
