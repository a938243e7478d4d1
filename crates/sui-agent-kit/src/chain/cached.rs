use super::{Balance, ChainClient, CoinMetadata, CoinPage, DryRunResult, ExecutionResult};
use crate::types::SuiAddress;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Wraps a client and remembers coin metadata, which never changes for a coin type.
///
/// Only successful lookups are cached; misses and errors go back to the node next time.
#[derive(Debug)]
pub struct CachedMetadata<C> {
    inner: C,
    metadata: Mutex<HashMap<String, CoinMetadata>>,
}

impl<C> CachedMetadata<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            metadata: Mutex::new(HashMap::new()),
        }
    }

    pub const fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: ChainClient> ChainClient for CachedMetadata<C> {
    async fn coin_metadata(&self, coin_type: &str) -> eyre::Result<Option<CoinMetadata>> {
        let hit = self.metadata.lock().await.get(coin_type).cloned();
        if hit.is_some() {
            return Ok(hit);
        }
        let fetched = self.inner.coin_metadata(coin_type).await?;
        if let Some(m) = &fetched {
            self.metadata
                .lock()
                .await
                .insert(coin_type.to_owned(), m.clone());
        }
        Ok(fetched)
    }

    async fn coins_page(
        &self,
        owner: SuiAddress,
        coin_type: &str,
        cursor: Option<&str>,
    ) -> eyre::Result<CoinPage> {
        self.inner.coins_page(owner, coin_type, cursor).await
    }

    async fn balance(&self, owner: SuiAddress, coin_type: &str) -> eyre::Result<Balance> {
        self.inner.balance(owner, coin_type).await
    }

    async fn reference_gas_price(&self) -> eyre::Result<u64> {
        self.inner.reference_gas_price().await
    }

    async fn dry_run(&self, tx_bytes: &[u8]) -> eyre::Result<DryRunResult> {
        self.inner.dry_run(tx_bytes).await
    }

    async fn execute(
        &self,
        tx_bytes: &[u8],
        signatures: &[String],
    ) -> eyre::Result<ExecutionResult> {
        self.inner.execute(tx_bytes, signatures).await
    }
}
