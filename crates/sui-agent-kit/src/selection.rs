//! Largest-first coin selection over the owner's paginated coin listing.

use crate::chain::ChainClient;
use crate::errors::KitError;
use crate::types::{CoinRef, ObjectId, SuiAddress};
use eyre::Context as _;
use tracing::debug;

/// Sum of coin balances, widened so it cannot overflow.
pub fn total_balance(coins: &[CoinRef]) -> u128 {
    coins.iter().map(|c| u128::from(c.balance)).sum()
}

/// Collect coins of `coin_type` until their sum reaches `target`.
///
/// Each page is sorted by balance (largest first) before accumulating, and no further
/// pages are fetched once the target is covered. A shortfall is not an error: all coins
/// found are returned and the caller decides.
pub async fn select_coins<C: ChainClient + ?Sized>(
    client: &C,
    owner: SuiAddress,
    coin_type: &str,
    target: u128,
) -> eyre::Result<Vec<CoinRef>> {
    select_coins_excluding(client, owner, coin_type, target, &[], usize::MAX).await
}

/// [`select_coins`] that skips `exclude` and stops after `max_objects` coins.
pub async fn select_coins_excluding<C: ChainClient + ?Sized>(
    client: &C,
    owner: SuiAddress,
    coin_type: &str,
    target: u128,
    exclude: &[ObjectId],
    max_objects: usize,
) -> eyre::Result<Vec<CoinRef>> {
    let mut selected: Vec<CoinRef> = vec![];
    if target == 0 {
        return Ok(selected);
    }

    let mut total = 0_u128;
    let mut cursor: Option<String> = None;
    let mut pages = 0_usize;
    loop {
        let mut page = client
            .coins_page(owner, coin_type, cursor.as_deref())
            .await
            .with_context(|| format!("list {coin_type} coins of {owner}"))?;
        pages = pages.saturating_add(1);

        // Deterministic within a page: largest first, ties by object id.
        page.data.sort_by(|a, b| {
            b.balance
                .cmp(&a.balance)
                .then_with(|| a.object_id().cmp(&b.object_id()))
        });

        for coin in page.data {
            if exclude.contains(&coin.object_id()) {
                continue;
            }
            total = total.saturating_add(u128::from(coin.balance));
            selected.push(coin);
            if total >= target || selected.len() >= max_objects {
                debug!(coin_type, pages, coins = selected.len(), %total, "coin selection done");
                return Ok(selected);
            }
        }

        if !page.has_next_page {
            break;
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    debug!(coin_type, pages, coins = selected.len(), %total, %target, "coin selection short");
    Ok(selected)
}

/// Fail with `InsufficientBalance` unless `coins` cover `required`.
pub fn ensure_covered(coin_type: &str, required: u128, coins: &[CoinRef]) -> eyre::Result<()> {
    let available = total_balance(coins);
    if available < required {
        return Err(KitError::InsufficientBalance {
            coin_type: coin_type.to_owned(),
            required,
            available,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockChain;

    const USDC: &str = "0xa::usdc::USDC";
    const OWNER: SuiAddress = SuiAddress::new([0xEE; 32]);

    fn balances(coins: &[CoinRef]) -> Vec<u64> {
        coins.iter().map(|c| c.balance).collect()
    }

    #[tokio::test]
    async fn selects_minimal_largest_first_prefix() -> eyre::Result<()> {
        let chain = MockChain::new().with_pages(USDC, &[&[10, 50, 5, 30]]);
        let got = select_coins(&chain, OWNER, USDC, 70).await?;
        assert_eq!(balances(&got), vec![50, 30]);
        Ok(())
    }

    #[tokio::test]
    async fn shortfall_returns_everything_without_error() -> eyre::Result<()> {
        let chain = MockChain::new().with_pages(USDC, &[&[25, 15]]);
        let got = select_coins(&chain, OWNER, USDC, 100).await?;
        assert_eq!(total_balance(&got), 40);
        let r = ensure_covered(USDC, 100, &got);
        let e = r.err().and_then(|e| e.downcast_ref::<KitError>().cloned());
        assert_eq!(
            e,
            Some(KitError::InsufficientBalance {
                coin_type: USDC.into(),
                required: 100,
                available: 40
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn shortfall_walks_every_page() -> eyre::Result<()> {
        let chain = MockChain::new().with_pages(USDC, &[&[10, 5], &[20], &[5]]);
        let got = select_coins(&chain, OWNER, USDC, 70).await?;
        assert_eq!(total_balance(&got), 40);
        assert_eq!(balances(&got), vec![10, 5, 20, 5]);
        assert_eq!(chain.page_calls(), 3);
        assert_eq!(
            chain.cursors().await,
            vec![None, Some("page-1".into()), Some("page-2".into())],
            "each request carries the previous page's cursor"
        );
        Ok(())
    }

    #[tokio::test]
    async fn missing_cursor_ends_the_listing() -> eyre::Result<()> {
        let chain = MockChain::new()
            .with_pages(USDC, &[&[10], &[20], &[30]])
            .with_cursorless_page(1);
        let got = select_coins(&chain, OWNER, USDC, 100).await?;
        assert_eq!(balances(&got), vec![10, 20]);
        assert_eq!(chain.page_calls(), 2, "no request without a cursor");
        Ok(())
    }

    #[tokio::test]
    async fn stops_fetching_once_covered() -> eyre::Result<()> {
        let chain = MockChain::new().with_pages(USDC, &[&[5, 8], &[40, 2], &[1_000]]);
        let got = select_coins(&chain, OWNER, USDC, 50).await?;
        // page order wins over global order: 8, 5, then 40 from page two
        assert_eq!(balances(&got), vec![8, 5, 40]);
        assert_eq!(chain.page_calls(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn empty_listing_and_zero_target() -> eyre::Result<()> {
        let chain = MockChain::new();
        assert!(select_coins(&chain, OWNER, USDC, 10).await?.is_empty());
        assert!(select_coins(&chain, OWNER, USDC, 0).await?.is_empty());
        assert_eq!(chain.page_calls(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn exclusions_and_object_cap_apply() -> eyre::Result<()> {
        let chain = MockChain::new().with_pages(USDC, &[&[100, 90, 80, 70]]);
        let first = select_coins(&chain, OWNER, USDC, 1).await?;
        let skip: Vec<ObjectId> = first.iter().map(CoinRef::object_id).collect();
        let got = select_coins_excluding(&chain, OWNER, USDC, 1_000, &skip, 2).await?;
        assert_eq!(balances(&got), vec![90, 80]);
        Ok(())
    }
}
