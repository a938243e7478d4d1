use super::{checked_coin_type, read_outcome, ActionEnv};
use crate::amount::format_amount_base_to_ui_string;
use crate::chain::ChainClient;
use crate::errors::KitError;
use crate::types::SUI_COIN_TYPE;
use serde_json::{json, Value};

/// Balance of `coin_type` (SUI when `None`) held by the context's owner.
pub async fn get_balance<C: ChainClient + ?Sized>(
    env: &ActionEnv<'_, C>,
    coin_type: Option<&str>,
) -> eyre::Result<Value> {
    let coin_type = checked_coin_type(coin_type.unwrap_or(SUI_COIN_TYPE))?;
    let owner = env.context.owner_address()?;

    let meta = env
        .client
        .coin_metadata(coin_type)
        .await
        .map_err(|e| KitError::MetadataFetchFailed(format!("{e:#}")))?
        .ok_or_else(|| KitError::InvalidCoinType(coin_type.to_owned()))?;
    let balance = env.client.balance(owner, coin_type).await?;
    let ui = format_amount_base_to_ui_string(balance.total_balance, u32::from(meta.decimals))?;

    Ok(read_outcome(
        format!("{owner} holds {ui} {}", meta.symbol),
        json!({
            "address": owner.to_string(),
            "coinType": balance.coin_type,
            "symbol": meta.symbol,
            "decimals": meta.decimals,
            "balance": balance.total_balance.to_string(),
            "uiBalance": ui,
            "coinObjectCount": balance.coin_object_count,
        }),
    ))
}

pub fn wallet_address<C: ChainClient + ?Sized>(env: &ActionEnv<'_, C>) -> eyre::Result<Value> {
    let owner = env.context.owner_address()?;
    Ok(read_outcome(
        format!("wallet address is {owner}"),
        json!({ "address": owner.to_string() }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KitConfig;
    use crate::context::AgentContext;
    use crate::testing::MockChain;
    use crate::types::SuiAddress;

    const OWNER: SuiAddress = SuiAddress::new([0x0b; 32]);

    #[tokio::test]
    async fn defaults_to_sui_with_exact_ui_amount() -> eyre::Result<()> {
        let chain = MockChain::new()
            .with_metadata(SUI_COIN_TYPE, 9)
            .with_pages(SUI_COIN_TYPE, &[&[1_500_000_000, 250_000_000]]);
        let ctx = AgentContext::with_address(OWNER);
        let cfg = KitConfig::default();
        let out = get_balance(&ActionEnv::new(&chain, &ctx, &cfg), None).await?;
        assert_eq!(out.get("balance"), Some(&json!("1750000000")));
        assert_eq!(out.get("uiBalance"), Some(&json!("1.75")));
        assert_eq!(out.get("coinObjectCount"), Some(&json!(2)));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_coin_type_is_rejected() -> eyre::Result<()> {
        let chain = MockChain::new();
        let ctx = AgentContext::with_address(OWNER);
        let cfg = KitConfig::default();
        let r = get_balance(&ActionEnv::new(&chain, &ctx, &cfg), Some("0xa::nope::NOPE")).await;
        let e = r.err().and_then(|e| e.downcast_ref::<KitError>().cloned());
        assert_eq!(e, Some(KitError::InvalidCoinType("0xa::nope::NOPE".into())));
        Ok(())
    }

    #[tokio::test]
    async fn needs_an_owner() -> eyre::Result<()> {
        let chain = MockChain::new().with_metadata(SUI_COIN_TYPE, 9);
        let ctx = AgentContext::detached();
        let cfg = KitConfig::default();
        let r = get_balance(&ActionEnv::new(&chain, &ctx, &cfg), None).await;
        let e = r.err().and_then(|e| e.downcast_ref::<KitError>().cloned());
        assert_eq!(e, Some(KitError::WalletNotConnected));
        assert_eq!(chain.metadata_calls(), 0);
        Ok(())
    }

    #[test]
    fn reports_the_owner_address() -> eyre::Result<()> {
        let chain = MockChain::new();
        let ctx = AgentContext::with_address(OWNER);
        let cfg = KitConfig::default();
        let out = wallet_address(&ActionEnv::new(&chain, &ctx, &cfg))?;
        assert_eq!(out.get("address"), Some(&json!(OWNER.to_string())));
        Ok(())
    }
}
