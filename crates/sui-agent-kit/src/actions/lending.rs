use super::{checked_coin_type, coin_amount, prepare_coin, ActionEnv};
use crate::chain::ChainClient;
use crate::protocols::{LendingMarket, ObligationHandle};
use crate::ptb::TransactionDraft;
use crate::types::SuiAddress;
use serde_json::{json, Value};
use tracing::info;

/// Resolve the owner's obligation into the draft. Without one, `create` decides between
/// queueing a new obligation and failing.
async fn obligation(
    market: &dyn LendingMarket,
    draft: &mut TransactionDraft,
    owner: SuiAddress,
    create: bool,
) -> eyre::Result<ObligationHandle> {
    match market.find_obligation(owner).await? {
        Some(o) => Ok(ObligationHandle::Existing {
            id: o.id,
            owner_cap: draft.object(o.owner_cap)?,
        }),
        None if create => Ok(ObligationHandle::New {
            owner_cap: market.create_obligation(draft)?,
        }),
        None => eyre::bail!("{owner} has no {} obligation", market.name()),
    }
}

fn details(
    market: &dyn LendingMarket,
    coin_type: &str,
    amount: u64,
    handle: ObligationHandle,
) -> Value {
    let obligation = match handle {
        ObligationHandle::Existing { id, .. } => Value::from(id.to_string()),
        ObligationHandle::New { .. } => Value::from("new"),
    };
    json!({
        "protocol": market.name(),
        "coinType": coin_type,
        "amount": amount.to_string(),
        "obligation": obligation,
    })
}

/// Supply `amount` of `coin_type` as collateral, opening an obligation if needed.
pub async fn deposit<C: ChainClient + ?Sized>(
    env: &ActionEnv<'_, C>,
    market: &dyn LendingMarket,
    coin_type: &str,
    amount: &str,
) -> eyre::Result<Value> {
    let coin_type = checked_coin_type(coin_type)?;
    let owner = env.context.owner_address()?;
    let base = coin_amount(env.client, amount, coin_type).await?;

    let mut draft = TransactionDraft::new();
    let coin = prepare_coin(env.client, &mut draft, owner, coin_type, base).await?;
    let handle = obligation(market, &mut draft, owner, true).await?;
    market.deposit(&mut draft, handle, coin_type, coin)?;
    if let ObligationHandle::New { owner_cap } = handle {
        // the cap is an owned object; it must leave the transaction somewhere
        draft.transfer_to(vec![owner_cap], owner)?;
    }

    info!(%owner, coin_type, amount = base, market = market.name(), "deposit prepared");
    env.dispatch(draft, "Deposit", details(market, coin_type, base, handle))
        .await
}

pub async fn borrow<C: ChainClient + ?Sized>(
    env: &ActionEnv<'_, C>,
    market: &dyn LendingMarket,
    coin_type: &str,
    amount: &str,
) -> eyre::Result<Value> {
    let coin_type = checked_coin_type(coin_type)?;
    let owner = env.context.owner_address()?;
    let base = coin_amount(env.client, amount, coin_type).await?;

    let mut draft = TransactionDraft::new();
    let handle = obligation(market, &mut draft, owner, false).await?;
    let coin = market.borrow(&mut draft, handle, coin_type, base)?;
    draft.transfer_to(vec![coin], owner)?;

    info!(%owner, coin_type, amount = base, market = market.name(), "borrow prepared");
    env.dispatch(draft, "Borrow", details(market, coin_type, base, handle))
        .await
}

pub async fn withdraw<C: ChainClient + ?Sized>(
    env: &ActionEnv<'_, C>,
    market: &dyn LendingMarket,
    coin_type: &str,
    amount: &str,
) -> eyre::Result<Value> {
    let coin_type = checked_coin_type(coin_type)?;
    let owner = env.context.owner_address()?;
    let base = coin_amount(env.client, amount, coin_type).await?;

    let mut draft = TransactionDraft::new();
    let handle = obligation(market, &mut draft, owner, false).await?;
    let coin = market.withdraw(&mut draft, handle, coin_type, base)?;
    draft.transfer_to(vec![coin], owner)?;

    info!(%owner, coin_type, amount = base, market = market.name(), "withdraw prepared");
    env.dispatch(draft, "Withdraw", details(market, coin_type, base, handle))
        .await
}

pub async fn repay<C: ChainClient + ?Sized>(
    env: &ActionEnv<'_, C>,
    market: &dyn LendingMarket,
    coin_type: &str,
    amount: &str,
) -> eyre::Result<Value> {
    let coin_type = checked_coin_type(coin_type)?;
    let owner = env.context.owner_address()?;
    let base = coin_amount(env.client, amount, coin_type).await?;

    let mut draft = TransactionDraft::new();
    let coin = prepare_coin(env.client, &mut draft, owner, coin_type, base).await?;
    let handle = obligation(market, &mut draft, owner, false).await?;
    market.repay(&mut draft, handle, coin_type, coin)?;

    info!(%owner, coin_type, amount = base, market = market.name(), "repay prepared");
    env.dispatch(draft, "Repay", details(market, coin_type, base, handle))
        .await
}
