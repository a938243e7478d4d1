use super::{checked_coin_type, coin_amount, prepare_coin, ActionEnv};
use crate::chain::ChainClient;
use crate::errors::KitError;
use crate::protocols::LiquidStaking;
use crate::ptb::{Argument, TransactionDraft};
use crate::types::SUI_COIN_TYPE;
use serde_json::{json, Value};
use tracing::info;

fn lst_coin_type(staking: &dyn LiquidStaking, requested: Option<&str>) -> eyre::Result<String> {
    let served = staking.lst_coin_types();
    match requested {
        Some(t) => {
            let t = checked_coin_type(t)?;
            if served.iter().any(|s| s == t) {
                Ok(t.to_owned())
            } else {
                let msg = format!("{} does not serve {t}", staking.name());
                Err(KitError::ProtocolUnavailable(msg).into())
            }
        }
        None => served.into_iter().next().ok_or_else(|| {
            KitError::ProtocolUnavailable(format!("{} serves no tokens", staking.name())).into()
        }),
    }
}

/// Stake `amount` SUI for the liquid staking token (the backend's default when `None`).
pub async fn stake<C: ChainClient + ?Sized>(
    env: &ActionEnv<'_, C>,
    staking: &dyn LiquidStaking,
    amount: &str,
    lst: Option<&str>,
) -> eyre::Result<Value> {
    let lst = lst_coin_type(staking, lst)?;
    let owner = env.context.owner_address()?;
    let base = coin_amount(env.client, amount, SUI_COIN_TYPE).await?;

    let mut draft = TransactionDraft::new();
    let sui = draft.split_coin(Argument::GasCoin, base)?;
    let minted = staking.mint(&mut draft, &lst, sui)?;
    draft.transfer_to(vec![minted], owner)?;

    info!(%owner, lst = %lst, amount = base, backend = staking.name(), "stake prepared");
    env.dispatch(
        draft,
        "Stake",
        json!({
            "protocol": staking.name(),
            "lstCoinType": lst,
            "amount": base.to_string(),
        }),
    )
    .await
}

/// Redeem `amount` of the liquid staking token back into SUI.
pub async fn unstake<C: ChainClient + ?Sized>(
    env: &ActionEnv<'_, C>,
    staking: &dyn LiquidStaking,
    amount: &str,
    lst: Option<&str>,
) -> eyre::Result<Value> {
    let lst = lst_coin_type(staking, lst)?;
    let owner = env.context.owner_address()?;
    let base = coin_amount(env.client, amount, &lst).await?;

    let mut draft = TransactionDraft::new();
    let coin = prepare_coin(env.client, &mut draft, owner, &lst, base).await?;
    let sui = staking.redeem(&mut draft, &lst, coin)?;
    draft.transfer_to(vec![sui], owner)?;

    info!(%owner, lst = %lst, amount = base, backend = staking.name(), "unstake prepared");
    env.dispatch(
        draft,
        "Unstake",
        json!({
            "protocol": staking.name(),
            "lstCoinType": lst,
            "amount": base.to_string(),
        }),
    )
    .await
}
