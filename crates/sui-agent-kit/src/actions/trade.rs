use super::{checked_coin_type, coin_amount, prepare_coin, ActionEnv};
use crate::chain::ChainClient;
use crate::protocols::{Swap, SwapRequest};
use crate::ptb::TransactionDraft;
use crate::types::SUI_COIN_TYPE;
use serde_json::{json, Value};
use tracing::info;

/// 1%
pub const DEFAULT_SLIPPAGE_BPS: u32 = 100;

/// Swap an exact `amount` of `from` (SUI when `None`) into `to` and keep the output.
pub async fn trade<C: ChainClient + ?Sized>(
    env: &ActionEnv<'_, C>,
    swap: &dyn Swap,
    to: &str,
    amount: &str,
    from: Option<&str>,
    slippage_bps: u32,
) -> eyre::Result<Value> {
    let from = checked_coin_type(from.unwrap_or(SUI_COIN_TYPE))?;
    let to = checked_coin_type(to)?;
    let owner = env.context.owner_address()?;

    let amount_in = coin_amount(env.client, amount, from).await?;
    let mut draft = TransactionDraft::new();
    let coin_in = prepare_coin(env.client, &mut draft, owner, from, amount_in).await?;
    let request = SwapRequest {
        sender: owner,
        from_coin_type: from.to_owned(),
        to_coin_type: to.to_owned(),
        amount_in,
        slippage_bps,
    };
    let coin_out = swap.swap(&mut draft, &request, coin_in).await?;
    draft.transfer_to(vec![coin_out], owner)?;

    info!(%owner, from, to, amount_in, backend = swap.name(), "swap prepared");
    env.dispatch(
        draft,
        "Trade",
        json!({
            "protocol": swap.name(),
            "from": from,
            "to": to,
            "amountIn": amount_in.to_string(),
            "slippageBps": slippage_bps,
        }),
    )
    .await
}
