use super::{checked_coin_type, coin_amount, prepare_coin, ActionEnv};
use crate::address::is_valid_account_address;
use crate::chain::ChainClient;
use crate::errors::KitError;
use crate::ptb::TransactionDraft;
use crate::types::{SuiAddress, SUI_COIN_TYPE};
use serde_json::{json, Value};
use tracing::info;

/// Send `amount` (human units) of `coin_type` (SUI when `None`) to `recipient`.
pub async fn transfer<C: ChainClient + ?Sized>(
    env: &ActionEnv<'_, C>,
    recipient: &str,
    amount: &str,
    coin_type: Option<&str>,
) -> eyre::Result<Value> {
    let recipient = recipient.trim();
    if !is_valid_account_address(recipient) {
        return Err(KitError::InvalidAddress(recipient.to_owned()).into());
    }
    let to = SuiAddress::from_hex_literal(recipient)?;
    let coin_type = checked_coin_type(coin_type.unwrap_or(SUI_COIN_TYPE))?;
    let owner = env.context.owner_address()?;

    let base = coin_amount(env.client, amount, coin_type).await?;
    let mut draft = TransactionDraft::new();
    let coin = prepare_coin(env.client, &mut draft, owner, coin_type, base).await?;
    draft.transfer_to(vec![coin], to)?;

    info!(%owner, %to, coin_type, amount = base, "transfer prepared");
    env.dispatch(
        draft,
        "Transfer",
        json!({
            "recipient": to.to_string(),
            "coinType": coin_type,
            "amount": base.to_string(),
        }),
    )
    .await
}
