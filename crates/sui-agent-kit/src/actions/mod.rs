//! User-facing operations. Each one builds a draft through the shared pipeline
//! (normalize, select, consolidate, split exact) and hands it to [`finalize`].

mod balance;
mod lending;
mod staking;
mod trade;
mod transfer;

pub use balance::{get_balance, wallet_address};
pub use lending::{borrow, deposit, repay, withdraw};
pub use staking::{stake, unstake};
pub use trade::{trade, DEFAULT_SLIPPAGE_BPS};
pub use transfer::transfer;

use crate::address::is_valid_token_address;
use crate::amount::{parse_human_amount, to_coin_units};
use crate::chain::ChainClient;
use crate::config::KitConfig;
use crate::consolidate::consolidate;
use crate::context::AgentContext;
use crate::dispatch::{finalize, Dispatched};
use crate::errors::KitError;
use crate::ptb::{Argument, TransactionDraft};
use crate::selection::{ensure_covered, select_coins};
use crate::types::{is_native_coin_type, SuiAddress};
use serde_json::{json, Value};

/// Everything an operation needs: where to read, who signs, how to build.
pub struct ActionEnv<'a, C: ?Sized> {
    pub client: &'a C,
    pub context: &'a AgentContext,
    pub config: &'a KitConfig,
}

impl<'a, C: ChainClient + ?Sized> ActionEnv<'a, C> {
    pub const fn new(client: &'a C, context: &'a AgentContext, config: &'a KitConfig) -> Self {
        Self {
            client,
            context,
            config,
        }
    }

    fn explorer_link(&self, digest: &str) -> String {
        format!("{}{digest}", self.config.explorer_tx_url)
    }

    /// Finalize `draft` and shape the result for callers.
    async fn dispatch(
        &self,
        draft: TransactionDraft,
        what: &str,
        details: Value,
    ) -> eyre::Result<Value> {
        let dispatched = finalize(self.client, draft, self.context, &self.config.gas).await?;
        Ok(self.outcome(what, dispatched, details))
    }

    fn outcome(&self, what: &str, dispatched: Dispatched, details: Value) -> Value {
        let mut out = match dispatched {
            Dispatched::Submitted {
                digest,
                effects,
                events,
            } => {
                let link = self.explorer_link(&digest);
                json!({
                    "status": "success",
                    "message": format!("{what} completed successfully: {link}"),
                    "digest": digest,
                    "explorer": link,
                    "transaction": { "effects": effects, "events": events },
                })
            }
            Dispatched::Unsigned { tx_bytes, sender } => json!({
                "status": "success",
                "message": format!("{what} transaction built; sign it with wallet {sender} and submit"),
                "sender": sender.to_string(),
                "txBytes": tx_bytes,
            }),
        };
        merge_details(&mut out, details);
        out
    }
}

fn merge_details(out: &mut Value, details: Value) {
    let (Value::Object(out), Value::Object(details)) = (out, details) else {
        return;
    };
    for (k, v) in details {
        out.entry(k).or_insert(v);
    }
}

/// A success payload for operations that do not touch the chain's state.
fn read_outcome(message: impl Into<String>, details: Value) -> Value {
    let mut out = json!({ "status": "success", "message": message.into() });
    merge_details(&mut out, details);
    out
}

fn checked_coin_type(coin_type: &str) -> eyre::Result<&str> {
    let coin_type = coin_type.trim();
    if !is_valid_token_address(coin_type) {
        return Err(KitError::InvalidCoinType(coin_type.to_owned()).into());
    }
    Ok(coin_type)
}

/// Parse and scale a human amount of `coin_type` to a single-coin base-unit value.
async fn coin_amount<C: ChainClient + ?Sized>(
    client: &C,
    amount: &str,
    coin_type: &str,
) -> eyre::Result<u64> {
    let human = parse_human_amount(amount)?;
    to_coin_units(client, human, coin_type).await
}

/// Produce a coin of exactly `amount` base units of `coin_type` inside `draft`.
///
/// The native coin is split off the gas coin; gas payment selection accounts for it.
async fn prepare_coin<C: ChainClient + ?Sized>(
    client: &C,
    draft: &mut TransactionDraft,
    owner: SuiAddress,
    coin_type: &str,
    amount: u64,
) -> eyre::Result<Argument> {
    let coins = if is_native_coin_type(coin_type) {
        vec![]
    } else {
        let coins = select_coins(client, owner, coin_type, u128::from(amount)).await?;
        ensure_covered(coin_type, u128::from(amount), &coins)?;
        coins
    };
    let merged = consolidate(draft, coin_type, &coins)?;
    draft.split_coin(merged, amount)
}
