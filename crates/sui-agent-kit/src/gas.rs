//! Turning a draft into signable transaction data: price, budget and gas payment.

use crate::chain::{ChainClient, ExecutionStatus, GasCostSummary};
use crate::config::GasConfig;
use crate::errors::KitError;
use crate::ptb::TransactionDraft;
use crate::selection::{ensure_covered, select_coins_excluding};
use crate::tx_data::{GasData, TransactionData};
use crate::types::{SuiAddress, SUI_COIN_TYPE};
use eyre::Context as _;
use tracing::debug;

/// Computation units added on top of the dry-run cost.
pub const GAS_SAFE_OVERHEAD: u64 = 1_000;

/// `max(computation + overhead * price, computation + storage - rebate)`
pub const fn budget_from_dry_run(gas: &GasCostSummary, price: u64) -> u64 {
    let with_overhead = gas
        .computation_cost
        .saturating_add(GAS_SAFE_OVERHEAD.saturating_mul(price));
    let net = gas
        .computation_cost
        .saturating_add(gas.storage_cost)
        .saturating_sub(gas.storage_rebate);
    if with_overhead > net {
        with_overhead
    } else {
        net
    }
}

async fn estimate_budget<C: ChainClient + ?Sized>(
    client: &C,
    sender: SuiAddress,
    draft: &TransactionDraft,
    price: u64,
    cfg: &GasConfig,
) -> eyre::Result<u64> {
    if let Some(b) = cfg.fixed_budget {
        return Ok(b);
    }
    // Empty payment: the node substitutes a mock gas coin for the dry run.
    let dry_tx = TransactionData::new_programmable(
        sender,
        draft.clone().into_programmable(),
        GasData {
            payment: vec![],
            owner: sender,
            price,
            budget: cfg.max_budget,
        },
    );
    let result = client
        .dry_run(&dry_tx.to_bytes()?)
        .await
        .map_err(|e| KitError::ExecutionFailed(format!("dry run: {e:#}")))?;
    if let ExecutionStatus::Failure { error } = result.status {
        return Err(KitError::ExecutionFailed(error).into());
    }
    Ok(budget_from_dry_run(&result.gas_used, price))
}

/// Build transaction data for `draft` with `sender` paying gas.
///
/// Gas payment is drawn from the sender's SUI coins that the draft does not already
/// consume, and must cover the budget plus whatever the draft splits off the gas coin.
pub async fn build_transaction<C: ChainClient + ?Sized>(
    client: &C,
    sender: SuiAddress,
    draft: TransactionDraft,
    cfg: &GasConfig,
) -> eyre::Result<TransactionData> {
    if let Some(declared) = draft.sender().filter(|d| *d != sender) {
        eyre::bail!("draft was declared for {declared}, not {sender}");
    }
    let price = client
        .reference_gas_price()
        .await
        .context("fetch reference gas price")?;
    let budget = estimate_budget(client, sender, &draft, price, cfg).await?;

    let target = u128::from(budget).saturating_add(u128::from(draft.gas_coin_spend()));
    let exclude = draft.input_object_ids();
    let coins = select_coins_excluding(
        client,
        sender,
        SUI_COIN_TYPE,
        target,
        &exclude,
        cfg.max_payment_objects,
    )
    .await?;
    ensure_covered(SUI_COIN_TYPE, target, &coins)?;

    debug!(%sender, price, budget, payment = coins.len(), "built transaction");
    Ok(TransactionData::new_programmable(
        sender,
        draft.into_programmable(),
        GasData {
            payment: coins.iter().map(|c| c.object_ref).collect(),
            owner: sender,
            price,
            budget,
        },
    ))
}
