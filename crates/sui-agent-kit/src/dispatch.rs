//! Finalizing a draft: sign and submit with a local key, or hand back unsigned bytes.

use crate::chain::{ChainClient, ExecutionStatus};
use crate::config::GasConfig;
use crate::context::{AgentContext, SigningCapability};
use crate::errors::KitError;
use crate::gas::build_transaction;
use crate::ptb::TransactionDraft;
use crate::types::SuiAddress;
use serde_json::Value;
use tracing::info;

#[derive(Debug, Clone)]
pub enum Dispatched {
    /// Signed locally and executed by the node.
    Submitted {
        digest: String,
        effects: Value,
        events: Value,
    },
    /// Built for `sender`; must be signed and submitted out-of-band.
    Unsigned { tx_bytes: String, sender: SuiAddress },
}

pub async fn finalize<C: ChainClient + ?Sized>(
    client: &C,
    mut draft: TransactionDraft,
    context: &AgentContext,
    gas: &GasConfig,
) -> eyre::Result<Dispatched> {
    match context.capability() {
        None => Err(KitError::NoSigningContext.into()),
        Some(SigningCapability::Keypair(kp)) => {
            let sender = kp.address();
            draft.set_sender(sender);
            let tx = build_transaction(client, sender, draft, gas).await?;
            let bytes = tx.to_bytes()?;
            let signature = kp.sign_transaction(&bytes);
            let result = client
                .execute(&bytes, &[signature])
                .await
                .map_err(|e| KitError::ExecutionFailed(format!("{e:#}")))?;
            if let ExecutionStatus::Failure { error } = result.status {
                return Err(KitError::ExecutionFailed(error).into());
            }
            info!(digest = %result.digest, %sender, "transaction executed");
            Ok(Dispatched::Submitted {
                digest: result.digest,
                effects: result.effects,
                events: result.events,
            })
        }
        Some(SigningCapability::Address(sender)) => {
            let sender = *sender;
            draft.set_sender(sender);
            let tx = build_transaction(client, sender, draft, gas).await?;
            let tx_bytes = hex::encode(tx.to_bytes()?);
            info!(%sender, len = tx_bytes.len() / 2, "built unsigned transaction");
            Ok(Dispatched::Unsigned { tx_bytes, sender })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SuiKeypair;
    use crate::ptb::Argument;
    use crate::testing::MockChain;
    use crate::types::SUI_COIN_TYPE;

    fn draft() -> eyre::Result<TransactionDraft> {
        let mut d = TransactionDraft::new();
        let c = d.split_coin(Argument::GasCoin, 1_000)?;
        d.transfer_to(vec![c], SuiAddress::new([0x77; 32]))?;
        Ok(d)
    }

    fn funded() -> MockChain {
        MockChain::new().with_pages(SUI_COIN_TYPE, &[&[50_000_000]])
    }

    fn kit_err(r: eyre::Result<Dispatched>) -> Option<KitError> {
        r.err().and_then(|e| e.downcast_ref::<KitError>().cloned())
    }

    #[tokio::test]
    async fn keypair_context_signs_and_submits() -> eyre::Result<()> {
        let chain = funded();
        let ctx = AgentContext::with_keypair(SuiKeypair::from_bytes(&[1; 32]));
        let out = finalize(&chain, draft()?, &ctx, &GasConfig::default()).await?;
        let Dispatched::Submitted { digest, .. } = out else {
            eyre::bail!("expected submission");
        };
        assert_eq!(digest, "mockdigest");
        let subs = chain.submissions().await;
        assert_eq!(subs.len(), 1);
        assert_eq!(subs.first().map(|s| s.signatures.len()), Some(1));
        Ok(())
    }

    #[tokio::test]
    async fn address_context_builds_bytes_without_submitting() -> eyre::Result<()> {
        let chain = funded();
        let sender = SuiAddress::new([0x42; 32]);
        let ctx = AgentContext::with_address(sender);
        let out = finalize(&chain, draft()?, &ctx, &GasConfig::default()).await?;
        let Dispatched::Unsigned { tx_bytes, sender: s } = out else {
            eyre::bail!("expected unsigned bytes");
        };
        assert_eq!(s, sender);
        let raw = hex::decode(&tx_bytes)?;
        assert!(
            raw.windows(32).any(|w| w == sender.as_bytes()),
            "sender must be embedded in the payload"
        );
        assert!(chain.submissions().await.is_empty(), "nothing submitted");
        Ok(())
    }

    #[tokio::test]
    async fn detached_context_fails_before_any_network_call() -> eyre::Result<()> {
        let chain = funded();
        let r = finalize(&chain, draft()?, &AgentContext::detached(), &GasConfig::default()).await;
        assert_eq!(kit_err(r), Some(KitError::NoSigningContext));
        assert_eq!(chain.page_calls(), 0);
        assert_eq!(chain.dry_run_calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn chain_rejection_is_an_execution_failure() -> eyre::Result<()> {
        let chain = funded().with_execute_error("ObjectVersionUnavailableForConsumption");
        let ctx = AgentContext::with_keypair(SuiKeypair::from_bytes(&[2; 32]));
        let r = finalize(&chain, draft()?, &ctx, &GasConfig::default()).await;
        let Some(KitError::ExecutionFailed(msg)) = kit_err(r) else {
            eyre::bail!("expected ExecutionFailed");
        };
        assert!(
            msg.contains("ObjectVersionUnavailableForConsumption"),
            "msg: {msg}"
        );
        Ok(())
    }
}
