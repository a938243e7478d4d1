use crate::address::is_valid_account_address;
use crate::errors::KitError;
use crate::keys::SuiKeypair;
use crate::types::SuiAddress;
use std::sync::Arc;

/// How the agent can authorize transactions.
#[derive(Debug, Clone)]
pub enum SigningCapability {
    /// Sign and submit locally.
    Keypair(Arc<SuiKeypair>),
    /// Produce unsigned bytes for an external wallet.
    Address(SuiAddress),
}

/// Immutable per-agent signing context. Reconnecting a wallet produces a new context.
#[derive(Debug, Clone, Default)]
pub struct AgentContext {
    capability: Option<SigningCapability>,
}

impl AgentContext {
    /// No keypair and no wallet; reads that need an owner fail.
    pub const fn detached() -> Self {
        Self { capability: None }
    }

    pub fn with_keypair(kp: SuiKeypair) -> Self {
        Self {
            capability: Some(SigningCapability::Keypair(Arc::new(kp))),
        }
    }

    pub const fn with_address(address: SuiAddress) -> Self {
        Self {
            capability: Some(SigningCapability::Address(address)),
        }
    }

    pub const fn capability(&self) -> Option<&SigningCapability> {
        self.capability.as_ref()
    }

    pub fn owner_address(&self) -> eyre::Result<SuiAddress> {
        match &self.capability {
            Some(SigningCapability::Keypair(kp)) => Ok(kp.address()),
            Some(SigningCapability::Address(a)) => Ok(*a),
            None => Err(KitError::WalletNotConnected.into()),
        }
    }

    /// Connect an external wallet address.
    ///
    /// With a keypair already present, only the keypair's own address is accepted.
    pub fn connect_wallet(&self, address: &str) -> eyre::Result<Self> {
        let address = address.trim();
        if !is_valid_account_address(address) {
            return Err(KitError::InvalidAddress(address.to_owned()).into());
        }
        let requested = SuiAddress::from_hex_literal(address)?;
        match &self.capability {
            Some(SigningCapability::Keypair(kp)) => {
                let own = kp.address();
                if own != requested {
                    return Err(KitError::AddressMismatch {
                        keypair: own.to_string(),
                        requested: requested.to_string(),
                    }
                    .into());
                }
                Ok(self.clone())
            }
            Some(SigningCapability::Address(_)) | None => Ok(Self::with_address(requested)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kit_err(r: eyre::Result<AgentContext>) -> Option<KitError> {
        r.err().and_then(|e| e.downcast_ref::<KitError>().cloned())
    }

    #[test]
    fn detached_context_has_no_owner() {
        let ctx = AgentContext::detached();
        let e = ctx.owner_address().err();
        assert_eq!(
            e.and_then(|e| e.downcast_ref::<KitError>().cloned()),
            Some(KitError::WalletNotConnected)
        );
    }

    #[test]
    fn connecting_replaces_the_address_without_mutation() -> eyre::Result<()> {
        let a = SuiAddress::new([1; 32]);
        let b = SuiAddress::new([2; 32]);
        let ctx = AgentContext::with_address(a);
        let next = ctx.connect_wallet(&b.to_string())?;
        assert_eq!(ctx.owner_address()?, a);
        assert_eq!(next.owner_address()?, b);
        Ok(())
    }

    #[test]
    fn keypair_contexts_reject_foreign_addresses() -> eyre::Result<()> {
        let kp = SuiKeypair::from_bytes(&[3; 32]);
        let own = kp.address();
        let ctx = AgentContext::with_keypair(kp);

        let same = ctx.connect_wallet(&own.to_string())?;
        assert!(matches!(
            same.capability(),
            Some(SigningCapability::Keypair(_))
        ));

        let other = SuiAddress::new([4; 32]).to_string();
        assert!(matches!(
            kit_err(ctx.connect_wallet(&other)),
            Some(KitError::AddressMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn invalid_wallet_addresses_are_rejected() {
        let ctx = AgentContext::detached();
        assert!(matches!(
            kit_err(ctx.connect_wallet("0x2")),
            Some(KitError::InvalidAddress(_))
        ));
    }
}
