//! Capability interfaces for external protocols.
//!
//! The core prepares input coins and hands them to a backend, which appends its own
//! calls to the draft. How a backend routes a swap or prices a loan is its business.

pub mod springsui;

use crate::ptb::{Argument, TransactionDraft};
use crate::types::{ObjectId, ObjectRef, SuiAddress};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub sender: SuiAddress,
    pub from_coin_type: String,
    pub to_coin_type: String,
    /// Exact input, in base units of `from_coin_type`.
    pub amount_in: u64,
    pub slippage_bps: u32,
}

#[async_trait]
pub trait Swap: Send + Sync {
    fn name(&self) -> &str;

    /// Append commands that consume `coin_in` and return the output coin handle.
    async fn swap(
        &self,
        draft: &mut TransactionDraft,
        request: &SwapRequest,
        coin_in: Argument,
    ) -> eyre::Result<Argument>;
}

/// A user's position in a lending market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obligation {
    pub id: ObjectId,
    /// Owned capability proving control of the obligation.
    pub owner_cap: ObjectRef,
}

/// Handle to an obligation's owner cap inside a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObligationHandle {
    Existing { id: ObjectId, owner_cap: Argument },
    /// Created earlier in the same draft; not yet on chain.
    New { owner_cap: Argument },
}

impl ObligationHandle {
    pub const fn owner_cap(&self) -> Argument {
        match self {
            Self::Existing { owner_cap, .. } | Self::New { owner_cap } => *owner_cap,
        }
    }
}

#[async_trait]
pub trait LendingMarket: Send + Sync {
    fn name(&self) -> &str;

    /// The owner's first obligation, if any.
    async fn find_obligation(&self, owner: SuiAddress) -> eyre::Result<Option<Obligation>>;

    /// Queue creation of a new obligation and return its owner cap handle.
    fn create_obligation(&self, draft: &mut TransactionDraft) -> eyre::Result<Argument>;

    fn deposit(
        &self,
        draft: &mut TransactionDraft,
        obligation: ObligationHandle,
        coin_type: &str,
        coin: Argument,
    ) -> eyre::Result<()>;

    /// Returns the borrowed coin.
    fn borrow(
        &self,
        draft: &mut TransactionDraft,
        obligation: ObligationHandle,
        coin_type: &str,
        amount: u64,
    ) -> eyre::Result<Argument>;

    /// Returns the withdrawn coin.
    fn withdraw(
        &self,
        draft: &mut TransactionDraft,
        obligation: ObligationHandle,
        coin_type: &str,
        amount: u64,
    ) -> eyre::Result<Argument>;

    fn repay(
        &self,
        draft: &mut TransactionDraft,
        obligation: ObligationHandle,
        coin_type: &str,
        coin: Argument,
    ) -> eyre::Result<()>;
}

pub trait LiquidStaking: Send + Sync {
    fn name(&self) -> &str;

    /// Liquid staking token types this backend can mint, default first.
    fn lst_coin_types(&self) -> Vec<String>;

    /// Stake `sui` and return the minted LST coin.
    fn mint(
        &self,
        draft: &mut TransactionDraft,
        lst_coin_type: &str,
        sui: Argument,
    ) -> eyre::Result<Argument>;

    /// Burn `lst` and return the redeemed SUI coin.
    fn redeem(
        &self,
        draft: &mut TransactionDraft,
        lst_coin_type: &str,
        lst: Argument,
    ) -> eyre::Result<Argument>;
}
