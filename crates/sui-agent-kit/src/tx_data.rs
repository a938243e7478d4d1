use crate::ptb::ProgrammableTransaction;
use crate::types::{ObjectRef, SuiAddress};
use eyre::Context as _;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransactionKind {
    ProgrammableTransaction(ProgrammableTransaction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GasData {
    pub payment: Vec<ObjectRef>,
    pub owner: SuiAddress,
    pub price: u64,
    pub budget: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionExpiration {
    None,
    Epoch(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionDataV1 {
    pub kind: TransactionKind,
    pub sender: SuiAddress,
    pub gas_data: GasData,
    pub expiration: TransactionExpiration,
}

/// Fully built transaction, ready to be signed or handed to an external wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransactionData {
    V1(TransactionDataV1),
}

impl TransactionData {
    pub const fn new_programmable(
        sender: SuiAddress,
        pt: ProgrammableTransaction,
        gas_data: GasData,
    ) -> Self {
        Self::V1(TransactionDataV1 {
            kind: TransactionKind::ProgrammableTransaction(pt),
            sender,
            gas_data,
            expiration: TransactionExpiration::None,
        })
    }

    pub const fn gas_data(&self) -> &GasData {
        match self {
            Self::V1(v) => &v.gas_data,
        }
    }

    pub fn to_bytes(&self) -> eyre::Result<Vec<u8>> {
        bcs::to_bytes(self).context("serialize transaction data")
    }
}
