use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// A structured error suitable for returning to a tool-calling client as action output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolError {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Value::is_null", default)]
    pub data: Value,
}

impl ToolError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: Value::Null,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Recover the typed failure carried by an `eyre::Report`, if any.
    pub fn from_report(e: &eyre::Report) -> Self {
        if let Some(ke) = e.downcast_ref::<KitError>() {
            Self::from(ke.clone())
        } else {
            Self::new("internal_error", format!("{e:#}"))
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KitError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid coin type: {0}")]
    InvalidCoinType(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("wallet not connected")]
    WalletNotConnected,

    #[error("no keypair or wallet address found")]
    NoSigningContext,

    #[error("wallet address {requested} does not match keypair address {keypair}")]
    AddressMismatch { keypair: String, requested: String },

    #[error("insufficient balance for {coin_type}: required {required}, available {available}")]
    InsufficientBalance {
        coin_type: String,
        required: u128,
        available: u128,
    },

    #[error("failed to fetch coin metadata: {0}")]
    MetadataFetchFailed(String),

    #[error("transaction execution failed: {0}")]
    ExecutionFailed(String),

    #[error("protocol not available: {0}")]
    ProtocolUnavailable(String),
}

impl From<KitError> for ToolError {
    fn from(e: KitError) -> Self {
        let message = e.to_string();
        match e {
            KitError::InvalidAddress(addr) => {
                Self::new("invalid_address", message).with_data(json!({ "address": addr }))
            }
            KitError::InvalidCoinType(coin_type) => Self::new("invalid_coin_type", message)
                .with_data(json!({ "coin_type": coin_type })),
            KitError::InvalidAmount(_) => Self::new("invalid_amount", message),
            KitError::WalletNotConnected => Self::new("wallet_not_connected", message),
            KitError::NoSigningContext => Self::new("no_signing_context", message),
            KitError::AddressMismatch { keypair, requested } => {
                Self::new("address_mismatch", message)
                    .with_data(json!({ "keypair": keypair, "requested": requested }))
            }
            KitError::InsufficientBalance {
                coin_type,
                required,
                available,
            } => Self::new("insufficient_balance", message).with_data(json!({
                "coin_type": coin_type,
                "required": required.to_string(),
                "available": available.to_string(),
            })),
            KitError::MetadataFetchFailed(_) => Self::new("metadata_fetch_failed", message),
            KitError::ExecutionFailed(_) => Self::new("execution_failed", message),
            KitError::ProtocolUnavailable(_) => Self::new("protocol_unavailable", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_failures_survive_the_report() {
        let report = eyre::Report::new(KitError::InsufficientBalance {
            coin_type: "0x2::sui::SUI".into(),
            required: 70,
            available: 40,
        })
        .wrap_err("transfer");
        let te = ToolError::from_report(&report);
        assert_eq!(te.code, "insufficient_balance");
        assert_eq!(
            te.data.get("available").and_then(Value::as_str),
            Some("40"),
            "data: {}",
            te.data
        );
    }

    #[test]
    fn untyped_failures_become_internal_errors() {
        let report = eyre::eyre!("socket closed");
        let te = ToolError::from_report(&report);
        assert_eq!(te.code, "internal_error");
        assert!(te.message.contains("socket closed"), "msg: {}", te.message);
        assert!(te.data.is_null(), "no data expected");
    }
}
