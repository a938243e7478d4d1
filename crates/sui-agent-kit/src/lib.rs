//! Toolkit for agents acting on the Sui blockchain: coin selection, programmable
//! transaction drafting, gas estimation and dispatch through a local key or an
//! external wallet.

#![expect(
    clippy::multiple_crate_versions,
    reason = "transitive dependency duplication"
)]

pub mod actions;
pub mod address;
pub mod agent;
pub mod amount;
pub mod chain;
pub mod config;
pub mod consolidate;
pub mod context;
pub mod dispatch;
pub mod errors;
pub mod gas;
pub mod http;
pub mod keys;
pub mod paths;
pub mod price;
pub mod protocols;
pub mod ptb;
pub mod selection;
pub mod store;
pub mod tx_data;
pub mod type_tag;
pub mod types;

#[cfg(test)]
mod testing;

pub use agent::{RpcAgentKit, SuiAgentKit};
pub use context::AgentContext;
pub use errors::{KitError, ToolError};
