//! `SuiAgentKit`: one handle bundling the chain client, signing context, config and
//! protocol backends, with every operation exposed as a method returning JSON.

use crate::actions::{self, ActionEnv};
use crate::chain::cached::CachedMetadata;
use crate::chain::rpc::SuiRpcClient;
use crate::chain::ChainClient;
use crate::config::KitConfig;
use crate::context::AgentContext;
use crate::errors::KitError;
use crate::price::{PriceQuote, PythClient};
use crate::protocols::springsui::SpringSui;
use crate::protocols::{LendingMarket, LiquidStaking, Swap};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

pub type RpcAgentKit = SuiAgentKit<CachedMetadata<SuiRpcClient>>;

pub struct SuiAgentKit<C> {
    client: Arc<C>,
    context: AgentContext,
    config: KitConfig,
    swap: Option<Arc<dyn Swap>>,
    lending: Option<Arc<dyn LendingMarket>>,
    staking: Option<Arc<dyn LiquidStaking>>,
}

impl RpcAgentKit {
    /// Connect to the configured fullnode. `SpringSui` is wired in when configured.
    pub fn connect(config: KitConfig, context: AgentContext) -> eyre::Result<Self> {
        let rpc = SuiRpcClient::new(config.rpc_url())?;
        info!(network = ?config.network, rpc = rpc.url(), "sui agent kit ready");
        let staking = config
            .springsui
            .as_ref()
            .map(SpringSui::from_config)
            .transpose()?;
        let kit = Self::new(CachedMetadata::new(rpc), context, config);
        Ok(match staking {
            Some(s) => kit.with_staking(Arc::new(s)),
            None => kit,
        })
    }
}

impl<C: ChainClient> SuiAgentKit<C> {
    pub fn new(client: C, context: AgentContext, config: KitConfig) -> Self {
        Self {
            client: Arc::new(client),
            context,
            config,
            swap: None,
            lending: None,
            staking: None,
        }
    }

    #[must_use]
    pub fn with_swap(mut self, swap: Arc<dyn Swap>) -> Self {
        self.swap = Some(swap);
        self
    }

    #[must_use]
    pub fn with_lending(mut self, lending: Arc<dyn LendingMarket>) -> Self {
        self.lending = Some(lending);
        self
    }

    #[must_use]
    pub fn with_staking(mut self, staking: Arc<dyn LiquidStaking>) -> Self {
        self.staking = Some(staking);
        self
    }

    pub const fn context(&self) -> &AgentContext {
        &self.context
    }

    pub const fn config(&self) -> &KitConfig {
        &self.config
    }

    /// Switch to an external wallet. The previous context stays intact on failure.
    pub fn connect_wallet(&mut self, address: &str) -> eyre::Result<()> {
        self.context = self.context.connect_wallet(address)?;
        Ok(())
    }

    fn env(&self) -> ActionEnv<'_, C> {
        ActionEnv::new(&*self.client, &self.context, &self.config)
    }

    fn swap(&self) -> eyre::Result<&dyn Swap> {
        self.swap.as_deref().ok_or_else(|| {
            KitError::ProtocolUnavailable("no swap backend configured".into()).into()
        })
    }

    fn lending(&self) -> eyre::Result<&dyn LendingMarket> {
        self.lending.as_deref().ok_or_else(|| {
            KitError::ProtocolUnavailable("no lending market configured".into()).into()
        })
    }

    fn staking(&self) -> eyre::Result<&dyn LiquidStaking> {
        self.staking.as_deref().ok_or_else(|| {
            KitError::ProtocolUnavailable(
                "no liquid staking backend configured; add a [springsui] section to config.toml"
                    .into(),
            )
            .into()
        })
    }

    pub fn wallet_address(&self) -> eyre::Result<Value> {
        actions::wallet_address(&self.env())
    }

    pub async fn get_balance(&self, coin_type: Option<&str>) -> eyre::Result<Value> {
        actions::get_balance(&self.env(), coin_type).await
    }

    pub async fn transfer(
        &self,
        recipient: &str,
        amount: &str,
        coin_type: Option<&str>,
    ) -> eyre::Result<Value> {
        actions::transfer(&self.env(), recipient, amount, coin_type).await
    }

    pub async fn trade(
        &self,
        to: &str,
        amount: &str,
        from: Option<&str>,
        slippage_bps: Option<u32>,
    ) -> eyre::Result<Value> {
        let swap = self.swap()?;
        let slippage = slippage_bps.unwrap_or(actions::DEFAULT_SLIPPAGE_BPS);
        actions::trade(&self.env(), swap, to, amount, from, slippage).await
    }

    pub async fn deposit(&self, coin_type: &str, amount: &str) -> eyre::Result<Value> {
        actions::deposit(&self.env(), self.lending()?, coin_type, amount).await
    }

    pub async fn borrow(&self, coin_type: &str, amount: &str) -> eyre::Result<Value> {
        actions::borrow(&self.env(), self.lending()?, coin_type, amount).await
    }

    pub async fn withdraw(&self, coin_type: &str, amount: &str) -> eyre::Result<Value> {
        actions::withdraw(&self.env(), self.lending()?, coin_type, amount).await
    }

    pub async fn repay(&self, coin_type: &str, amount: &str) -> eyre::Result<Value> {
        actions::repay(&self.env(), self.lending()?, coin_type, amount).await
    }

    pub async fn stake(&self, amount: &str, lst: Option<&str>) -> eyre::Result<Value> {
        actions::stake(&self.env(), self.staking()?, amount, lst).await
    }

    pub async fn unstake(&self, amount: &str, lst: Option<&str>) -> eyre::Result<Value> {
        actions::unstake(&self.env(), self.staking()?, amount, lst).await
    }

    pub async fn price(&self, ticker: &str) -> eyre::Result<PriceQuote> {
        PythClient::new(&self.config.pyth.hermes_url)?
            .quote(ticker)
            .await
    }
}
