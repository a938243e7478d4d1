#![expect(
    clippy::multiple_crate_versions,
    reason = "transitive dependency duplication"
)]

use clap::{Parser, Subcommand, ValueEnum};
use eyre::Context as _;
use secrecy::SecretString;
use serde_json::{json, Value};
use std::io::Write as _;
use sui_agent_kit::address::{is_valid_account_address, is_valid_address, is_valid_token_address};
use sui_agent_kit::config::{KitConfig, Network};
use sui_agent_kit::keys::SuiKeypair;
use sui_agent_kit::paths::KitPaths;
use sui_agent_kit::price::PriceQuote;
use sui_agent_kit::store::ConfigStore;
use sui_agent_kit::{AgentContext, RpcAgentKit, ToolError};
use tracing_subscriber::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliNetwork {
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
}

impl From<CliNetwork> for Network {
    fn from(v: CliNetwork) -> Self {
        match v {
            CliNetwork::Mainnet => Self::Mainnet,
            CliNetwork::Testnet => Self::Testnet,
            CliNetwork::Devnet => Self::Devnet,
            CliNetwork::Localnet => Self::Localnet,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AddressKind {
    /// Account, object id, or `addr::module::Name`.
    Any,
    Account,
    Token,
}

#[derive(Parser, Debug)]
#[command(name = "sui-agent-kit", version)]
struct Cli {
    /// Network to use; also drops any RPC URL from the config file.
    #[arg(long, global = true, value_enum)]
    network: Option<CliNetwork>,

    /// Fullnode JSON-RPC URL (https, or http on loopback).
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Build unsigned transactions for this wallet instead of signing locally.
    ///
    /// Local signing reads the key from `SUI_PRIVATE_KEY` (`suiprivkey...`, base64 or hex).
    #[arg(long, global = true)]
    wallet_address: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print resolved paths (useful for debugging).
    Paths,

    /// Check an address or coin type without touching the network.
    Validate {
        input: String,
        #[arg(long, value_enum, default_value_t = AddressKind::Any)]
        kind: AddressKind,
    },

    /// Balance of a coin type (SUI by default).
    Balance {
        #[arg(long)]
        coin_type: Option<String>,
    },

    /// Send coins to another address.
    Transfer {
        #[arg(long)]
        to: String,
        /// Human units, e.g. `1.5`.
        #[arg(long)]
        amount: String,
        #[arg(long)]
        coin_type: Option<String>,
    },

    /// Swap through the configured swap backend.
    Trade {
        /// Output coin type.
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: String,
        /// Input coin type (SUI by default).
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        slippage_bps: Option<u32>,
    },

    /// Stake SUI for a liquid staking token.
    ///
    /// Needs a `[springsui]` section (package and `[[springsui.lst]]` entries) in config.toml.
    Stake {
        #[arg(long)]
        amount: String,
        #[arg(long)]
        lst: Option<String>,
    },

    /// Redeem a liquid staking token for SUI.
    ///
    /// Needs the same `[springsui]` section as `stake`.
    Unstake {
        #[arg(long)]
        amount: String,
        #[arg(long)]
        lst: Option<String>,
    },

    /// Latest Pyth price and EMA price for a ticker.
    Price { ticker: String },

    /// Address transactions are built for.
    WalletAddress,
}

fn init_logging(paths: &KitPaths) -> tracing_appender::non_blocking::WorkerGuard {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let file_name = paths
        .log_file
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("sui-agent-kit.log.jsonl");
    let file_appender = tracing_appender::rolling::never(&paths.data_dir, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_filter(env_filter.clone());
    let file_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(file_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

fn emit(v: &Value) -> eyre::Result<()> {
    let s = serde_json::to_string_pretty(v).context("serialize output")?;
    writeln!(std::io::stdout().lock(), "{s}").context("write output")?;
    Ok(())
}

fn signing_context(wallet_address: Option<&str>) -> eyre::Result<AgentContext> {
    let base = match std::env::var("SUI_PRIVATE_KEY") {
        Ok(k) if !k.trim().is_empty() => {
            let kp = SuiKeypair::from_secret(&SecretString::from(k))
                .context("load SUI_PRIVATE_KEY")?;
            AgentContext::with_keypair(kp)
        }
        Ok(_) | Err(_) => AgentContext::detached(),
    };
    match wallet_address {
        Some(a) => base.connect_wallet(a),
        None => Ok(base),
    }
}

fn load_config(
    paths: &KitPaths,
    network: Option<CliNetwork>,
    rpc_url: Option<&str>,
) -> eyre::Result<KitConfig> {
    let mut cfg = ConfigStore::new(paths).load()?;
    if let Some(n) = network {
        cfg.network = n.into();
        cfg.rpc.url = None;
    }
    if let Some(u) = rpc_url {
        cfg.rpc.url = Some(u.trim().to_owned());
    }
    Ok(cfg)
}

fn validate(input: &str, kind: AddressKind) -> Value {
    let input = input.trim();
    let valid = match kind {
        AddressKind::Any => is_valid_address(input),
        AddressKind::Account => is_valid_account_address(input),
        AddressKind::Token => is_valid_token_address(input),
    };
    json!({
        "status": "success",
        "input": input,
        "kind": format!("{kind:?}").to_lowercase(),
        "valid": valid,
    })
}

fn price_output(q: PriceQuote) -> eyre::Result<Value> {
    let message = format!("{} is {} (EMA {})", q.ticker, q.price, q.ema_price);
    let mut out = json!({ "status": "success", "message": message });
    if let (Some(o), Value::Object(q)) = (out.as_object_mut(), serde_json::to_value(q)?) {
        o.extend(q);
    }
    Ok(out)
}

async fn run(cli: Cli, paths: &KitPaths) -> eyre::Result<Value> {
    let Cli {
        network,
        rpc_url,
        wallet_address,
        cmd,
    } = cli;
    let connect = || -> eyre::Result<RpcAgentKit> {
        let cfg = load_config(paths, network, rpc_url.as_deref())?;
        RpcAgentKit::connect(cfg, signing_context(wallet_address.as_deref())?)
    };

    match cmd {
        Command::Paths => Ok(json!({
          "config_dir": paths.config_dir,
          "data_dir": paths.data_dir,
          "log_file": paths.log_file,
        })),
        Command::Validate { input, kind } => Ok(validate(&input, kind)),
        Command::Balance { coin_type } => {
            let kit = connect()?;
            kit.get_balance(coin_type.as_deref()).await
        }
        Command::Transfer {
            to,
            amount,
            coin_type,
        } => {
            let kit = connect()?;
            kit.transfer(&to, &amount, coin_type.as_deref()).await
        }
        Command::Trade {
            to,
            amount,
            from,
            slippage_bps,
        } => {
            let kit = connect()?;
            kit.trade(&to, &amount, from.as_deref(), slippage_bps).await
        }
        Command::Stake { amount, lst } => {
            let kit = connect()?;
            kit.stake(&amount, lst.as_deref()).await
        }
        Command::Unstake { amount, lst } => {
            let kit = connect()?;
            kit.unstake(&amount, lst.as_deref()).await
        }
        Command::Price { ticker } => {
            let kit = connect()?;
            price_output(kit.price(&ticker).await?)
        }
        Command::WalletAddress => connect()?.wallet_address(),
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let paths = KitPaths::discover()?;
    std::fs::create_dir_all(&paths.data_dir).context("create data dir")?;
    let _log_guard = init_logging(&paths);

    match run(cli, &paths).await {
        Ok(v) => emit(&v),
        Err(e) => {
            let err = ToolError::from_report(&e);
            emit(&json!({ "status": "error", "error": err }))?;
            Err(e)
        }
    }
}
