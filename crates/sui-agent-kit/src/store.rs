use crate::{
    config::{KitConfig, Network},
    paths::KitPaths,
};
use eyre::Context as _;
use std::{fs, path::PathBuf};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

/// Helper: if an env var is set and non-empty, apply `setter` with the trimmed value.
fn apply_env(var: &str, setter: impl FnOnce(&str)) {
    if let Ok(u) = std::env::var(var) {
        let t = u.trim();
        if !t.is_empty() {
            setter(t);
        }
    }
}

/// Apply environment variable overrides to the config.
fn apply_env_overrides(cfg: &mut KitConfig) {
    apply_env("SUI_AGENT_NETWORK", |v| match Network::parse(v) {
        Some(n) => cfg.network = n,
        None => warn!(value = v, "ignoring unknown SUI_AGENT_NETWORK"),
    });
    apply_env("SUI_AGENT_RPC_URL", |v| {
        cfg.rpc.url = Some(v.to_owned());
    });
    apply_env("SUI_AGENT_HERMES_URL", |v| {
        v.clone_into(&mut cfg.pyth.hermes_url);
    });
    apply_env("SUI_AGENT_GAS_BUDGET", |v| match v.parse::<u64>() {
        Ok(n) if n > 0 => cfg.gas.fixed_budget = Some(n),
        Ok(_) | Err(_) => warn!(value = v, "ignoring invalid SUI_AGENT_GAS_BUDGET"),
    });
}

impl ConfigStore {
    pub fn new(paths: &KitPaths) -> Self {
        Self {
            path: paths.config_file(),
        }
    }

    /// Read `config.toml` (defaults when absent) and layer env overrides on top.
    pub fn load(&self) -> eyre::Result<KitConfig> {
        let mut cfg = if self.path.exists() {
            let s = fs::read_to_string(&self.path).context("read config.toml")?;
            toml::from_str(&s).context("parse config.toml")?
        } else {
            KitConfig::default()
        };
        apply_env_overrides(&mut cfg);
        Ok(cfg)
    }
}
