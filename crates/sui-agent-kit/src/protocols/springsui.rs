use super::LiquidStaking;
use crate::config::SpringSuiConfig;
use crate::errors::KitError;
use crate::ptb::{Argument, TransactionDraft};
use crate::type_tag::TypeTag;
use crate::types::{ObjectId, SuiAddress};
use eyre::Context as _;

/// `0x5`, the shared `SuiSystemState`.
pub const SUI_SYSTEM_STATE_OBJECT_ID: SuiAddress = {
    let mut b = [0_u8; 32];
    b[31] = 5;
    SuiAddress::new(b)
};
pub const SUI_SYSTEM_STATE_INITIAL_VERSION: u64 = 1;

const MODULE: &str = "liquid_staking";

#[derive(Debug, Clone)]
struct LstPool {
    coin_type: String,
    type_tag: TypeTag,
    info_id: ObjectId,
    info_initial_shared_version: u64,
}

/// `SpringSui` liquid staking: SUI in, LST out (and back) through `LiquidStakingInfo<P>`.
#[derive(Debug, Clone)]
pub struct SpringSui {
    package: ObjectId,
    pools: Vec<LstPool>,
}

impl SpringSui {
    pub fn from_config(cfg: &SpringSuiConfig) -> eyre::Result<Self> {
        let package = SuiAddress::from_hex_literal(&cfg.package).context("springsui package")?;
        let pools = cfg
            .lst
            .iter()
            .map(|l| {
                Ok(LstPool {
                    coin_type: l.coin_type.clone(),
                    type_tag: l
                        .coin_type
                        .parse()
                        .with_context(|| format!("lst coin type {}", l.coin_type))?,
                    info_id: SuiAddress::from_hex_literal(&l.info_object_id)
                        .context("liquid staking info id")?,
                    info_initial_shared_version: l.info_initial_shared_version,
                })
            })
            .collect::<eyre::Result<Vec<_>>>()?;
        if pools.is_empty() {
            eyre::bail!("springsui config lists no liquid staking tokens");
        }
        Ok(Self { package, pools })
    }

    fn pool(&self, coin_type: &str) -> eyre::Result<&LstPool> {
        self.pools
            .iter()
            .find(|p| p.coin_type == coin_type)
            .ok_or_else(|| {
                KitError::ProtocolUnavailable(format!("springsui does not serve {coin_type}"))
                    .into()
            })
    }

    fn shared_inputs(
        draft: &mut TransactionDraft,
        pool: &LstPool,
    ) -> eyre::Result<(Argument, Argument)> {
        let info = draft.shared_object(pool.info_id, pool.info_initial_shared_version, true)?;
        let system = draft.shared_object(
            SUI_SYSTEM_STATE_OBJECT_ID,
            SUI_SYSTEM_STATE_INITIAL_VERSION,
            true,
        )?;
        Ok((info, system))
    }
}

impl LiquidStaking for SpringSui {
    fn name(&self) -> &str {
        "springsui"
    }

    fn lst_coin_types(&self) -> Vec<String> {
        self.pools.iter().map(|p| p.coin_type.clone()).collect()
    }

    fn mint(
        &self,
        draft: &mut TransactionDraft,
        lst_coin_type: &str,
        sui: Argument,
    ) -> eyre::Result<Argument> {
        let pool = self.pool(lst_coin_type)?;
        let (info, system) = Self::shared_inputs(draft, pool)?;
        draft.move_call(
            self.package,
            MODULE,
            "mint",
            vec![pool.type_tag.clone()],
            vec![info, system, sui],
        )
    }

    fn redeem(
        &self,
        draft: &mut TransactionDraft,
        lst_coin_type: &str,
        lst: Argument,
    ) -> eyre::Result<Argument> {
        let pool = self.pool(lst_coin_type)?;
        let (info, system) = Self::shared_inputs(draft, pool)?;
        draft.move_call(
            self.package,
            MODULE,
            "redeem",
            vec![pool.type_tag.clone()],
            vec![info, lst, system],
        )
    }
}
