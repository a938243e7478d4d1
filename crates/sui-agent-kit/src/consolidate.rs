use crate::ptb::{Argument, TransactionDraft};
use crate::types::{is_native_coin_type, CoinRef};

/// Produce one coin handle for `coin_type` inside `draft`.
///
/// The native coin is always the gas coin (nothing is merged, `coins` is ignored). Other
/// coins are merged into the first selected object when more than one was selected.
pub fn consolidate(
    draft: &mut TransactionDraft,
    coin_type: &str,
    coins: &[CoinRef],
) -> eyre::Result<Argument> {
    if is_native_coin_type(coin_type) {
        return Ok(Argument::GasCoin);
    }

    let Some((first, rest)) = coins.split_first() else {
        eyre::bail!("no {coin_type} coins to consolidate");
    };
    let primary = draft.object(first.object_ref)?;
    if !rest.is_empty() {
        let sources = rest
            .iter()
            .map(|c| draft.object(c.object_ref))
            .collect::<eyre::Result<Vec<_>>>()?;
        draft.merge_coins(primary, sources)?;
    }
    Ok(primary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ptb::Command;
    use crate::testing::coin;
    use crate::types::{SUI_COIN_TYPE, SUI_COIN_TYPE_FULL};

    #[test]
    fn native_coin_short_circuits_to_gas() -> eyre::Result<()> {
        for ty in [SUI_COIN_TYPE, SUI_COIN_TYPE_FULL] {
            let mut d = TransactionDraft::new();
            let h = consolidate(&mut d, ty, &[coin(1, 5), coin(2, 6)])?;
            assert_eq!(h, Argument::GasCoin);
            assert!(d.commands().is_empty(), "no merge for native coin");
            assert!(d.inputs().is_empty(), "no inputs for native coin");
        }
        Ok(())
    }

    #[test]
    fn single_coin_is_used_as_is() -> eyre::Result<()> {
        let mut d = TransactionDraft::new();
        let h = consolidate(&mut d, "0xa::c::C", &[coin(1, 5)])?;
        assert_eq!(h, Argument::Input(0));
        assert!(d.commands().is_empty(), "single coin needs no merge");
        Ok(())
    }

    #[test]
    fn several_coins_merge_into_the_first() -> eyre::Result<()> {
        let mut d = TransactionDraft::new();
        let h = consolidate(&mut d, "0xa::c::C", &[coin(1, 50), coin(2, 30), coin(3, 10)])?;
        assert_eq!(h, Argument::Input(0));
        assert_eq!(
            d.commands(),
            &[Command::MergeCoins(
                Argument::Input(0),
                vec![Argument::Input(1), Argument::Input(2)]
            )]
        );
        Ok(())
    }

    #[test]
    fn empty_selection_for_non_native_coin_is_an_error() {
        let mut d = TransactionDraft::new();
        assert!(consolidate(&mut d, "0xa::c::C", &[]).is_err());
    }
}
