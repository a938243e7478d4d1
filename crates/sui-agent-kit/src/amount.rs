use crate::chain::ChainClient;
use crate::errors::KitError;
use rust_decimal::Decimal;

fn invalid(msg: impl Into<String>) -> eyre::Report {
    KitError::InvalidAmount(msg.into()).into()
}

/// Parse a human-readable amount such as `"1.5"`. Rejects zero and negatives.
pub fn parse_human_amount(s: &str) -> eyre::Result<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return Err(invalid("empty amount"));
    }
    let d: Decimal = s
        .parse()
        .map_err(|e| invalid(format!("{s:?} is not a decimal number: {e}")))?;
    if d <= Decimal::ZERO {
        return Err(invalid(format!("amount must be positive, got {s}")));
    }
    Ok(d)
}

/// `round_half_away_from_zero(human * 10^decimals)`, computed on the decimal's mantissa.
pub fn scale_to_base_units(human: Decimal, decimals: u8) -> eyre::Result<u128> {
    if human <= Decimal::ZERO {
        return Err(invalid(format!("amount must be positive, got {human}")));
    }
    let mantissa = u128::try_from(human.mantissa())
        .map_err(|e| invalid(format!("amount {human} out of range: {e}")))?;
    let scale = human.scale();
    let decimals = u32::from(decimals);
    let too_large = || invalid(format!("amount {human} too large for {decimals} decimals"));

    let base = if decimals >= scale {
        let factor = 10_u128
            .checked_pow(decimals.saturating_sub(scale))
            .ok_or_else(too_large)?;
        mantissa.checked_mul(factor).ok_or_else(too_large)?
    } else {
        // scale <= 28, so the divisor always fits
        let divisor = 10_u128
            .checked_pow(scale.saturating_sub(decimals))
            .ok_or_else(too_large)?;
        let q = mantissa / divisor;
        let r = mantissa % divisor;
        if r.saturating_mul(2) >= divisor {
            q.saturating_add(1)
        } else {
            q
        }
    };

    if base == 0 {
        return Err(invalid(format!(
            "amount {human} is below the smallest unit for {decimals} decimals"
        )));
    }
    Ok(base)
}

/// Convert a human amount of `coin_type` into integer base units using the coin's metadata.
pub async fn to_base_units<C: ChainClient + ?Sized>(
    client: &C,
    human: Decimal,
    coin_type: &str,
) -> eyre::Result<u128> {
    let meta = client
        .coin_metadata(coin_type)
        .await
        .map_err(|e| KitError::MetadataFetchFailed(format!("{e:#}")))?
        .ok_or_else(|| KitError::InvalidCoinType(coin_type.to_owned()))?;
    scale_to_base_units(human, meta.decimals)
}

/// Like [`to_base_units`], but for amounts that must fit a single coin (`u64`).
pub async fn to_coin_units<C: ChainClient + ?Sized>(
    client: &C,
    human: Decimal,
    coin_type: &str,
) -> eyre::Result<u64> {
    let base = to_base_units(client, human, coin_type).await?;
    u64::try_from(base).map_err(|e| invalid(format!("amount {human} exceeds coin capacity: {e}")))
}

/// Format a base-unit integer amount into a UI decimal string without using floats.
///
/// Examples:
/// - base=1500000, decimals=6 => "1.5"
/// - base=1, decimals=6 => "0.000001"
pub fn format_amount_base_to_ui_string(base: u128, decimals: u32) -> eyre::Result<String> {
    if decimals == 0 {
        return Ok(base.to_string());
    }
    let scale = 10_u128
        .checked_pow(decimals)
        .ok_or_else(|| eyre::eyre!("decimals too large"))?;
    let whole = base / scale;
    let frac = base % scale;
    if frac == 0 {
        return Ok(whole.to_string());
    }
    let width = usize::try_from(decimals)?;
    let mut frac_s = format!("{frac:0width$}");
    while frac_s.ends_with('0') {
        frac_s.pop();
    }
    Ok(format!("{whole}.{frac_s}"))
}
