//! Pyth Hermes price feeds: ticker → feed id → latest price and EMA price.

use crate::http::{client, ensure_https_or_loopback, DEFAULT_TIMEOUT};
use eyre::Context as _;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct FeedAttributes {
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub symbol: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedInfo {
    pub id: String,
    pub attributes: FeedAttributes,
}

#[derive(Debug, Deserialize)]
struct RawPrice {
    price: String,
    expo: i32,
}

#[derive(Debug, Deserialize)]
struct ParsedUpdate {
    price: RawPrice,
    ema_price: RawPrice,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    parsed: Vec<ParsedUpdate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub ticker: String,
    pub feed_id: String,
    /// Decimal strings; never rounded through floats.
    pub price: String,
    pub ema_price: String,
}

/// Choose the feed for `ticker`: the only result, or the one whose base asset matches exactly.
pub fn pick_feed(ticker: &str, feeds: &[FeedInfo]) -> eyre::Result<String> {
    match feeds {
        [] => eyre::bail!("no price feed found for {ticker} on Pyth"),
        [only] => Ok(only.id.clone()),
        many => many
            .iter()
            .find(|f| f.attributes.base.eq_ignore_ascii_case(ticker))
            .map(|f| f.id.clone())
            .ok_or_else(|| eyre::eyre!("no price feed found for {ticker} on Pyth")),
    }
}

/// `raw × 10^expo`, exactly.
pub fn scale_price(raw: &str, expo: i32) -> eyre::Result<Decimal> {
    let raw: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("parse pyth price {raw:?}"))?;
    let out = if expo < 0 {
        Decimal::try_from_i128_with_scale(i128::from(raw), expo.unsigned_abs())
            .context("pyth exponent out of range")?
    } else {
        let factor = 10_i64
            .checked_pow(expo.unsigned_abs())
            .ok_or_else(|| eyre::eyre!("pyth exponent {expo} out of range"))?;
        Decimal::from(raw)
            .checked_mul(Decimal::from(factor))
            .ok_or_else(|| eyre::eyre!("pyth price overflow"))?
    };
    Ok(out.normalize())
}

#[derive(Debug, Clone)]
pub struct PythClient {
    base_url: String,
    http: Client,
}

impl PythClient {
    pub fn new(hermes_url: &str) -> eyre::Result<Self> {
        ensure_https_or_loopback(hermes_url, "pyth.hermes_url")?;
        Ok(Self {
            base_url: hermes_url.trim().trim_end_matches('/').to_owned(),
            http: client(DEFAULT_TIMEOUT)?,
        })
    }

    pub async fn feed_id(&self, ticker: &str) -> eyre::Result<String> {
        let url = format!("{}/v2/price_feeds", self.base_url);
        let feeds: Vec<FeedInfo> = self
            .http
            .get(url)
            .query(&[("query", ticker), ("asset_type", "crypto")])
            .send()
            .await
            .context("pyth price_feeds request")?
            .error_for_status()
            .context("pyth price_feeds status")?
            .json()
            .await
            .context("pyth price_feeds json")?;
        debug!(ticker, matches = feeds.len(), "pyth feed lookup");
        pick_feed(ticker, &feeds)
    }

    /// Latest `(price, ema_price)` for a feed.
    pub async fn latest(&self, feed_id: &str) -> eyre::Result<(Decimal, Decimal)> {
        let url = format!("{}/v2/updates/price/latest", self.base_url);
        let resp: LatestResponse = self
            .http
            .get(url)
            .query(&[("ids[]", feed_id)])
            .send()
            .await
            .context("pyth latest price request")?
            .error_for_status()
            .context("pyth latest price status")?
            .json()
            .await
            .context("pyth latest price json")?;
        let Some(update) = resp.parsed.first() else {
            eyre::bail!("no price data found for {feed_id}");
        };
        Ok((
            scale_price(&update.price.price, update.price.expo)?,
            scale_price(&update.ema_price.price, update.ema_price.expo)?,
        ))
    }

    pub async fn quote(&self, ticker: &str) -> eyre::Result<PriceQuote> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            eyre::bail!("ticker is required");
        }
        let feed_id = self.feed_id(ticker).await?;
        let (price, ema) = self.latest(&feed_id).await?;
        Ok(PriceQuote {
            ticker: ticker.to_uppercase(),
            feed_id,
            price: price.to_string(),
            ema_price: ema.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(id: &str, base: &str) -> FeedInfo {
        FeedInfo {
            id: id.into(),
            attributes: FeedAttributes {
                base: base.into(),
                symbol: format!("Crypto.{base}/USD"),
            },
        }
    }

    #[test]
    fn negative_exponent_divides() -> eyre::Result<()> {
        assert_eq!(scale_price("123456", -2)?.to_string(), "1234.56");
        assert_eq!(scale_price("345612345", -8)?.to_string(), "3.45612345");
        Ok(())
    }

    #[test]
    fn non_negative_exponent_multiplies() -> eyre::Result<()> {
        assert_eq!(scale_price("42", 0)?.to_string(), "42");
        assert_eq!(scale_price("42", 3)?.to_string(), "42000");
        Ok(())
    }

    #[test]
    fn garbage_price_is_an_error() {
        assert!(scale_price("1.5e3", -2).is_err());
    }

    #[test]
    fn single_match_is_taken_as_is() -> eyre::Result<()> {
        assert_eq!(pick_feed("sui", &[feed("abc", "SUI")])?, "abc");
        assert_eq!(pick_feed("anything", &[feed("xyz", "OTHER")])?, "xyz");
        Ok(())
    }

    #[test]
    fn several_matches_need_an_exact_base() -> eyre::Result<()> {
        let feeds = [feed("1", "SUIP"), feed("2", "SUI"), feed("3", "ASUI")];
        assert_eq!(pick_feed("sui", &feeds)?, "2");
        assert!(pick_feed("deep", &feeds).is_err());
        assert!(pick_feed("sui", &[]).is_err());
        Ok(())
    }

    #[test]
    fn rejects_plain_http_endpoints() {
        assert!(PythClient::new("http://hermes.pyth.network").is_err());
    }
}
