//! Pure predicates over address and coin-type strings.
//!
//! Nothing here fails loudly: invalid input yields `false` plus a warning in the log.

use crate::types::SUI_COIN_TYPE;
use tracing::warn;

const HEX_DIGITS: usize = 64;

fn is_segment(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// `0x` followed by exactly 64 hex digits.
fn is_full_hex(s: &str) -> bool {
    s.strip_prefix("0x")
        .is_some_and(|d| d.len() == HEX_DIGITS && d.bytes().all(|b| b.is_ascii_hexdigit()))
}

fn matches_address_pattern(s: &str) -> bool {
    let mut parts = s.split("::");
    let head_ok = parts.next().is_some_and(is_full_hex);
    head_ok && parts.all(is_segment)
}

/// Account address, object id, or a fully-qualified `addr::module::Name` path.
pub fn is_valid_address(s: &str) -> bool {
    if matches_address_pattern(s) {
        return true;
    }
    warn!(input = %s, "rejected address");
    false
}

/// Bare account address (no `::` segments); used for recipients and wallet connection.
pub fn is_valid_account_address(s: &str) -> bool {
    if is_full_hex(s) {
        return true;
    }
    warn!(input = %s, "rejected account address");
    false
}

/// Like [`is_valid_address`], but also accepts the short native coin alias.
pub fn is_valid_token_address(s: &str) -> bool {
    if s == SUI_COIN_TYPE {
        return true;
    }
    if matches_address_pattern(s) {
        return true;
    }
    warn!(input = %s, "rejected token address");
    false
}
