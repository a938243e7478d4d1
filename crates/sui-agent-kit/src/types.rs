use eyre::Context as _;
use serde::{Serialize, Serializer};
use std::fmt;

pub const SUI_ADDRESS_LENGTH: usize = 32;

/// Short alias of the native coin type.
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";
/// Fully expanded native coin type.
pub const SUI_COIN_TYPE_FULL: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI";

/// Whether `coin_type` names the native gas coin.
///
/// Only the two canonical spellings match; other paddings of `0x2` are treated as
/// ordinary coin types.
pub fn is_native_coin_type(coin_type: &str) -> bool {
    coin_type == SUI_COIN_TYPE || coin_type == SUI_COIN_TYPE_FULL
}

/// A 32-byte account (or object) address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SuiAddress([u8; SUI_ADDRESS_LENGTH]);

/// Object ids share the address representation.
pub type ObjectId = SuiAddress;

impl SuiAddress {
    pub const ZERO: Self = Self([0_u8; SUI_ADDRESS_LENGTH]);

    pub const fn new(bytes: [u8; SUI_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; SUI_ADDRESS_LENGTH] {
        &self.0
    }

    /// Parse `0x`-prefixed hex, accepting short forms such as `0x2` (left-padded with zeros).
    pub fn from_hex_literal(s: &str) -> eyre::Result<Self> {
        let s = s.trim();
        let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) else {
            eyre::bail!("address must start with 0x: {s}");
        };
        if digits.is_empty() || digits.len() > SUI_ADDRESS_LENGTH * 2 {
            eyre::bail!("address must have 1..=64 hex digits: {s}");
        }
        let padded = format!("{digits:0>width$}", width = SUI_ADDRESS_LENGTH * 2);
        let mut out = [0_u8; SUI_ADDRESS_LENGTH];
        hex::decode_to_slice(&padded, &mut out).with_context(|| format!("decode address {s}"))?;
        Ok(Self(out))
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl std::str::FromStr for SuiAddress {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex_literal(s)
    }
}

/// Object content digest. Base58 in JSON-RPC, length-prefixed bytes on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectDigest([u8; 32]);

impl ObjectDigest {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn from_base58(s: &str) -> eyre::Result<Self> {
        let v = bs58::decode(s.trim())
            .into_vec()
            .with_context(|| format!("decode digest {s}"))?;
        let bytes = <[u8; 32]>::try_from(v.as_slice())
            .map_err(|e| eyre::eyre!("digest {s} must be 32 bytes: {e}"))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectDigest({self})")
    }
}

impl Serialize for ObjectDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

/// `(id, version, digest)`; serialized field-by-field like a tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectRef {
    pub object_id: ObjectId,
    pub version: u64,
    pub digest: ObjectDigest,
}

/// An owned coin object together with its balance in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinRef {
    pub object_ref: ObjectRef,
    pub balance: u64,
}

impl CoinRef {
    pub const fn object_id(&self) -> ObjectId {
        self.object_ref.object_id
    }
}
