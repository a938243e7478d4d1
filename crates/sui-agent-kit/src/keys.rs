//! Ed25519 signing for Sui transactions.
//!
//! Keys are only held in memory; loading them from storage is the caller's concern.

use crate::types::SuiAddress;
use base64::Engine as _;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest as _};
use ed25519_dalek::{Signer as _, SigningKey};
use eyre::Context as _;
use secrecy::{ExposeSecret as _, SecretString};
use std::fmt;
use zeroize::Zeroizing;

type Blake2b256 = Blake2b<U32>;

const ED25519_FLAG: u8 = 0x00;
const BECH32_HRP: &str = "suiprivkey";
/// `[scope = TransactionData, version = V0, app = Sui]`
const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

pub fn blake2b256(parts: &[&[u8]]) -> [u8; 32] {
    let mut h = Blake2b256::new();
    for p in parts {
        h.update(p);
    }
    h.finalize().into()
}

pub struct SuiKeypair {
    signing: SigningKey,
}

impl SuiKeypair {
    pub fn from_bytes(secret: &[u8; 32]) -> Self {
        Self {
            signing: SigningKey::from_bytes(secret),
        }
    }

    /// Accepts a `suiprivkey1…` Bech32 string, base64 of `flag || key` (or the bare key),
    /// or 32 bytes of hex.
    pub fn from_secret(secret: &SecretString) -> eyre::Result<Self> {
        let s = secret.expose_secret().trim();
        if s.is_empty() {
            eyre::bail!("empty private key");
        }

        let raw: Zeroizing<Vec<u8>> = if s.starts_with(BECH32_HRP) {
            let (hrp, data) = bech32::decode(s).context("decode bech32 private key")?;
            if hrp.as_str() != BECH32_HRP {
                eyre::bail!("unexpected bech32 prefix {}", hrp.as_str());
            }
            Zeroizing::new(data)
        } else if let Some(bytes) = decode_hex_key(s) {
            bytes
        } else {
            Zeroizing::new(
                base64::engine::general_purpose::STANDARD
                    .decode(s)
                    .context("private key is neither bech32, hex nor base64")?,
            )
        };

        let key: &[u8] = match raw.split_first() {
            Some((flag, rest)) if raw.len() == 33 => {
                if *flag != ED25519_FLAG {
                    eyre::bail!("unsupported key scheme flag {flag}; only ed25519 is supported");
                }
                rest
            }
            _ => raw.as_slice(),
        };
        let key = Zeroizing::new(
            <[u8; 32]>::try_from(key)
                .map_err(|e| eyre::eyre!("private key must be 32 bytes: {e}"))?,
        );
        Ok(Self::from_bytes(&key))
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing.verifying_key().to_bytes()
    }

    /// `blake2b256(flag || pubkey)`
    pub fn address(&self) -> SuiAddress {
        SuiAddress::new(blake2b256(&[&[ED25519_FLAG], &self.public_key_bytes()]))
    }

    /// Sign transaction bytes under the transaction intent and return the
    /// serialized signature (`base64(flag || sig || pubkey)`) the network expects.
    pub fn sign_transaction(&self, tx_bytes: &[u8]) -> String {
        let digest = blake2b256(&[&TRANSACTION_INTENT, tx_bytes]);
        let sig = self.signing.sign(&digest);
        let mut out = Vec::with_capacity(1 + 64 + 32);
        out.push(ED25519_FLAG);
        out.extend_from_slice(&sig.to_bytes());
        out.extend_from_slice(&self.public_key_bytes());
        base64::engine::general_purpose::STANDARD.encode(out)
    }
}

fn decode_hex_key(s: &str) -> Option<Zeroizing<Vec<u8>>> {
    let h = s.strip_prefix("0x").unwrap_or(s);
    if h.len() != 64 || !h.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    hex::decode(h).ok().map(Zeroizing::new)
}

impl fmt::Debug for SuiKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiKeypair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
