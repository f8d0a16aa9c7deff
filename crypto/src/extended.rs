//! Parsing of BIP-32 extended private keys (`xprv...`).
//!
//! Only the secret is extracted; chain codes and paths are not used by the
//! wallet.

use std::str::FromStr;

use bip32::XPrv;
use warden_types::PrivateKey;
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::keys::private_from_secret;

/// Parse a base58check `xprv` string into its private key.
pub fn parse_extended_private_key(encoded: &str) -> Result<PrivateKey, CryptoError> {
    let xprv = XPrv::from_str(encoded.trim())
        .map_err(|e| CryptoError::InvalidExtendedKey(e.to_string()))?;
    let secret: Zeroizing<[u8; 32]> = Zeroizing::new(xprv.private_key().to_bytes().into());
    private_from_secret(&secret)
}
