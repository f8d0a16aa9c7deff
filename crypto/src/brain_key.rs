//! Brain keys: human-memorable phrases that seed a private key.
//!
//! A phrase is drawn from the BIP-39 English word list by repeatedly
//! reducing 512 bits of entropy modulo the list size. The phrase itself is
//! the secret; key derivation only ever sees its normalized form, so the
//! same words typed with different case or spacing recover the same key.

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Serialize;
use warden_types::PublicKey;
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::keys::{derive_private_key, key_to_wif, public_from_private};

/// Number of words in a generated brain key.
pub const BRAIN_KEY_WORD_COUNT: usize = 16;

/// A generated brain key together with the key it derives at index 0.
#[derive(Serialize)]
pub struct BrainKeyInfo {
    pub brain_priv_key: Zeroizing<String>,
    pub wif_priv_key: Zeroizing<String>,
    pub pub_key: PublicKey,
}

/// Uppercase ASCII letters and collapse every whitespace run to one space,
/// dropping leading and trailing whitespace.
pub fn normalize_brain_key(phrase: &str) -> String {
    let mut result = String::with_capacity(phrase.len());
    let mut pending_space = false;
    for c in phrase.chars() {
        if matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c') {
            pending_space = true;
            continue;
        }
        if pending_space && !result.is_empty() {
            result.push(' ');
        }
        pending_space = false;
        result.push(c.to_ascii_uppercase());
    }
    result
}

/// Select the phrase words from 512 bits of entropy.
pub fn brain_key_from_entropy(entropy: &[u8; 64]) -> Zeroizing<String> {
    let words = bip39::Language::English.word_list();
    let modulus = BigUint::from(words.len());
    let mut remaining = BigUint::from_bytes_be(entropy);
    let mut phrase = Zeroizing::new(String::new());
    for i in 0..BRAIN_KEY_WORD_COUNT {
        let choice = (&remaining % &modulus).to_usize().unwrap_or_default();
        remaining /= &modulus;
        if i > 0 {
            phrase.push(' ');
        }
        phrase.push_str(words[choice]);
    }
    Zeroizing::new(normalize_brain_key(&phrase))
}

/// Normalize `phrase` and derive its index-0 key.
pub fn brain_key_info(phrase: &str) -> Result<BrainKeyInfo, CryptoError> {
    let normalized = Zeroizing::new(normalize_brain_key(phrase));
    let private = derive_private_key(&normalized, 0)?;
    let pub_key = public_from_private(&private)?;
    Ok(BrainKeyInfo {
        wif_priv_key: key_to_wif(&private),
        brain_priv_key: normalized,
        pub_key,
    })
}

/// Generate a fresh brain key from two independent 256-bit random draws.
pub fn generate_brain_key() -> Result<BrainKeyInfo, CryptoError> {
    let mut entropy = Zeroizing::new([0u8; 64]);
    OsRng.fill_bytes(&mut entropy[..32]);
    OsRng.fill_bytes(&mut entropy[32..]);
    let phrase = brain_key_from_entropy(&entropy);
    brain_key_info(&phrase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::wif_to_key;

    #[test]
    fn normalize_collapses_whitespace_and_uppercases() {
        assert_eq!(
            normalize_brain_key("  abc\t def\n\nghi  "),
            "ABC DEF GHI"
        );
    }

    #[test]
    fn normalize_only_touches_ascii_letters() {
        assert_eq!(normalize_brain_key("über-1 x"), "üBER-1 X");
    }

    #[test]
    fn normalize_empty_and_blank() {
        assert_eq!(normalize_brain_key(""), "");
        assert_eq!(normalize_brain_key(" \t\n"), "");
    }

    #[test]
    fn zero_entropy_selects_first_word() {
        let phrase = brain_key_from_entropy(&[0u8; 64]);
        let words: Vec<&str> = phrase.split(' ').collect();
        assert_eq!(words.len(), BRAIN_KEY_WORD_COUNT);
        assert!(words.iter().all(|w| *w == "ABANDON"));
    }

    #[test]
    fn low_entropy_word_order_follows_selection() {
        // 1 + 2 * 2048: first word index 1, second index 2, rest index 0.
        let mut entropy = [0u8; 64];
        let value: u32 = 1 + 2 * 2048;
        entropy[60..].copy_from_slice(&value.to_be_bytes());
        let phrase = brain_key_from_entropy(&entropy);
        let words: Vec<&str> = phrase.split(' ').collect();
        assert_eq!(words[0], "ABILITY");
        assert_eq!(words[1], "ABLE");
        assert_eq!(words[2], "ABANDON");
    }

    #[test]
    fn generated_brain_key_is_consistent() {
        let info = generate_brain_key().unwrap();
        assert_eq!(info.brain_priv_key.split(' ').count(), BRAIN_KEY_WORD_COUNT);
        let again = brain_key_info(&info.brain_priv_key).unwrap();
        assert_eq!(again.pub_key, info.pub_key);
        let private = wif_to_key(&info.wif_priv_key).unwrap();
        assert_eq!(public_from_private(&private).unwrap(), info.pub_key);
    }

    #[test]
    fn case_and_spacing_do_not_change_key() {
        let a = brain_key_info("abc def ghi").unwrap();
        let b = brain_key_info("  ABC   def\tGHI ").unwrap();
        assert_eq!(a.pub_key, b.pub_key);
        assert_eq!(a.wif_priv_key, b.wif_priv_key);
    }
}
