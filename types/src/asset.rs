//! Fungible amounts tagged with their symbol.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbol of the network's base asset, in which all fees are paid.
pub const BASE_SYMBOL: &str = "WDN";

/// Decimal places of the base asset.
pub const BASE_PRECISION: u32 = 6;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Amount in the smallest unit.
    pub amount: u64,
    pub symbol: String,
}

impl Asset {
    pub fn new(amount: u64, symbol: impl Into<String>) -> Self {
        Self {
            amount,
            symbol: symbol.into(),
        }
    }

    /// An amount of the base asset.
    pub fn base(amount: u64) -> Self {
        Self::new(amount, BASE_SYMBOL)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl Default for Asset {
    fn default() -> Self {
        Self::base(0)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = 10u64.pow(BASE_PRECISION);
        write!(
            f,
            "{}.{:0width$} {}",
            self.amount / scale,
            self.amount % scale,
            self.symbol,
            width = BASE_PRECISION as usize
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_fixed_precision() {
        assert_eq!(Asset::base(1_500_000).to_string(), "1.500000 WDN");
        assert_eq!(Asset::base(7).to_string(), "0.000007 WDN");
    }

    #[test]
    fn default_is_zero_base() {
        let a = Asset::default();
        assert!(a.is_zero());
        assert_eq!(a.symbol, BASE_SYMBOL);
    }
}
