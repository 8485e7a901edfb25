//! Uniswap V3 fee tiers
//!
//! Fees are expressed in pips (hundredths of a basis point), the unit the
//! V3 contracts use for their `uint24 fee` arguments.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the fixed V3 fee tiers; ordering follows the fee size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FeeTier {
    /// 0.01%
    Lowest,
    /// 0.05%
    Low,
    /// 0.3%
    Medium,
    /// 1%
    High,
}

impl FeeTier {
    /// Every tier, lowest fee first
    pub const ALL: [FeeTier; 4] = [FeeTier::Lowest, FeeTier::Low, FeeTier::Medium, FeeTier::High];

    pub const fn pips(self) -> u32 {
        match self {
            FeeTier::Lowest => 100,
            FeeTier::Low => 500,
            FeeTier::Medium => 3000,
            FeeTier::High => 10_000,
        }
    }

    pub fn from_pips(pips: u32) -> Option<FeeTier> {
        Self::ALL.into_iter().find(|tier| tier.pips() == pips)
    }

    /// Fee as a percentage (0.05 for the 500-pip tier)
    pub fn percent(self) -> Decimal {
        Decimal::new(self.pips() as i64, 4)
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = String;

    fn try_from(pips: u32) -> Result<Self, Self::Error> {
        FeeTier::from_pips(pips).ok_or_else(|| format!("Unknown fee tier: {} pips", pips))
    }
}

impl From<FeeTier> for u32 {
    fn from(tier: FeeTier) -> u32 {
        tier.pips()
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent().normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tier_pips_and_order() {
        let pips: Vec<u32> = FeeTier::ALL.iter().map(|t| t.pips()).collect();
        assert_eq!(pips, vec![100, 500, 3000, 10_000]);
        assert!(FeeTier::Lowest < FeeTier::High);
    }

    #[test]
    fn test_from_pips() {
        assert_eq!(FeeTier::from_pips(3000), Some(FeeTier::Medium));
        assert_eq!(FeeTier::from_pips(2500), None);
        assert!(FeeTier::try_from(42u32).is_err());
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(FeeTier::Low.percent(), dec!(0.05));
        assert_eq!(FeeTier::Lowest.to_string(), "0.01%");
        assert_eq!(FeeTier::Medium.to_string(), "0.3%");
        assert_eq!(FeeTier::High.to_string(), "1%");
    }
}
