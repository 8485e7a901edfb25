//! Slippage tolerance and minimum-output floors

use crate::error::{AmmError, Result};
use ethereum_types::U256;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Basis points in 100%
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Maximum acceptable shortfall between quoted and executed output
///
/// Always in `[0, 10_000)` basis points: a 100% tolerance would let the
/// minimum output fall to zero, which is never a meaningful floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SlippageTolerance {
    bps: u32,
}

impl SlippageTolerance {
    /// 0.5%, the usual interface default
    pub const DEFAULT: SlippageTolerance = SlippageTolerance { bps: 50 };

    pub fn from_bps(bps: u32) -> Result<Self> {
        if bps >= BPS_DENOMINATOR {
            return Err(AmmError::InvalidSlippage {
                value: format!("{} bps", bps),
            });
        }
        Ok(Self { bps })
    }

    /// Build from a percentage such as `0.5`
    ///
    /// The retained share is `floor((100 - percent) * 100)` bps, so
    /// fractional basis points round the tolerance up.
    pub fn from_percent(percent: Decimal) -> Result<Self> {
        let invalid = || AmmError::InvalidSlippage {
            value: format!("{}%", percent),
        };

        if percent.is_sign_negative() || percent >= Decimal::ONE_HUNDRED {
            return Err(invalid());
        }

        let retained = ((Decimal::ONE_HUNDRED - percent) * Decimal::ONE_HUNDRED)
            .floor()
            .to_u32()
            .ok_or_else(invalid)?;

        Self::from_bps(BPS_DENOMINATOR - retained)
    }

    pub fn bps(&self) -> u32 {
        self.bps
    }

    pub fn percent(&self) -> Decimal {
        Decimal::new(self.bps as i64, 2)
    }

    /// `floor(amount_out * (10_000 - bps) / 10_000)`
    pub fn minimum_output(&self, amount_out: U256) -> Result<U256> {
        let retained = U256::from(BPS_DENOMINATOR - self.bps);
        let scaled = amount_out
            .checked_mul(retained)
            .ok_or(AmmError::Overflow("minimum output"))?;
        Ok(scaled / U256::from(BPS_DENOMINATOR))
    }
}

impl Default for SlippageTolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for SlippageTolerance {
    type Error = AmmError;

    fn try_from(bps: u32) -> Result<Self> {
        Self::from_bps(bps)
    }
}

impl From<SlippageTolerance> for u32 {
    fn from(tolerance: SlippageTolerance) -> u32 {
        tolerance.bps
    }
}
