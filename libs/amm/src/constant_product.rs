//! Uniswap V2 constant-product math with exact integer arithmetic
//!
//! Mirrors the pair contract's `getAmountOut` / `getAmountIn` formulas.
//! Every intermediate value stays in `U256` so results match the chain
//! to the last base unit.

use crate::error::{AmmError, Result};
use crate::slippage::BPS_DENOMINATOR;
use ethereum_types::U256;
use rust_decimal::Decimal;

/// Fee charged by a pair, expressed as the retained share of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeRatio {
    pub numerator: u32,
    pub denominator: u32,
}

impl FeeRatio {
    /// Standard Uniswap V2 fee: 0.3% (997/1000 of the input is swapped)
    pub const STANDARD: FeeRatio = FeeRatio {
        numerator: 997,
        denominator: 1000,
    };

    /// Fee in basis points (30 = 0.3%)
    pub fn fee_bps(&self) -> u32 {
        (self.denominator - self.numerator) * BPS_DENOMINATOR / self.denominator
    }
}

impl Default for FeeRatio {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Reserves exactly as returned by `getReserves()`, in pair order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PairReserves {
    pub reserve0: U256,
    pub reserve1: U256,
}

impl PairReserves {
    pub fn new(reserve0: U256, reserve1: U256) -> Self {
        Self { reserve0, reserve1 }
    }

    /// True for a created but never funded pair
    pub fn is_empty(&self) -> bool {
        self.reserve0.is_zero() && self.reserve1.is_zero()
    }

    /// Orient reserves as `(reserve_in, reserve_out)` for a swap direction
    pub fn oriented(&self, token_in_is_token0: bool) -> (U256, U256) {
        if token_in_is_token0 {
            (self.reserve0, self.reserve1)
        } else {
            (self.reserve1, self.reserve0)
        }
    }
}

/// Pool reserves oriented for one swap direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantProductPool {
    pub reserve_in: U256,
    pub reserve_out: U256,
    pub fee: FeeRatio,
}

impl ConstantProductPool {
    pub fn new(reserve_in: U256, reserve_out: U256) -> Self {
        Self {
            reserve_in,
            reserve_out,
            fee: FeeRatio::STANDARD,
        }
    }

    pub fn get_amount_out(&self, amount_in: U256) -> Result<U256> {
        ConstantProductMath::get_amount_out(amount_in, self.reserve_in, self.reserve_out, self.fee)
    }

    pub fn get_amount_in(&self, amount_out: U256) -> Result<U256> {
        ConstantProductMath::get_amount_in(amount_out, self.reserve_in, self.reserve_out, self.fee)
    }
}

/// V2 AMM math functions with zero precision loss
pub struct ConstantProductMath;

impl ConstantProductMath {
    /// Calculate exact output amount using the x*y=k formula
    ///
    /// ```text
    /// amount_in_with_fee = amount_in * 997
    /// amount_out = amount_in_with_fee * reserve_out / (reserve_in * 1000 + amount_in_with_fee)
    /// ```
    ///
    /// The division floors, exactly like the pair contract.
    pub fn get_amount_out(
        amount_in: U256,
        reserve_in: U256,
        reserve_out: U256,
        fee: FeeRatio,
    ) -> Result<U256> {
        let amount_in_with_fee = amount_in
            .checked_mul(U256::from(fee.numerator))
            .ok_or(AmmError::Overflow("amount_in * fee"))?;
        let numerator = amount_in_with_fee
            .checked_mul(reserve_out)
            .ok_or(AmmError::Overflow("numerator"))?;
        let denominator = reserve_in
            .checked_mul(U256::from(fee.denominator))
            .and_then(|scaled| scaled.checked_add(amount_in_with_fee))
            .ok_or(AmmError::Overflow("denominator"))?;

        if denominator.is_zero() {
            return Err(AmmError::ZeroDenominator);
        }

        Ok(numerator / denominator)
    }

    /// Calculate required input amount for a desired output (reverse calculation)
    ///
    /// Rounds up by one base unit so the input always suffices.
    pub fn get_amount_in(
        amount_out: U256,
        reserve_in: U256,
        reserve_out: U256,
        fee: FeeRatio,
    ) -> Result<U256> {
        if amount_out.is_zero() {
            return Err(AmmError::ZeroAmount);
        }
        if amount_out >= reserve_out {
            return Err(AmmError::InsufficientLiquidity);
        }

        let numerator = reserve_in
            .checked_mul(amount_out)
            .and_then(|v| v.checked_mul(U256::from(fee.denominator)))
            .ok_or(AmmError::Overflow("numerator"))?;
        let denominator = (reserve_out - amount_out)
            .checked_mul(U256::from(fee.numerator))
            .ok_or(AmmError::Overflow("denominator"))?;

        if denominator.is_zero() {
            return Err(AmmError::ZeroDenominator);
        }

        (numerator / denominator)
            .checked_add(U256::one())
            .ok_or(AmmError::Overflow("amount_in"))
    }

    /// Price impact of a trade in basis points, fee excluded
    ///
    /// Compares the mid price before the trade with the mid price after it:
    /// `1 - (new_out / new_in) / (reserve_out / reserve_in)`.
    pub fn price_impact_bps(amount_in: U256, reserve_in: U256, reserve_out: U256) -> Result<u32> {
        if amount_in.is_zero() {
            return Err(AmmError::ZeroAmount);
        }
        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(AmmError::InsufficientLiquidity);
        }

        let no_fee = FeeRatio {
            numerator: 1,
            denominator: 1,
        };
        let amount_out = Self::get_amount_out(amount_in, reserve_in, reserve_out, no_fee)?;

        let new_reserve_in = reserve_in
            .checked_add(amount_in)
            .ok_or(AmmError::Overflow("reserve_in"))?;
        let new_reserve_out = reserve_out - amount_out;

        let after = new_reserve_out
            .checked_mul(reserve_in)
            .and_then(|v| v.checked_mul(U256::from(BPS_DENOMINATOR)))
            .ok_or(AmmError::Overflow("price after"))?;
        let before = new_reserve_in
            .checked_mul(reserve_out)
            .ok_or(AmmError::Overflow("price before"))?;

        let retained_bps = (after / before).min(U256::from(BPS_DENOMINATOR));
        Ok(BPS_DENOMINATOR - retained_bps.as_u32())
    }

    /// Price impact as a percentage (e.g. 1.25 for 125 bps)
    pub fn price_impact_percent(amount_in: U256, reserve_in: U256, reserve_out: U256) -> Result<Decimal> {
        let bps = Self::price_impact_bps(amount_in, reserve_in, reserve_out)?;
        Ok(Decimal::new(bps as i64, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    #[test]
    fn test_amount_out_matches_pair_formula() {
        // floor((10*997*2000)/(1000*1000+10*997)) = floor(19940000/1009970) = 19
        let out = ConstantProductMath::get_amount_out(u(10), u(1000), u(2000), FeeRatio::STANDARD)
            .unwrap();
        assert_eq!(out, u(19));
    }

    #[test]
    fn test_amount_out_eighteen_decimal_reserves() {
        // 1 WETH into a 100 WETH / 300_000 USDC pair
        let one_eth = U256::exp10(18);
        let reserve_in = U256::exp10(20);
        let reserve_out = u(300_000) * U256::exp10(6);

        let out = ConstantProductMath::get_amount_out(one_eth, reserve_in, reserve_out, FeeRatio::STANDARD)
            .unwrap();

        // 997e18 * 3e11 / (1e20 * 1000 + 997e18), floored
        assert_eq!(out, u(2_961_474_103));
    }

    #[test]
    fn test_zero_input_yields_zero() {
        let out = ConstantProductMath::get_amount_out(U256::zero(), u(1000), u(2000), FeeRatio::STANDARD)
            .unwrap();
        assert!(out.is_zero());
    }

    #[test]
    fn test_empty_pool_has_zero_denominator() {
        let err = ConstantProductMath::get_amount_out(U256::zero(), U256::zero(), u(2000), FeeRatio::STANDARD)
            .unwrap_err();
        assert_eq!(err, AmmError::ZeroDenominator);
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = ConstantProductMath::get_amount_out(U256::MAX, u(1), u(1), FeeRatio::STANDARD).unwrap_err();
        assert!(matches!(err, AmmError::Overflow(_)));
    }

    #[test]
    fn test_amount_in_round_trip_covers_output() {
        let pool = ConstantProductPool::new(u(1_000_000), u(2_000_000));
        let needed = pool.get_amount_in(u(19_000)).unwrap();
        assert!(pool.get_amount_out(needed).unwrap() >= u(19_000));
        assert!(pool.get_amount_out(needed - 1).unwrap() < u(19_000));
    }

    #[test]
    fn test_amount_in_rejects_draining_output() {
        let err = ConstantProductMath::get_amount_in(u(2000), u(1000), u(2000), FeeRatio::STANDARD)
            .unwrap_err();
        assert_eq!(err, AmmError::InsufficientLiquidity);
    }

    #[test]
    fn test_reserve_orientation() {
        let reserves = PairReserves::new(u(1), u(2));
        assert_eq!(reserves.oriented(true), (u(1), u(2)));
        assert_eq!(reserves.oriented(false), (u(2), u(1)));
        assert!(!reserves.is_empty());
        assert!(PairReserves::default().is_empty());
    }

    #[test]
    fn test_standard_fee_bps() {
        assert_eq!(FeeRatio::STANDARD.fee_bps(), 30);
    }

    #[test]
    fn test_price_impact() {
        // 10% of reserves moves the mid price by ~17.3%
        let bps = ConstantProductMath::price_impact_bps(u(100), u(1000), u(2000)).unwrap();
        assert_eq!(bps, 1732);

        let pct = ConstantProductMath::price_impact_percent(u(100), u(1000), u(2000)).unwrap();
        assert_eq!(pct, dec!(17.32));

        // floor division leaves at most one bp of noise on dust trades
        let dust = ConstantProductMath::price_impact_bps(u(1), u(1_000_000), u(1_000_000)).unwrap();
        assert!(dust <= 1);
    }

    proptest! {
        #[test]
        fn prop_fee_reduces_output_and_stays_positive(
            amount_in in 1u64..1_000_000_000u64,
            reserve_in in 1u64..100_000u64,
            reserve_out in 1_000_000u64..1_000_000_000_000u64,
        ) {
            let out = ConstantProductMath::get_amount_out(
                u(amount_in), u(reserve_in), u(reserve_out), FeeRatio::STANDARD,
            ).unwrap();

            prop_assert!(out > U256::zero());
            // out < amount_in * reserve_out / reserve_in, compared without division
            prop_assert!(out * u(reserve_in) < u(amount_in) * u(reserve_out));
            prop_assert!(out < u(reserve_out));
        }

        #[test]
        fn prop_output_is_monotonic_in_input(
            amount_a in 0u64..1_000_000_000_000u64,
            delta in 0u64..1_000_000_000u64,
            reserve_in in 1u64..u64::MAX,
            reserve_out in 1u64..u64::MAX,
        ) {
            let smaller = ConstantProductMath::get_amount_out(
                u(amount_a), u(reserve_in), u(reserve_out), FeeRatio::STANDARD,
            ).unwrap();
            let larger = ConstantProductMath::get_amount_out(
                u(amount_a) + u(delta), u(reserve_in), u(reserve_out), FeeRatio::STANDARD,
            ).unwrap();

            prop_assert!(larger >= smaller);
        }
    }
}
