//! Error types for AMM calculations

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    #[error("Input amount must be positive")]
    ZeroAmount,

    #[error("Insufficient liquidity: output exceeds reserves")]
    InsufficientLiquidity,

    #[error("Invalid calculation: denominator would be zero")]
    ZeroDenominator,

    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("Slippage tolerance {value} is outside [0%, 100%)")]
    InvalidSlippage { value: String },
}

pub type Result<T> = std::result::Result<T, AmmError>;
