//! # Swapline AMM Library - Exact Swap Arithmetic
//!
//! ## Purpose
//!
//! Integer arithmetic for quoting swaps against Uniswap-style pools. The
//! constant-product formula reproduces the V2 pair contract bit for bit,
//! slippage floors and unit conversions never pass through a float, and the
//! V3 fee tiers are modelled as a closed enum.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Reserves read from pair contracts, user-entered amounts
//! - **Output Destinations**: The quoting service and the swap parameter builder
//! - **Protocol Support**: Uniswap V2 (and forks using the 997/1000 fee), Uniswap V3 fee tiers
//! - **Precision**: `U256` base units end to end; `Decimal` only for display percentages
//!
//! ## Architecture Role
//!
//! Pure leaf crate with no I/O. Everything that touches a chain lives in the
//! adapter and quoter crates and calls down into this one.
//!
//! See [`architecture_diagram()`] for the data flow.

pub mod constant_product;
pub mod error;
pub mod fee_tier;
pub mod slippage;
pub mod units;

pub use constant_product::{ConstantProductMath, ConstantProductPool, FeeRatio, PairReserves};
pub use error::{AmmError, Result};
pub use fee_tier::FeeTier;
pub use slippage::{SlippageTolerance, BPS_DENOMINATOR};
pub use units::{format_units, parse_units, QuoteInput, UnitsError};

/// Common types for AMM calculations
pub use ethereum_types::U256;
pub use rust_decimal::Decimal;

/// Architecture diagram showing how amounts flow through the AMM library
#[cfg_attr(doc, aquamarine::aquamarine)]
/// ```mermaid
/// graph LR
///     subgraph Input["Input"]
///         TXT[Amount text]
///         RES[Pair reserves]
///         TIER[Fee tier]
///     end
///
///     subgraph Math["AMM Mathematics"]
///         PU[parse_units]
///         CP[ConstantProductMath]
///         SL[SlippageTolerance]
///     end
///
///     subgraph Output["Output"]
///         OUT[amountOut]
///         MIN[minAmountOut]
///         FMT[format_units]
///     end
///
///     TXT --> PU
///     PU --> CP
///     RES --> CP
///     CP --> OUT
///     OUT --> SL
///     TIER --> SL
///     SL --> MIN
///     OUT --> FMT
/// ```
pub fn architecture_diagram() {
    // Rendered by aquamarine in rustdoc
}
