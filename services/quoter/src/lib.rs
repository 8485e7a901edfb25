//! # Swapline Quoter
//!
//! Client-side DEX quoting for Uniswap V2 and V3 style deployments.
//!
//! ## Components
//!
//! - **Constant-product engine**: cached pair discovery, live reserves,
//!   exact `x * y = k` output with the 0.3% fee
//! - **Concentrated-liquidity engine**: all fee tiers quoted at once through
//!   QuoterV2, best output wins, per-tier breakdown kept
//! - **Swap builder**: slippage floor, deadline and router calldata for the
//!   native-in, native-out and token-to-token shapes
//! - **Allowance advisor**: approval decision and `approve` call parameters
//! - **Quote service and sessions**: one owner for registry, readers and
//!   cache; superseded requests yield nothing
//!
//! Quotes never silently become zero: every failure surfaces as a
//! [`QuoteError`] or [`BuildError`] variant, and only
//! [`QuoteError::ChainRead`] is worth retrying.

pub mod allowance;
pub mod engine;
pub mod error;
pub mod quote;
pub mod service;
pub mod session;
pub mod swap_builder;

pub use allowance::{build_approval, needs_approval_for, AllowanceAdvisor, AllowanceCheck, ApprovalCall};
pub use engine::{ConcentratedEngine, ConstantProductEngine};
pub use error::{BuildError, QuoteError};
pub use quote::{ConcentratedQuote, Quote, TierOutcome, TierResult};
pub use service::QuoteService;
pub use session::QuoteSession;
pub use swap_builder::{RouteShape, SwapBuilder, SwapParameters, SwapRequest};
