//! Quote results shared by both engines

use ethereum_types::{Address, U256};
use pool_metadata_adapter::ReadError;
use serde_json::{json, Value};
use swapline_amm::{format_units, FeeTier};
use swapline_config::ProtocolFamily;

/// Expected output of one swap, produced fresh per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub protocol: ProtocolFamily,
    /// Routing addresses the quote was computed for
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    pub amount_out: U256,
    pub decimals_out: u8,
    /// Set for concentrated-liquidity quotes only
    pub fee_tier: Option<FeeTier>,
    pub gas_estimate: Option<U256>,
    /// Constant-product mid-price movement, fee excluded
    pub price_impact_bps: Option<u32>,
}

impl Quote {
    /// `amount_out` in whole-token units
    pub fn amount_out_display(&self) -> String {
        format_units(self.amount_out, self.decimals_out)
    }

    pub fn to_json(&self) -> Value {
        json!({
            "protocol": self.protocol.to_string(),
            "tokenIn": format!("{:?}", self.token_in),
            "tokenOut": format!("{:?}", self.token_out),
            "amountIn": self.amount_in.to_string(),
            "amountOut": self.amount_out.to_string(),
            "amountOutDisplay": self.amount_out_display(),
            "feeTier": self.fee_tier.map(|tier| tier.pips()),
            "gasEstimate": self.gas_estimate.map(|gas| gas.to_string()),
            "priceImpactBps": self.price_impact_bps,
        })
    }
}

/// What one fee tier answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierOutcome {
    Quoted {
        amount_out: U256,
        gas_estimate: U256,
        sqrt_price_x96_after: U256,
        initialized_ticks_crossed: u32,
    },
    /// The quote call reverted: no pool or no liquidity at this tier
    NoPool { reason: String },
    /// The read itself failed; says nothing about the pool
    Failed(ReadError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierResult {
    pub tier: FeeTier,
    pub outcome: TierOutcome,
}

impl TierResult {
    pub fn amount_out(&self) -> Option<U256> {
        match self.outcome {
            TierOutcome::Quoted { amount_out, .. } => Some(amount_out),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match &self.outcome {
            TierOutcome::Quoted {
                amount_out,
                gas_estimate,
                ..
            } => json!({
                "feeTier": self.tier.pips(),
                "status": "quoted",
                "amountOut": amount_out.to_string(),
                "gasEstimate": gas_estimate.to_string(),
            }),
            TierOutcome::NoPool { reason } => json!({
                "feeTier": self.tier.pips(),
                "status": "no_pool",
                "reason": reason,
            }),
            TierOutcome::Failed(err) => json!({
                "feeTier": self.tier.pips(),
                "status": "failed",
                "error": err.to_string(),
            }),
        }
    }
}

/// Best tier plus the full per-tier breakdown, lowest fee first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcentratedQuote {
    pub best: Quote,
    pub per_tier: Vec<TierResult>,
}

impl ConcentratedQuote {
    pub fn to_json(&self) -> Value {
        json!({
            "best": self.best.to_json(),
            "perTier": self.per_tier.iter().map(TierResult::to_json).collect::<Vec<_>>(),
        })
    }
}
