//! Concentrated-liquidity (Uniswap V3 style) multi-tier quote engine
//!
//! Every fee tier is quoted through QuoterV2 at once. A revert means the
//! tier has no usable pool; the best of the tiers that answered wins.

use ethereum_types::{Address, U256};
use futures::future::join_all;
use std::sync::Arc;
use swapline_amm::{FeeTier, QuoteInput};
use swapline_config::{ChainRegistry, ProtocolFamily, Token};
use swapline_dex::uniswap_v3::{self, QuoteExactInputSingleParams};
use tracing::{debug, info, warn};

use pool_metadata_adapter::{read, ChainReader, ReadError};

use crate::error::QuoteError;
use crate::quote::{ConcentratedQuote, Quote, TierOutcome, TierResult};

#[derive(Debug, Clone)]
pub struct ConcentratedEngine {
    registry: Arc<ChainRegistry>,
}

impl ConcentratedEngine {
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        Self { registry }
    }

    /// Quote every fee tier and pick the best
    ///
    /// `Ok(None)` means no quote was requested. When no tier produced a
    /// quote the result is `NoLiquidity`, unless a tier failed to read, in
    /// which case that read error is reported instead.
    pub async fn quote(
        &self,
        reader: &dyn ChainReader,
        chain_id: u64,
        amount_in: &str,
        token_in: &Token,
        token_out: &Token,
    ) -> Result<Option<ConcentratedQuote>, QuoteError> {
        let Some(input) = QuoteInput::parse(amount_in, token_in.decimals) else {
            return Ok(None);
        };

        let route_in = token_in.route_address()?;
        let route_out = token_out.route_address()?;
        let family = ProtocolFamily::ConcentratedLiquidity;
        let quoter = self
            .registry
            .addresses_for(family, chain_id)?
            .quoter
            .ok_or(QuoteError::UnsupportedChain { family, chain_id })?;

        let per_tier = quote_tiers(reader, quoter, route_in, route_out, input.base_units).await?;

        let Some((tier, amount_out, gas_estimate)) = select_best(&per_tier) else {
            return Err(no_quote_error(&per_tier));
        };

        info!(
            "Best V3 tier for {} -> {}: {} ({} base units)",
            token_in.symbol, token_out.symbol, tier, amount_out
        );

        let best = Quote {
            protocol: family,
            token_in: route_in,
            token_out: route_out,
            amount_in: input.base_units,
            amount_out,
            decimals_out: token_out.decimals,
            fee_tier: Some(tier),
            gas_estimate: Some(gas_estimate),
            price_impact_bps: None,
        };

        Ok(Some(ConcentratedQuote { best, per_tier }))
    }
}

/// Issue one quote per fee tier and wait for all of them to settle
pub async fn quote_tiers(
    reader: &dyn ChainReader,
    quoter: Address,
    token_in: Address,
    token_out: Address,
    amount_in: U256,
) -> Result<Vec<TierResult>, QuoteError> {
    let calls = FeeTier::ALL
        .into_iter()
        .map(|tier| {
            let params = QuoteExactInputSingleParams {
                token_in,
                token_out,
                amount_in,
                fee: tier.pips(),
                sqrt_price_limit_x96: U256::zero(),
            };
            uniswap_v3::quote_exact_input_single_call(quoter, &params).map(|call| (tier, call))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let pending = calls.into_iter().map(|(tier, call)| async move {
        let outcome = match read(reader, call, uniswap_v3::decode_quote_exact_input_single).await {
            Ok(output) => TierOutcome::Quoted {
                amount_out: output.amount_out,
                gas_estimate: output.gas_estimate,
                sqrt_price_x96_after: output.sqrt_price_x96_after,
                initialized_ticks_crossed: output.initialized_ticks_crossed,
            },
            Err(ReadError::Reverted { reason, .. }) => {
                debug!("Tier {} has no pool: {}", tier, reason);
                TierOutcome::NoPool { reason }
            }
            Err(e) => {
                warn!("Tier {} quote failed: {}", tier, e);
                TierOutcome::Failed(e)
            }
        };
        TierResult { tier, outcome }
    });

    Ok(join_all(pending).await)
}

/// Largest output among quoted tiers; an exact tie keeps the lower fee
pub fn select_best(results: &[TierResult]) -> Option<(FeeTier, U256, U256)> {
    let mut best: Option<(FeeTier, U256, U256)> = None;

    let mut ordered: Vec<&TierResult> = results.iter().collect();
    ordered.sort_by_key(|result| result.tier);

    for result in ordered {
        if let TierOutcome::Quoted {
            amount_out,
            gas_estimate,
            ..
        } = result.outcome
        {
            match best {
                Some((_, current, _)) if amount_out <= current => {}
                _ => best = Some((result.tier, amount_out, gas_estimate)),
            }
        }
    }

    best
}

fn no_quote_error(results: &[TierResult]) -> QuoteError {
    let failure = results.iter().find_map(|result| match &result.outcome {
        TierOutcome::Failed(e) => Some(e.clone()),
        _ => None,
    });

    match failure {
        Some(e) => QuoteError::ChainRead(e),
        None => QuoteError::NoLiquidity,
    }
}
