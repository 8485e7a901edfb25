//! Constant-product (Uniswap V2 style) quote engine
//!
//! Pair metadata comes from the shared adapter cache; reserves are read
//! fresh for every quote and fed to the exact integer formula.

use ethereum_types::U256;
use std::sync::Arc;
use swapline_amm::{parse_units, ConstantProductMath, FeeRatio, QuoteInput};
use swapline_config::{ChainRegistry, ProtocolFamily, Token};
use tracing::debug;

use pool_metadata_adapter::{ChainReader, PairMetadataAdapter};

use crate::error::QuoteError;
use crate::quote::Quote;

#[derive(Debug, Clone)]
pub struct ConstantProductEngine {
    registry: Arc<ChainRegistry>,
    adapter: PairMetadataAdapter,
}

impl ConstantProductEngine {
    pub fn new(registry: Arc<ChainRegistry>, adapter: PairMetadataAdapter) -> Self {
        Self { registry, adapter }
    }

    pub fn adapter(&self) -> &PairMetadataAdapter {
        &self.adapter
    }

    /// Quote `amount_in` (whole-token units) of `token_in` for `token_out`
    ///
    /// `Ok(None)` means no quote was requested: the amount is empty,
    /// unparseable, or not positive.
    pub async fn quote(
        &self,
        reader: &dyn ChainReader,
        chain_id: u64,
        amount_in: &str,
        token_in: &Token,
        token_out: &Token,
    ) -> Result<Option<Quote>, QuoteError> {
        let Some(input) = QuoteInput::parse(amount_in, token_in.decimals) else {
            return Ok(None);
        };

        let route_in = token_in.route_address()?;
        let route_out = token_out.route_address()?;
        let factory = self
            .registry
            .addresses_for(ProtocolFamily::ConstantProduct, chain_id)?
            .factory;

        let metadata = self
            .adapter
            .get_or_discover_pair(reader, chain_id, factory, route_in, route_out)
            .await?;
        let reserves = self.adapter.read_reserves(reader, metadata.pair_address).await?;

        if reserves.is_empty() {
            debug!("Pair {:?} has no reserves", metadata.pair_address);
            return Err(QuoteError::NoLiquidity);
        }

        let (reserve_in, reserve_out) = reserves.oriented(metadata.token_in_is_token0(route_in));

        // On-chain decimals are authoritative for the base-unit conversion
        let amount = if metadata.decimals_in == token_in.decimals {
            input.base_units
        } else {
            parse_units(&input.text, metadata.decimals_in)?
        };
        if amount.is_zero() {
            return Ok(None);
        }

        // One-sided pool: nothing can be paid out
        let amount_out = if reserve_in.is_zero() || reserve_out.is_zero() {
            debug!("Pair {:?} has a zero reserve, quoting zero", metadata.pair_address);
            U256::zero()
        } else {
            ConstantProductMath::get_amount_out(amount, reserve_in, reserve_out, FeeRatio::STANDARD)?
        };
        let price_impact_bps = ConstantProductMath::price_impact_bps(amount, reserve_in, reserve_out).ok();

        debug!(
            "V2 quote {} {} -> {} base units of {} (chain {})",
            input.text, token_in.symbol, amount_out, token_out.symbol, chain_id
        );

        Ok(Some(Quote {
            protocol: ProtocolFamily::ConstantProduct,
            token_in: route_in,
            token_out: route_out,
            amount_in: amount,
            amount_out,
            decimals_out: metadata.decimals_out,
            fee_tier: None,
            gas_estimate: None,
            price_impact_bps,
        }))
    }
}
