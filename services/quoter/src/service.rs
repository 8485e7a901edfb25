//! Quoting service
//!
//! Long-lived owner of the chain registry, the per-chain readers and the
//! shared pair cache. Each operation is an explicit request; nothing is
//! recomputed behind the caller's back, so state-changing actions elsewhere
//! (an approval, a large swap) are followed by an explicit invalidation.

use anyhow::{Context, Result};
use ethereum_types::{Address, U256};
use std::sync::Arc;
use swapline_amm::SlippageTolerance;
use swapline_config::{ChainRegistry, ProtocolFamily, QuoterConfig, Token};
use tracing::info;

use pool_metadata_adapter::{ChainReader, ChainReaders, Metrics, PairMetadataAdapter, PoolMetadataConfig};

use crate::allowance::{self, AllowanceAdvisor, AllowanceCheck, ApprovalCall};
use crate::engine::{ConcentratedEngine, ConstantProductEngine};
use crate::error::{BuildError, QuoteError};
use crate::quote::{ConcentratedQuote, Quote};
use crate::session::QuoteSession;
use crate::swap_builder::{SwapBuilder, SwapParameters, SwapRequest};

#[derive(Debug, Clone)]
pub struct QuoteService {
    registry: Arc<ChainRegistry>,
    readers: ChainReaders,
    adapter: PairMetadataAdapter,
    constant_product: ConstantProductEngine,
    concentrated: ConcentratedEngine,
    builder: SwapBuilder,
    default_slippage: SlippageTolerance,
}

impl QuoteService {
    pub fn new(registry: ChainRegistry, readers: ChainReaders, adapter: PairMetadataAdapter) -> Self {
        let registry = Arc::new(registry);
        Self {
            constant_product: ConstantProductEngine::new(registry.clone(), adapter.clone()),
            concentrated: ConcentratedEngine::new(registry.clone()),
            builder: SwapBuilder::new(registry.clone()),
            registry,
            readers,
            adapter,
            default_slippage: SlippageTolerance::DEFAULT,
        }
    }

    /// Built-in deployments with configured overrides, one reader per chain
    pub fn from_config(config: &QuoterConfig) -> Result<Self> {
        let registry = config.apply_overrides(
            ChainRegistry::builtin().context("Failed to load built-in chain registry")?,
        );
        let pool_config = PoolMetadataConfig::from(config);
        let readers = ChainReaders::connect(&pool_config).context("Failed to connect chain readers")?;
        let adapter = PairMetadataAdapter::new(&pool_config);

        info!("Quote service ready for chains {:?}", readers.chains());

        let mut service = Self::new(registry, readers, adapter);
        service.default_slippage = SlippageTolerance::from_bps(config.default_slippage_bps)
            .context("Invalid default slippage")?;
        Ok(service)
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    pub fn default_slippage(&self) -> SlippageTolerance {
        self.default_slippage
    }

    fn reader(&self, family: ProtocolFamily, chain_id: u64) -> Result<Arc<dyn ChainReader>, QuoteError> {
        self.readers
            .get(chain_id)
            .ok_or(QuoteError::UnsupportedChain { family, chain_id })
    }

    /// Constant-product quote; `Ok(None)` when no quote was requested
    pub async fn get_constant_product_quote(
        &self,
        amount_in: &str,
        token_in: &Token,
        token_out: &Token,
        chain_id: u64,
    ) -> Result<Option<Quote>, QuoteError> {
        let reader = self.reader(ProtocolFamily::ConstantProduct, chain_id)?;
        self.constant_product
            .quote(reader.as_ref(), chain_id, amount_in, token_in, token_out)
            .await
    }

    /// Best concentrated-liquidity tier plus the per-tier breakdown
    pub async fn get_best_concentrated_liquidity_quote(
        &self,
        amount_in: &str,
        token_in: &Token,
        token_out: &Token,
        chain_id: u64,
    ) -> Result<Option<ConcentratedQuote>, QuoteError> {
        let reader = self.reader(ProtocolFamily::ConcentratedLiquidity, chain_id)?;
        self.concentrated
            .quote(reader.as_ref(), chain_id, amount_in, token_in, token_out)
            .await
    }

    pub fn build_swap_parameters(&self, request: &SwapRequest<'_>) -> Result<SwapParameters, BuildError> {
        self.builder.build(request)
    }

    pub fn needs_approval_for(&self, token: &Token, amount_in: U256, current_allowance: U256) -> bool {
        allowance::needs_approval_for(token, amount_in, current_allowance)
    }

    /// Router of `family` on `chain_id`, the spender for swaps through it
    pub fn spender(&self, family: ProtocolFamily, chain_id: u64) -> Result<Address, QuoteError> {
        Ok(self.registry.addresses_for(family, chain_id)?.router)
    }

    /// Read `owner`'s allowance to the family's router and decide
    pub async fn check_allowance(
        &self,
        family: ProtocolFamily,
        chain_id: u64,
        token: &Token,
        owner: Address,
        amount_in: U256,
    ) -> Result<AllowanceCheck, QuoteError> {
        let spender = self.spender(family, chain_id)?;
        let reader = self.reader(family, chain_id)?;
        AllowanceAdvisor
            .check(reader.as_ref(), token, owner, spender, amount_in)
            .await
    }

    pub fn approval_for(
        &self,
        family: ProtocolFamily,
        chain_id: u64,
        token: &Token,
        amount: U256,
    ) -> Result<Option<ApprovalCall>, QuoteError> {
        let spender = self.spender(family, chain_id)?;
        allowance::build_approval(token, spender, amount)
    }

    /// Drop the cached pair for this direction; true if one was cached
    pub fn invalidate_pair(&self, chain_id: u64, token_in: &Token, token_out: &Token) -> Result<bool, QuoteError> {
        let route_in = token_in.route_address()?;
        let route_out = token_out.route_address()?;
        Ok(self.adapter.invalidate(chain_id, route_in, route_out))
    }

    pub fn clear_cache(&self) {
        self.adapter.cache().clear();
    }

    pub async fn metrics(&self) -> Metrics {
        self.adapter.get_metrics().await
    }

    /// A fresh session for one caller's stream of requests
    pub fn session(&self) -> QuoteSession {
        QuoteSession::new()
    }
}
