//! Pair Metadata Adapter Implementation
//!
//! Discovers constant-product pairs through the factory and caches what it
//! finds. All chain reads for pair state go through this adapter so the
//! quote engines never talk to the transport directly.

use std::sync::Arc;
use swapline_amm::PairReserves;
use swapline_dex::{erc20, uniswap_v2, AbiError};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use web3::types::Address;

use crate::cache::{unix_now, PairCache, PairKey, PairMetadata};
use crate::config::PoolMetadataConfig;
use crate::rpc_client::{read, ChainReader, ReadError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// The factory has no pair for these tokens
    #[error("No pair for {token_in:?} -> {token_out:?}")]
    PairNotFound { token_in: Address, token_out: Address },

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Abi(#[from] AbiError),
}

/// Pair Metadata Adapter
///
/// Cheap to clone; clones share the cache and the metrics.
#[derive(Debug, Clone)]
pub struct PairMetadataAdapter {
    /// Pair metadata cache
    cache: PairCache,

    /// Metrics
    metrics: Arc<RwLock<Metrics>>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metrics {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub rpc_discoveries: u64,
    pub rpc_failures: u64,
    pub pairs_not_found: u64,
}

impl Default for PairMetadataAdapter {
    fn default() -> Self {
        Self::with_cache(PairCache::default())
    }
}

impl PairMetadataAdapter {
    /// Create new pair metadata adapter
    pub fn new(config: &PoolMetadataConfig) -> Self {
        Self::with_cache(PairCache::new(config.pair_cache_ttl()))
    }

    pub fn with_cache(cache: PairCache) -> Self {
        info!("Pair metadata adapter initialized (ttl {}s)", cache.ttl().as_secs());
        Self {
            cache,
            metrics: Arc::new(RwLock::new(Metrics::default())),
        }
    }

    pub fn cache(&self) -> &PairCache {
        &self.cache
    }

    /// Get pair metadata for routing addresses, discovering it on a miss
    pub async fn get_or_discover_pair(
        &self,
        reader: &dyn ChainReader,
        chain_id: u64,
        factory: Address,
        token_in: Address,
        token_out: Address,
    ) -> Result<PairMetadata, DiscoveryError> {
        let key = PairKey::new(chain_id, token_in, token_out);

        // Check cache first
        if let Some(metadata) = self.cache.get(&key) {
            self.metrics.write().await.cache_hits += 1;
            debug!("Cache hit for pair {:?} on chain {}", metadata.pair_address, chain_id);
            return Ok(metadata);
        }

        self.metrics.write().await.cache_misses += 1;
        debug!(
            "Cache miss for {:?} -> {:?} on chain {}, discovering via factory",
            token_in, token_out, chain_id
        );

        match discover_pair(reader, factory, token_in, token_out).await {
            Ok(metadata) => {
                self.cache.insert(key, metadata.clone());
                self.metrics.write().await.rpc_discoveries += 1;

                info!(
                    "Discovered pair {:?} on chain {} (token0 {:?}, {}/{} decimals)",
                    metadata.pair_address,
                    chain_id,
                    metadata.token0,
                    metadata.decimals_in,
                    metadata.decimals_out,
                );
                Ok(metadata)
            }
            Err(e @ DiscoveryError::PairNotFound { .. }) => {
                self.metrics.write().await.pairs_not_found += 1;
                debug!("{}", e);
                Err(e)
            }
            Err(e) => {
                self.metrics.write().await.rpc_failures += 1;
                warn!("Pair discovery failed on chain {}: {}", chain_id, e);
                Err(e)
            }
        }
    }

    /// Current reserves of a pair, in `reserve0`/`reserve1` order
    pub async fn read_reserves(
        &self,
        reader: &dyn ChainReader,
        pair: Address,
    ) -> Result<PairReserves, DiscoveryError> {
        let call = uniswap_v2::get_reserves_call(pair)?;
        match read(reader, call, uniswap_v2::decode_reserves).await {
            Ok((reserve0, reserve1)) => Ok(PairReserves::new(reserve0, reserve1)),
            Err(e) => {
                self.metrics.write().await.rpc_failures += 1;
                warn!("getReserves failed for pair {:?}: {}", pair, e);
                Err(e.into())
            }
        }
    }

    pub fn invalidate(&self, chain_id: u64, token_in: Address, token_out: Address) -> bool {
        self.cache.invalidate(&PairKey::new(chain_id, token_in, token_out))
    }

    /// Get current metrics
    pub async fn get_metrics(&self) -> Metrics {
        self.metrics.read().await.clone()
    }
}

/// Factory lookup, then token0 and both decimals
///
/// The three reads after `getPair` are independent and issued together.
pub async fn discover_pair(
    reader: &dyn ChainReader,
    factory: Address,
    token_in: Address,
    token_out: Address,
) -> Result<PairMetadata, DiscoveryError> {
    let pair_call = uniswap_v2::get_pair_call(factory, token_in, token_out)?;
    let pair = read(reader, pair_call, uniswap_v2::decode_get_pair).await?;
    let pair_address = uniswap_v2::pair_or_none(pair)
        .ok_or(DiscoveryError::PairNotFound { token_in, token_out })?;

    let token0_call = uniswap_v2::token0_call(pair_address)?;
    let decimals_in_call = erc20::decimals_call(token_in)?;
    let decimals_out_call = erc20::decimals_call(token_out)?;

    let (token0, decimals_in, decimals_out) = tokio::try_join!(
        read(reader, token0_call, uniswap_v2::decode_token0),
        read(reader, decimals_in_call, erc20::decode_decimals),
        read(reader, decimals_out_call, erc20::decode_decimals),
    )?;

    Ok(PairMetadata {
        pair_address,
        token0,
        decimals_in,
        decimals_out,
        discovered_at: unix_now(),
    })
}
