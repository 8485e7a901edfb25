//! Configuration for Pool Metadata Adapter

use serde::{Deserialize, Serialize};
use std::time::Duration;
use swapline_config::{quoting, QuoterConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolMetadataConfig {
    /// RPC endpoints per chain, primary first
    pub chains: Vec<ChainEndpoints>,

    /// Lifetime of a cached pair before it is rediscovered
    pub pair_cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainEndpoints {
    pub chain_id: u64,
    pub endpoints: Vec<String>,
}

impl PoolMetadataConfig {
    pub fn pair_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.pair_cache_ttl_secs)
    }
}

impl Default for PoolMetadataConfig {
    fn default() -> Self {
        Self {
            chains: Vec::new(),
            pair_cache_ttl_secs: quoting::PAIR_CACHE_TTL_SECS,
        }
    }
}

impl From<&QuoterConfig> for PoolMetadataConfig {
    fn from(config: &QuoterConfig) -> Self {
        Self {
            chains: config
                .chains
                .iter()
                .map(|chain| ChainEndpoints {
                    chain_id: chain.chain_id,
                    endpoints: chain.endpoints(),
                })
                .collect(),
            pair_cache_ttl_secs: config.pair_cache_ttl_secs,
        }
    }
}
