//! Pair metadata caching with time-based expiry
//!
//! Discovering a pair costs four contract reads (factory lookup, token0 and
//! both decimals). The result is stable for the life of the pair, so it is
//! cached per chain and swap direction, and dropped after a fixed TTL so a
//! misconfigured or redeployed pair is eventually seen again.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use swapline_config::quoting;
use tracing::debug;
use web3::types::Address;

/// Pair metadata discovered for one swap direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairMetadata {
    /// Pair contract address
    pub pair_address: Address,

    /// Owner of `reserve0`
    pub token0: Address,

    /// Decimals of the input token (e.g. 18 for WETH)
    pub decimals_in: u8,

    /// Decimals of the output token (e.g. 6 for USDC)
    pub decimals_out: u8,

    /// Unix seconds at discovery
    pub discovered_at: u64,
}

impl PairMetadata {
    /// Whether `token_in` owns `reserve0`
    pub fn token_in_is_token0(&self, token_in: Address) -> bool {
        self.token0 == token_in
    }
}

/// Cache key: chain plus the ordered pair of routing addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub chain_id: u64,
    pub token_in: Address,
    pub token_out: Address,
}

impl PairKey {
    pub fn new(chain_id: u64, token_in: Address, token_out: Address) -> Self {
        Self {
            chain_id,
            token_in,
            token_out,
        }
    }
}

#[derive(Debug, Clone)]
struct CachedPair {
    metadata: PairMetadata,
    inserted_at: Instant,
}

/// Thread-safe pair metadata cache
#[derive(Debug, Clone)]
pub struct PairCache {
    /// In-memory cache using DashMap for concurrent access
    cache: Arc<DashMap<PairKey, CachedPair>>,

    ttl: Duration,
}

impl Default for PairCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(quoting::PAIR_CACHE_TTL_SECS))
    }
}

impl PairCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get pair metadata, evicting it if it has expired
    pub fn get(&self, key: &PairKey) -> Option<PairMetadata> {
        self.get_at(key, Instant::now())
    }

    /// `get` as seen at `now`
    pub fn get_at(&self, key: &PairKey, now: Instant) -> Option<PairMetadata> {
        let expired = {
            let entry = self.cache.get(key)?;
            if now.saturating_duration_since(entry.inserted_at) < self.ttl {
                return Some(entry.metadata.clone());
            }
            entry.inserted_at
        };

        // Only remove the entry we saw; a fresher concurrent insert survives
        self.cache
            .remove_if(key, |_, cached| cached.inserted_at == expired);
        debug!("Evicted expired pair {:?}", key);
        None
    }

    /// Insert pair metadata; last writer wins
    pub fn insert(&self, key: PairKey, metadata: PairMetadata) {
        self.insert_at(key, metadata, Instant::now());
    }

    pub fn insert_at(&self, key: PairKey, metadata: PairMetadata, now: Instant) {
        self.cache.insert(
            key,
            CachedPair {
                metadata,
                inserted_at: now,
            },
        );
    }

    /// Drop one entry; true if it was present
    pub fn invalidate(&self, key: &PairKey) -> bool {
        self.cache.remove(key).is_some()
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn purge_expired(&self, now: Instant) -> usize {
        let before = self.cache.len();
        self.cache
            .retain(|_, cached| now.saturating_duration_since(cached.inserted_at) < self.ttl);
        before.saturating_sub(self.cache.len())
    }

    /// Check if a live entry exists
    pub fn contains(&self, key: &PairKey) -> bool {
        self.get(key).is_some()
    }

    /// Get total number of cached pairs, expired ones included
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Unix seconds of `time`; `None` before the epoch
pub fn unix_seconds(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}

/// Current unix time in seconds, zero if the clock reads before the epoch
pub fn unix_now() -> u64 {
    unix_seconds(SystemTime::now()).unwrap_or_default()
}
