//! Pair Metadata Adapter
//!
//! Chain access for the quote engines. Owns the read transport, discovers
//! constant-product pairs through their factory and caches the result.
//!
//! Features:
//! - `ChainReader` trait with a web3 HTTP implementation and endpoint fallback
//! - Pair discovery (`getPair`, `token0`, `decimals`) with TTL caching
//! - Reserve reads oriented by the cached `token0`
//! - In-memory mock reader behind the `test-utils` feature

pub mod adapter;
pub mod cache;
pub mod config;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod rpc_client;

pub use adapter::{discover_pair, DiscoveryError, Metrics, PairMetadataAdapter};
pub use cache::{PairCache, PairKey, PairMetadata};
pub use config::{ChainEndpoints, PoolMetadataConfig};
pub use rpc_client::{read, ChainReader, ChainReaders, ReadError, Web3Reader};

#[cfg(test)]
mod tests;
