//! Chain read transport
//!
//! Every contract read in the quoting path goes through [`ChainReader`], so
//! the engines can run against a live node or an in-memory mock. The web3
//! implementation walks its endpoints in order: a transport failure falls
//! through to the next endpoint, a revert is the contract's answer and is
//! returned immediately.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use swapline_dex::{AbiError, ContractCall};
use thiserror::Error;
use tracing::{debug, warn};
use web3::transports::Http;
use web3::types::{Address, Bytes, CallRequest};
use web3::Web3;

use crate::config::PoolMetadataConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// The call executed and reverted: no pool, no liquidity, bad arguments
    #[error("Call to {to:?} reverted: {reason}")]
    Reverted { to: Address, reason: String },

    /// RPC or network failure; the same read may succeed later
    #[error("Transport error: {0}")]
    Transport(String),

    /// The node answered but the payload does not match the ABI
    #[error("Malformed return data: {0}")]
    Decode(String),
}

impl From<AbiError> for ReadError {
    fn from(err: AbiError) -> Self {
        ReadError::Decode(err.to_string())
    }
}

impl ReadError {
    pub fn is_revert(&self) -> bool {
        matches!(self, ReadError::Reverted { .. })
    }
}

/// Read-only access to contract state on one chain
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// `eth_call` against the latest block
    async fn call(&self, to: Address, data: Vec<u8>) -> std::result::Result<Vec<u8>, ReadError>;
}

/// Issue `call` and decode the return data
pub async fn read<T>(
    reader: &dyn ChainReader,
    call: ContractCall,
    decode: impl FnOnce(&[u8]) -> std::result::Result<T, AbiError>,
) -> std::result::Result<T, ReadError> {
    let data = reader.call(call.to, call.data).await?;
    Ok(decode(&data)?)
}

/// `ChainReader` over one or more HTTP JSON-RPC endpoints
pub struct Web3Reader {
    chain_id: u64,
    web3_clients: Vec<(String, Web3<Http>)>,
}

impl Web3Reader {
    /// Create a reader; endpoints are tried in the given order
    pub fn new(chain_id: u64, endpoints: &[String]) -> Result<Self> {
        let mut web3_clients = Vec::new();

        for rpc_url in endpoints {
            match Http::new(rpc_url) {
                Ok(transport) => web3_clients.push((rpc_url.clone(), Web3::new(transport))),
                Err(e) => warn!("Skipping invalid RPC endpoint {}: {}", rpc_url, e),
            }
        }

        if web3_clients.is_empty() {
            return Err(anyhow!("No valid RPC endpoints configured for chain {}", chain_id));
        }

        Ok(Self {
            chain_id,
            web3_clients,
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn endpoint_count(&self) -> usize {
        self.web3_clients.len()
    }
}

/// Nodes report reverts as JSON-RPC errors whose message mentions the revert
fn classify(to: Address, err: web3::Error) -> ReadError {
    match err {
        web3::Error::Rpc(rpc) if rpc.message.to_lowercase().contains("revert") => ReadError::Reverted {
            to,
            reason: rpc.message,
        },
        other => ReadError::Transport(other.to_string()),
    }
}

#[async_trait]
impl ChainReader for Web3Reader {
    async fn call(&self, to: Address, data: Vec<u8>) -> std::result::Result<Vec<u8>, ReadError> {
        let request = CallRequest {
            to: Some(to),
            data: Some(Bytes(data)),
            ..Default::default()
        };

        let mut last_error = ReadError::Transport("no endpoints".to_string());

        // Try each RPC endpoint until one answers
        for (idx, (url, web3)) in self.web3_clients.iter().enumerate() {
            match web3.eth().call(request.clone(), None).await {
                Ok(bytes) => {
                    debug!("eth_call to {:?} answered by endpoint {}", to, idx);
                    return Ok(bytes.0);
                }
                Err(e) => match classify(to, e) {
                    revert @ ReadError::Reverted { .. } => return Err(revert),
                    failure => {
                        warn!("RPC endpoint {} ({}) failed: {}", idx, url, failure);
                        last_error = failure;
                    }
                },
            }
        }

        Err(last_error)
    }
}

/// Chain readers keyed by chain id
#[derive(Clone, Default)]
pub struct ChainReaders {
    readers: HashMap<u64, Arc<dyn ChainReader>>,
}

impl ChainReaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// One web3 reader per configured chain
    pub fn connect(config: &PoolMetadataConfig) -> Result<Self> {
        let mut readers = Self::new();
        for chain in &config.chains {
            let reader = Web3Reader::new(chain.chain_id, &chain.endpoints)?;
            debug!(
                "Chain {} reader ready with {} endpoints",
                chain.chain_id,
                reader.endpoint_count()
            );
            readers.insert(chain.chain_id, Arc::new(reader));
        }
        Ok(readers)
    }

    pub fn insert(&mut self, chain_id: u64, reader: Arc<dyn ChainReader>) {
        self.readers.insert(chain_id, reader);
    }

    pub fn with_reader(mut self, chain_id: u64, reader: Arc<dyn ChainReader>) -> Self {
        self.insert(chain_id, reader);
        self
    }

    pub fn get(&self, chain_id: u64) -> Option<Arc<dyn ChainReader>> {
        self.readers.get(&chain_id).cloned()
    }

    pub fn chains(&self) -> Vec<u64> {
        let mut chains: Vec<u64> = self.readers.keys().copied().collect();
        chains.sort_unstable();
        chains
    }
}

impl std::fmt::Debug for ChainReaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainReaders")
            .field("chains", &self.chains())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use web3::error::TransportError;

    fn rpc_error(message: &str) -> web3::Error {
        web3::Error::Rpc(jsonrpc_core::Error {
            code: jsonrpc_core::ErrorCode::ServerError(3),
            message: message.to_string(),
            data: None,
        })
    }

    #[test]
    fn test_revert_classification() {
        let to = Address::repeat_byte(1);
        assert!(classify(to, rpc_error("execution reverted")).is_revert());
        assert!(classify(to, rpc_error("VM Exception: Revert")).is_revert());
        assert!(!classify(to, rpc_error("header not found")).is_revert());

        let transport = classify(to, web3::Error::Transport(TransportError::Code(503)));
        assert!(matches!(transport, ReadError::Transport(_)));
    }

    #[test]
    fn test_reader_requires_an_endpoint() {
        assert!(Web3Reader::new(1, &[]).is_err());

        let reader = Web3Reader::new(1, &["http://localhost:8545".to_string()]).unwrap();
        assert_eq!(reader.endpoint_count(), 1);
        assert_eq!(reader.chain_id(), 1);
    }

    #[test]
    fn test_abi_error_becomes_decode() {
        let err: ReadError = AbiError::Decode {
            function: "getReserves".to_string(),
            reason: "short".to_string(),
        }
        .into();
        assert!(matches!(err, ReadError::Decode(_)));
    }
}
