//! Error types for quoting and swap construction

use ethereum_types::Address;
use pool_metadata_adapter::{DiscoveryError, ReadError};
use swapline_amm::{AmmError, UnitsError};
use swapline_config::{ProtocolFamily, RegistryError, TokenError};
use swapline_dex::AbiError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("Unsupported chain {chain_id} for {family}")]
    UnsupportedChain { family: ProtocolFamily, chain_id: u64 },

    #[error("Native token {symbol} has no wrapped address configured")]
    MissingWrappedAddress { symbol: String },

    #[error("No pair for {token_in:?} -> {token_out:?}")]
    PairNotFound { token_in: Address, token_out: Address },

    #[error("No liquidity for this pair")]
    NoLiquidity,

    #[error("Chain read failed: {0}")]
    ChainRead(#[from] ReadError),

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] UnitsError),

    #[error("Quote math failed: {0}")]
    Math(#[from] AmmError),

    #[error("ABI encoding failed: {0}")]
    Abi(#[from] AbiError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl QuoteError {
    /// Only transport failures may succeed on a later attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, QuoteError::ChainRead(_))
    }
}

impl From<RegistryError> for QuoteError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnsupportedChain { family, chain_id } => {
                QuoteError::UnsupportedChain { family, chain_id }
            }
            other => QuoteError::Configuration {
                message: other.to_string(),
            },
        }
    }
}

impl From<TokenError> for QuoteError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::MissingWrappedAddress { symbol } => QuoteError::MissingWrappedAddress { symbol },
            other => QuoteError::Configuration {
                message: other.to_string(),
            },
        }
    }
}

impl From<DiscoveryError> for QuoteError {
    fn from(err: DiscoveryError) -> Self {
        match err {
            DiscoveryError::PairNotFound { token_in, token_out } => {
                QuoteError::PairNotFound { token_in, token_out }
            }
            DiscoveryError::Read(e) => QuoteError::ChainRead(e),
            DiscoveryError::Abi(e) => QuoteError::Abi(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// No resolved quote, or a concentrated-liquidity quote without a tier
    #[error("No route: {reason}")]
    NoRoute { reason: &'static str },

    #[error("Invalid slippage tolerance: {bps} bps")]
    InvalidSlippage { bps: u32 },

    #[error("Unsupported chain {chain_id} for {family}")]
    UnsupportedChain { family: ProtocolFamily, chain_id: u64 },

    #[error("Native token {symbol} has no wrapped address configured")]
    MissingWrappedAddress { symbol: String },

    #[error("Swap math failed: {0}")]
    Math(#[from] AmmError),

    #[error("ABI encoding failed: {0}")]
    Abi(#[from] AbiError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("System clock reads before the Unix epoch")]
    ClockBeforeEpoch,
}

impl From<RegistryError> for BuildError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnsupportedChain { family, chain_id } => {
                BuildError::UnsupportedChain { family, chain_id }
            }
            other => BuildError::Configuration {
                message: other.to_string(),
            },
        }
    }
}

impl From<TokenError> for BuildError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::MissingWrappedAddress { symbol } => BuildError::MissingWrappedAddress { symbol },
            other => BuildError::Configuration {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_chain_reads_are_retryable() {
        assert!(QuoteError::ChainRead(ReadError::Transport("503".into())).is_retryable());
        assert!(!QuoteError::NoLiquidity.is_retryable());
        assert!(!QuoteError::PairNotFound {
            token_in: Address::zero(),
            token_out: Address::zero()
        }
        .is_retryable());
        assert!(!QuoteError::MissingWrappedAddress { symbol: "ETH".into() }.is_retryable());
    }

    #[test]
    fn test_discovery_errors_keep_their_kind() {
        let not_found: QuoteError = DiscoveryError::PairNotFound {
            token_in: Address::repeat_byte(1),
            token_out: Address::repeat_byte(2),
        }
        .into();
        assert!(matches!(not_found, QuoteError::PairNotFound { .. }));

        let read: QuoteError = DiscoveryError::Read(ReadError::Transport("timeout".into())).into();
        assert!(read.is_retryable());
    }

    #[test]
    fn test_registry_error_maps_to_unsupported_chain() {
        let err: QuoteError = RegistryError::UnsupportedChain {
            family: ProtocolFamily::ConcentratedLiquidity,
            chain_id: 56,
        }
        .into();
        assert_eq!(
            err,
            QuoteError::UnsupportedChain {
                family: ProtocolFamily::ConcentratedLiquidity,
                chain_id: 56
            }
        );
    }
}
