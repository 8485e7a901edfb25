//! # Swapline Configuration
//!
//! Static chain knowledge and runtime configuration for the quoting crates.
//!
//! ## Features
//!
//! - **Chain Registry**: Uniswap V2/V3 factory, router and quoter addresses per chain
//! - **Token Model**: native vs. ERC-20 tokens and routing-address resolution
//! - **Token Lists**: built-in tokens and standard token-list JSON
//! - **Service Configuration**: RPC endpoints, cache TTL, default slippage
//!
//! ## Usage
//!
//! ```rust
//! use swapline_config::{chain_id, native_token, ChainRegistry, ProtocolFamily};
//!
//! let registry = ChainRegistry::builtin().unwrap();
//! let v2 = registry.addresses_for(ProtocolFamily::ConstantProduct, chain_id::MAINNET).unwrap();
//!
//! let eth = native_token(chain_id::MAINNET).unwrap();
//! let weth = eth.route_address().unwrap();
//! # let _ = (v2, weth);
//! ```

pub mod chains;
pub mod service;
pub mod service_config;
pub mod tokens;

// Re-export commonly used types
pub use chains::{chain_id, chain_name, parse_address, ChainAddresses, ChainRegistry, ProtocolFamily, RegistryError, RouterKind};
pub use service::{chain, quoting};
pub use service_config::{ChainSettings, QuoterConfig};
pub use tokens::{
    builtin_tokens, is_native_token, native_token, needs_approval, popular_tokens, resolve_logo,
    to_route_address, Token, TokenAddress, TokenBook, TokenError, TokenList, TokenListEntry,
};

pub use ethereum_types::Address;
