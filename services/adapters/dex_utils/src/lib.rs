//! Shared DEX ABI library
//!
//! Call encoding and return decoding for every contract the quoting engine
//! talks to. Nothing here performs I/O; callers hand the resulting
//! [`ContractCall`]s to a chain reader.
//!
//! # Architecture
//!
//! ```text
//! dex_utils/
//! ├── abi/
//! │   ├── erc20.rs       # decimals, allowance, approve, balanceOf
//! │   ├── uniswap_v2.rs  # factory, pair and router
//! │   └── uniswap_v3.rs  # QuoterV2 and SwapRouter
//! └── selectors.rs       # 4-byte selector constants
//! ```
//!
//! # Design Principles
//! - Single canonical source for DEX ABIs
//! - Typed inputs and outputs at the edges, `ethabi::Token` only inside
//! - Malformed return data is an error, never a zero

pub mod abi;
pub mod selectors;

// Re-export commonly used types
pub use abi::{
    decode_output, encode_call, erc20, uniswap_v2, uniswap_v3, AbiError, ContractCall,
};
pub use abi::uniswap_v3::{ExactInputSingleParams, QuoteExactInputSingleParams, QuoterOutput};
