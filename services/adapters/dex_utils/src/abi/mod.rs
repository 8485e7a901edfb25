//! ABI definitions and call encoding for DEX protocols
//!
//! This module provides:
//! - Canonical function definitions for the contracts a quote touches
//! - Call-data encoding and return-data decoding helpers
//! - Typed extraction of decoded tokens
//!
//! # Supported Protocols
//! - ERC-20 tokens
//! - Uniswap V2 and forks (factory, pair, router)
//! - Uniswap V3 (QuoterV2, SwapRouter)

pub mod erc20;
pub mod uniswap_v2;
pub mod uniswap_v3;

use ethabi::{Function, Param, ParamType, StateMutability, Token};
use ethereum_types::{Address, U256};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    #[error("Failed to encode {function}: {reason}")]
    Encode { function: String, reason: String },

    #[error("Failed to decode {function} output: {reason}")]
    Decode { function: String, reason: String },

    #[error("Unexpected output shape for {function}: expected {expected}")]
    UnexpectedOutput {
        function: String,
        expected: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, AbiError>;

pub(crate) fn param(name: &str, kind: ParamType) -> Param {
    Param {
        name: name.to_string(),
        kind,
        internal_type: None,
    }
}

#[allow(deprecated)]
pub(crate) fn function(
    name: &str,
    inputs: Vec<Param>,
    outputs: Vec<Param>,
    state_mutability: StateMutability,
) -> Function {
    Function {
        name: name.to_string(),
        inputs,
        outputs,
        constant: None,
        state_mutability,
    }
}

/// Selector followed by the ABI-encoded arguments
pub fn encode_call(function: &Function, args: &[Token]) -> Result<Vec<u8>> {
    function.encode_input(args).map_err(|e| AbiError::Encode {
        function: function.name.clone(),
        reason: e.to_string(),
    })
}

pub fn decode_output(function: &Function, data: &[u8]) -> Result<Vec<Token>> {
    function.decode_output(data).map_err(|e| AbiError::Decode {
        function: function.name.clone(),
        reason: e.to_string(),
    })
}

/// Decoded token at `index`, converted with `extract`
pub(crate) fn output_at<T>(
    function: &Function,
    tokens: &[Token],
    index: usize,
    expected: &'static str,
    extract: impl Fn(&Token) -> Option<T>,
) -> Result<T> {
    tokens
        .get(index)
        .and_then(extract)
        .ok_or_else(|| AbiError::UnexpectedOutput {
            function: function.name.clone(),
            expected,
        })
}

pub(crate) fn as_address(token: &Token) -> Option<Address> {
    match token {
        Token::Address(address) => Some(*address),
        _ => None,
    }
}

pub(crate) fn as_uint(token: &Token) -> Option<U256> {
    match token {
        Token::Uint(value) => Some(*value),
        _ => None,
    }
}

/// Decode a function whose single output is a `uint`
pub fn decode_single_uint(function: &Function, data: &[u8]) -> Result<U256> {
    let tokens = decode_output(function, data)?;
    output_at(function, &tokens, 0, "uint", as_uint)
}

/// Decode a function whose single output is an `address`
pub fn decode_single_address(function: &Function, data: &[u8]) -> Result<Address> {
    let tokens = decode_output(function, data)?;
    output_at(function, &tokens, 0, "address", as_address)
}

/// Full calldata for a contract call: target plus encoded input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub to: Address,
    pub data: Vec<u8>,
}

impl ContractCall {
    pub fn selector(&self) -> Option<[u8; 4]> {
        let head = self.data.get(..4)?;
        let mut selector = [0u8; 4];
        selector.copy_from_slice(head);
        Some(selector)
    }
}
