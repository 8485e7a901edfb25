//! ERC-20 functions used for quoting and approvals

use super::{encode_call, function, param, ContractCall, Result};
use ethabi::{Function, ParamType, StateMutability, Token};
use ethereum_types::{Address, U256};

/// function decimals() view returns (uint8)
pub fn decimals() -> Function {
    function(
        "decimals",
        vec![],
        vec![param("", ParamType::Uint(8))],
        StateMutability::View,
    )
}

/// function allowance(address owner, address spender) view returns (uint256)
pub fn allowance() -> Function {
    function(
        "allowance",
        vec![
            param("owner", ParamType::Address),
            param("spender", ParamType::Address),
        ],
        vec![param("", ParamType::Uint(256))],
        StateMutability::View,
    )
}

/// function approve(address spender, uint256 amount) returns (bool)
pub fn approve() -> Function {
    function(
        "approve",
        vec![
            param("spender", ParamType::Address),
            param("amount", ParamType::Uint(256)),
        ],
        vec![param("", ParamType::Bool)],
        StateMutability::NonPayable,
    )
}

/// function balanceOf(address account) view returns (uint256)
pub fn balance_of() -> Function {
    function(
        "balanceOf",
        vec![param("account", ParamType::Address)],
        vec![param("", ParamType::Uint(256))],
        StateMutability::View,
    )
}

pub fn decimals_call(token: Address) -> Result<ContractCall> {
    Ok(ContractCall {
        to: token,
        data: encode_call(&decimals(), &[])?,
    })
}

pub fn allowance_call(token: Address, owner: Address, spender: Address) -> Result<ContractCall> {
    Ok(ContractCall {
        to: token,
        data: encode_call(&allowance(), &[Token::Address(owner), Token::Address(spender)])?,
    })
}

pub fn approve_call(token: Address, spender: Address, amount: U256) -> Result<ContractCall> {
    Ok(ContractCall {
        to: token,
        data: encode_call(&approve(), &[Token::Address(spender), Token::Uint(amount)])?,
    })
}

pub fn balance_of_call(token: Address, account: Address) -> Result<ContractCall> {
    Ok(ContractCall {
        to: token,
        data: encode_call(&balance_of(), &[Token::Address(account)])?,
    })
}

/// Decode `decimals()`; values above 255 are rejected
pub fn decode_decimals(data: &[u8]) -> Result<u8> {
    let function = decimals();
    let value = super::decode_single_uint(&function, data)?;
    if value > U256::from(u8::MAX) {
        return Err(super::AbiError::UnexpectedOutput {
            function: function.name,
            expected: "uint8",
        });
    }
    Ok(value.low_u32() as u8)
}

pub fn decode_allowance(data: &[u8]) -> Result<U256> {
    super::decode_single_uint(&allowance(), data)
}
