//! Uniswap V2 and compatible protocol ABIs
//!
//! Factory discovery, pair state reads, and the three router entry points
//! for exact-input swaps (native in, native out, token to token).

use super::{
    as_uint, decode_output, decode_single_address, encode_call, function, output_at,
    param, ContractCall, Result,
};
use ethabi::{Function, ParamType, StateMutability, Token};
use ethereum_types::{Address, U256};

fn address_path() -> ParamType {
    ParamType::Array(Box::new(ParamType::Address))
}

fn amounts_output() -> Vec<ethabi::Param> {
    vec![param("amounts", ParamType::Array(Box::new(ParamType::Uint(256))))]
}

fn path_token(path: &[Address]) -> Token {
    Token::Array(path.iter().map(|a| Token::Address(*a)).collect())
}

/// function getPair(address tokenA, address tokenB) view returns (address pair)
pub fn get_pair() -> Function {
    function(
        "getPair",
        vec![
            param("tokenA", ParamType::Address),
            param("tokenB", ParamType::Address),
        ],
        vec![param("pair", ParamType::Address)],
        StateMutability::View,
    )
}

/// function token0() view returns (address)
pub fn token0() -> Function {
    function(
        "token0",
        vec![],
        vec![param("", ParamType::Address)],
        StateMutability::View,
    )
}

/// function getReserves() view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast)
pub fn get_reserves() -> Function {
    function(
        "getReserves",
        vec![],
        vec![
            param("reserve0", ParamType::Uint(112)),
            param("reserve1", ParamType::Uint(112)),
            param("blockTimestampLast", ParamType::Uint(32)),
        ],
        StateMutability::View,
    )
}

/// function getAmountsOut(uint256 amountIn, address[] path) view returns (uint256[] amounts)
pub fn get_amounts_out() -> Function {
    function(
        "getAmountsOut",
        vec![
            param("amountIn", ParamType::Uint(256)),
            param("path", address_path()),
        ],
        amounts_output(),
        StateMutability::View,
    )
}

/// function swapExactETHForTokens(uint256 amountOutMin, address[] path, address to, uint256 deadline) payable
pub fn swap_exact_eth_for_tokens() -> Function {
    function(
        "swapExactETHForTokens",
        vec![
            param("amountOutMin", ParamType::Uint(256)),
            param("path", address_path()),
            param("to", ParamType::Address),
            param("deadline", ParamType::Uint(256)),
        ],
        amounts_output(),
        StateMutability::Payable,
    )
}

/// function swapExactTokensForETH(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline)
pub fn swap_exact_tokens_for_eth() -> Function {
    function(
        "swapExactTokensForETH",
        vec![
            param("amountIn", ParamType::Uint(256)),
            param("amountOutMin", ParamType::Uint(256)),
            param("path", address_path()),
            param("to", ParamType::Address),
            param("deadline", ParamType::Uint(256)),
        ],
        amounts_output(),
        StateMutability::NonPayable,
    )
}

/// function swapExactTokensForTokens(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline)
pub fn swap_exact_tokens_for_tokens() -> Function {
    function(
        "swapExactTokensForTokens",
        vec![
            param("amountIn", ParamType::Uint(256)),
            param("amountOutMin", ParamType::Uint(256)),
            param("path", address_path()),
            param("to", ParamType::Address),
            param("deadline", ParamType::Uint(256)),
        ],
        amounts_output(),
        StateMutability::NonPayable,
    )
}

pub fn get_pair_call(factory: Address, token_a: Address, token_b: Address) -> Result<ContractCall> {
    Ok(ContractCall {
        to: factory,
        data: encode_call(&get_pair(), &[Token::Address(token_a), Token::Address(token_b)])?,
    })
}

pub fn token0_call(pair: Address) -> Result<ContractCall> {
    Ok(ContractCall {
        to: pair,
        data: encode_call(&token0(), &[])?,
    })
}

pub fn get_reserves_call(pair: Address) -> Result<ContractCall> {
    Ok(ContractCall {
        to: pair,
        data: encode_call(&get_reserves(), &[])?,
    })
}

pub fn get_amounts_out_call(router: Address, amount_in: U256, path: &[Address]) -> Result<ContractCall> {
    Ok(ContractCall {
        to: router,
        data: encode_call(&get_amounts_out(), &[Token::Uint(amount_in), path_token(path)])?,
    })
}

pub fn decode_get_pair(data: &[u8]) -> Result<Address> {
    decode_single_address(&get_pair(), data)
}

pub fn decode_token0(data: &[u8]) -> Result<Address> {
    decode_single_address(&token0(), data)
}

/// `(reserve0, reserve1)`; the timestamp is dropped
pub fn decode_reserves(data: &[u8]) -> Result<(U256, U256)> {
    let function = get_reserves();
    let tokens = decode_output(&function, data)?;
    let reserve0 = output_at(&function, &tokens, 0, "uint112 reserve0", as_uint)?;
    let reserve1 = output_at(&function, &tokens, 1, "uint112 reserve1", as_uint)?;
    Ok((reserve0, reserve1))
}

/// Final element of the `amounts` array
pub fn decode_amounts_out(data: &[u8]) -> Result<U256> {
    let function = get_amounts_out();
    let tokens = decode_output(&function, data)?;
    output_at(&function, &tokens, 0, "uint256[] amounts", |token| match token {
        Token::Array(amounts) => amounts.last().and_then(as_uint),
        _ => None,
    })
}

/// Router call data for the three exact-input swap shapes
pub fn swap_exact_eth_for_tokens_data(
    amount_out_min: U256,
    path: &[Address],
    to: Address,
    deadline: U256,
) -> Result<Vec<u8>> {
    encode_call(
        &swap_exact_eth_for_tokens(),
        &[
            Token::Uint(amount_out_min),
            path_token(path),
            Token::Address(to),
            Token::Uint(deadline),
        ],
    )
}

pub fn swap_exact_tokens_for_eth_data(
    amount_in: U256,
    amount_out_min: U256,
    path: &[Address],
    to: Address,
    deadline: U256,
) -> Result<Vec<u8>> {
    encode_call(
        &swap_exact_tokens_for_eth(),
        &[
            Token::Uint(amount_in),
            Token::Uint(amount_out_min),
            path_token(path),
            Token::Address(to),
            Token::Uint(deadline),
        ],
    )
}

pub fn swap_exact_tokens_for_tokens_data(
    amount_in: U256,
    amount_out_min: U256,
    path: &[Address],
    to: Address,
    deadline: U256,
) -> Result<Vec<u8>> {
    encode_call(
        &swap_exact_tokens_for_tokens(),
        &[
            Token::Uint(amount_in),
            Token::Uint(amount_out_min),
            path_token(path),
            Token::Address(to),
            Token::Uint(deadline),
        ],
    )
}

/// Factories return the zero address for pairs that were never created
pub fn pair_or_none(pair: Address) -> Option<Address> {
    if pair.is_zero() {
        None
    } else {
        Some(pair)
    }
}
