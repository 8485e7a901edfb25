//! Uniswap V3 and compatible protocol ABIs
//!
//! QuoterV2 single-hop quotes and exact-input swaps for both router
//! generations. All take their arguments as a single struct, encoded as an
//! ABI tuple. SwapRouter02 dropped `deadline` from the struct; its deadline
//! is enforced by wrapping the swap in `multicall(uint256,bytes[])`.

use super::{as_uint, decode_output, encode_call, function, output_at, param, ContractCall, Result};
use ethabi::{Function, ParamType, StateMutability, Token};
use ethereum_types::{Address, U256};

/// Arguments of `QuoterV2.quoteExactInputSingle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteExactInputSingleParams {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    /// Pool fee in pips (3000 = 0.3%)
    pub fee: u32,
    /// Zero disables the price limit
    pub sqrt_price_limit_x96: U256,
}

/// Decoded `quoteExactInputSingle` result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoterOutput {
    pub amount_out: U256,
    pub sqrt_price_x96_after: U256,
    pub initialized_ticks_crossed: u32,
    pub gas_estimate: U256,
}

/// Arguments of `exactInputSingle` on either router
///
/// `deadline` goes into the struct for SwapRouter and into the enclosing
/// `multicall` for SwapRouter02.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactInputSingleParams {
    pub token_in: Address,
    pub token_out: Address,
    pub fee: u32,
    pub recipient: Address,
    pub deadline: U256,
    pub amount_in: U256,
    pub amount_out_minimum: U256,
    pub sqrt_price_limit_x96: U256,
}

/// function quoteExactInputSingle((address tokenIn, address tokenOut, uint256 amountIn, uint24 fee, uint160 sqrtPriceLimitX96) params)
///     returns (uint256 amountOut, uint160 sqrtPriceX96After, uint32 initializedTicksCrossed, uint256 gasEstimate)
///
/// Not a view function: QuoterV2 simulates the swap and reverts internally,
/// so it is only ever invoked through `eth_call`.
pub fn quote_exact_input_single() -> Function {
    function(
        "quoteExactInputSingle",
        vec![param(
            "params",
            ParamType::Tuple(vec![
                ParamType::Address,
                ParamType::Address,
                ParamType::Uint(256),
                ParamType::Uint(24),
                ParamType::Uint(160),
            ]),
        )],
        vec![
            param("amountOut", ParamType::Uint(256)),
            param("sqrtPriceX96After", ParamType::Uint(160)),
            param("initializedTicksCrossed", ParamType::Uint(32)),
            param("gasEstimate", ParamType::Uint(256)),
        ],
        StateMutability::NonPayable,
    )
}

/// function exactInputSingle((address tokenIn, address tokenOut, uint24 fee, address recipient, uint256 deadline,
///     uint256 amountIn, uint256 amountOutMinimum, uint160 sqrtPriceLimitX96) params) payable returns (uint256 amountOut)
pub fn exact_input_single() -> Function {
    function(
        "exactInputSingle",
        vec![param(
            "params",
            ParamType::Tuple(vec![
                ParamType::Address,
                ParamType::Address,
                ParamType::Uint(24),
                ParamType::Address,
                ParamType::Uint(256),
                ParamType::Uint(256),
                ParamType::Uint(256),
                ParamType::Uint(160),
            ]),
        )],
        vec![param("amountOut", ParamType::Uint(256))],
        StateMutability::Payable,
    )
}

/// SwapRouter02:
/// function exactInputSingle((address tokenIn, address tokenOut, uint24 fee, address recipient,
///     uint256 amountIn, uint256 amountOutMinimum, uint160 sqrtPriceLimitX96) params) payable returns (uint256 amountOut)
pub fn router02_exact_input_single() -> Function {
    function(
        "exactInputSingle",
        vec![param(
            "params",
            ParamType::Tuple(vec![
                ParamType::Address,
                ParamType::Address,
                ParamType::Uint(24),
                ParamType::Address,
                ParamType::Uint(256),
                ParamType::Uint(256),
                ParamType::Uint(160),
            ]),
        )],
        vec![param("amountOut", ParamType::Uint(256))],
        StateMutability::Payable,
    )
}

/// SwapRouter02:
/// function multicall(uint256 deadline, bytes[] data) payable returns (bytes[] results)
pub fn router02_multicall() -> Function {
    function(
        "multicall",
        vec![
            param("deadline", ParamType::Uint(256)),
            param("data", ParamType::Array(Box::new(ParamType::Bytes))),
        ],
        vec![param("results", ParamType::Array(Box::new(ParamType::Bytes)))],
        StateMutability::Payable,
    )
}

pub fn quote_exact_input_single_call(
    quoter: Address,
    params: &QuoteExactInputSingleParams,
) -> Result<ContractCall> {
    let tuple = Token::Tuple(vec![
        Token::Address(params.token_in),
        Token::Address(params.token_out),
        Token::Uint(params.amount_in),
        Token::Uint(U256::from(params.fee)),
        Token::Uint(params.sqrt_price_limit_x96),
    ]);

    Ok(ContractCall {
        to: quoter,
        data: encode_call(&quote_exact_input_single(), &[tuple])?,
    })
}

pub fn decode_quote_exact_input_single(data: &[u8]) -> Result<QuoterOutput> {
    let function = quote_exact_input_single();
    let tokens = decode_output(&function, data)?;

    Ok(QuoterOutput {
        amount_out: output_at(&function, &tokens, 0, "uint256 amountOut", as_uint)?,
        sqrt_price_x96_after: output_at(&function, &tokens, 1, "uint160 sqrtPriceX96After", as_uint)?,
        initialized_ticks_crossed: output_at(&function, &tokens, 2, "uint32 initializedTicksCrossed", as_uint)?
            .low_u32(),
        gas_estimate: output_at(&function, &tokens, 3, "uint256 gasEstimate", as_uint)?,
    })
}

pub fn exact_input_single_data(params: &ExactInputSingleParams) -> Result<Vec<u8>> {
    let tuple = Token::Tuple(vec![
        Token::Address(params.token_in),
        Token::Address(params.token_out),
        Token::Uint(U256::from(params.fee)),
        Token::Address(params.recipient),
        Token::Uint(params.deadline),
        Token::Uint(params.amount_in),
        Token::Uint(params.amount_out_minimum),
        Token::Uint(params.sqrt_price_limit_x96),
    ]);

    encode_call(&exact_input_single(), &[tuple])
}

/// SwapRouter02 `exactInputSingle` inside a deadline-checked `multicall`
pub fn router02_exact_input_single_data(params: &ExactInputSingleParams) -> Result<Vec<u8>> {
    let tuple = Token::Tuple(vec![
        Token::Address(params.token_in),
        Token::Address(params.token_out),
        Token::Uint(U256::from(params.fee)),
        Token::Address(params.recipient),
        Token::Uint(params.amount_in),
        Token::Uint(params.amount_out_minimum),
        Token::Uint(params.sqrt_price_limit_x96),
    ]);
    let swap = encode_call(&router02_exact_input_single(), &[tuple])?;

    encode_call(
        &router02_multicall(),
        &[Token::Uint(params.deadline), Token::Array(vec![Token::Bytes(swap)])],
    )
}
