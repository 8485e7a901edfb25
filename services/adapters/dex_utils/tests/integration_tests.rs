//! Integration tests for DEX ABI library
//!
//! Checks call data against hand-assembled hex and decodes realistic
//! return payloads, including malformed ones.

use ethereum_types::{Address, U256};
use swapline_dex::abi::*;
use swapline_dex::selectors;
use swapline_dex::QuoteExactInputSingleParams;

/// Create H160 from hex string (for addresses)
fn h160_from_hex(hex: &str) -> Address {
    let bytes = hex::decode(hex.trim_start_matches("0x")).unwrap();
    let mut result = [0u8; 20];
    result[20 - bytes.len()..].copy_from_slice(&bytes);
    Address::from(result)
}

/// Left-pad a hex string to one 32-byte ABI word
fn word(hex: &str) -> String {
    format!("{:0>64}", hex.trim_start_matches("0x").to_lowercase())
}

const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
const V2_FACTORY: &str = "0x5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f";

#[test]
fn test_get_pair_calldata_matches_hand_encoding() {
    let call = uniswap_v2::get_pair_call(h160_from_hex(V2_FACTORY), h160_from_hex(WETH), h160_from_hex(USDC))
        .unwrap();

    let expected = format!("e6a43905{}{}", word(WETH), word(USDC));
    assert_eq!(hex::encode(&call.data), expected);
    assert_eq!(call.to, h160_from_hex(V2_FACTORY));
}

#[test]
fn test_get_reserves_decodes_realistic_payload() {
    // ~100 WETH / ~300k USDC, last block timestamp 1_700_000_000
    let payload = format!(
        "{}{}{}",
        word("56bc75e2d63100000"),
        word("45d964b800"),
        word("6553f100")
    );
    let data = hex::decode(payload).unwrap();

    let (reserve0, reserve1) = uniswap_v2::decode_reserves(&data).unwrap();
    assert_eq!(reserve0, U256::exp10(20));
    assert_eq!(reserve1, U256::from(300_000_000_000u64));
}

#[test]
fn test_truncated_payload_is_a_decode_error() {
    let data = hex::decode(word("01")).unwrap();
    let err = uniswap_v2::decode_reserves(&data).unwrap_err();
    assert!(matches!(err, AbiError::Decode { .. }));
}

#[test]
fn test_zero_pair_address() {
    let data = hex::decode(word("0")).unwrap();
    let pair = uniswap_v2::decode_get_pair(&data).unwrap();
    assert!(pair.is_zero());
    assert_eq!(uniswap_v2::pair_or_none(pair), None);
}

#[test]
fn test_quoter_call_and_output() {
    let params = QuoteExactInputSingleParams {
        token_in: h160_from_hex(WETH),
        token_out: h160_from_hex(USDC),
        amount_in: U256::exp10(18),
        fee: 500,
        sqrt_price_limit_x96: U256::zero(),
    };
    let quoter = h160_from_hex("0x61fFE014bA17989E743c5F6cB21bF9697530B21e");
    let call = uniswap_v3::quote_exact_input_single_call(quoter, &params).unwrap();

    let expected = format!(
        "c6a5026a{}{}{}{}{}",
        word(WETH),
        word(USDC),
        word("de0b6b3a7640000"),
        word("1f4"),
        word("0")
    );
    assert_eq!(hex::encode(&call.data), expected);

    let response = hex::decode(format!(
        "{}{}{}{}",
        word("b0a41a07"),
        word("1000000000000000000000000"),
        word("1"),
        word("1d4c0")
    ))
    .unwrap();
    let output = uniswap_v3::decode_quote_exact_input_single(&response).unwrap();
    assert_eq!(output.amount_out, U256::from(0xb0a41a07u64));
    assert_eq!(output.initialized_ticks_crossed, 1);
    assert_eq!(output.gas_estimate, U256::from(120_000));
}

#[test]
fn test_selectors_agree_with_calls() {
    let token = h160_from_hex(USDC);
    let owner = Address::repeat_byte(1);

    let decimals = erc20::decimals_call(token).unwrap();
    assert_eq!(decimals.selector(), Some(selectors::ERC20_DECIMALS));

    let balance = erc20::balance_of_call(token, owner).unwrap();
    assert_eq!(balance.selector(), Some(selectors::ERC20_BALANCE_OF));

    let reserves = uniswap_v2::get_reserves_call(token).unwrap();
    assert_eq!(reserves.selector(), Some(selectors::UNISWAP_V2_GET_RESERVES));
    assert_eq!(reserves.data.len(), 4);

    let amounts = uniswap_v2::get_amounts_out_call(token, U256::one(), &[token, owner]).unwrap();
    assert_eq!(amounts.selector(), Some(selectors::UNISWAP_V2_GET_AMOUNTS_OUT));
}

#[test]
fn test_function_structure() {
    let quote = uniswap_v3::quote_exact_input_single();
    assert_eq!(quote.inputs.len(), 1);
    assert_eq!(quote.outputs.len(), 4);
    assert_eq!(
        quote.signature(),
        "quoteExactInputSingle((address,address,uint256,uint24,uint160)):(uint256,uint160,uint32,uint256)"
    );

    let swap = uniswap_v2::swap_exact_eth_for_tokens();
    assert_eq!(swap.inputs[0].name, "amountOutMin");
    assert_eq!(swap.state_mutability, ethabi::StateMutability::Payable);
}
