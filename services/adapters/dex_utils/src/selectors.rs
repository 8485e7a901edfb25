//! Function Selector Constants
//!
//! First four bytes of keccak256 of each canonical function signature.
//! Mock chain readers and call routing match on these, so they are kept as
//! constants and checked against the ABI definitions in tests.

// =============================================================================
// ERC-20
// =============================================================================

/// keccak256("decimals()")
pub const ERC20_DECIMALS: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];

/// keccak256("allowance(address,address)")
pub const ERC20_ALLOWANCE: [u8; 4] = [0xdd, 0x62, 0xed, 0x3e];

/// keccak256("approve(address,uint256)")
pub const ERC20_APPROVE: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];

/// keccak256("balanceOf(address)")
pub const ERC20_BALANCE_OF: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

// =============================================================================
// Uniswap V2
// =============================================================================

/// keccak256("getPair(address,address)")
pub const UNISWAP_V2_GET_PAIR: [u8; 4] = [0xe6, 0xa4, 0x39, 0x05];

/// keccak256("token0()")
pub const UNISWAP_V2_TOKEN0: [u8; 4] = [0x0d, 0xfe, 0x16, 0x81];

/// keccak256("getReserves()")
pub const UNISWAP_V2_GET_RESERVES: [u8; 4] = [0x09, 0x02, 0xf1, 0xac];

/// keccak256("getAmountsOut(uint256,address[])")
pub const UNISWAP_V2_GET_AMOUNTS_OUT: [u8; 4] = [0xd0, 0x6c, 0xa6, 0x1f];

/// keccak256("swapExactETHForTokens(uint256,address[],address,uint256)")
pub const UNISWAP_V2_SWAP_EXACT_ETH_FOR_TOKENS: [u8; 4] = [0x7f, 0xf3, 0x6a, 0xb5];

/// keccak256("swapExactTokensForETH(uint256,uint256,address[],address,uint256)")
pub const UNISWAP_V2_SWAP_EXACT_TOKENS_FOR_ETH: [u8; 4] = [0x18, 0xcb, 0xaf, 0xe5];

/// keccak256("swapExactTokensForTokens(uint256,uint256,address[],address,uint256)")
pub const UNISWAP_V2_SWAP_EXACT_TOKENS_FOR_TOKENS: [u8; 4] = [0x38, 0xed, 0x17, 0x39];

// =============================================================================
// Uniswap V3
// =============================================================================

/// keccak256("quoteExactInputSingle((address,address,uint256,uint24,uint160))")
pub const UNISWAP_V3_QUOTE_EXACT_INPUT_SINGLE: [u8; 4] = [0xc6, 0xa5, 0x02, 0x6a];

/// keccak256("exactInputSingle((address,address,uint24,address,uint256,uint256,uint256,uint160))")
pub const UNISWAP_V3_EXACT_INPUT_SINGLE: [u8; 4] = [0x41, 0x4b, 0xf3, 0x89];

/// keccak256("exactInputSingle((address,address,uint24,address,uint256,uint256,uint160))")
pub const SWAP_ROUTER_02_EXACT_INPUT_SINGLE: [u8; 4] = [0x04, 0xe4, 0x5a, 0xaf];

/// keccak256("multicall(uint256,bytes[])")
pub const SWAP_ROUTER_02_MULTICALL: [u8; 4] = [0x5a, 0xe4, 0x01, 0xdc];

/// Render a selector as `0x`-prefixed hex
pub fn to_hex_string(selector: &[u8; 4]) -> String {
    format!(
        "0x{:02x}{:02x}{:02x}{:02x}",
        selector[0], selector[1], selector[2], selector[3]
    )
}

/// Human-readable name for a known selector, for logs
pub fn describe(selector: [u8; 4]) -> Option<&'static str> {
    let name = match selector {
        ERC20_DECIMALS => "decimals",
        ERC20_ALLOWANCE => "allowance",
        ERC20_APPROVE => "approve",
        ERC20_BALANCE_OF => "balanceOf",
        UNISWAP_V2_GET_PAIR => "getPair",
        UNISWAP_V2_TOKEN0 => "token0",
        UNISWAP_V2_GET_RESERVES => "getReserves",
        UNISWAP_V2_GET_AMOUNTS_OUT => "getAmountsOut",
        UNISWAP_V2_SWAP_EXACT_ETH_FOR_TOKENS => "swapExactETHForTokens",
        UNISWAP_V2_SWAP_EXACT_TOKENS_FOR_ETH => "swapExactTokensForETH",
        UNISWAP_V2_SWAP_EXACT_TOKENS_FOR_TOKENS => "swapExactTokensForTokens",
        UNISWAP_V3_QUOTE_EXACT_INPUT_SINGLE => "quoteExactInputSingle",
        UNISWAP_V3_EXACT_INPUT_SINGLE | SWAP_ROUTER_02_EXACT_INPUT_SINGLE => "exactInputSingle",
        SWAP_ROUTER_02_MULTICALL => "multicall",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{erc20, uniswap_v2, uniswap_v3};

    #[test]
    fn test_constants_match_abi_definitions() {
        let cases = [
            (ERC20_DECIMALS, erc20::decimals()),
            (ERC20_ALLOWANCE, erc20::allowance()),
            (ERC20_APPROVE, erc20::approve()),
            (ERC20_BALANCE_OF, erc20::balance_of()),
            (UNISWAP_V2_GET_PAIR, uniswap_v2::get_pair()),
            (UNISWAP_V2_TOKEN0, uniswap_v2::token0()),
            (UNISWAP_V2_GET_RESERVES, uniswap_v2::get_reserves()),
            (UNISWAP_V2_GET_AMOUNTS_OUT, uniswap_v2::get_amounts_out()),
            (UNISWAP_V2_SWAP_EXACT_ETH_FOR_TOKENS, uniswap_v2::swap_exact_eth_for_tokens()),
            (UNISWAP_V2_SWAP_EXACT_TOKENS_FOR_ETH, uniswap_v2::swap_exact_tokens_for_eth()),
            (UNISWAP_V2_SWAP_EXACT_TOKENS_FOR_TOKENS, uniswap_v2::swap_exact_tokens_for_tokens()),
            (UNISWAP_V3_QUOTE_EXACT_INPUT_SINGLE, uniswap_v3::quote_exact_input_single()),
            (UNISWAP_V3_EXACT_INPUT_SINGLE, uniswap_v3::exact_input_single()),
            (SWAP_ROUTER_02_EXACT_INPUT_SINGLE, uniswap_v3::router02_exact_input_single()),
            (SWAP_ROUTER_02_MULTICALL, uniswap_v3::router02_multicall()),
        ];

        for (constant, function) in cases {
            assert_eq!(
                constant,
                function.short_signature(),
                "selector mismatch for {}",
                function.signature()
            );
        }
    }

    #[test]
    fn test_describe_and_hex() {
        assert_eq!(describe(UNISWAP_V2_GET_RESERVES), Some("getReserves"));
        assert_eq!(describe([0, 0, 0, 0]), None);
        assert_eq!(to_hex_string(&ERC20_APPROVE), "0x095ea7b3");
    }
}
