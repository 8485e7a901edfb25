//! Token model and address resolution
//!
//! A native asset (ETH, MATIC) has no contract address. Pools only hold its
//! wrapped ERC-20, so every on-chain call addresses a native token through
//! its wrapped address, while swaps and approvals still need to know the
//! user is spending the native asset itself.

use crate::chains::{chain_id, parse_address, RegistryError};
use ethereum_types::Address;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Literal used in token lists for the chain's native asset
pub const NATIVE_MARKER: &str = "NATIVE";

const IPFS_SCHEME: &str = "ipfs://";
const IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Native token {symbol} has no wrapped address configured")]
    MissingWrappedAddress { symbol: String },

    #[error("Invalid token address: {0}")]
    InvalidAddress(String),

    #[error("No native token registered for chain {0}")]
    UnknownChain(u64),
}

impl From<RegistryError> for TokenError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::InvalidAddress(value) => TokenError::InvalidAddress(value),
            RegistryError::UnsupportedChain { chain_id, .. } => TokenError::UnknownChain(chain_id),
        }
    }
}

/// Where a token lives: the chain's native asset or an ERC-20 contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenAddress {
    Native,
    Contract(Address),
}

impl TokenAddress {
    pub fn contract(&self) -> Option<Address> {
        match self {
            TokenAddress::Native => None,
            TokenAddress::Contract(address) => Some(*address),
        }
    }
}

impl FromStr for TokenAddress {
    type Err = TokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case(NATIVE_MARKER) {
            return Ok(TokenAddress::Native);
        }
        Ok(TokenAddress::Contract(parse_address(value)?))
    }
}

impl fmt::Display for TokenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenAddress::Native => f.write_str(NATIVE_MARKER),
            TokenAddress::Contract(address) => write!(f, "{:?}", address),
        }
    }
}

impl Serialize for TokenAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TokenAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Canonical token descriptor; immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub address: TokenAddress,
    #[serde(default)]
    pub is_native: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapped_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Token {
    pub fn erc20(symbol: &str, name: &str, decimals: u8, address: Address) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            decimals,
            address: TokenAddress::Contract(address),
            is_native: false,
            wrapped_address: None,
            logo: None,
        }
    }

    pub fn native(symbol: &str, name: &str, decimals: u8, wrapped_address: Option<Address>) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            decimals,
            address: TokenAddress::Native,
            is_native: true,
            wrapped_address,
            logo: None,
        }
    }

    pub fn with_logo(mut self, logo: &str) -> Self {
        self.logo = Some(resolve_logo(logo));
        self
    }

    /// True for the chain's native asset, whichever way it was flagged
    pub fn is_native_token(&self) -> bool {
        self.is_native || self.address == TokenAddress::Native
    }

    /// Address used for every contract call involving this token
    pub fn route_address(&self) -> Result<Address, TokenError> {
        match (self.is_native_token(), self.address) {
            (false, TokenAddress::Contract(address)) => Ok(address),
            _ => self.wrapped_address.ok_or_else(|| TokenError::MissingWrappedAddress {
                symbol: self.symbol.clone(),
            }),
        }
    }

    /// Native assets are sent as call value and never approved
    pub fn needs_approval(&self) -> bool {
        !self.is_native_token()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.address)
    }
}

pub fn to_route_address(token: &Token) -> Result<Address, TokenError> {
    token.route_address()
}

pub fn is_native_token(token: &Token) -> bool {
    token.is_native_token()
}

pub fn needs_approval(token: &Token) -> bool {
    token.needs_approval()
}

/// Rewrite `ipfs://` logo URIs to an HTTP gateway
pub fn resolve_logo(logo: &str) -> String {
    match logo.strip_prefix(IPFS_SCHEME) {
        Some(path) => format!("{}{}", IPFS_GATEWAY, path),
        None => logo.to_string(),
    }
}

const ETH_LOGO: &str = "https://assets.coingecko.com/coins/images/279/small/ethereum.png";
const MATIC_LOGO: &str = "https://assets.coingecko.com/coins/images/4713/small/matic-token-icon.png";

/// The chain's native asset, pointing at its wrapped token for routing
pub fn native_token(chain: u64) -> Result<Token, TokenError> {
    let (symbol, name, wrapped, logo) = match chain {
        chain_id::MAINNET => ("ETH", "Ethereum", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", ETH_LOGO),
        chain_id::SEPOLIA => ("ETH", "Ethereum", "0xfFf9976782d46CC05630D1f6eBAb18b2324d6B14", ETH_LOGO),
        chain_id::POLYGON => ("MATIC", "Polygon", "0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270", MATIC_LOGO),
        chain_id::ARBITRUM => ("ETH", "Ethereum", "0x82aF49447D8a07e3bd95BD0d56f35241523fBab1", ETH_LOGO),
        chain_id::OPTIMISM | chain_id::BASE => {
            ("ETH", "Ethereum", "0x4200000000000000000000000000000000000006", ETH_LOGO)
        }
        other => return Err(TokenError::UnknownChain(other)),
    };

    Ok(Token::native(symbol, name, 18, Some(parse_address(wrapped)?)).with_logo(logo))
}

/// (symbol, name, decimals, address, logo)
type RawToken = (&'static str, &'static str, u8, &'static str, &'static str);

const MAINNET_TOKENS: &[RawToken] = &[
    ("WETH", "Wrapped Ether", 18, "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", "https://assets.coingecko.com/coins/images/2518/small/weth.png"),
    ("USDC", "USD Coin", 6, "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "https://assets.coingecko.com/coins/images/6319/small/USD_Coin_icon.png"),
    ("USDT", "Tether USD", 6, "0xdAC17F958D2ee523a2206206994597C13D831ec7", "https://assets.coingecko.com/coins/images/325/small/Tether.png"),
    ("DAI", "Dai Stablecoin", 18, "0x6B175474E89094C44Da98b954EedeAC495271d0F", "https://assets.coingecko.com/coins/images/9956/small/Badge_Dai.png"),
    ("UNI", "Uniswap", 18, "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984", "https://assets.coingecko.com/coins/images/12504/small/uni.jpg"),
    ("LINK", "ChainLink Token", 18, "0x514910771AF9Ca656af840dff83E8264EcF986CA", "https://assets.coingecko.com/coins/images/877/small/chainlink-new-logo.png"),
    ("WBTC", "Wrapped BTC", 8, "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599", "https://assets.coingecko.com/coins/images/7598/small/wrapped_bitcoin_wbtc.png"),
];

const SEPOLIA_TOKENS: &[RawToken] = &[
    ("WETH", "Wrapped Ether", 18, "0xfFf9976782d46CC05630D1f6eBAb18b2324d6B14", "https://assets.coingecko.com/coins/images/2518/small/weth.png"),
    ("USDC", "USD Coin", 6, "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238", "https://assets.coingecko.com/coins/images/6319/small/USD_Coin_icon.png"),
    ("DAI", "Dai Stablecoin", 18, "0x68194a729C2450ad26072b3D33ADaCbcef39D574", "https://assets.coingecko.com/coins/images/9956/small/Badge_Dai.png"),
];

/// Built-in tokens for `chain`, native asset first
///
/// Chains without a curated list only get their native asset.
pub fn builtin_tokens(chain: u64) -> Result<Vec<Token>, TokenError> {
    let raw = match chain {
        chain_id::MAINNET => MAINNET_TOKENS,
        chain_id::SEPOLIA => SEPOLIA_TOKENS,
        _ => &[],
    };

    let mut tokens = vec![native_token(chain)?];
    for &(symbol, name, decimals, address, logo) in raw {
        tokens.push(Token::erc20(symbol, name, decimals, parse_address(address)?).with_logo(logo));
    }
    Ok(tokens)
}

const POPULAR_SYMBOLS: [&str; 7] = ["WETH", "USDC", "USDT", "DAI", "WBTC", "UNI", "LINK"];

/// Native assets plus the well-known majors, for quick pickers
pub fn popular_tokens(tokens: &[Token]) -> Vec<Token> {
    tokens
        .iter()
        .filter(|t| {
            t.is_native_token() || POPULAR_SYMBOLS.iter().any(|s| s.eq_ignore_ascii_case(&t.symbol))
        })
        .cloned()
        .collect()
}

/// One entry of a standard token-list document
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenListEntry {
    pub chain_id: u64,
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    #[serde(default, rename = "logoURI")]
    pub logo_uri: Option<String>,
}

/// Token-list JSON as published at tokens.uniswap.org
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenList {
    pub name: String,
    pub tokens: Vec<TokenListEntry>,
}

impl TokenList {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Tokens deployed on `chain`, preceded by the chain's native asset
    ///
    /// Entries with malformed addresses are skipped.
    pub fn tokens_for_chain(&self, chain: u64) -> Result<Vec<Token>, TokenError> {
        let mut tokens = vec![native_token(chain)?];
        for entry in self.tokens.iter().filter(|e| e.chain_id == chain) {
            let Ok(address) = parse_address(&entry.address) else {
                tracing::debug!("Skipping {} with invalid address {}", entry.symbol, entry.address);
                continue;
            };
            let mut token = Token::erc20(&entry.symbol, &entry.name, entry.decimals, address);
            token.logo = entry.logo_uri.as_deref().map(resolve_logo);
            tokens.push(token);
        }
        Ok(tokens)
    }
}

/// Symbol and address lookup over one chain's tokens
#[derive(Debug, Clone, Default)]
pub struct TokenBook {
    tokens: Vec<Token>,
}

impl TokenBook {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn builtin(chain: u64) -> Result<Self, TokenError> {
        Ok(Self::new(builtin_tokens(chain)?))
    }

    /// Case-insensitive symbol match, first entry wins
    pub fn by_symbol(&self, symbol: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Contract address match; never returns the native asset
    pub fn by_address(&self, address: Address) -> Option<&Token> {
        self.tokens.iter().find(|t| t.address == TokenAddress::Contract(address))
    }

    /// Resolve a CLI-style identifier: symbol, `NATIVE`, or hex address
    pub fn resolve(&self, query: &str) -> Option<&Token> {
        match query.parse::<TokenAddress>() {
            Ok(TokenAddress::Contract(address)) => self.by_address(address),
            Ok(TokenAddress::Native) => self.tokens.iter().find(|t| t.is_native_token()),
            Err(_) => self.by_symbol(query),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
