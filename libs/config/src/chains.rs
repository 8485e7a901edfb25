//! Chain registry: per-chain contract addresses for each protocol family
//!
//! The constant-product (Uniswap V2) and concentrated-liquidity (Uniswap V3)
//! deployments are kept in separate tables. A chain can host a V2 fork
//! while the V3 quoter is missing, and a lookup for a chain that has no
//! entry is an error rather than a silent fallback to mainnet.

use ethereum_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Chain identifiers with built-in deployments
pub mod chain_id {
    pub const MAINNET: u64 = 1;
    pub const OPTIMISM: u64 = 10;
    pub const POLYGON: u64 = 137;
    pub const BASE: u64 = 8453;
    pub const ARBITRUM: u64 = 42161;
    pub const SEPOLIA: u64 = 11_155_111;
}

/// Human-readable chain name for logs and CLI output
pub fn chain_name(id: u64) -> &'static str {
    match id {
        chain_id::MAINNET => "ethereum",
        chain_id::OPTIMISM => "optimism",
        chain_id::POLYGON => "polygon",
        chain_id::BASE => "base",
        chain_id::ARBITRUM => "arbitrum",
        chain_id::SEPOLIA => "sepolia",
        _ => "unknown",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolFamily {
    /// Uniswap V2 style reserve pairs
    #[serde(alias = "v2")]
    ConstantProduct,
    /// Uniswap V3 style fee-tiered pools
    #[serde(alias = "v3")]
    ConcentratedLiquidity,
}

impl fmt::Display for ProtocolFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolFamily::ConstantProduct => write!(f, "uniswap-v2"),
            ProtocolFamily::ConcentratedLiquidity => write!(f, "uniswap-v3"),
        }
    }
}

/// Calling convention of a concentrated-liquidity swap router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouterKind {
    /// SwapRouter: `deadline` is a field of the swap struct
    #[default]
    SwapRouter,
    /// SwapRouter02: no `deadline` field; checked by `multicall(uint256,bytes[])`
    SwapRouter02,
}

/// Contract addresses of one protocol family on one chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainAddresses {
    pub factory: Address,
    pub router: Address,
    /// Absent when the quoting contract is not deployed on the chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoter: Option<Address>,
    /// Unused for constant-product deployments
    #[serde(default)]
    pub router_kind: RouterKind,
}

impl ChainAddresses {
    /// Deployment with the original SwapRouter calling convention
    pub fn new(factory: Address, router: Address, quoter: Option<Address>) -> Self {
        Self {
            factory,
            router,
            quoter,
            router_kind: RouterKind::SwapRouter,
        }
    }

    pub fn with_router_kind(mut self, router_kind: RouterKind) -> Self {
        self.router_kind = router_kind;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Unsupported chain {chain_id} for {family}")]
    UnsupportedChain { family: ProtocolFamily, chain_id: u64 },

    #[error("Invalid address literal: {0}")]
    InvalidAddress(String),
}

/// (chain, factory, router, quoter, router kind)
type RawDeployment = (u64, &'static str, &'static str, Option<&'static str>, RouterKind);

const UNISWAP_V2_DEPLOYMENTS: &[RawDeployment] = &[
    (
        chain_id::MAINNET,
        "0x5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f",
        "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D",
        None,
        RouterKind::SwapRouter,
    ),
    (
        chain_id::SEPOLIA,
        "0xF62c03E08ada871A0bEb309762E260a7a6a880E6",
        "0xeE567Fe1712Faf6149d80dA1E6934E354124CfE3",
        None,
        RouterKind::SwapRouter,
    ),
    (
        chain_id::POLYGON,
        "0x9e5A52f57b3038F1B8EeE45F28b3C1967e22799C",
        "0xedf6066a2b290C185783862C7F4776A2C8077AD1",
        None,
        RouterKind::SwapRouter,
    ),
    (
        chain_id::ARBITRUM,
        "0xf1D7CC64Fb4452F05c498126312eBE29f30Fbcf9",
        "0x4752ba5DBc23f44D87826276BF6Fd6b1C372aD24",
        None,
        RouterKind::SwapRouter,
    ),
    (
        chain_id::OPTIMISM,
        "0x0c3c1c532F1e39EdF36BE9Fe0bE1410313E074Bf",
        "0x4A7b5Da61326A6379179b40d00F57E5bbDC962c2",
        None,
        RouterKind::SwapRouter,
    ),
    (
        chain_id::BASE,
        "0x8909Dc15e40173Ff4699343b6eB8132c65e18eC6",
        "0x4752ba5DBc23f44D87826276BF6Fd6b1C372aD24",
        None,
        RouterKind::SwapRouter,
    ),
];

const UNISWAP_V3_FACTORY: &str = "0x1F98431c8aD98523631AE4a59f267346ea31F984";
const UNISWAP_V3_SWAP_ROUTER: &str = "0xE592427A0AEce92De3Edee1F18E0157C05861564";
const UNISWAP_V3_QUOTER_V2: &str = "0x61fFE014bA17989E743c5F6cB21bF9697530B21e";

const UNISWAP_V3_DEPLOYMENTS: &[RawDeployment] = &[
    (chain_id::MAINNET, UNISWAP_V3_FACTORY, UNISWAP_V3_SWAP_ROUTER, Some(UNISWAP_V3_QUOTER_V2), RouterKind::SwapRouter),
    (chain_id::POLYGON, UNISWAP_V3_FACTORY, UNISWAP_V3_SWAP_ROUTER, Some(UNISWAP_V3_QUOTER_V2), RouterKind::SwapRouter),
    (chain_id::ARBITRUM, UNISWAP_V3_FACTORY, UNISWAP_V3_SWAP_ROUTER, Some(UNISWAP_V3_QUOTER_V2), RouterKind::SwapRouter),
    (chain_id::OPTIMISM, UNISWAP_V3_FACTORY, UNISWAP_V3_SWAP_ROUTER, Some(UNISWAP_V3_QUOTER_V2), RouterKind::SwapRouter),
    (
        chain_id::SEPOLIA,
        "0x0227628f3F023bb0B980b67D528571c95c6DaC1c",
        "0x3bFA4769FB09eefC5a80d6E87c3B9C650f7Ae48E",
        Some("0xEd1f6473345F45b75F8179591dd5bA1888cf2FB3"),
        RouterKind::SwapRouter02,
    ),
    (
        chain_id::BASE,
        "0x33128a8fC17869897dcE68Ed026d694621f6FDfD",
        "0x2626664c2603336E57B271c5C0b26F421741e481",
        Some("0x3d4e44Eb1374240CE5F1B871ab261CD16335B76a"),
        RouterKind::SwapRouter02,
    ),
];

/// Parse a `0x`-prefixed hex address
pub fn parse_address(value: &str) -> Result<Address, RegistryError> {
    value
        .trim()
        .parse::<Address>()
        .map_err(|_| RegistryError::InvalidAddress(value.to_string()))
}

/// Static lookup of protocol deployments by chain
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    constant_product: HashMap<u64, ChainAddresses>,
    concentrated_liquidity: HashMap<u64, ChainAddresses>,
}

impl ChainRegistry {
    /// Registry with no deployments, for tests and fully custom setups
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry populated with the public Uniswap deployments
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::empty();
        for (family, table) in [
            (ProtocolFamily::ConstantProduct, UNISWAP_V2_DEPLOYMENTS),
            (ProtocolFamily::ConcentratedLiquidity, UNISWAP_V3_DEPLOYMENTS),
        ] {
            for &(chain, factory, router, quoter, router_kind) in table {
                let addresses = ChainAddresses::new(
                    parse_address(factory)?,
                    parse_address(router)?,
                    quoter.map(parse_address).transpose()?,
                )
                .with_router_kind(router_kind);
                registry.insert(family, chain, addresses);
            }
        }
        Ok(registry)
    }

    /// Add or replace the deployment of `family` on `chain`
    pub fn insert(&mut self, family: ProtocolFamily, chain: u64, addresses: ChainAddresses) {
        self.table_mut(family).insert(chain, addresses);
    }

    pub fn with_override(mut self, family: ProtocolFamily, chain: u64, addresses: ChainAddresses) -> Self {
        self.insert(family, chain, addresses);
        self
    }

    pub fn addresses_for(&self, family: ProtocolFamily, chain: u64) -> Result<&ChainAddresses, RegistryError> {
        self.table(family)
            .get(&chain)
            .ok_or(RegistryError::UnsupportedChain { family, chain_id: chain })
    }

    /// Chains with a deployment for `family`, ascending
    pub fn chains(&self, family: ProtocolFamily) -> Vec<u64> {
        let mut chains: Vec<u64> = self.table(family).keys().copied().collect();
        chains.sort_unstable();
        chains
    }

    fn table(&self, family: ProtocolFamily) -> &HashMap<u64, ChainAddresses> {
        match family {
            ProtocolFamily::ConstantProduct => &self.constant_product,
            ProtocolFamily::ConcentratedLiquidity => &self.concentrated_liquidity,
        }
    }

    fn table_mut(&mut self, family: ProtocolFamily) -> &mut HashMap<u64, ChainAddresses> {
        match family {
            ProtocolFamily::ConstantProduct => &mut self.constant_product,
            ProtocolFamily::ConcentratedLiquidity => &mut self.concentrated_liquidity,
        }
    }
}
