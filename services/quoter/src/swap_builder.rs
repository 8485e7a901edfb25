//! Swap parameter construction
//!
//! Turns a resolved quote into router call parameters. Nothing here signs
//! or submits; the bundle is handed to whatever wallet integration the
//! caller uses.

use ethereum_types::{Address, U256};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::SystemTime;
use swapline_amm::{FeeTier, SlippageTolerance};
use swapline_config::{quoting, ChainRegistry, ProtocolFamily, RouterKind, Token};
use swapline_dex::{uniswap_v2, uniswap_v3, ExactInputSingleParams};
use tracing::debug;

use pool_metadata_adapter::cache::unix_seconds;

use crate::error::BuildError;
use crate::quote::Quote;

/// Which side of the swap, if any, is the chain's native asset
///
/// Decided by the tokens' native flag, never by routing address: WETH
/// routes through the same address as ETH but is a plain ERC-20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteShape {
    NativeToToken,
    TokenToNative,
    TokenToToken,
}

impl RouteShape {
    /// A native input wins when both sides are native
    pub fn classify(token_in: &Token, token_out: &Token) -> RouteShape {
        if token_in.is_native_token() {
            RouteShape::NativeToToken
        } else if token_out.is_native_token() {
            RouteShape::TokenToNative
        } else {
            RouteShape::TokenToToken
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteShape::NativeToToken => "native_to_token",
            RouteShape::TokenToNative => "token_to_native",
            RouteShape::TokenToToken => "token_to_token",
        }
    }
}

/// Everything needed to submit one swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapParameters {
    pub protocol: ProtocolFamily,
    pub shape: RouteShape,
    /// Router the transaction is sent to
    pub router: Address,
    /// Native value attached to the call
    pub value: U256,
    pub calldata: Vec<u8>,
    /// Routing addresses, input first
    pub path: Vec<Address>,
    pub amount_in: U256,
    pub min_amount_out: U256,
    /// Unix seconds
    pub deadline: u64,
    pub recipient: Address,
    pub fee_tier: Option<FeeTier>,
}

impl SwapParameters {
    pub fn to_json(&self) -> Value {
        json!({
            "protocol": self.protocol.to_string(),
            "shape": self.shape.as_str(),
            "to": format!("{:?}", self.router),
            "value": self.value.to_string(),
            "data": format!("0x{}", hex::encode(&self.calldata)),
            "path": self.path.iter().map(|a| format!("{:?}", a)).collect::<Vec<_>>(),
            "amountIn": self.amount_in.to_string(),
            "minAmountOut": self.min_amount_out.to_string(),
            "deadline": self.deadline,
            "recipient": format!("{:?}", self.recipient),
            "feeTier": self.fee_tier.map(|tier| tier.pips()),
        })
    }
}

/// Inputs of one swap construction
#[derive(Debug, Clone, Copy)]
pub struct SwapRequest<'a> {
    pub protocol: ProtocolFamily,
    /// The resolved best quote; `None` when quoting found nothing
    pub quote: Option<&'a Quote>,
    pub token_in: &'a Token,
    pub token_out: &'a Token,
    pub slippage_bps: u32,
    pub recipient: Address,
    pub chain_id: u64,
}

#[derive(Debug, Clone)]
pub struct SwapBuilder {
    registry: Arc<ChainRegistry>,
    deadline_secs: u64,
}

impl SwapBuilder {
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        Self {
            registry,
            deadline_secs: quoting::SWAP_DEADLINE_SECS,
        }
    }

    pub fn build(&self, request: &SwapRequest<'_>) -> Result<SwapParameters, BuildError> {
        self.build_at(request, clock_seconds(SystemTime::now())?)
    }

    /// `build` with an explicit clock
    pub fn build_at(&self, request: &SwapRequest<'_>, now: u64) -> Result<SwapParameters, BuildError> {
        let slippage = SlippageTolerance::from_bps(request.slippage_bps).map_err(|_| {
            BuildError::InvalidSlippage {
                bps: request.slippage_bps,
            }
        })?;

        let quote = request.quote.ok_or(BuildError::NoRoute {
            reason: "no quote resolved",
        })?;
        if quote.protocol != request.protocol {
            return Err(BuildError::NoRoute {
                reason: "quote is for another protocol family",
            });
        }

        let route_in = request.token_in.route_address()?;
        let route_out = request.token_out.route_address()?;
        if quote.token_in != route_in || quote.token_out != route_out {
            return Err(BuildError::NoRoute {
                reason: "quote is for another token pair",
            });
        }

        let addresses = self.registry.addresses_for(request.protocol, request.chain_id)?;
        let router = addresses.router;

        let shape = RouteShape::classify(request.token_in, request.token_out);
        let min_amount_out = slippage.minimum_output(quote.amount_out)?;
        let deadline = now + self.deadline_secs;
        let path = vec![route_in, route_out];
        let value = match shape {
            RouteShape::NativeToToken => quote.amount_in,
            _ => U256::zero(),
        };

        let (calldata, fee_tier) = match request.protocol {
            ProtocolFamily::ConstantProduct => {
                let recipient = request.recipient;
                let deadline = U256::from(deadline);
                let calldata = match shape {
                    RouteShape::NativeToToken => {
                        uniswap_v2::swap_exact_eth_for_tokens_data(min_amount_out, &path, recipient, deadline)?
                    }
                    RouteShape::TokenToNative => uniswap_v2::swap_exact_tokens_for_eth_data(
                        quote.amount_in,
                        min_amount_out,
                        &path,
                        recipient,
                        deadline,
                    )?,
                    RouteShape::TokenToToken => uniswap_v2::swap_exact_tokens_for_tokens_data(
                        quote.amount_in,
                        min_amount_out,
                        &path,
                        recipient,
                        deadline,
                    )?,
                };
                (calldata, None)
            }
            ProtocolFamily::ConcentratedLiquidity => {
                let tier = quote.fee_tier.ok_or(BuildError::NoRoute {
                    reason: "no fee tier resolved",
                })?;
                let params = ExactInputSingleParams {
                    token_in: route_in,
                    token_out: route_out,
                    fee: tier.pips(),
                    recipient: request.recipient,
                    deadline: U256::from(deadline),
                    amount_in: quote.amount_in,
                    amount_out_minimum: min_amount_out,
                    sqrt_price_limit_x96: U256::zero(),
                };
                let calldata = match addresses.router_kind {
                    RouterKind::SwapRouter => uniswap_v3::exact_input_single_data(&params)?,
                    RouterKind::SwapRouter02 => uniswap_v3::router02_exact_input_single_data(&params)?,
                };
                (calldata, Some(tier))
            }
        };

        debug!(
            "Built {} {} swap: min out {} (slippage {} bps), deadline {}",
            request.protocol,
            shape.as_str(),
            min_amount_out,
            slippage.bps(),
            deadline
        );

        Ok(SwapParameters {
            protocol: request.protocol,
            shape,
            router,
            value,
            calldata,
            path,
            amount_in: quote.amount_in,
            min_amount_out,
            deadline,
            recipient: request.recipient,
            fee_tier,
        })
    }
}

/// Unix seconds of `time`; an error when the clock reads before the epoch
fn clock_seconds(time: SystemTime) -> Result<u64, BuildError> {
    unix_seconds(time).ok_or(BuildError::ClockBeforeEpoch)
}
