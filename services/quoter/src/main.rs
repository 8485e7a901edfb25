//! Swapline command-line quoter
//!
//! Quotes swaps against Uniswap V2 and V3 style deployments and prints the
//! result, or ready-to-submit swap and approval parameters, as JSON.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use ethereum_types::{Address, U256};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use swapline_amm::parse_units;
use swapline_config::{chain_name, parse_address, ProtocolFamily, QuoterConfig, Token, TokenBook, TokenList};
use swapline_quoter::{QuoteError, QuoteService, SwapRequest};

#[derive(Parser, Debug)]
#[command(name = "swapline")]
#[command(about = "Client-side DEX quotes and swap parameters")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Chain id (defaults to the configured default chain)
    #[arg(long, global = true)]
    chain: Option<u64>,

    /// Token-list JSON replacing the built-in tokens
    #[arg(long, global = true)]
    tokens: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Quote through the constant-product (V2) pair
    V2Quote(QuoteArgs),
    /// Quote every concentrated-liquidity (V3) fee tier
    V3Quote(QuoteArgs),
    /// Quote, then build router call parameters
    BuildSwap {
        #[command(flatten)]
        quote: QuoteArgs,

        #[arg(long, value_enum, default_value = "v2")]
        protocol: Protocol,

        /// Address receiving the output tokens
        #[arg(long)]
        recipient: String,

        /// Slippage tolerance in basis points (50 = 0.5%)
        #[arg(long)]
        slippage_bps: Option<u32>,
    },
    /// Decide whether an approval is needed before swapping
    NeedsApproval {
        /// Token symbol, address or NATIVE
        #[arg(long)]
        token: String,

        /// Amount to spend, in whole-token units
        #[arg(long)]
        amount: String,

        /// Current allowance in base units; read from chain when omitted
        #[arg(long)]
        allowance: Option<String>,

        /// Token owner, required when reading the allowance
        #[arg(long)]
        owner: Option<String>,

        #[arg(long, value_enum, default_value = "v2")]
        protocol: Protocol,
    },
}

#[derive(Args, Debug)]
struct QuoteArgs {
    /// Input token symbol, address or NATIVE
    #[arg(long)]
    from: String,

    /// Output token symbol, address or NATIVE
    #[arg(long)]
    to: String,

    /// Input amount in whole-token units
    #[arg(long)]
    amount: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Protocol {
    V2,
    V3,
}

impl From<Protocol> for ProtocolFamily {
    fn from(protocol: Protocol) -> Self {
        match protocol {
            Protocol::V2 => ProtocolFamily::ConstantProduct,
            Protocol::V3 => ProtocolFamily::ConcentratedLiquidity,
        }
    }
}

fn load_tokens(path: Option<&Path>, chain_id: u64) -> Result<TokenBook> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read token list {:?}", path))?;
            let list = TokenList::from_json(&raw).context("Failed to parse token list")?;
            debug!("Token list '{}' loaded", list.name);
            Ok(TokenBook::new(list.tokens_for_chain(chain_id)?))
        }
        None => Ok(TokenBook::builtin(chain_id)?),
    }
}

fn token<'a>(book: &'a TokenBook, query: &str) -> Result<&'a Token> {
    book.resolve(query)
        .ok_or_else(|| anyhow!("Unknown token '{}'", query))
}

fn quote_failed(err: QuoteError) -> anyhow::Error {
    if err.is_retryable() {
        anyhow!("{} (transient, retry later)", err)
    } else {
        anyhow!(err)
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Info for the binary and the library; `RUST_LOG` adds to it
fn log_filter() -> Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive("swapline=info".parse()?)
        .add_directive("swapline_quoter=info".parse()?))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so stdout stays JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter()?)
        .init();

    let config = QuoterConfig::load(cli.config.as_deref())?;
    let chain_id = cli.chain.unwrap_or(config.default_chain);
    let token_path = cli.tokens.clone().or_else(|| config.token_list.clone());
    let book = load_tokens(token_path.as_deref(), chain_id)?;
    let service = QuoteService::from_config(&config)?;

    info!("Quoting on {} ({}) with {} tokens", chain_name(chain_id), chain_id, book.len());

    match cli.command {
        Commands::V2Quote(args) => {
            let (token_in, token_out) = (token(&book, &args.from)?, token(&book, &args.to)?);
            let quote = service
                .get_constant_product_quote(&args.amount, token_in, token_out, chain_id)
                .await
                .map_err(quote_failed)?;
            print_json(&json!({ "quote": quote.map(|q| q.to_json()) }))?;
        }

        Commands::V3Quote(args) => {
            let (token_in, token_out) = (token(&book, &args.from)?, token(&book, &args.to)?);
            let quote = service
                .get_best_concentrated_liquidity_quote(&args.amount, token_in, token_out, chain_id)
                .await
                .map_err(quote_failed)?;
            print_json(&json!({ "quote": quote.map(|q| q.to_json()) }))?;
        }

        Commands::BuildSwap {
            quote: args,
            protocol,
            recipient,
            slippage_bps,
        } => {
            let (token_in, token_out) = (token(&book, &args.from)?, token(&book, &args.to)?);
            let recipient: Address = parse_address(&recipient)?;
            let family = ProtocolFamily::from(protocol);

            let quote = match family {
                ProtocolFamily::ConstantProduct => service
                    .get_constant_product_quote(&args.amount, token_in, token_out, chain_id)
                    .await
                    .map_err(quote_failed)?,
                ProtocolFamily::ConcentratedLiquidity => service
                    .get_best_concentrated_liquidity_quote(&args.amount, token_in, token_out, chain_id)
                    .await
                    .map_err(quote_failed)?
                    .map(|q| q.best),
            };

            let request = SwapRequest {
                protocol: family,
                quote: quote.as_ref(),
                token_in,
                token_out,
                slippage_bps: slippage_bps.unwrap_or(service.default_slippage().bps()),
                recipient,
                chain_id,
            };
            let swap = service.build_swap_parameters(&request)?;

            let approval = match &quote {
                Some(q) if token_in.needs_approval() => service.approval_for(family, chain_id, token_in, q.amount_in)?,
                _ => None,
            };

            print_json(&json!({
                "quote": quote.as_ref().map(|q| q.to_json()),
                "swap": swap.to_json(),
                "approval": approval.map(|a| a.to_json()),
            }))?;
        }

        Commands::NeedsApproval {
            token: query,
            amount,
            allowance,
            owner,
            protocol,
        } => {
            let token = token(&book, &query)?;
            let amount_in = parse_units(&amount, token.decimals)?;
            let family = ProtocolFamily::from(protocol);

            let (current, needs) = match (allowance, owner) {
                (Some(allowance), _) => {
                    let current = U256::from_dec_str(&allowance)
                        .map_err(|e| anyhow!("Invalid allowance '{}': {:?}", allowance, e))?;
                    (Some(current), service.needs_approval_for(token, amount_in, current))
                }
                (None, Some(owner)) => {
                    let owner = parse_address(&owner)?;
                    let check = service
                        .check_allowance(family, chain_id, token, owner, amount_in)
                        .await
                        .map_err(quote_failed)?;
                    (check.current_allowance, check.needs_approval)
                }
                (None, None) if !token.needs_approval() => (None, false),
                (None, None) => bail!("Pass --allowance or --owner for ERC-20 tokens"),
            };

            let approval = if needs {
                service.approval_for(family, chain_id, token, amount_in)?
            } else {
                None
            };

            print_json(&json!({
                "token": token.symbol,
                "amountIn": amount_in.to_string(),
                "currentAllowance": current.map(|c| c.to_string()),
                "needsApproval": needs,
                "approval": approval.map(|a| a.to_json()),
            }))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_covers_binary_target() {
        let filter = log_filter().unwrap().to_string();
        assert!(filter.contains("swapline=info"), "{}", filter);
        assert!(filter.contains("swapline_quoter=info"), "{}", filter);
    }
}
