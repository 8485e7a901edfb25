//! Tests for PairMetadataAdapter

use super::*;
use crate::mock::{MockChainReader, MockResponse};
use swapline_dex::selectors;
use web3::types::{Address, U256};

const CHAIN: u64 = 1;

fn factory() -> Address {
    Address::repeat_byte(0xfa)
}
fn pair() -> Address {
    Address::repeat_byte(0xaa)
}
fn weth() -> Address {
    Address::repeat_byte(0x0e)
}
fn usdc() -> Address {
    Address::repeat_byte(0x0c)
}

/// Factory knows WETH/USDC; USDC is token0
fn mock_chain() -> MockChainReader {
    let reader = MockChainReader::new();
    reader
        .on_selector(factory(), selectors::UNISWAP_V2_GET_PAIR, MockResponse::address(pair()))
        .on_selector(pair(), selectors::UNISWAP_V2_TOKEN0, MockResponse::address(usdc()))
        .on_selector(weth(), selectors::ERC20_DECIMALS, MockResponse::uint(18u64))
        .on_selector(usdc(), selectors::ERC20_DECIMALS, MockResponse::uint(6u64))
        .on_selector(
            pair(),
            selectors::UNISWAP_V2_GET_RESERVES,
            MockResponse::tokens(&[
                ethabi::Token::Uint(U256::from(2_000_000_000_000u64)),
                ethabi::Token::Uint(U256::from(10u64).pow(U256::from(21))),
                ethabi::Token::Uint(U256::from(1_700_000_000u64)),
            ]),
        );
    reader
}

#[tokio::test]
async fn test_discovery_reads_pair_token0_and_decimals() {
    let adapter = PairMetadataAdapter::default();
    let reader = mock_chain();

    let metadata = adapter
        .get_or_discover_pair(&reader, CHAIN, factory(), weth(), usdc())
        .await
        .unwrap();

    assert_eq!(metadata.pair_address, pair());
    assert_eq!(metadata.token0, usdc());
    assert_eq!(metadata.decimals_in, 18);
    assert_eq!(metadata.decimals_out, 6);
    assert!(!metadata.token_in_is_token0(weth()));
    assert_eq!(reader.call_count(), 4);
}

#[tokio::test]
async fn test_second_lookup_is_served_from_cache() {
    let adapter = PairMetadataAdapter::default();
    let reader = mock_chain();

    adapter
        .get_or_discover_pair(&reader, CHAIN, factory(), weth(), usdc())
        .await
        .unwrap();
    adapter
        .get_or_discover_pair(&reader, CHAIN, factory(), weth(), usdc())
        .await
        .unwrap();

    assert_eq!(reader.calls_with_selector(selectors::UNISWAP_V2_GET_PAIR), 1);

    let metrics = adapter.get_metrics().await;
    assert_eq!(metrics.cache_hits, 1);
    assert_eq!(metrics.cache_misses, 1);
    assert_eq!(metrics.rpc_discoveries, 1);
}

#[tokio::test]
async fn test_zero_pair_is_not_found_and_not_cached() {
    let adapter = PairMetadataAdapter::default();
    let reader = MockChainReader::new();
    reader.on_selector(
        factory(),
        selectors::UNISWAP_V2_GET_PAIR,
        MockResponse::address(Address::zero()),
    );

    let err = adapter
        .get_or_discover_pair(&reader, CHAIN, factory(), weth(), usdc())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        DiscoveryError::PairNotFound {
            token_in: weth(),
            token_out: usdc()
        }
    );
    assert!(adapter.cache().is_empty());
    assert_eq!(adapter.get_metrics().await.pairs_not_found, 1);
}

#[tokio::test]
async fn test_transport_failure_propagates() {
    let adapter = PairMetadataAdapter::default();
    let reader = mock_chain();
    reader.on_selector(
        usdc(),
        selectors::ERC20_DECIMALS,
        MockResponse::Transport("connection reset".to_string()),
    );

    let err = adapter
        .get_or_discover_pair(&reader, CHAIN, factory(), weth(), usdc())
        .await
        .unwrap_err();

    assert!(matches!(err, DiscoveryError::Read(ReadError::Transport(_))));
    assert!(adapter.cache().is_empty());
    assert_eq!(adapter.get_metrics().await.rpc_failures, 1);
}

#[tokio::test]
async fn test_read_reserves_in_pair_order() {
    let adapter = PairMetadataAdapter::default();
    let reader = mock_chain();

    let reserves = adapter.read_reserves(&reader, pair()).await.unwrap();
    assert_eq!(reserves.reserve0, U256::from(2_000_000_000_000u64));

    // WETH is token1, so WETH -> USDC reads reserve1 as the input side
    let (reserve_in, reserve_out) = reserves.oriented(false);
    assert_eq!(reserve_in, U256::from(10u64).pow(U256::from(21)));
    assert_eq!(reserve_out, U256::from(2_000_000_000_000u64));
}

#[tokio::test]
async fn test_invalidate_forces_rediscovery() {
    let adapter = PairMetadataAdapter::default();
    let reader = mock_chain();

    adapter
        .get_or_discover_pair(&reader, CHAIN, factory(), weth(), usdc())
        .await
        .unwrap();
    assert!(adapter.invalidate(CHAIN, weth(), usdc()));
    adapter
        .get_or_discover_pair(&reader, CHAIN, factory(), weth(), usdc())
        .await
        .unwrap();

    assert_eq!(reader.calls_with_selector(selectors::UNISWAP_V2_GET_PAIR), 2);
}

#[tokio::test]
async fn test_adapter_clones_share_cache() {
    let adapter = PairMetadataAdapter::new(&PoolMetadataConfig::default());
    let clone = adapter.clone();
    let reader = mock_chain();

    clone
        .get_or_discover_pair(&reader, CHAIN, factory(), weth(), usdc())
        .await
        .unwrap();
    assert_eq!(adapter.cache().len(), 1);
}
