//! Integration tests for PairMetadataAdapter
//!
//! The mock-backed tests run everywhere. The live test reads the mainnet
//! WETH/USDC pair and is ignored by default:
//!
//! ```text
//! SWAPLINE_TEST_RPC=https://... cargo test -p pool-metadata-adapter -- --ignored
//! ```

use futures::future::join_all;
use pool_metadata_adapter::mock::{MockChainReader, MockResponse};
use pool_metadata_adapter::{
    ChainEndpoints, ChainReader, ChainReaders, PairCache, PairMetadataAdapter, PoolMetadataConfig,
    Web3Reader,
};
use std::sync::Arc;
use std::time::Duration;
use swapline_config::{chain_id, parse_address, ChainRegistry, ProtocolFamily};
use swapline_dex::selectors;
use web3::types::Address;

const MAINNET_WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
const MAINNET_USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
const MAINNET_WETH_USDC_PAIR: &str = "0xB4e16d0168e52d35CaCD2c6185b44281Ec28C9Dc";

#[tokio::test]
async fn test_concurrent_discovery_of_same_pair() {
    let factory = Address::repeat_byte(0xfa);
    let pair = Address::repeat_byte(0xaa);
    let (token_a, token_b) = (Address::repeat_byte(1), Address::repeat_byte(2));

    let reader = MockChainReader::new().with_delay(Duration::from_millis(20));
    reader
        .on_selector(factory, selectors::UNISWAP_V2_GET_PAIR, MockResponse::address(pair))
        .on_selector(pair, selectors::UNISWAP_V2_TOKEN0, MockResponse::address(token_a))
        .on_selector(token_a, selectors::ERC20_DECIMALS, MockResponse::uint(18u64))
        .on_selector(token_b, selectors::ERC20_DECIMALS, MockResponse::uint(8u64));

    let adapter = PairMetadataAdapter::default();
    let lookups = (0..4).map(|_| adapter.get_or_discover_pair(&reader, 1, factory, token_a, token_b));
    let results = join_all(lookups).await;

    // Racing misses may all discover; every caller sees the same metadata
    let first = results[0].as_ref().unwrap().pair_address;
    assert!(results.iter().all(|r| r.as_ref().unwrap().pair_address == first));
    assert_eq!(adapter.cache().len(), 1);
}

#[tokio::test]
async fn test_short_ttl_expires_entries() {
    let factory = Address::repeat_byte(0xfa);
    let pair = Address::repeat_byte(0xaa);
    let (token_a, token_b) = (Address::repeat_byte(1), Address::repeat_byte(2));

    let reader = MockChainReader::new();
    reader
        .on_selector(factory, selectors::UNISWAP_V2_GET_PAIR, MockResponse::address(pair))
        .on_selector(pair, selectors::UNISWAP_V2_TOKEN0, MockResponse::address(token_a))
        .on_selector(token_a, selectors::ERC20_DECIMALS, MockResponse::uint(18u64))
        .on_selector(token_b, selectors::ERC20_DECIMALS, MockResponse::uint(18u64));

    let adapter = PairMetadataAdapter::with_cache(PairCache::new(Duration::from_millis(30)));
    adapter
        .get_or_discover_pair(&reader, 1, factory, token_a, token_b)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;
    adapter
        .get_or_discover_pair(&reader, 1, factory, token_a, token_b)
        .await
        .unwrap();

    assert_eq!(reader.calls_with_selector(selectors::UNISWAP_V2_GET_PAIR), 2);
}

#[test]
fn test_readers_from_config() {
    let config = PoolMetadataConfig {
        chains: vec![
            ChainEndpoints {
                chain_id: chain_id::MAINNET,
                endpoints: vec!["http://localhost:8545".to_string()],
            },
            ChainEndpoints {
                chain_id: chain_id::POLYGON,
                endpoints: vec!["http://localhost:8546".to_string()],
            },
        ],
        ..Default::default()
    };

    let readers = ChainReaders::connect(&config).unwrap();
    assert_eq!(readers.chains(), vec![chain_id::MAINNET, chain_id::POLYGON]);
    assert!(readers.get(chain_id::BASE).is_none());
}

#[tokio::test]
#[ignore] // Run with --ignored flag to test with real RPC
async fn test_real_pair_discovery() {
    let Ok(rpc) = std::env::var("SWAPLINE_TEST_RPC") else {
        println!("SWAPLINE_TEST_RPC not set, skipping");
        return;
    };

    let reader: Arc<dyn ChainReader> =
        Arc::new(Web3Reader::new(chain_id::MAINNET, &[rpc]).expect("Failed to create reader"));
    let registry = ChainRegistry::builtin().unwrap();
    let factory = registry
        .addresses_for(ProtocolFamily::ConstantProduct, chain_id::MAINNET)
        .unwrap()
        .factory;

    let weth = parse_address(MAINNET_WETH).unwrap();
    let usdc = parse_address(MAINNET_USDC).unwrap();

    let adapter = PairMetadataAdapter::default();
    let metadata = adapter
        .get_or_discover_pair(reader.as_ref(), chain_id::MAINNET, factory, weth, usdc)
        .await
        .expect("WETH/USDC pair should exist");

    println!("Discovered {:?}", metadata);
    assert_eq!(metadata.pair_address, parse_address(MAINNET_WETH_USDC_PAIR).unwrap());
    assert_eq!(metadata.token0, usdc);
    assert_eq!((metadata.decimals_in, metadata.decimals_out), (18, 6));

    let reserves = adapter
        .read_reserves(reader.as_ref(), metadata.pair_address)
        .await
        .unwrap();
    assert!(!reserves.is_empty());
}
