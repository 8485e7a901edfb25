//! In-memory `ChainReader` for tests
//!
//! Responses are matched by exact calldata first, then by contract and
//! selector. Unmatched calls revert, which is what a node reports for a
//! call into a missing pool.

use async_trait::async_trait;
use ethabi::Token;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use web3::types::Address;

use crate::rpc_client::{ChainReader, ReadError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    Return(Vec<u8>),
    Revert(String),
    Transport(String),
}

impl MockResponse {
    /// ABI-encoded return values
    pub fn tokens(tokens: &[Token]) -> Self {
        MockResponse::Return(ethabi::encode(tokens))
    }

    pub fn uint(value: impl Into<web3::types::U256>) -> Self {
        Self::tokens(&[Token::Uint(value.into())])
    }

    pub fn address(address: Address) -> Self {
        Self::tokens(&[Token::Address(address)])
    }
}

#[derive(Debug, Default)]
pub struct MockChainReader {
    by_calldata: Mutex<HashMap<(Address, Vec<u8>), MockResponse>>,
    by_selector: Mutex<HashMap<(Address, [u8; 4]), MockResponse>>,
    delay: Option<Duration>,
    log: Mutex<Vec<(Address, Vec<u8>)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockChainReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps this long before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answer calls with exactly this calldata
    pub fn on_call(&self, to: Address, data: Vec<u8>, response: MockResponse) -> &Self {
        self.by_calldata.lock().insert((to, data), response);
        self
    }

    /// Answer any call to `to` with this selector
    pub fn on_selector(&self, to: Address, selector: [u8; 4], response: MockResponse) -> &Self {
        self.by_selector.lock().insert((to, selector), response);
        self
    }

    pub fn call_count(&self) -> usize {
        self.log.lock().len()
    }

    pub fn calls_with_selector(&self, selector: [u8; 4]) -> usize {
        self.log
            .lock()
            .iter()
            .filter(|(_, data)| data.len() >= 4 && data[..4] == selector)
            .count()
    }

    /// Highest number of calls observed awaiting an answer at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn respond(&self, to: Address, data: &[u8]) -> MockResponse {
        if let Some(response) = self.by_calldata.lock().get(&(to, data.to_vec())) {
            return response.clone();
        }
        let selector = data.get(..4).and_then(|s| <[u8; 4]>::try_from(s).ok());
        selector
            .and_then(|selector| self.by_selector.lock().get(&(to, selector)).cloned())
            .unwrap_or_else(|| MockResponse::Revert("execution reverted".to_string()))
    }
}

#[async_trait]
impl ChainReader for MockChainReader {
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, ReadError> {
        self.log.lock().push((to, data.clone()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.respond(to, &data) {
            MockResponse::Return(bytes) => Ok(bytes),
            MockResponse::Revert(reason) => Err(ReadError::Reverted { to, reason }),
            MockResponse::Transport(message) => Err(ReadError::Transport(message)),
        }
    }
}
