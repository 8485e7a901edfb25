//! Allowance and approval decisions
//!
//! Native assets travel as call value, so they never need an allowance.
//! ERC-20 inputs need one at least as large as the amount being swapped.

use ethereum_types::{Address, U256};
use serde_json::{json, Value};
use swapline_config::Token;
use swapline_dex::{erc20, ContractCall};
use tracing::debug;

use pool_metadata_adapter::{read, ChainReader};

use crate::error::QuoteError;

/// Whether spending `amount_in` of `token` needs an approval first
pub fn needs_approval_for(token: &Token, amount_in: U256, current_allowance: U256) -> bool {
    token.needs_approval() && current_allowance < amount_in
}

/// ERC-20 `approve(spender, amount)` call parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalCall {
    pub token: Address,
    pub spender: Address,
    pub amount: U256,
    pub calldata: Vec<u8>,
}

impl ApprovalCall {
    pub fn to_json(&self) -> Value {
        json!({
            "to": format!("{:?}", self.token),
            "spender": format!("{:?}", self.spender),
            "amount": self.amount.to_string(),
            "data": format!("0x{}", hex::encode(&self.calldata)),
        })
    }
}

/// `None` for native tokens, which are never approved
pub fn build_approval(token: &Token, spender: Address, amount: U256) -> Result<Option<ApprovalCall>, QuoteError> {
    let Some(address) = token.address.contract().filter(|_| token.needs_approval()) else {
        return Ok(None);
    };

    let ContractCall { to, data } = erc20::approve_call(address, spender, amount)?;
    Ok(Some(ApprovalCall {
        token: to,
        spender,
        amount,
        calldata: data,
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowanceCheck {
    /// `None` when no read was needed
    pub current_allowance: Option<U256>,
    pub needs_approval: bool,
}

/// Reads the on-chain allowance and applies [`needs_approval_for`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowanceAdvisor;

impl AllowanceAdvisor {
    pub async fn check(
        &self,
        reader: &dyn ChainReader,
        token: &Token,
        owner: Address,
        spender: Address,
        amount_in: U256,
    ) -> Result<AllowanceCheck, QuoteError> {
        let Some(address) = token.address.contract().filter(|_| token.needs_approval()) else {
            return Ok(AllowanceCheck {
                current_allowance: None,
                needs_approval: false,
            });
        };

        let call = erc20::allowance_call(address, owner, spender)?;
        let current = read(reader, call, erc20::decode_allowance).await?;
        let needs_approval = needs_approval_for(token, amount_in, current);

        debug!(
            "{} allowance for {:?}: {} (need {}, approve: {})",
            token.symbol, spender, current, amount_in, needs_approval
        );

        Ok(AllowanceCheck {
            current_allowance: Some(current),
            needs_approval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pool_metadata_adapter::mock::{MockChainReader, MockResponse};
    use swapline_dex::selectors;

    fn usdc() -> Token {
        Token::erc20("USDC", "USD Coin", 6, Address::repeat_byte(0x0c))
    }

    fn eth() -> Token {
        Token::native("ETH", "Ether", 18, Some(Address::repeat_byte(0x0e)))
    }

    #[test]
    fn test_allowance_decision() {
        let amount = U256::from(100);
        assert!(needs_approval_for(&usdc(), amount, U256::from(50)));
        assert!(!needs_approval_for(&usdc(), amount, U256::from(150)));
        assert!(!needs_approval_for(&usdc(), amount, amount));
    }

    #[test]
    fn test_native_never_needs_approval() {
        assert!(!needs_approval_for(&eth(), U256::from(100), U256::zero()));
        assert!(!needs_approval_for(&eth(), U256::MAX, U256::zero()));
        assert_eq!(build_approval(&eth(), Address::repeat_byte(1), U256::one()).unwrap(), None);
    }

    #[test]
    fn test_build_approval_targets_token() {
        let spender = Address::repeat_byte(0xe1);
        let approval = build_approval(&usdc(), spender, U256::from(1_000_000u64))
            .unwrap()
            .unwrap();

        assert_eq!(approval.token, Address::repeat_byte(0x0c));
        assert_eq!(approval.calldata[..4], selectors::ERC20_APPROVE);
        assert_eq!(&approval.calldata[16..36], spender.as_bytes());
    }

    #[tokio::test]
    async fn test_advisor_reads_allowance() {
        let reader = MockChainReader::new();
        reader.on_selector(
            Address::repeat_byte(0x0c),
            selectors::ERC20_ALLOWANCE,
            MockResponse::uint(50u64),
        );

        let check = AllowanceAdvisor
            .check(&reader, &usdc(), Address::repeat_byte(1), Address::repeat_byte(2), U256::from(100))
            .await
            .unwrap();
        assert_eq!(check.current_allowance, Some(U256::from(50)));
        assert!(check.needs_approval);
    }

    #[tokio::test]
    async fn test_advisor_skips_read_for_native() {
        let reader = MockChainReader::new();
        let check = AllowanceAdvisor
            .check(&reader, &eth(), Address::repeat_byte(1), Address::repeat_byte(2), U256::from(100))
            .await
            .unwrap();

        assert!(!check.needs_approval);
        assert_eq!(reader.call_count(), 0);
    }
}
