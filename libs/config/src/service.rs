//! Service defaults
//!
//! Default values and protocol constants shared by the quoting crates.

/// Quoting and swap-building defaults
pub mod quoting {
    /// Lifetime of a discovered pair before it is looked up again (seconds)
    pub const PAIR_CACHE_TTL_SECS: u64 = 3600;

    /// Execution window added to the current time for swap deadlines (seconds)
    pub const SWAP_DEADLINE_SECS: u64 = 1200;

    /// Slippage tolerance used when the caller supplies none (0.5%)
    pub const DEFAULT_SLIPPAGE_BPS: u32 = 50;
}

/// Chain-facing constants
pub mod chain {
    /// Default chain for the CLI
    pub const DEFAULT_CHAIN_ID: u64 = crate::chains::chain_id::MAINNET;
}
