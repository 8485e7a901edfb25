//! Quoter Configuration Module
//!
//! Loads the quoting service configuration from TOML with `SWAPLINE_`
//! environment overrides, e.g. `SWAPLINE_DEFAULT_SLIPPAGE_BPS=100`.
//! RPC URLs may reference environment variables (`${ALCHEMY_KEY}`).

use crate::chains::{ChainAddresses, ChainRegistry, ProtocolFamily};
use crate::service::{chain, quoting};
use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use swapline_amm::SlippageTolerance;
use tracing::{debug, info};

/// Default location searched when no explicit path is given
pub const DEFAULT_CONFIG_PATH: &str = "config/swapline.toml";

/// Top-level quoting service configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QuoterConfig {
    #[serde(default = "default_chain_id")]
    pub default_chain: u64,

    #[serde(default = "default_pair_cache_ttl")]
    pub pair_cache_ttl_secs: u64,

    #[serde(default = "default_slippage_bps")]
    pub default_slippage_bps: u32,

    /// Token-list JSON used instead of the built-in tokens
    #[serde(default)]
    pub token_list: Option<PathBuf>,

    #[serde(default)]
    pub chains: Vec<ChainSettings>,
}

/// RPC endpoints and optional address overrides for one chain
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChainSettings {
    pub chain_id: u64,
    pub primary_rpc: String,

    #[serde(default)]
    pub fallback_rpcs: Vec<String>,

    /// Replaces the built-in constant-product deployment
    #[serde(default)]
    pub v2: Option<ChainAddresses>,

    /// Replaces the built-in concentrated-liquidity deployment
    #[serde(default)]
    pub v3: Option<ChainAddresses>,
}

impl ChainSettings {
    /// Primary endpoint followed by fallbacks, in failover order
    pub fn endpoints(&self) -> Vec<String> {
        std::iter::once(self.primary_rpc.clone())
            .chain(self.fallback_rpcs.iter().cloned())
            .collect()
    }
}

fn default_chain_id() -> u64 {
    chain::DEFAULT_CHAIN_ID
}

fn default_pair_cache_ttl() -> u64 {
    quoting::PAIR_CACHE_TTL_SECS
}

fn default_slippage_bps() -> u32 {
    quoting::DEFAULT_SLIPPAGE_BPS
}

impl Default for QuoterConfig {
    fn default() -> Self {
        Self {
            default_chain: default_chain_id(),
            pair_cache_ttl_secs: default_pair_cache_ttl(),
            default_slippage_bps: default_slippage_bps(),
            token_list: None,
            chains: Vec::new(),
        }
    }
}

impl QuoterConfig {
    /// Load configuration from a file with environment overrides
    ///
    /// An explicit path must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let source = match path {
            Some(path) => {
                info!("Loading quoter config: {:?}", path);
                File::from(path).required(true)
            }
            None => File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false),
        };

        let config = Config::builder()
            .add_source(source)
            .add_source(
                Environment::with_prefix("SWAPLINE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let mut quoter: QuoterConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        quoter.expand_env_vars()?;
        quoter.validate()?;
        debug!("Loaded config for {} chains", quoter.chains.len());
        Ok(quoter)
    }

    /// Expand environment variables in RPC URLs and paths
    pub fn expand_env_vars(&mut self) -> Result<()> {
        for settings in &mut self.chains {
            settings.primary_rpc = shellexpand::env(&settings.primary_rpc)
                .context("Failed to expand RPC URL")?
                .to_string();

            for rpc in &mut settings.fallback_rpcs {
                *rpc = shellexpand::env(rpc)
                    .context("Failed to expand fallback RPC URL")?
                    .to_string();
            }
        }

        if let Some(path) = &self.token_list {
            let raw = path.to_string_lossy();
            let expanded = shellexpand::env(&raw).context("Failed to expand token list path")?;
            self.token_list = Some(PathBuf::from(expanded.as_ref()));
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        SlippageTolerance::from_bps(self.default_slippage_bps).context("Invalid default_slippage_bps")?;
        if self.pair_cache_ttl_secs == 0 {
            bail!("pair_cache_ttl_secs must be positive");
        }

        let mut seen = HashSet::new();
        for settings in &self.chains {
            if !seen.insert(settings.chain_id) {
                bail!("Chain {} is configured twice", settings.chain_id);
            }
            if settings.primary_rpc.trim().is_empty() {
                bail!("Chain {} has an empty primary_rpc", settings.chain_id);
            }
        }

        Ok(())
    }

    pub fn chain(&self, chain_id: u64) -> Option<&ChainSettings> {
        self.chains.iter().find(|c| c.chain_id == chain_id)
    }

    /// Layer configured address overrides on top of `registry`
    pub fn apply_overrides(&self, mut registry: ChainRegistry) -> ChainRegistry {
        for settings in &self.chains {
            if let Some(v2) = settings.v2 {
                registry.insert(ProtocolFamily::ConstantProduct, settings.chain_id, v2);
            }
            if let Some(v3) = settings.v3 {
                registry.insert(ProtocolFamily::ConcentratedLiquidity, settings.chain_id, v3);
            }
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::chain_id;
    use ethereum_types::Address;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_base_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("swapline.toml");

        let config_content = r#"
default_chain = 11155111
pair_cache_ttl_secs = 600

[[chains]]
chain_id = 11155111
primary_rpc = "https://rpc.sepolia.org"
fallback_rpcs = ["https://ethereum-sepolia.publicnode.com"]

[[chains]]
chain_id = 1
primary_rpc = "https://eth.llamarpc.com"
"#;

        fs::write(&config_path, config_content).unwrap();

        let config = QuoterConfig::load(Some(&config_path)).unwrap();

        assert_eq!(config.default_chain, chain_id::SEPOLIA);
        assert_eq!(config.pair_cache_ttl_secs, 600);
        assert_eq!(config.chains.len(), 2);

        let sepolia = config.chain(chain_id::SEPOLIA).unwrap();
        assert_eq!(
            sepolia.endpoints(),
            vec![
                "https://rpc.sepolia.org".to_string(),
                "https://ethereum-sepolia.publicnode.com".to_string()
            ]
        );
        assert!(config.chain(chain_id::BASE).is_none());
    }

    #[test]
    fn test_rpc_urls_expand_environment() {
        std::env::set_var("SWAPLINE_TEST_RPC_KEY", "secret123");

        let dir = tempdir().unwrap();
        let config_path = dir.path().join("swapline.toml");
        fs::write(
            &config_path,
            r#"
[[chains]]
chain_id = 1
primary_rpc = "https://eth-mainnet.g.alchemy.com/v2/${SWAPLINE_TEST_RPC_KEY}"
"#,
        )
        .unwrap();

        let config = QuoterConfig::load(Some(&config_path)).unwrap();
        assert_eq!(
            config.chains[0].primary_rpc,
            "https://eth-mainnet.g.alchemy.com/v2/secret123"
        );
    }

    #[test]
    fn test_address_overrides() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("swapline.toml");
        fs::write(
            &config_path,
            r#"
[[chains]]
chain_id = 56
primary_rpc = "https://bsc-dataseed.binance.org"

[chains.v2]
factory = "0xcA143Ce32Fe78f1f7019d7d551a6402fC5350c73"
router = "0x10ED43C718714eb63d5aA57B78B54704E256024E"
"#,
        )
        .unwrap();

        let config = QuoterConfig::load(Some(&config_path)).unwrap();
        let registry = config.apply_overrides(ChainRegistry::empty());

        let v2 = registry.addresses_for(ProtocolFamily::ConstantProduct, 56).unwrap();
        assert_eq!(
            v2.router,
            "0x10ED43C718714eb63d5aA57B78B54704E256024E".parse::<Address>().unwrap()
        );
        assert!(v2.quoter.is_none());
        assert!(registry.addresses_for(ProtocolFamily::ConcentratedLiquidity, 56).is_err());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempdir().unwrap();
        assert!(QuoterConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = QuoterConfig::default();
        assert!(config.validate().is_ok());

        config.default_slippage_bps = 10_000;
        assert!(config.validate().is_err());

        let mut config = QuoterConfig::default();
        let settings = ChainSettings {
            chain_id: 1,
            primary_rpc: "http://localhost:8545".to_string(),
            fallback_rpcs: vec![],
            v2: None,
            v3: None,
        };
        config.chains = vec![settings.clone(), settings];
        assert!(config.validate().is_err());
    }
}
