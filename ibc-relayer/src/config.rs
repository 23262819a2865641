//! Configuration of the relayer and of the chains it connects.

use core::str::FromStr;
use core::time::Duration;

use ibc_core::host::types::identifiers::ChainId;
use serde::{Deserialize, Serialize};
use subtle_encoding::hex;

use crate::error::RelayerError;
use crate::retry::RetryPolicy;

/// How a chain is reached and which key signs for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// IBC identifier of the chain.
    pub chain_id: String,
    /// Numeric EVM chain id, bound into every transaction signature.
    pub eth_chain_id: u64,
    pub rpc_addr: String,
    /// BIP-39 mnemonic of the relayer key on this chain.
    pub hdw_mnemonic: String,
    /// BIP-32 derivation path of the relayer key, e.g. `m/44'/60'/0'/0/0`.
    pub hdw_path: String,
    /// 0x-prefixed address of the contract holding the provable store.
    pub ibc_host_address: String,
    /// 0x-prefixed address of the contract accepting IBC messages.
    pub ibc_handler_address: String,
}

impl ChainConfig {
    pub fn chain_id(&self) -> Result<ChainId, RelayerError> {
        ChainId::from_str(&self.chain_id).map_err(|e| RelayerError::Config {
            description: format!("chain id `{}`: {e}", self.chain_id),
        })
    }

    pub fn ibc_host_address(&self) -> Result<Vec<u8>, RelayerError> {
        decode_address("ibc_host_address", &self.ibc_host_address)
    }

    pub fn ibc_handler_address(&self) -> Result<Vec<u8>, RelayerError> {
        decode_address("ibc_handler_address", &self.ibc_handler_address)
    }
}

fn decode_address(field: &str, address: &str) -> Result<Vec<u8>, RelayerError> {
    let invalid = |description: String| RelayerError::Config {
        description: format!("{field} `{address}`: {description}"),
    };

    let digits = address.strip_prefix("0x").unwrap_or(address);
    let bytes = hex::decode(digits.to_ascii_lowercase()).map_err(|e| invalid(e.to_string()))?;
    if bytes.len() != 20 {
        return Err(invalid(format!("expected 20 bytes, got {}", bytes.len())));
    }
    Ok(bytes)
}

/// Pacing of the relay loop and of retries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayerConfig {
    /// Retries of one work item after its first transient failure.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    /// Pause between two relay rounds of a running link.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Delay period proposed for new connections.
    #[serde(default)]
    pub connection_delay_ms: u64,
}

const fn default_max_retries() -> u32 {
    5
}

const fn default_initial_backoff_ms() -> u64 {
    200
}

const fn default_max_backoff_ms() -> u64 {
    5_000
}

const fn default_poll_interval_ms() -> u64 {
    1_000
}

impl Default for RelayerConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            connection_delay_ms: 0,
        }
    }
}

impl RelayerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn connection_delay(&self) -> Duration {
        Duration::from_millis(self.connection_delay_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_config() -> ChainConfig {
        ChainConfig {
            chain_id: "ibc0".to_string(),
            eth_chain_id: 2018,
            rpc_addr: "http://127.0.0.1:8645".to_string(),
            hdw_mnemonic: "test test test test test test test test test test test junk".to_string(),
            hdw_path: "m/44'/60'/0'/0/0".to_string(),
            ibc_host_address: "0x2f5703804E29F4252FA9405B8D357220d11b3bd9".to_string(),
            ibc_handler_address: "0xaa43d337145E8930d01cb4E60Abf6595C692921E".to_string(),
        }
    }

    #[test]
    fn missing_relayer_fields_take_defaults() {
        let config: RelayerConfig = serde_json::from_str(r#"{ "max_retries": 2 }"#).unwrap();

        assert_eq!(config.max_retries, 2);
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(
            config.retry_policy().initial_backoff,
            Duration::from_millis(200)
        );
    }

    #[test]
    fn chain_config_parses_from_json() {
        let json = serde_json::to_string(&chain_config()).unwrap();
        let config: ChainConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, chain_config());
        assert_eq!(config.chain_id().unwrap().as_str(), "ibc0");
        assert_eq!(config.ibc_host_address().unwrap().len(), 20);
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        let config = ChainConfig {
            ibc_host_address: "0x1234".to_string(),
            ibc_handler_address: "0xnothex".to_string(),
            ..chain_config()
        };

        assert!(matches!(
            config.ibc_host_address(),
            Err(RelayerError::Config { .. })
        ));
        assert!(matches!(
            config.ibc_handler_address(),
            Err(RelayerError::Config { .. })
        ));
    }
}
