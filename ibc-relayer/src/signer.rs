//! The per-chain signing context of the relayer.

use core::fmt::{Debug, Formatter};
use core::str::FromStr;

use bip32::{DerivationPath, Language, Mnemonic, XPrv};
use ibc_client_ibft2_types::{Address, Seal};
use ibc_core::host::types::identifiers::ChainId;
use ibc_core::host::types::key::{keccak256, HASH_LENGTH};
use ibc_primitives::proto::Any;
use ibc_primitives::Signer;
use k256::ecdsa::SigningKey;

use crate::config::ChainConfig;
use crate::error::RelayerError;

/// The key the relayer signs transactions with on one chain.
///
/// A context belongs to exactly one chain: the chain's numeric id is bound
/// into every signature, so a transaction signed for one chain does not
/// verify on another.
#[derive(Clone)]
pub struct SigningContext {
    chain_id: ChainId,
    eth_chain_id: u64,
    key: SigningKey,
    address: Address,
}

impl Debug for SigningContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SigningContext")
            .field("chain_id", &self.chain_id)
            .field("eth_chain_id", &self.eth_chain_id)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl SigningContext {
    pub fn new(chain_id: ChainId, eth_chain_id: u64, key: SigningKey) -> Self {
        let address = Address::from_verifying_key(key.verifying_key());
        Self {
            chain_id,
            eth_chain_id,
            key,
            address,
        }
    }

    /// Derives the relayer key of a chain from its configured mnemonic and
    /// derivation path.
    pub fn from_config(config: &ChainConfig) -> Result<Self, RelayerError> {
        let invalid = |what: &str, e: bip32::Error| RelayerError::Config {
            description: format!("{what}: {e}"),
        };

        let mnemonic = Mnemonic::new(config.hdw_mnemonic.trim(), Language::English)
            .map_err(|e| invalid("hdw_mnemonic", e))?;
        let path =
            DerivationPath::from_str(&config.hdw_path).map_err(|e| invalid("hdw_path", e))?;
        // no BIP-39 passphrase
        let seed = mnemonic.to_seed("");
        let xprv = XPrv::derive_from_path(&seed, &path).map_err(|e| invalid("hdw_path", e))?;

        Ok(Self::new(config.chain_id()?, config.eth_chain_id, xprv.into()))
    }

    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    pub fn eth_chain_id(&self) -> u64 {
        self.eth_chain_id
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// The signer put into the IBC messages of this chain.
    pub fn signer(&self) -> Signer {
        Signer::new(self.address.to_string())
    }

    pub fn sign(&self, messages: Vec<Any>) -> Result<SignedTx, RelayerError> {
        let digest = SignedTx::sign_digest(self.eth_chain_id, &messages);
        let seal = Seal::sign(&self.key, &digest).map_err(|e| RelayerError::Signing {
            description: e.to_string(),
        })?;

        Ok(SignedTx {
            eth_chain_id: self.eth_chain_id,
            messages,
            seal,
        })
    }
}

/// A batch of IBC messages with the relayer's recoverable signature.
#[derive(Clone, Debug, PartialEq)]
pub struct SignedTx {
    pub eth_chain_id: u64,
    pub messages: Vec<Any>,
    pub seal: Seal,
}

impl SignedTx {
    /// Keccak-256 over the chain id and the hashes of each message's type URL
    /// and value.
    pub fn sign_digest(eth_chain_id: u64, messages: &[Any]) -> [u8; HASH_LENGTH] {
        let mut payload = Vec::with_capacity(8 + messages.len() * 2 * HASH_LENGTH);
        payload.extend_from_slice(&eth_chain_id.to_be_bytes());
        for message in messages {
            payload.extend_from_slice(&keccak256(message.type_url.as_bytes()));
            payload.extend_from_slice(&keccak256(&message.value));
        }
        keccak256(&payload)
    }

    /// Recovers the address that signed the transaction.
    pub fn recover_signer(&self) -> Result<Address, RelayerError> {
        let digest = Self::sign_digest(self.eth_chain_id, &self.messages);
        self.seal
            .recover(&digest)
            .map_err(|e| RelayerError::InvalidTxSignature {
                signer: "unknown".to_string(),
                description: e.to_string(),
            })
    }

    /// Checks the transaction was signed by `expected` for the chain with
    /// numeric id `eth_chain_id`.
    pub fn verify(&self, eth_chain_id: u64, expected: &Address) -> Result<(), RelayerError> {
        let recovered = Self::sign_digest(eth_chain_id, &self.messages);
        let signer = self
            .seal
            .recover(&recovered)
            .map_err(|e| RelayerError::InvalidTxSignature {
                signer: expected.to_string(),
                description: e.to_string(),
            })?;

        if &signer != expected {
            return Err(RelayerError::InvalidTxSignature {
                signer: expected.to_string(),
                description: format!("recovered {signer}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MNEMONIC: &str = "test test test test test test test test test test test junk";

    fn config(path: &str) -> ChainConfig {
        ChainConfig {
            chain_id: "ibc0".to_string(),
            eth_chain_id: 2018,
            rpc_addr: "http://127.0.0.1:8645".to_string(),
            hdw_mnemonic: MNEMONIC.to_string(),
            hdw_path: path.to_string(),
            ibc_host_address: "0x2f5703804E29F4252FA9405B8D357220d11b3bd9".to_string(),
            ibc_handler_address: "0xaa43d337145E8930d01cb4E60Abf6595C692921E".to_string(),
        }
    }

    fn message() -> Any {
        Any {
            type_url: "/ibc.core.client.v1.MsgUpdateClient".to_string(),
            value: vec![1, 2, 3],
        }
    }

    #[test]
    fn keys_are_derived_deterministically() {
        let first = SigningContext::from_config(&config("m/44'/60'/0'/0/0")).unwrap();
        let again = SigningContext::from_config(&config("m/44'/60'/0'/0/0")).unwrap();
        let other = SigningContext::from_config(&config("m/44'/60'/0'/0/1")).unwrap();

        assert_eq!(first.address(), again.address());
        assert_ne!(first.address(), other.address());
        assert!(first.signer().as_ref().starts_with("0x"));
    }

    #[test]
    fn derived_addresses_match_the_standard_accounts() {
        for (path, expected) in [
            ("m/44'/60'/0'/0/0", "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"),
            ("m/44'/60'/0'/0/1", "0x70997970c51812dc3a010c7d01b50e0d17dc79c8"),
        ] {
            let ctx = SigningContext::from_config(&config(path)).unwrap();
            assert_eq!(ctx.address().to_string(), expected);
        }
    }

    #[test]
    fn invalid_mnemonic_is_a_config_error() {
        let mut bad = config("m/44'/60'/0'/0/0");
        bad.hdw_mnemonic = "not a mnemonic".to_string();

        assert!(matches!(
            SigningContext::from_config(&bad),
            Err(RelayerError::Config { .. })
        ));
    }

    #[test]
    fn signatures_bind_the_chain() {
        let ctx = SigningContext::from_config(&config("m/44'/60'/0'/0/0")).unwrap();
        let tx = ctx.sign(vec![message()]).unwrap();

        assert_eq!(tx.recover_signer().unwrap(), ctx.address());
        tx.verify(2018, &ctx.address()).unwrap();
        assert!(matches!(
            tx.verify(3018, &ctx.address()),
            Err(RelayerError::InvalidTxSignature { .. })
        ));
    }

    #[test]
    fn tampered_messages_do_not_verify() {
        let ctx = SigningContext::from_config(&config("m/44'/60'/0'/0/0")).unwrap();
        let mut tx = ctx.sign(vec![message()]).unwrap();
        tx.messages[0].value.push(4);

        assert!(tx.verify(2018, &ctx.address()).is_err());
    }
}
