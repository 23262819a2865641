use core::str::FromStr;

use derive_more::Display;
use ibc_primitives::prelude::*;

use crate::error::IdentifierError;
use crate::validate::validate_chain_identifier;

/// Identifier of a chain. An optional `{name}-{revision}` suffix carries the
/// revision number; names without it belong to revision 0.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub struct ChainId(String);

impl ChainId {
    pub fn new(id: &str) -> Result<Self, IdentifierError> {
        Self::from_str(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn revision_number(&self) -> u64 {
        self.0
            .rsplit_once('-')
            .and_then(|(_, rev)| {
                // a leading zero is part of the name, e.g. `evm-01`
                if rev.len() > 1 && rev.starts_with('0') {
                    None
                } else {
                    rev.parse::<u64>().ok()
                }
            })
            .unwrap_or(0)
    }
}

impl FromStr for ChainId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_chain_identifier(s).map(|_| Self(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("ibc0", 0)]
    #[case("ibc-1", 1)]
    #[case("evm-testnet-12", 12)]
    #[case("evm-01", 0)]
    #[case("evm-", 0)]
    fn test_revision_number(#[case] id: &str, #[case] revision: u64) {
        assert_eq!(ChainId::new(id).unwrap().revision_number(), revision);
    }
}
