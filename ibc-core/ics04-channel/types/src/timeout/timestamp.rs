use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_primitives::prelude::*;
use ibc_primitives::{Expiry, Timestamp};

/// Indicates a timestamp on the destination chain after which the packet will
/// no longer be processed, and will instead count as having timed-out.
///
/// A raw value of 0 means "no timeout timestamp"; it maps to `Never`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub enum TimeoutTimestamp {
    #[default]
    Never,
    At(Timestamp),
}

impl TimeoutTimestamp {
    pub fn from_nanoseconds(nanoseconds: u64) -> Self {
        if nanoseconds == 0 {
            Self::Never
        } else {
            Self::At(Timestamp::from_nanoseconds(nanoseconds))
        }
    }

    /// Returns the timestamp in nanoseconds; 0 stands for no timeout.
    pub fn nanoseconds(&self) -> u64 {
        match self {
            Self::At(timestamp) => timestamp.nanoseconds(),
            Self::Never => 0,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::At(_))
    }

    /// A packet is expired once the chain time reaches its timeout timestamp.
    pub fn has_expired(&self, timestamp: &Timestamp) -> bool {
        match self {
            Self::At(timeout_timestamp) => {
                timeout_timestamp.check_expiry(timestamp) == Expiry::Expired
            }
            Self::Never => false,
        }
    }
}

impl From<Timestamp> for TimeoutTimestamp {
    fn from(timestamp: Timestamp) -> Self {
        Self::from_nanoseconds(timestamp.nanoseconds())
    }
}

impl Display for TimeoutTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Self::At(timeout_timestamp) => write!(f, "{timeout_timestamp}"),
            Self::Never => write!(f, "no timeout"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_never() {
        let timeout = TimeoutTimestamp::from_nanoseconds(0);
        assert!(!timeout.is_set());
        assert!(!timeout.has_expired(&Timestamp::from_nanoseconds(u64::MAX)));
    }

    #[test]
    fn expires_at_the_deadline() {
        let timeout = TimeoutTimestamp::from_nanoseconds(1_000);
        assert!(!timeout.has_expired(&Timestamp::from_nanoseconds(999)));
        assert!(timeout.has_expired(&Timestamp::from_nanoseconds(1_000)));
        assert!(timeout.has_expired(&Timestamp::from_nanoseconds(1_001)));
    }
}
