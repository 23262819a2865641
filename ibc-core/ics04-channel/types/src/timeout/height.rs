use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_core_client_types::proto::v1::Height as RawHeight;
use ibc_core_client_types::Height;
use ibc_primitives::prelude::*;

use crate::error::PacketError;

/// Indicates a consensus height on the destination chain after which the
/// packet will no longer be processed, and will instead count as having
/// timed-out.
///
/// A raw height of `0-0` means "no timeout height"; it maps to `Never`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum TimeoutHeight {
    Never,
    At(Height),
}

impl TimeoutHeight {
    pub fn no_timeout() -> Self {
        Self::Never
    }

    /// Revision number to be used in packet commitment computation
    pub fn commitment_revision_number(&self) -> u64 {
        match self {
            Self::At(height) => height.revision_number(),
            Self::Never => 0,
        }
    }

    /// Revision height to be used in packet commitment computation
    pub fn commitment_revision_height(&self) -> u64 {
        match self {
            Self::At(height) => height.revision_height(),
            Self::Never => 0,
        }
    }

    /// A packet is expired once the chain reaches its timeout height.
    pub fn has_expired(&self, height: Height) -> bool {
        match self {
            Self::At(timeout_height) => height >= *timeout_height,
            Self::Never => false,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::At(_))
    }
}

impl Default for TimeoutHeight {
    fn default() -> Self {
        Self::Never
    }
}

impl From<Height> for TimeoutHeight {
    fn from(height: Height) -> Self {
        Self::At(height)
    }
}

impl TryFrom<RawHeight> for TimeoutHeight {
    type Error = PacketError;

    fn try_from(raw_height: RawHeight) -> Result<Self, Self::Error> {
        if raw_height.revision_number == 0 && raw_height.revision_height == 0 {
            Ok(TimeoutHeight::Never)
        } else {
            let height = raw_height
                .try_into()
                .map_err(|_| PacketError::InvalidTimeoutHeight)?;
            Ok(TimeoutHeight::At(height))
        }
    }
}

impl TryFrom<Option<RawHeight>> for TimeoutHeight {
    type Error = PacketError;

    fn try_from(maybe_raw_height: Option<RawHeight>) -> Result<Self, Self::Error> {
        match maybe_raw_height {
            Some(raw_height) => TimeoutHeight::try_from(raw_height),
            None => Ok(TimeoutHeight::Never),
        }
    }
}

/// `Never` is encoded as a missing height in the raw packet.
impl From<TimeoutHeight> for Option<RawHeight> {
    fn from(timeout_height: TimeoutHeight) -> Self {
        match timeout_height {
            TimeoutHeight::At(height) => Some(height.into()),
            TimeoutHeight::Never => None,
        }
    }
}

impl Display for TimeoutHeight {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            TimeoutHeight::At(timeout_height) => write!(f, "{timeout_height}"),
            TimeoutHeight::Never => write!(f, "no timeout"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(10, 9, false)]
    #[case(10, 10, true)]
    #[case(10, 11, true)]
    fn expiry_is_inclusive(#[case] timeout: u64, #[case] current: u64, #[case] expired: bool) {
        let timeout_height = TimeoutHeight::At(Height::new(0, timeout).unwrap());
        assert_eq!(
            timeout_height.has_expired(Height::new(0, current).unwrap()),
            expired
        );
    }

    #[test]
    fn zero_raw_height_means_never() {
        let raw = RawHeight {
            revision_number: 0,
            revision_height: 0,
        };
        let timeout = TimeoutHeight::try_from(raw).unwrap();
        assert_eq!(timeout, TimeoutHeight::Never);
        assert!(!timeout.has_expired(Height::new(0, u64::MAX).unwrap()));
    }
}
