//! Defines the representation of timestamps used in IBC.

use core::fmt::{Display, Error as FmtError, Formatter};
use core::num::ParseIntError;
use core::ops::{Add, Sub};
use core::str::FromStr;
use core::time::Duration;

use displaydoc::Display;

use crate::prelude::*;

pub const ZERO_DURATION: Duration = Duration::from_secs(0);

/// Host timestamp as nanoseconds since the unix epoch.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

/// Outcome of comparing a deadline with a later point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiry {
    Expired,
    NotExpired,
    InvalidTimestamp,
}

impl Timestamp {
    pub const fn from_nanoseconds(nanoseconds: u64) -> Self {
        Self(nanoseconds)
    }

    pub fn from_unix_timestamp(secs: u64, nanos: u32) -> Result<Self, TimestampError> {
        if nanos > 999_999_999 {
            return Err(TimestampError::DateOutOfRange);
        }
        secs.checked_mul(1_000_000_000)
            .and_then(|n| n.checked_add(u64::from(nanos)))
            .map(Self)
            .ok_or(TimestampError::DateOutOfRange)
    }

    /// Returns a `Timestamp` representation of the current time.
    #[cfg(feature = "std")]
    pub fn now() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        Self(nanos)
    }

    /// Computes the duration difference of another `Timestamp` from the current
    /// one. Returns `None` if `other` is later than `self`.
    pub fn duration_since(&self, other: &Self) -> Option<Duration> {
        self.0.checked_sub(other.0).map(Duration::from_nanos)
    }

    pub fn nanoseconds(self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks whether `self`, taken as a deadline, has passed at `other`.
    /// A zero timestamp on either side cannot be compared.
    pub fn check_expiry(&self, other: &Self) -> Expiry {
        if self.is_zero() || other.is_zero() {
            Expiry::InvalidTimestamp
        } else if self.0 <= other.0 {
            Expiry::Expired
        } else {
            Expiry::NotExpired
        }
    }
}

impl From<u64> for Timestamp {
    fn from(nanoseconds: u64) -> Self {
        Self(nanoseconds)
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(u64::from_str(s)?))
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "Timestamp({})", self.0)
    }
}

impl Add<Duration> for Timestamp {
    type Output = Result<Self, TimestampError>;

    fn add(self, rhs: Duration) -> Self::Output {
        let nanos = u64::try_from(rhs.as_nanos()).map_err(|_| TimestampError::TimestampOverflow)?;
        self.0
            .checked_add(nanos)
            .map(Self)
            .ok_or(TimestampError::TimestampOverflow)
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Result<Self, TimestampError>;

    fn sub(self, rhs: Duration) -> Self::Output {
        let nanos = u64::try_from(rhs.as_nanos()).map_err(|_| TimestampError::TimestampOverflow)?;
        self.0
            .checked_sub(nanos)
            .map(Self)
            .ok_or(TimestampError::DateOutOfRange)
    }
}

#[derive(Debug, Display, derive_more::From)]
pub enum TimestampError {
    /// parsing u64 integer from string error: `{0}`
    ParseInt(ParseIntError),
    /// date out of range
    DateOutOfRange,
    /// Timestamp overflow when modifying with duration
    TimestampOverflow,
}

#[cfg(feature = "std")]
impl std::error::Error for TimestampError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::ParseInt(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;
    use std::thread::sleep;

    use rstest::rstest;

    use super::{Expiry, Timestamp, ZERO_DURATION};

    #[rstest]
    #[case(1, 2, Expiry::NotExpired)]
    #[case(1, 1, Expiry::Expired)]
    #[case(2, 1, Expiry::Expired)]
    #[case(0, 1, Expiry::InvalidTimestamp)]
    #[case(1, 0, Expiry::InvalidTimestamp)]
    fn test_timestamp_expiry(#[case] now: u64, #[case] deadline: u64, #[case] expected: Expiry) {
        let deadline = Timestamp::from_nanoseconds(deadline);
        let now = Timestamp::from_nanoseconds(now);
        assert_eq!(deadline.check_expiry(&now), expected);
    }

    #[test]
    fn test_timestamp_arithmetic() {
        let time0 = Timestamp::from_nanoseconds(0);
        let time1 = Timestamp::from_nanoseconds(100);
        let time2 = Timestamp::from_nanoseconds(150);
        let time3 = Timestamp::from_nanoseconds(50);
        let duration = Duration::from_nanos(50);

        assert_eq!(time1, (time1 + ZERO_DURATION).unwrap());
        assert_eq!(time2, (time1 + duration).unwrap());
        assert_eq!(time3, (time1 - duration).unwrap());
        assert_eq!(time0, (time0 + ZERO_DURATION).unwrap());
        assert!((time0 - duration).is_err());
    }

    #[test]
    fn test_from_unix_timestamp() {
        let ts = Timestamp::from_unix_timestamp(2, 5).unwrap();
        assert_eq!(ts.nanoseconds(), 2_000_000_005);
        assert!(Timestamp::from_unix_timestamp(1, 1_000_000_000).is_err());
        assert!(Timestamp::from_unix_timestamp(u64::MAX, 0).is_err());
    }

    #[test]
    fn subtract_compare() {
        let sleep_duration = Duration::from_micros(100);

        let start = Timestamp::now();
        sleep(sleep_duration);
        let end = Timestamp::now();

        let res = end.duration_since(&start);
        assert!(res.is_some());

        let inner = res.unwrap();
        assert!(inner >= sleep_duration);
    }
}
