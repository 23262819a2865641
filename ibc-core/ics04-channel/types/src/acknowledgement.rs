//! Acknowledgements written by the receiving application.

use core::fmt::{Display, Error as FmtError, Formatter};

use derive_more::Into;
use ibc_primitives::prelude::*;

use crate::error::PacketError;

/// Opaque acknowledgement bytes, interpreted by the sending application.
/// An acknowledgement cannot be empty.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Into)]
pub struct Acknowledgement(Vec<u8>);

impl Acknowledgement {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl AsRef<[u8]> for Acknowledgement {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl TryFrom<Vec<u8>> for Acknowledgement {
    type Error = PacketError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.is_empty() {
            Err(PacketError::InvalidAcknowledgement)
        } else {
            Ok(Self(bytes))
        }
    }
}

/// Success or failure of processing a received packet, in the JSON shape
/// applications conventionally use: `{"result":"AQ=="}` or `{"error":"..."}`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AcknowledgementStatus {
    #[cfg_attr(feature = "serde", serde(rename = "result"))]
    Success(StatusValue),
    #[cfg_attr(feature = "serde", serde(rename = "error"))]
    Error(StatusValue),
}

/// A non-empty status string.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusValue(String);

impl StatusValue {
    pub fn new(value: impl ToString) -> Result<Self, PacketError> {
        let value = value.to_string();

        if value.is_empty() {
            return Err(PacketError::InvalidAcknowledgement);
        }

        Ok(Self(value))
    }
}

impl Display for StatusValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.0)
    }
}

impl AcknowledgementStatus {
    pub fn success(value: StatusValue) -> Self {
        Self::Success(value)
    }

    pub fn error(value: StatusValue) -> Self {
        Self::Error(value)
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, AcknowledgementStatus::Success(_))
    }

    /// Recognizes the JSON shape produced by the `Acknowledgement`
    /// conversion below.
    pub fn from_ack(ack: &Acknowledgement) -> Option<Self> {
        let text = core::str::from_utf8(ack.as_bytes()).ok()?;
        let (variant, rest): (fn(StatusValue) -> Self, &str) =
            if let Some(rest) = text.strip_prefix(r#"{"result":""#) {
                (Self::Success, rest)
            } else if let Some(rest) = text.strip_prefix(r#"{"error":""#) {
                (Self::Error, rest)
            } else {
                return None;
            };
        let value = rest.strip_suffix(r#""}"#)?;
        StatusValue::new(value).ok().map(variant)
    }
}

impl Display for AcknowledgementStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            AcknowledgementStatus::Success(v) | AcknowledgementStatus::Error(v) => write!(f, "{v}"),
        }
    }
}

impl From<AcknowledgementStatus> for Vec<u8> {
    fn from(ack: AcknowledgementStatus) -> Self {
        match ack {
            AcknowledgementStatus::Success(v) => format!(r#"{{"result":"{v}"}}"#).into(),
            AcknowledgementStatus::Error(v) => format!(r#"{{"error":"{v}"}}"#).into(),
        }
    }
}

/// Both JSON shapes are non-empty, so no emptiness check is needed.
impl From<AcknowledgementStatus> for Acknowledgement {
    fn from(ack_status: AcknowledgementStatus) -> Self {
        Self(ack_status.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ack_is_rejected() {
        assert!(Acknowledgement::try_from(Vec::new()).is_err());
        assert!(StatusValue::new("").is_err());
    }

    #[test]
    fn status_survives_the_ack_bytes() {
        let status = AcknowledgementStatus::success(StatusValue::new("AQ==").unwrap());
        let ack = Acknowledgement::from(status.clone());
        assert_eq!(ack.as_bytes(), br#"{"result":"AQ=="}"#);
        assert_eq!(AcknowledgementStatus::from_ack(&ack), Some(status));

        let failed = Acknowledgement::from(AcknowledgementStatus::error(
            StatusValue::new("insufficient funds").unwrap(),
        ));
        assert!(!AcknowledgementStatus::from_ack(&failed)
            .unwrap()
            .is_successful());
    }
}
