//! Packet and acknowledgement commitments.
//!
//! These digests are what a chain stores for an in-flight packet and for a
//! written acknowledgement; the counterparty proves against them.

use ibc_primitives::prelude::*;
use sha2::{Digest, Sha256};

use crate::acknowledgement::Acknowledgement;
use crate::packet::Packet;
use crate::timeout::{TimeoutHeight, TimeoutTimestamp};

/// Packet commitment
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketCommitment(Vec<u8>);

impl PacketCommitment {
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for PacketCommitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for PacketCommitment {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&Packet> for PacketCommitment {
    fn from(packet: &Packet) -> Self {
        compute_packet_commitment(
            &packet.data,
            &packet.timeout_height_on_b,
            &packet.timeout_timestamp_on_b,
        )
    }
}

/// Acknowledgement commitment to be stored
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcknowledgementCommitment(Vec<u8>);

impl AcknowledgementCommitment {
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for AcknowledgementCommitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for AcknowledgementCommitment {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Computes the commitment for a packet.
///
/// An unset timeout height commits as `0-0` and an unset timeout timestamp
/// as 0.
pub fn compute_packet_commitment(
    packet_data: &[u8],
    timeout_height: &TimeoutHeight,
    timeout_timestamp: &TimeoutTimestamp,
) -> PacketCommitment {
    let mut hash_input = [0; 8 * 3 + 32];

    hash_input[..8].copy_from_slice(&timeout_timestamp.nanoseconds().to_be_bytes());
    hash_input[8..16].copy_from_slice(&timeout_height.commitment_revision_number().to_be_bytes());
    hash_input[16..24].copy_from_slice(&timeout_height.commitment_revision_height().to_be_bytes());
    hash_input[24..].copy_from_slice(&sha256(packet_data));

    sha256(&hash_input).to_vec().into()
}

pub fn compute_ack_commitment(ack: &Acknowledgement) -> AcknowledgementCommitment {
    sha256(ack.as_ref()).to_vec().into()
}

fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

#[cfg(test)]
mod tests {
    use ibc_core_client_types::Height;

    use super::*;

    #[test]
    fn packet_commitment_vector() {
        let expected: [u8; 32] = [
            0xa9, 0x28, 0xb5, 0x1f, 0x62, 0xbd, 0x54, 0x00, 0x91, 0xec, 0x45, 0x1f, 0x4e, 0xf3,
            0x45, 0x79, 0x4f, 0x05, 0x9e, 0x65, 0x91, 0x08, 0x16, 0x86, 0x61, 0x26, 0xdc, 0x36,
            0x4f, 0x84, 0xcc, 0x15,
        ];
        let actual = compute_packet_commitment(
            b"packet data",
            &TimeoutHeight::At(Height::new(42, 24).unwrap()),
            &TimeoutTimestamp::from_nanoseconds(0x42),
        );
        assert_eq!(&expected[..], actual.as_ref());
    }

    #[test]
    fn ack_commitment_vector() {
        let expected: [u8; 32] = [
            0x05, 0x4e, 0xde, 0xc1, 0xd0, 0x21, 0x1f, 0x62, 0x4f, 0xed, 0x0c, 0xbc, 0xa9, 0xd4,
            0xf9, 0x40, 0x0b, 0x0e, 0x49, 0x1c, 0x43, 0x74, 0x2a, 0xf2, 0xc5, 0xb0, 0xab, 0xeb,
            0xf0, 0xc9, 0x90, 0xd8,
        ];
        let ack = Acknowledgement::try_from(vec![0, 1, 2, 3]).unwrap();
        assert_eq!(&expected[..], compute_ack_commitment(&ack).as_ref())
    }

    #[test]
    fn timeout_changes_the_commitment() {
        let at_height = compute_packet_commitment(
            b"data",
            &TimeoutHeight::At(Height::new(0, 10).unwrap()),
            &TimeoutTimestamp::Never,
        );
        let at_time = compute_packet_commitment(
            b"data",
            &TimeoutHeight::Never,
            &TimeoutTimestamp::from_nanoseconds(10),
        );
        assert_ne!(at_height, at_time);
    }
}
