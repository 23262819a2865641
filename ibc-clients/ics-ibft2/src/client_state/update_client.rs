use ibc_client_ibft2_types::error::Ibft2ClientError;
use ibc_client_ibft2_types::{
    Address, ClientState as ClientStateType, ConsensusState as ConsensusStateType, Header,
};
use ibc_core_client::context::{ClientValidationContext, Convertible};
use ibc_core_client::types::error::ClientError;
use ibc_core_host::types::identifiers::ClientId;
use ibc_core_host::types::path::ClientConsensusStatePath;
use ibc_primitives::prelude::*;

/// Verifies a header against the consensus state stored at its trusted
/// height.
///
/// The header must extend the client past its latest height, carry a later
/// timestamp than the trusted state, be sealed by at least two thirds of its
/// own validator set and by at least one third of the trusted validator set.
pub fn verify_header<V>(
    client_state: &ClientStateType,
    ctx: &V,
    client_id: &ClientId,
    header: &Header,
) -> Result<(), ClientError>
where
    V: ClientValidationContext,
    ConsensusStateType: Convertible<V::ConsensusStateRef>,
    <ConsensusStateType as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
{
    header.validate_basic()?;

    if header.height.revision_number() != client_state.chain_id.revision_number() {
        return Err(Ibft2ClientError::MismatchedRevision {
            expected: client_state.chain_id.revision_number(),
            actual: header.height.revision_number(),
        }
        .into());
    }

    if header.height <= client_state.latest_height {
        return Err(ClientError::StaleHeader {
            header_height: header.height,
            latest_height: client_state.latest_height,
        });
    }

    let trusted_consensus_state: ConsensusStateType = {
        let trusted_path = ClientConsensusStatePath::new(
            client_id.clone(),
            header.trusted_height.revision_number(),
            header.trusted_height.revision_height(),
        );
        let consensus_state = ctx.consensus_state(&trusted_path)?;
        ConsensusStateType::try_from(consensus_state).map_err(Into::<ClientError>::into)?
    };

    if header.timestamp <= trusted_consensus_state.timestamp() {
        return Err(ClientError::StaleTimestamp {
            header_timestamp: header.timestamp,
            trusted_timestamp: trusted_consensus_state.timestamp(),
        });
    }

    verify_seals(header, trusted_consensus_state.validators())
}

/// Checks the quorum rules on the seals of `header`. Every seal must
/// recover to a distinct member of the header's validator set.
pub fn verify_seals(header: &Header, trusted_validators: &[Address]) -> Result<(), ClientError> {
    let signers = header.signers()?;

    if let Some(unknown) = signers.iter().find(|s| !header.validators.contains(*s)) {
        return Err(Ibft2ClientError::UnknownSigner(unknown.to_string()).into());
    }

    let signed = signers.len();
    let total = header.validators.len();
    if signed * 3 < total * 2 {
        return Err(ClientError::InsufficientSignatures { signed, total });
    }

    let overlap = trusted_validators
        .iter()
        .filter(|v| signers.contains(*v))
        .count();
    let trusted = trusted_validators.len();
    if overlap * 3 < trusted {
        return Err(ClientError::InsufficientTrustedOverlap { overlap, trusted });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use ibc_core_client::types::Height;
    use ibc_core_commitment_types::commitment::CommitmentRoot;
    use ibc_primitives::Timestamp;
    use k256::ecdsa::SigningKey;
    use rstest::rstest;

    use super::*;

    fn keys(seeds: core::ops::RangeInclusive<u8>) -> Vec<SigningKey> {
        seeds
            .map(|seed| SigningKey::from_slice(&[seed; 32]).unwrap())
            .collect()
    }

    fn addresses(keys: &[SigningKey]) -> Vec<Address> {
        keys.iter()
            .map(|k| Address::from_verifying_key(k.verifying_key()))
            .collect()
    }

    fn header_sealed_by(validators: &[SigningKey], signers: &[SigningKey]) -> Header {
        Header {
            height: Height::new(0, 2).unwrap(),
            timestamp: Timestamp::from_nanoseconds(2_000),
            root: CommitmentRoot::from([1u8; 32]),
            validators: addresses(validators),
            seals: vec![],
            trusted_height: Height::new(0, 1).unwrap(),
        }
        .sealed_by(signers)
        .unwrap()
    }

    #[rstest]
    #[case(4, true)]
    #[case(3, true)]
    #[case(2, false)]
    #[case(0, false)]
    fn two_thirds_of_the_new_set_must_seal(#[case] signers: usize, #[case] accepted: bool) {
        let validators = keys(1..=4);
        let header = header_sealed_by(&validators, &validators[..signers]);

        let result = verify_seals(&header, &addresses(&validators));
        assert_eq!(result.is_ok(), accepted);
        if !accepted {
            assert!(matches!(
                result,
                Err(ClientError::InsufficientSignatures { .. })
            ));
        }
    }

    #[test]
    fn rotated_set_needs_a_third_of_the_trusted_set() {
        let trusted = keys(1..=3);
        let fresh = keys(10..=12);
        let header = header_sealed_by(&fresh, &fresh);

        assert!(matches!(
            verify_seals(&header, &addresses(&trusted)),
            Err(ClientError::InsufficientTrustedOverlap {
                overlap: 0,
                trusted: 3
            })
        ));

        let mut overlapping = fresh.clone();
        overlapping.push(trusted[0].clone());
        let header = header_sealed_by(&overlapping, &overlapping);
        assert!(verify_seals(&header, &addresses(&trusted)).is_ok());
    }

    #[test]
    fn seal_from_outside_the_set_is_rejected() {
        let validators = keys(1..=3);
        let outsider = keys(9..=9);
        let mut signers = validators.clone();
        signers.extend(outsider);
        let header = header_sealed_by(&validators, &signers);

        assert!(matches!(
            verify_seals(&header, &addresses(&validators)),
            Err(ClientError::InvalidSignature { .. })
        ));
    }
}
