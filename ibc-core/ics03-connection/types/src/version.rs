//! Defines connection versioning type and functions

use core::fmt::Display;

use ibc_primitives::prelude::*;
use ibc_primitives::utils::PrettySlice;
use ibc_proto::ibc::core::connection::v1::Version as RawVersion;
use ibc_proto::Protobuf;

use crate::error::ConnectionError;

pub const DEFAULT_VERSION_IDENTIFIER: &str = "1";
pub const ORDER_ORDERED: &str = "ORDER_ORDERED";
pub const ORDER_UNORDERED: &str = "ORDER_UNORDERED";

/// Stores the identifier and the features supported by a version
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Version {
    /// unique version identifier
    identifier: String,
    /// list of features compatible with the specified identifier
    features: Vec<String>,
}

impl Version {
    pub fn new(identifier: impl Into<String>, features: Vec<String>) -> Self {
        Self {
            identifier: identifier.into(),
            features,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Checks whether the version has a matching version identifier and its
    /// feature set is a subset of the supported features
    pub fn verify_is_supported(
        &self,
        supported_versions: &[Version],
    ) -> Result<(), ConnectionError> {
        let supported = supported_versions
            .iter()
            .find(|sv| sv.identifier == self.identifier)
            .ok_or_else(|| ConnectionError::VersionNotSupported {
                version: self.clone(),
            })?;

        if self.features.is_empty() {
            return Err(ConnectionError::EmptyFeatures);
        }

        for feature in self.features.iter() {
            supported.verify_feature_supported(feature)?;
        }
        Ok(())
    }

    /// Checks whether the given feature is supported in this version
    pub fn verify_feature_supported(&self, feature: &str) -> Result<(), ConnectionError> {
        if !self.features.iter().any(|f| f == feature) {
            return Err(ConnectionError::FeatureNotSupported {
                feature: feature.to_string(),
            });
        }
        Ok(())
    }

    /// Returns the lists of supported versions
    pub fn compatibles() -> Vec<Self> {
        vec![Self::default()]
    }
}

impl Default for Version {
    fn default() -> Self {
        Self {
            identifier: DEFAULT_VERSION_IDENTIFIER.to_string(),
            features: vec![ORDER_ORDERED.to_string(), ORDER_UNORDERED.to_string()],
        }
    }
}

impl Protobuf<RawVersion> for Version {}

impl TryFrom<RawVersion> for Version {
    type Error = ConnectionError;

    fn try_from(value: RawVersion) -> Result<Self, Self::Error> {
        if value.identifier.trim().is_empty() {
            return Err(ConnectionError::EmptyVersions);
        }
        if value.features.iter().any(|f| f.trim().is_empty()) {
            return Err(ConnectionError::EmptyFeatures);
        }
        Ok(Version {
            identifier: value.identifier,
            features: value.features,
        })
    }
}

impl From<Version> for RawVersion {
    fn from(value: Version) -> Self {
        Self {
            identifier: value.identifier,
            features: value.features,
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Version {{ identifier: {}, features: {} }}",
            self.identifier,
            PrettySlice(&self.features)
        )
    }
}

/// Negotiates the version of a connection during `conn_open_try`.
///
/// Walks the counterparty proposals in order and picks the first one whose
/// identifier is supported locally. The chosen version carries the features
/// both sides have in common. An empty intersection ends the negotiation
/// with `NoCompatibleVersion`.
pub fn pick_version(
    supported_versions: &[Version],
    counterparty_versions: &[Version],
) -> Result<Version, ConnectionError> {
    let (supported, proposed) = counterparty_versions
        .iter()
        .find_map(|cv| {
            supported_versions
                .iter()
                .find(|sv| sv.identifier == cv.identifier)
                .map(|sv| (sv, cv))
        })
        .ok_or(ConnectionError::NoCompatibleVersion)?;

    let features: Vec<String> = supported
        .features
        .iter()
        .filter(|f| proposed.features.contains(f))
        .cloned()
        .collect();

    if features.is_empty() {
        return Err(ConnectionError::NoCompatibleVersion);
    }

    Ok(Version {
        identifier: proposed.identifier.clone(),
        features,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn version(identifier: &str, features: &[&str]) -> Version {
        Version::new(
            identifier,
            features.iter().map(|f| f.to_string()).collect(),
        )
    }

    #[test]
    fn default_version_supports_both_orderings() {
        let v = Version::default();
        assert_eq!(v.identifier(), "1");
        assert!(v.verify_feature_supported(ORDER_ORDERED).is_ok());
        assert!(v.verify_feature_supported(ORDER_UNORDERED).is_ok());
        assert!(v.verify_feature_supported("ORDER_RANDOM").is_err());
    }

    #[rstest]
    #[case(RawVersion { identifier: "1".to_string(), features: vec![ORDER_ORDERED.to_string()] }, true)]
    #[case(RawVersion { identifier: "".to_string(), features: vec![ORDER_ORDERED.to_string()] }, false)]
    #[case(RawVersion { identifier: "2".to_string(), features: vec!["".to_string()] }, false)]
    fn decode_raw_version(#[case] raw: RawVersion, #[case] want_pass: bool) {
        assert_eq!(Version::try_from(raw).is_ok(), want_pass);
    }

    #[test]
    fn pick_compatible_versions() {
        let picked = pick_version(&Version::compatibles(), &Version::compatibles()).unwrap();
        assert_eq!(picked, Version::default());
    }

    #[test]
    fn pick_intersects_features() {
        let counterparty = [version("1", &[ORDER_UNORDERED, "ORDER_RANDOM"])];
        let picked = pick_version(&Version::compatibles(), &counterparty).unwrap();
        assert_eq!(picked, version("1", &[ORDER_UNORDERED]));
    }

    #[test]
    fn pick_follows_counterparty_preference() {
        let supported = [version("1", &[ORDER_ORDERED]), version("2", &[ORDER_ORDERED])];
        let counterparty = [version("3", &[ORDER_ORDERED]), version("2", &[ORDER_ORDERED])];
        let picked = pick_version(&supported, &counterparty).unwrap();
        assert_eq!(picked.identifier(), "2");
    }

    #[rstest]
    #[case(vec![version("2", &[ORDER_ORDERED])])]
    #[case(vec![version("1", &["ORDER_RANDOM"])])]
    #[case(vec![])]
    fn pick_without_overlap_fails(#[case] counterparty: Vec<Version>) {
        assert!(matches!(
            pick_version(&Version::compatibles(), &counterparty),
            Err(ConnectionError::NoCompatibleVersion)
        ));
    }

    #[test]
    fn verify_supported_subset() {
        let supported = Version::compatibles();
        assert!(version("1", &[ORDER_ORDERED]).verify_is_supported(&supported).is_ok());
        assert!(version("1", &[]).verify_is_supported(&supported).is_err());
        assert!(version("9", &[ORDER_ORDERED]).verify_is_supported(&supported).is_err());
    }
}
