use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FleetError;

const ARTIFACT_EXTENSION: &str = ".swu";

/// A parsed firmware artifact filename, `<hardware>_<version>.swu`.
///
/// The hardware token is kept verbatim; whether it matches the target
/// node is decided at update time, not at upload time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    pub hardware: String,
    pub version: String,
}

impl ArtifactName {
    /// Validate and parse an artifact filename. Rejects a missing `.swu`
    /// extension, a stem not split by exactly one underscore, an empty
    /// hardware or version token, and a non-numeric version token.
    pub fn parse(filename: &str) -> Result<Self, FleetError> {
        let stem = filename
            .strip_suffix(ARTIFACT_EXTENSION)
            .ok_or_else(|| invalid(filename, "missing .swu extension"))?;

        let mut parts = stem.split('_');
        let hardware = parts
            .next()
            .ok_or_else(|| invalid(filename, "missing hardware token"))?;
        let version = parts
            .next()
            .ok_or_else(|| invalid(filename, "missing version token"))?;
        if parts.next().is_some() {
            return Err(invalid(filename, "expected a single underscore"));
        }
        if hardware.is_empty() {
            return Err(invalid(filename, "empty hardware token"));
        }
        if version.is_empty() || !version.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(filename, "version is not numeric"));
        }

        Ok(ArtifactName {
            hardware: hardware.to_string(),
            version: version.to_string(),
        })
    }

    /// True when this artifact targets hardware whose artifact slug is
    /// `slug` (comparison is case-insensitive).
    pub fn targets(&self, slug: &str) -> bool {
        self.hardware.eq_ignore_ascii_case(slug)
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}{}", self.hardware, self.version, ARTIFACT_EXTENSION)
    }
}

fn invalid(filename: &str, reason: &str) -> FleetError {
    FleetError::ValidationFailed(format!("artifact {filename:?}: {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_artifact() {
        let artifact = ArtifactName::parse("ahn2_34.swu").unwrap();
        assert_eq!(artifact.hardware, "ahn2");
        assert_eq!(artifact.version, "34");

        let artifact = ArtifactName::parse("moxa_100.swu").unwrap();
        assert_eq!(artifact.hardware, "moxa");
        assert_eq!(artifact.version, "100");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        // missing extension
        assert!(ArtifactName::parse("ahn2_34").is_err());
        assert!(ArtifactName::parse("ahn2_34.bin").is_err());
        // no underscore
        assert!(ArtifactName::parse("ahn234.swu").is_err());
        // more than one underscore
        assert!(ArtifactName::parse("ahn2_34_extra.swu").is_err());
        // empty tokens
        assert!(ArtifactName::parse("_34.swu").is_err());
        assert!(ArtifactName::parse("ahn2_.swu").is_err());
        assert!(ArtifactName::parse(".swu").is_err());
        // non-numeric version
        assert!(ArtifactName::parse("invalid_format.swu").is_err());
        assert!(ArtifactName::parse("ahn2_3a.swu").is_err());
    }

    #[test]
    fn test_unknown_hardware_token_is_still_well_formed() {
        // Compatibility is checked at update time, not here.
        let artifact = ArtifactName::parse("ep9_12.swu").unwrap();
        assert_eq!(artifact.hardware, "ep9");
    }

    #[test]
    fn test_targets_is_case_insensitive() {
        let artifact = ArtifactName::parse("AHN2_34.swu").unwrap();
        assert!(artifact.targets("ahn2"));
        assert!(!artifact.targets("moxa"));
    }

    #[test]
    fn test_display_round_trips() {
        let artifact = ArtifactName::parse("cassia_35.swu").unwrap();
        assert_eq!(artifact.to_string(), "cassia_35.swu");
    }
}
