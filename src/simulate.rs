use tracing::{info, warn};

use crate::api::FleetApi;
use crate::artifact::ArtifactName;
use crate::error::FleetError;
use crate::types::Endpoint;

impl FleetApi {
    /// Simulate an OTA update of a node to `target_version`.
    ///
    /// An artifact with the target version must already be in the
    /// node's channel and must target the node's hardware. Those
    /// failures are terminal; only the apply step is retried, up to the
    /// configured bound. Node state is untouched on failure.
    pub fn simulate_ota_update(&mut self, uuid: &str, target_version: &str) -> bool {
        let (channel, hardware, slug) = match self.registry.get_node(uuid) {
            Ok(node) => (node.ota_channel(), node.hardware, node.hardware.artifact_slug()),
            Err(err) => {
                warn!(uuid, %err, "OTA update failed");
                return false;
            }
        };

        // Locate uploaded artifacts carrying the target version.
        let candidates: Vec<ArtifactName> = self
            .get_ota_channel_versions(&channel)
            .iter()
            .filter_map(|name| ArtifactName::parse(name).ok())
            .filter(|parsed| parsed.version == target_version)
            .collect();
        if candidates.is_empty() {
            warn!(
                uuid,
                target_version,
                channel = %channel,
                "OTA update failed: no matching artifact"
            );
            return false;
        }

        // Hardware gate, deferred from upload time. Non-transient.
        if !candidates.iter().any(|parsed| parsed.targets(slug)) {
            let err = FleetError::Blocked(format!(
                "no {target_version} artifact targets {hardware:?}"
            ));
            warn!(uuid, %err, "OTA update failed");
            return false;
        }

        let max_retries = self.config.ota_max_retries;
        for attempt in 1..=max_retries {
            if self.apply_node_update(uuid, target_version) {
                info!(uuid, target_version, attempt, "OTA update committed");
                return true;
            }
            warn!(uuid, target_version, attempt, max_retries, "OTA apply attempt failed");
        }
        false
    }

    /// The apply step: enforce the monotonic version rule and commit.
    /// Both versions must be numeric and the target strictly newer.
    fn apply_node_update(&mut self, uuid: &str, target_version: &str) -> bool {
        let node = match self.registry.get_node_mut(uuid) {
            Ok(node) => node,
            Err(_) => return false,
        };
        let (current, target) = match (node.version.parse::<u64>(), target_version.parse::<u64>()) {
            (Ok(current), Ok(target)) => (current, target),
            _ => return false,
        };
        if target <= current {
            return false;
        }
        node.version = target_version.to_string();
        true
    }

    /// Simulate a DFU of an endpoint to `target_version`.
    ///
    /// Both gates are checked before any mutation: a nonzero backlog or
    /// a battery below the hardware threshold blocks the update and
    /// leaves the endpoint unchanged.
    pub fn simulate_endpoint_dfu(&mut self, serial: &str, target_version: &str) -> bool {
        let endpoint = match self.registry.get_endpoint_mut(serial) {
            Ok(endpoint) => endpoint,
            Err(err) => {
                warn!(serial, %err, "DFU failed");
                return false;
            }
        };

        if let Err(err) = dfu_gates(endpoint) {
            warn!(serial, %err, "DFU failed");
            return false;
        }

        endpoint.version = target_version.to_string();
        info!(serial, target_version, "DFU committed");
        true
    }
}

/// Both gates, evaluated before any mutation. A blocked update is an
/// expected outcome, not a fault.
fn dfu_gates(endpoint: &Endpoint) -> Result<(), FleetError> {
    if endpoint.backlog > 0 {
        return Err(FleetError::Blocked(format!(
            "{} samples pending in backlog",
            endpoint.backlog
        )));
    }
    if endpoint.battery < endpoint.battery_threshold() {
        return Err(FleetError::Blocked(format!(
            "battery {}mA below threshold {}mA",
            endpoint.battery,
            endpoint.battery_threshold()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::api::{FleetApi, OK};

    const AHN2: &str = "AHN2_TBCDB1045001";
    const AHN2_CHANNEL: &str = "OTA_AHN2_TBCDB1045001";

    #[test]
    fn test_ota_happy_path() {
        let mut api = FleetApi::new();
        assert_eq!(api.post_version_to_ota_channel(AHN2_CHANNEL, "ahn2_34.swu"), OK);
        assert!(api.simulate_ota_update(AHN2, "34"));
        assert_eq!(api.get_node_by_uuid(AHN2).unwrap().version, "34");
    }

    #[test]
    fn test_ota_unknown_node() {
        let mut api = FleetApi::new();
        assert!(!api.simulate_ota_update("NONEXISTENT_UUID", "34"));
    }

    #[test]
    fn test_ota_no_matching_artifact() {
        let mut api = FleetApi::new();
        assert!(!api.simulate_ota_update(AHN2, "34"));

        api.post_version_to_ota_channel(AHN2_CHANNEL, "ahn2_35.swu");
        assert!(!api.simulate_ota_update(AHN2, "34"));
        assert_eq!(api.get_node_by_uuid(AHN2).unwrap().version, "33");
    }

    #[test]
    fn test_ota_hardware_mismatch() {
        let mut api = FleetApi::new();
        // syntactically valid, semantically wrong hardware: accepted at
        // upload, rejected at pickup
        assert_eq!(api.post_version_to_ota_channel(AHN2_CHANNEL, "moxa_34.swu"), OK);
        assert!(!api.simulate_ota_update(AHN2, "34"));
        assert_eq!(api.get_node_by_uuid(AHN2).unwrap().version, "33");
    }

    #[test]
    fn test_ota_rejects_non_monotonic_version() {
        let mut api = FleetApi::new();
        api.post_version_to_ota_channel(AHN2_CHANNEL, "ahn2_33.swu");
        assert!(!api.simulate_ota_update(AHN2, "33"));
        api.post_version_to_ota_channel(AHN2_CHANNEL, "ahn2_32.swu");
        assert!(!api.simulate_ota_update(AHN2, "32"));
        assert_eq!(api.get_node_by_uuid(AHN2).unwrap().version, "33");
    }

    #[test]
    fn test_dfu_gates() {
        let mut api = FleetApi::new();

        // backlog gate
        api.set_endpoint_backlog("EP1_001", 5);
        assert!(!api.simulate_endpoint_dfu("EP1_001", "2.0"));
        assert_eq!(api.get_endpoint_by_serial("EP1_001").unwrap().version, "1.0");

        api.set_endpoint_backlog("EP1_001", 0);
        assert!(api.simulate_endpoint_dfu("EP1_001", "2.0"));
        assert_eq!(api.get_endpoint_by_serial("EP1_001").unwrap().version, "2.0");

        // battery gate
        api.set_endpoint_battery("EP2_001", 2000);
        assert!(!api.simulate_endpoint_dfu("EP2_001", "2.0"));
        assert_eq!(api.get_endpoint_by_serial("EP2_001").unwrap().version, "1.0");
    }

    #[test]
    fn test_dfu_unknown_endpoint() {
        let mut api = FleetApi::new();
        assert!(!api.simulate_endpoint_dfu("EP999_001", "2.0"));
    }
}
