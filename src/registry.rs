use std::collections::BTreeMap;
use tracing::info;

use crate::error::FleetError;
use crate::types::{Endpoint, EndpointHardware, Node, NodeHardware, OtaChannel};

/// The fixed simulated fleet: three gateway nodes, three sensor
/// endpoints attached to the AHN2 node, and one OTA channel per node.
/// Entities are never added or removed after construction.
#[derive(Debug, Clone)]
pub struct FleetRegistry {
    nodes: BTreeMap<String, Node>,
    endpoints: BTreeMap<String, Endpoint>,
    channels: BTreeMap<String, OtaChannel>,
}

impl FleetRegistry {
    pub fn new() -> Self {
        let mut registry = FleetRegistry {
            nodes: BTreeMap::new(),
            endpoints: BTreeMap::new(),
            channels: BTreeMap::new(),
        };

        registry.add_node("AHN2_TBCDB1045001", NodeHardware::Ahn2);
        registry.add_node("Cassia_TBCDB1045002", NodeHardware::Cassia);
        registry.add_node("MOXA_TBCDB1045003", NodeHardware::Moxa);

        let ahn2 = "AHN2_TBCDB1045001";
        registry.add_endpoint("EP1_001", EndpointHardware::Ep1, ahn2, 3000);
        registry.add_endpoint("EP2_001", EndpointHardware::Ep2, ahn2, 2800);
        registry.add_endpoint("Canary_001", EndpointHardware::Canary, ahn2, 3800);

        info!(
            nodes = registry.nodes.len(),
            endpoints = registry.endpoints.len(),
            "Fleet registry initialized"
        );
        registry
    }

    fn add_node(&mut self, uuid: &str, hardware: NodeHardware) {
        let node = Node {
            uuid: uuid.to_string(),
            hardware,
            version: "33".to_string(),
            endpoints: Vec::new(),
        };
        self.channels.insert(node.ota_channel(), OtaChannel::default());
        self.nodes.insert(uuid.to_string(), node);
    }

    fn add_endpoint(
        &mut self,
        serial: &str,
        hardware: EndpointHardware,
        node_uuid: &str,
        battery: i64,
    ) {
        if let Some(node) = self.nodes.get_mut(node_uuid) {
            node.endpoints.push(serial.to_string());
        }
        self.endpoints.insert(
            serial.to_string(),
            Endpoint {
                serial_number: serial.to_string(),
                hardware,
                node_uuid: node_uuid.to_string(),
                version: "1.0".to_string(),
                battery,
                backlog: 0,
            },
        );
    }

    pub fn get_node(&self, uuid: &str) -> Result<&Node, FleetError> {
        self.nodes
            .get(uuid)
            .ok_or_else(|| FleetError::node_not_found(uuid))
    }

    pub fn get_node_mut(&mut self, uuid: &str) -> Result<&mut Node, FleetError> {
        self.nodes
            .get_mut(uuid)
            .ok_or_else(|| FleetError::node_not_found(uuid))
    }

    pub fn get_endpoint(&self, serial: &str) -> Result<&Endpoint, FleetError> {
        self.endpoints
            .get(serial)
            .ok_or_else(|| FleetError::endpoint_not_found(serial))
    }

    pub fn get_endpoint_mut(&mut self, serial: &str) -> Result<&mut Endpoint, FleetError> {
        self.endpoints
            .get_mut(serial)
            .ok_or_else(|| FleetError::endpoint_not_found(serial))
    }

    pub fn get_channel(&self, channel: &str) -> Result<&OtaChannel, FleetError> {
        self.channels
            .get(channel)
            .ok_or_else(|| FleetError::channel_not_found(channel))
    }

    pub fn get_channel_mut(&mut self, channel: &str) -> Result<&mut OtaChannel, FleetError> {
        self.channels
            .get_mut(channel)
            .ok_or_else(|| FleetError::channel_not_found(channel))
    }

    pub fn node_uuids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn endpoint_serials(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }
}

impl Default for FleetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_fleet() {
        let registry = FleetRegistry::new();
        assert_eq!(registry.node_uuids().count(), 3);
        assert_eq!(registry.endpoint_serials().count(), 3);

        let node = registry.get_node("AHN2_TBCDB1045001").unwrap();
        assert_eq!(node.hardware, NodeHardware::Ahn2);
        assert_eq!(node.version, "33");
        assert_eq!(node.endpoints, vec!["EP1_001", "EP2_001", "Canary_001"]);

        // every node has its channel pre-created and empty
        for uuid in ["AHN2_TBCDB1045001", "Cassia_TBCDB1045002", "MOXA_TBCDB1045003"] {
            let channel = registry.get_channel(&format!("OTA_{uuid}")).unwrap();
            assert!(channel.artifacts.is_empty());
        }
    }

    #[test]
    fn test_lookup_failures() {
        let registry = FleetRegistry::new();
        let err = registry.get_node("NONEXISTENT_UUID").unwrap_err();
        assert_eq!(err, FleetError::node_not_found("NONEXISTENT_UUID"));
        assert!(registry.get_endpoint("EP999_001").is_err());
        assert!(registry.get_channel("OTA_UNKNOWN").is_err());
    }

    #[test]
    fn test_endpoint_fixture_state() {
        let registry = FleetRegistry::new();
        let ep = registry.get_endpoint("Canary_001").unwrap();
        assert_eq!(ep.hardware, EndpointHardware::Canary);
        assert_eq!(ep.battery, 3800);
        assert_eq!(ep.backlog, 0);
        assert_eq!(ep.version, "1.0");
        assert_eq!(ep.node_uuid, "AHN2_TBCDB1045001");
    }
}
