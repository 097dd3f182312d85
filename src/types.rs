use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Gateway hardware variants. Parsed from the uuid prefix; unknown
/// prefixes are rejected rather than mapped to a default.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeHardware {
    Ahn2,
    Cassia,
    Moxa,
}

impl NodeHardware {
    /// Parse the hardware type from a node uuid such as
    /// `AHN2_TBCDB1045001`. Prefix spellings are the fixture's.
    pub fn from_uuid(uuid: &str) -> Option<Self> {
        match uuid.split('_').next()? {
            "AHN2" => Some(NodeHardware::Ahn2),
            "Cassia" => Some(NodeHardware::Cassia),
            "MOXA" => Some(NodeHardware::Moxa),
            _ => None,
        }
    }

    /// Lowercase token used in firmware artifact filenames.
    pub fn artifact_slug(&self) -> &'static str {
        match self {
            NodeHardware::Ahn2 => "ahn2",
            NodeHardware::Cassia => "cassia",
            NodeHardware::Moxa => "moxa",
        }
    }

    /// Host of the management API serving this hardware family.
    pub fn management_host(&self) -> &'static str {
        match self {
            NodeHardware::Ahn2 | NodeHardware::Cassia => "buildroot_api.azure",
            NodeHardware::Moxa => "moxa_api.azure",
        }
    }
}

/// Sensor hardware variants.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointHardware {
    Ep1,
    Ep2,
    Canary,
}

impl EndpointHardware {
    pub fn from_serial(serial: &str) -> Option<Self> {
        match serial.split('_').next()? {
            "EP1" => Some(EndpointHardware::Ep1),
            "EP2" => Some(EndpointHardware::Ep2),
            "Canary" => Some(EndpointHardware::Canary),
            _ => None,
        }
    }

    /// Minimum battery level (mA) required before a DFU is permitted.
    pub fn battery_threshold(&self) -> i64 {
        match self {
            EndpointHardware::Ep1 | EndpointHardware::Ep2 => 2500,
            EndpointHardware::Canary => 3600,
        }
    }
}

/// A simulated gateway device.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Node {
    pub uuid: String,
    pub hardware: NodeHardware,
    pub version: String,
    /// Serials of the endpoints attached to this node, in fixture order.
    pub endpoints: Vec<String>,
}

impl Node {
    /// Channel name is derived from the uuid, 1:1, never stored apart.
    pub fn ota_channel(&self) -> String {
        format!("OTA_{}", self.uuid)
    }
}

/// A simulated sensor device.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Endpoint {
    pub serial_number: String,
    pub hardware: EndpointHardware,
    pub node_uuid: String,
    pub version: String,
    /// Battery level in milliamps.
    pub battery: i64,
    /// Unprocessed sample count; nonzero blocks DFU.
    pub backlog: i64,
}

impl Endpoint {
    pub fn battery_threshold(&self) -> i64 {
        self.hardware.battery_threshold()
    }

    /// True when both DFU gates pass.
    pub fn can_update(&self) -> bool {
        self.backlog == 0 && self.battery >= self.battery_threshold()
    }
}

/// Per-node holding area for uploaded firmware artifacts.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct OtaChannel {
    pub artifacts: BTreeSet<String>,
}

/// Endpoint record as returned by the management API.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EndpointRecord {
    pub serial_number: String,
    pub hardware: EndpointHardware,
    pub node_uuid: String,
    pub version: String,
    pub battery: i64,
    pub battery_threshold: i64,
    pub backlog: i64,
}

impl From<&Endpoint> for EndpointRecord {
    fn from(ep: &Endpoint) -> Self {
        EndpointRecord {
            serial_number: ep.serial_number.clone(),
            hardware: ep.hardware,
            node_uuid: ep.node_uuid.clone(),
            version: ep.version.clone(),
            battery: ep.battery,
            battery_threshold: ep.battery_threshold(),
            backlog: ep.backlog,
        }
    }
}

/// Node record as returned by the management API, with the owned
/// endpoint records nested.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NodeRecord {
    pub uuid: String,
    pub hardware: NodeHardware,
    pub ota_channel: String,
    pub version: String,
    pub endpoints: Vec<EndpointRecord>,
}
