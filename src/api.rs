use tracing::{info, warn};

use crate::artifact::ArtifactName;
use crate::config::Config;
use crate::error::FleetError;
use crate::registry::FleetRegistry;
use crate::types::{EndpointRecord, NodeRecord};

/// HTTP-like status codes returned by the channel operations. Purely a
/// convention; no transport is involved.
pub const OK: u16 = 200;
pub const BAD_REQUEST: u16 = 400;

/// The fake management API. Owns the fleet state; every call is a
/// single synchronous read-modify-return against it. Construct one per
/// test to get an isolated fleet.
#[derive(Debug, Clone)]
pub struct FleetApi {
    pub(crate) registry: FleetRegistry,
    pub(crate) config: Config,
}

impl FleetApi {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        FleetApi {
            registry: FleetRegistry::new(),
            config,
        }
    }

    /// Node record by uuid, endpoints nested.
    pub fn get_node_by_uuid(&self, uuid: &str) -> Result<NodeRecord, FleetError> {
        let node = self.registry.get_node(uuid)?;
        let endpoints = node
            .endpoints
            .iter()
            .filter_map(|serial| self.registry.get_endpoint(serial).ok())
            .map(EndpointRecord::from)
            .collect();
        Ok(NodeRecord {
            uuid: node.uuid.clone(),
            hardware: node.hardware,
            ota_channel: node.ota_channel(),
            version: node.version.clone(),
            endpoints,
        })
    }

    /// Endpoint record by serial number.
    pub fn get_endpoint_by_serial(&self, serial: &str) -> Result<EndpointRecord, FleetError> {
        self.registry.get_endpoint(serial).map(EndpointRecord::from)
    }

    /// Upload an artifact to a channel. 400 when the channel does not
    /// exist or the filename fails the artifact grammar. Hardware
    /// compatibility with the owning node is deliberately not checked
    /// here; the update simulator enforces it at pickup time.
    pub fn post_version_to_ota_channel(&mut self, channel: &str, artifact: &str) -> u16 {
        if let Err(err) = ArtifactName::parse(artifact) {
            warn!(channel, artifact, %err, "Rejected artifact upload");
            return BAD_REQUEST;
        }
        match self.registry.get_channel_mut(channel) {
            Ok(ota_channel) => {
                // duplicate post is a no-op; membership is a set
                ota_channel.artifacts.insert(artifact.to_string());
                info!(channel, artifact, "Artifact posted to OTA channel");
                OK
            }
            Err(err) => {
                warn!(channel, artifact, %err, "Rejected artifact upload");
                BAD_REQUEST
            }
        }
    }

    /// Remove an artifact from a channel. 400 when the channel or the
    /// artifact is absent; the channel itself is never deleted.
    pub fn clear_ota_channel(&mut self, channel: &str, artifact: &str) -> u16 {
        if let Ok(ota_channel) = self.registry.get_channel_mut(channel) {
            if ota_channel.artifacts.remove(artifact) {
                info!(channel, artifact, "Artifact cleared from OTA channel");
                return OK;
            }
        }
        warn!(channel, artifact, "Clear failed: channel or artifact absent");
        BAD_REQUEST
    }

    /// Current artifact set for a channel; empty when the channel is
    /// unknown.
    pub fn get_ota_channel_versions(&self, channel: &str) -> Vec<String> {
        self.registry
            .get_channel(channel)
            .map(|ch| ch.artifacts.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn set_endpoint_battery(&mut self, serial: &str, milliamps: i64) -> bool {
        match self.registry.get_endpoint_mut(serial) {
            Ok(endpoint) => {
                endpoint.battery = milliamps;
                info!(serial, milliamps, "Endpoint battery set");
                true
            }
            Err(err) => {
                warn!(serial, %err, "Battery set failed");
                false
            }
        }
    }

    /// Negative counts are rejected; a backlog is a sample count.
    pub fn set_endpoint_backlog(&mut self, serial: &str, count: i64) -> bool {
        if count < 0 {
            warn!(serial, count, "Backlog set failed: negative count");
            return false;
        }
        match self.registry.get_endpoint_mut(serial) {
            Ok(endpoint) => {
                endpoint.backlog = count;
                info!(serial, count, "Endpoint backlog set");
                true
            }
            Err(err) => {
                warn!(serial, %err, "Backlog set failed");
                false
            }
        }
    }

    pub fn node_uuids(&self) -> Vec<String> {
        self.registry.node_uuids().map(str::to_string).collect()
    }

    pub fn endpoint_serials(&self) -> Vec<String> {
        self.registry.endpoint_serials().map(str::to_string).collect()
    }
}

impl Default for FleetApi {
    fn default() -> Self {
        Self::new()
    }
}
