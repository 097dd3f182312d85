//! In-memory simulated device fleet for exercising OTA and DFU update
//! workflows. No network, no persistence; a test harness constructs a
//! [`FleetApi`], drives the management operations, and asserts on the
//! returned state.

pub mod api;
pub mod artifact;
pub mod config;
pub mod error;
pub mod registry;
pub mod simulate;
pub mod types;

pub use api::{FleetApi, BAD_REQUEST, OK};
pub use artifact::ArtifactName;
pub use config::Config;
pub use error::FleetError;
pub use types::{Endpoint, EndpointHardware, EndpointRecord, Node, NodeHardware, NodeRecord};
