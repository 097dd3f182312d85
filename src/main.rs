use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fleetsim::{Config, FleetApi};

/// Walks the standard update scenarios against a fresh fleet: the OTA
/// happy path, an endpoint DFU, and the expected rejections.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    info!(?config, "Fleet simulator starting");

    let mut api = FleetApi::with_config(config);

    for uuid in api.node_uuids() {
        let node = api.get_node_by_uuid(&uuid)?;
        info!(
            uuid = %node.uuid,
            version = %node.version,
            channel = %node.ota_channel,
            host = node.hardware.management_host(),
            endpoints = node.endpoints.len(),
            "Node"
        );
    }
    for serial in api.endpoint_serials() {
        let endpoint = api.get_endpoint_by_serial(&serial)?;
        info!(
            serial = %endpoint.serial_number,
            battery = endpoint.battery,
            threshold = endpoint.battery_threshold,
            version = %endpoint.version,
            "Endpoint"
        );
    }

    // OTA happy path: upload a new build and let the node pick it up.
    let node_uuid = "AHN2_TBCDB1045001";
    let channel = format!("OTA_{node_uuid}");
    let status = api.post_version_to_ota_channel(&channel, "ahn2_34.swu");
    info!(status, "Posted ahn2_34.swu");
    let ok = api.simulate_ota_update(node_uuid, "34");
    let node = api.get_node_by_uuid(node_uuid)?;
    info!(ok, version = %node.version, "OTA update result");
    println!("{}", serde_json::to_string_pretty(&node)?);

    // DFU on a healthy endpoint.
    let serial = "EP1_001";
    let ok = api.simulate_endpoint_dfu(serial, "2.0");
    let endpoint = api.get_endpoint_by_serial(serial)?;
    info!(ok, version = %endpoint.version, "DFU result");

    // Expected rejections.
    let status = api.post_version_to_ota_channel(&channel, "invalid_format.swu");
    info!(status, "Posted malformed artifact");

    api.set_endpoint_backlog(serial, 5);
    let ok = api.simulate_endpoint_dfu(serial, "3.0");
    info!(ok, "DFU with pending backlog");

    info!("Demo complete");
    Ok(())
}
