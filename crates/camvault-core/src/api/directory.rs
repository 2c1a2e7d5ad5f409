//! Camera directory: connected cameras and their associated audio gateways.
//!
//! The mapping is computed once before the worker pool starts and is
//! read-only afterwards.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::json;

use super::ApiClient;
use crate::error::FootageError;
use crate::model::DeviceDescriptor;

const CAMERA_STATES_PATH: &str = "/api/camera/getMinimalCameraStateList";
const GATEWAY_STATES_PATH: &str = "/api/audiogateway/getMinimalAudioGatewayStateList";

/// Cameras reporting this status are offline and skipped.
const DISCONNECTED_STATUS: &str = "RED";

/// Optional narrowing of the device set.
#[derive(Debug, Clone, Default)]
pub struct DeviceFilter {
    pub location_id: Option<String>,
    pub device_id: Option<String>,
}

/// Source of the device → audio gateway mapping.
pub trait DeviceDirectory {
    fn list_devices(&self, filter: &DeviceFilter) -> Result<BTreeMap<String, DeviceDescriptor>, FootageError>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraState {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location_uuid: Option<String>,
    #[serde(default)]
    pub connection_status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioGatewayState {
    pub uuid: String,
    #[serde(default)]
    pub associated_cameras: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CameraStateList {
    #[serde(default)]
    camera_states: Vec<CameraState>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AudioGatewayStateList {
    #[serde(default)]
    audio_gateway_states: Vec<AudioGatewayState>,
}

/// Directory backed by the control API's minimal state lists.
pub struct ApiDirectory<'a> {
    api: &'a ApiClient,
}

impl<'a> ApiDirectory<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }
}

impl DeviceDirectory for ApiDirectory<'_> {
    fn list_devices(&self, filter: &DeviceFilter) -> Result<BTreeMap<String, DeviceDescriptor>, FootageError> {
        let cameras: CameraStateList = self.api.post_for(CAMERA_STATES_PATH, &json!({}))?;
        let gateways: AudioGatewayStateList = self.api.post_for(GATEWAY_STATES_PATH, &json!({}))?;
        let devices = build_device_map(&cameras.camera_states, &gateways.audio_gateway_states, filter);
        tracing::info!(
            cameras = cameras.camera_states.len(),
            gateways = gateways.audio_gateway_states.len(),
            selected = devices.len(),
            "loaded device directory"
        );
        Ok(devices)
    }
}

/// Keeps connected cameras that pass `filter` and attaches the audio gateway
/// that lists each camera among its associated cameras.
pub fn build_device_map(
    cameras: &[CameraState],
    gateways: &[AudioGatewayState],
    filter: &DeviceFilter,
) -> BTreeMap<String, DeviceDescriptor> {
    let mut devices = BTreeMap::new();

    for cam in cameras {
        if cam.connection_status.as_deref() == Some(DISCONNECTED_STATUS) {
            tracing::debug!(device = %cam.uuid, "skipping disconnected camera");
            continue;
        }
        if let Some(loc) = &filter.location_id {
            if cam.location_uuid.as_deref() != Some(loc.as_str()) {
                continue;
            }
        }
        if let Some(id) = &filter.device_id {
            if &cam.uuid != id {
                continue;
            }
        }
        devices.insert(cam.uuid.clone(), DeviceDescriptor::new(&cam.uuid, &cam.name));
    }

    for gw in gateways {
        for cam_id in &gw.associated_cameras {
            if let Some(device) = devices.get_mut(cam_id) {
                device.audio_gateway_id = Some(gw.uuid.clone());
            }
        }
    }

    devices
}
