//! Media URI templates for cameras and audio gateways.

use serde::Deserialize;
use serde_json::json;

use super::ApiClient;
use crate::error::FootageError;

/// Which device's media URIs to request.
#[derive(Debug, Clone, Copy)]
pub enum MediaSource<'a> {
    Camera(&'a str),
    AudioGateway(&'a str),
}

impl MediaSource<'_> {
    fn endpoint(&self) -> &'static str {
        match self {
            MediaSource::Camera(_) => "/api/camera/getMediaUris",
            MediaSource::AudioGateway(_) => "/api/audiogateway/getMediaUris",
        }
    }

    fn body(&self) -> serde_json::Value {
        match self {
            MediaSource::Camera(id) => json!({ "cameraUuid": id }),
            MediaSource::AudioGateway(id) => json!({ "gatewayUuid": id }),
        }
    }
}

/// VOD manifest URI templates offered for a device.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaUris {
    #[serde(default)]
    pub wan_vod_mpd_uri_template: Option<String>,
    #[serde(default)]
    pub lan_vod_mpd_uris_templates: Vec<String>,
}

impl MediaUris {
    /// WAN template when `use_wan`, otherwise the first LAN template.
    pub fn vod_template(&self, use_wan: bool) -> Result<&str, FootageError> {
        let chosen = if use_wan {
            self.wan_vod_mpd_uri_template.as_deref()
        } else {
            self.lan_vod_mpd_uris_templates.first().map(String::as_str)
        };
        chosen.filter(|t| !t.is_empty()).ok_or_else(|| FootageError::Template {
            template: String::new(),
            reason: format!(
                "device offers no {} VOD manifest template",
                if use_wan { "WAN" } else { "LAN" }
            ),
        })
    }
}

pub fn fetch_media_uris(api: &ApiClient, source: MediaSource<'_>) -> Result<MediaUris, FootageError> {
    api.post_for(source.endpoint(), &source.body())
}
