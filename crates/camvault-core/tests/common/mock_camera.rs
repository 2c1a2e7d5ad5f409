//! Minimal HTTP/1.1 server standing in for the control API and a camera's
//! media endpoint in integration tests.
//!
//! Routes:
//! - POST `/api/org/generateFederatedSessionToken` → `{"federatedSessionToken": TOKEN}`
//! - POST `/api/camera/getMediaUris` / `/api/audiogateway/getMediaUris` → LAN and WAN
//!   templates pointing back at this server
//! - POST `/api/camera/getMinimalCameraStateList` / `.../getMinimalAudioGatewayStateList`
//! - GET `/media/<id>/<start>/<duration>/<manifest>` → MPD
//! - GET `/media/<id>/<start>/<duration>/init.mp4` and `seg_<n>.m4s` → deterministic bytes
//!
//! Every request is recorded as `"METHOD /path"`. Each connection serves one
//! request (`Connection: close`).

use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub const TOKEN: &str = "federated-test-token";

#[derive(Debug, Clone)]
pub struct MockOptions {
    /// Status for the token endpoint; non-2xx returns `token_error_body`.
    pub token_status: u16,
    pub token_error_body: String,
    /// `startNumber` advertised in every manifest.
    pub start_number: u64,
    /// Manifest file name in the returned templates (`clip.mpd`, `file.mpd`, or anything else).
    pub manifest_name: String,
    /// Device/gateway ids whose manifest body is not an MPD.
    pub bad_manifest_ids: HashSet<String>,
    /// Device/gateway ids whose manifest GET answers with this status.
    pub manifest_status: HashMap<String, u16>,
    /// Device/gateway ids whose getMediaUris call answers with this status.
    pub media_uris_status: HashMap<String, u16>,
    /// Segment number that answers 503 this many times before succeeding.
    pub flaky_segment: Option<(u64, usize)>,
    /// `mediaPresentationDuration` advertised in manifests (ISO 8601), if any.
    pub presentation_duration: Option<String>,
    pub camera_states: serde_json::Value,
    pub gateway_states: serde_json::Value,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            token_status: 200,
            token_error_body: String::new(),
            start_number: 0,
            manifest_name: "clip.mpd".to_string(),
            bad_manifest_ids: HashSet::new(),
            manifest_status: HashMap::new(),
            media_uris_status: HashMap::new(),
            flaky_segment: None,
            presentation_duration: None,
            camera_states: serde_json::json!([]),
            gateway_states: serde_json::json!([]),
        }
    }
}

pub struct MockCamera {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockCamera {
    /// Starts the server in background threads; runs until the process exits.
    pub fn start(opts: MockOptions) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}", port);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = Arc::new(State {
            base_url: base_url.clone(),
            opts,
            requests: Arc::clone(&requests),
            flaky_hits: Mutex::new(HashMap::new()),
        });
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&state);
                thread::spawn(move || handle(stream, &state));
            }
        });
        Self { base_url, requests }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose path ends with `suffix`.
    pub fn count_ending_with(&self, suffix: &str) -> usize {
        self.requests().iter().filter(|r| r.ends_with(suffix)).count()
    }

    /// Media GETs (manifests excluded) for device `id`.
    pub fn media_fetches(&self, id: &str) -> usize {
        let prefix = format!("GET /media/{}/", id);
        self.requests()
            .iter()
            .filter(|r| r.starts_with(&prefix) && !r.ends_with(".mpd") && !r.ends_with(".m3u8"))
            .count()
    }
}

/// Bytes served for the init segment of `id`.
pub fn init_bytes(id: &str) -> Vec<u8> {
    format!("INIT[{}]", id).into_bytes()
}

/// Bytes served for media segment number `n` of `id`.
pub fn segment_bytes(id: &str, n: u64) -> Vec<u8> {
    format!("SEG[{}:{}]", id, n).into_bytes()
}

struct State {
    base_url: String,
    opts: MockOptions,
    requests: Arc<Mutex<Vec<String>>>,
    flaky_hits: Mutex<HashMap<u64, usize>>,
}

struct Request {
    method: String,
    path: String,
    cookie: Option<String>,
    body: String,
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let mut lines = head.lines();
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let path = first.next()?.to_string();

    let mut content_length = 0usize;
    let mut cookie = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            } else if name.eq_ignore_ascii_case("cookie") {
                cookie = Some(value.to_string());
            }
        }
    }
    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }
    let body = String::from_utf8_lossy(&data[header_end..]).to_string();
    Some(Request {
        method,
        path,
        cookie,
        body,
    })
}

fn respond(stream: &mut TcpStream, status: &str, content_type: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}

fn json(stream: &mut TcpStream, value: serde_json::Value) {
    respond(stream, "200 OK", "application/json", value.to_string().as_bytes());
}

fn handle(mut stream: TcpStream, state: &State) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let Some(req) = read_request(&mut stream) else {
        return;
    };
    state
        .requests
        .lock()
        .unwrap()
        .push(format!("{} {}", req.method, req.path));

    let body: serde_json::Value = serde_json::from_str(&req.body).unwrap_or(serde_json::Value::Null);
    match (req.method.as_str(), req.path.as_str()) {
        ("POST", "/api/org/generateFederatedSessionToken") => {
            if state.opts.token_status == 200 {
                json(&mut stream, serde_json::json!({ "federatedSessionToken": TOKEN }));
            } else {
                let status = error_status(state.opts.token_status);
                respond(&mut stream, &status, "application/json", state.opts.token_error_body.as_bytes());
            }
        }
        ("POST", "/api/camera/getMediaUris") => {
            let id = body["cameraUuid"].as_str().unwrap_or("").to_string();
            media_uris(&mut stream, state, &id);
        }
        ("POST", "/api/audiogateway/getMediaUris") => {
            let id = body["gatewayUuid"].as_str().unwrap_or("").to_string();
            media_uris(&mut stream, state, &id);
        }
        ("POST", "/api/camera/getMinimalCameraStateList") => {
            json(&mut stream, serde_json::json!({ "cameraStates": state.opts.camera_states }));
        }
        ("POST", "/api/audiogateway/getMinimalAudioGatewayStateList") => {
            json(&mut stream, serde_json::json!({ "audioGatewayStates": state.opts.gateway_states }));
        }
        ("GET", path) if path.starts_with("/media/") => media(&mut stream, state, &req),
        _ => respond(&mut stream, "404 Not Found", "text/plain", b"not found"),
    }
}

fn error_status(code: u16) -> String {
    format!("{} Error", code)
}

fn media_uris(stream: &mut TcpStream, state: &State, id: &str) {
    if let Some(code) = state.opts.media_uris_status.get(id) {
        respond(stream, &error_status(*code), "application/json", br#"{"error":"device offline"}"#);
        return;
    }
    let template = format!(
        "{}/media/{}/{{START_TIME}}/{{DURATION}}/{}",
        state.base_url, id, state.opts.manifest_name
    );
    json(
        stream,
        serde_json::json!({
            "wanVodMpdUriTemplate": template,
            "lanVodMpdUrisTemplates": [template],
        }),
    );
}

fn media(stream: &mut TcpStream, state: &State, req: &Request) {
    let expected_cookie = format!("RSESSIONID=RFT:{}", TOKEN);
    if req.cookie.as_deref() != Some(expected_cookie.as_str()) {
        respond(stream, "401 Unauthorized", "text/plain", b"missing session");
        return;
    }
    // /media/<id>/<start>/<duration>/<file>
    let parts: Vec<&str> = req.path.trim_start_matches('/').split('/').collect();
    if parts.len() != 5 {
        respond(stream, "404 Not Found", "text/plain", b"bad media path");
        return;
    }
    let (id, file) = (parts[1], parts[4]);

    if file == state.opts.manifest_name {
        if let Some(code) = state.opts.manifest_status.get(id) {
            respond(stream, &error_status(*code), "text/plain", b"no footage for that range");
            return;
        }
        if state.opts.bad_manifest_ids.contains(id) {
            respond(stream, "200 OK", "application/dash+xml", b"<html>upstream error</html>");
            return;
        }
        let duration_attr = state
            .opts
            .presentation_duration
            .as_ref()
            .map(|d| format!(" mediaPresentationDuration=\"{}\"", d))
            .unwrap_or_default();
        let mpd = format!(
            r#"<?xml version="1.0"?>
<MPD xmlns="urn:mpeg:dash:schema:mpd:2011" type="static"{}>
  <Period>
    <AdaptationSet mimeType="video/mp4">
      <SegmentTemplate timescale="1000" duration="2000" initialization="init.mp4" media="seg_$Number$.m4s" startNumber="{}"/>
    </AdaptationSet>
  </Period>
</MPD>"#,
            duration_attr, state.opts.start_number
        );
        respond(stream, "200 OK", "application/dash+xml", mpd.as_bytes());
        return;
    }
    if file == "init.mp4" {
        respond(stream, "200 OK", "video/mp4", &init_bytes(id));
        return;
    }
    let number = file
        .strip_prefix("seg_")
        .and_then(|s| s.strip_suffix(".m4s"))
        .and_then(|s| s.parse::<u64>().ok());
    let Some(n) = number else {
        respond(stream, "404 Not Found", "text/plain", b"unknown segment");
        return;
    };
    if let Some((flaky, failures)) = state.opts.flaky_segment {
        if flaky == n {
            let mut hits = state.flaky_hits.lock().unwrap();
            let seen = hits.entry(n).or_insert(0);
            if *seen < failures {
                *seen += 1;
                respond(stream, "503 Service Unavailable", "text/plain", b"busy");
                return;
            }
        }
    }
    respond(stream, "200 OK", "video/mp4", &segment_bytes(id, n));
}
