//! In-process fake of the Openfiles service for integration tests.
//!
//! A single `wiremock` responder keeps uploaded files in memory and serves the
//! same endpoints as the real service, so tests can chain operations
//! (upload, list, download, delete) against one account.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const TOKEN: &str = "test-token";
pub const CAPACITY: f64 = 1_000_000_000.0;

/// One part of a `multipart/form-data` body.
#[derive(Debug, Clone)]
pub struct FormPart {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// A file held by the fake service.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub bag_id: String,
    pub filename: String,
    pub description: String,
    pub data: Vec<u8>,
    pub content_type: Option<String>,
    pub uploaded_at: f64,
}

#[derive(Default)]
struct State {
    next_id: u64,
    /// Files on this account, in upload order
    files: Vec<StoredFile>,
    /// Bags that exist on the network but are not on this account
    network: HashMap<String, StoredFile>,
}

#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<State>>,
}

impl FakeStore {
    /// Start a mock server backed by a fresh, empty account.
    pub async fn start() -> (MockServer, FakeStore) {
        let server = MockServer::start().await;
        let store = FakeStore::default();
        Mock::given(any())
            .respond_with(store.clone())
            .mount(&server)
            .await;
        (server, store)
    }

    pub fn files(&self) -> Vec<StoredFile> {
        self.state.lock().unwrap().files.clone()
    }

    pub fn file(&self, bag_id: &str) -> Option<StoredFile> {
        self.files().into_iter().find(|f| f.bag_id == bag_id)
    }

    /// Make a bag known to the network without attaching it to the account.
    pub fn seed_network_bag(&self, bag_id: &str, filename: &str, data: &[u8]) {
        let file = StoredFile {
            bag_id: bag_id.to_string(),
            filename: filename.to_string(),
            description: String::new(),
            data: data.to_vec(),
            content_type: None,
            uploaded_at: 1_700_000_000.0,
        };
        self.state
            .lock()
            .unwrap()
            .network
            .insert(bag_id.to_string(), file);
    }

    fn upload(&self, request: &Request) -> ResponseTemplate {
        let content_type = header(request, "content-type").unwrap_or_default();
        let parts = parse_multipart(&content_type, &request.body);

        let Some(file) = parts.iter().find(|p| p.name == "file") else {
            return validation_error("file");
        };
        let Some(filename) = file.filename.clone() else {
            return validation_error("file");
        };
        let description = parts
            .iter()
            .find(|p| p.name == "description")
            .map(|p| String::from_utf8_lossy(&p.data).into_owned())
            .unwrap_or_default();

        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let bag_id = format!("bag{:06x}", state.next_id);
        let uploaded_at = 1_700_000_000.0 + state.next_id as f64;
        state.files.push(StoredFile {
            bag_id: bag_id.clone(),
            filename,
            description,
            data: file.data.clone(),
            content_type: file.content_type.clone(),
            uploaded_at,
        });

        ResponseTemplate::new(200).set_body_json(json!({ "bag_id": bag_id }))
    }

    fn download(&self, bag_id: &str) -> ResponseTemplate {
        match self.file(bag_id) {
            Some(file) => ResponseTemplate::new(200)
                .insert_header(
                    "content-disposition",
                    format!("attachment; filename=\"{}\"", file.filename).as_str(),
                )
                .set_body_raw(file.data, "application/octet-stream"),
            None => not_found(),
        }
    }

    fn delete(&self, request: &Request) -> ResponseTemplate {
        let Some(bag_id) = form_value(&request.body, "bag_id") else {
            return validation_error("bag_id");
        };
        let mut state = self.state.lock().unwrap();
        let before = state.files.len();
        state.files.retain(|f| f.bag_id != bag_id);
        if state.files.len() == before {
            return not_found();
        }
        ResponseTemplate::new(200).set_body_json(json!({ "message": "Bag deleted" }))
    }

    fn add_by_id(&self, request: &Request) -> ResponseTemplate {
        let Some(bag_id) = form_value(&request.body, "bag_id") else {
            return validation_error("bag_id");
        };
        let mut state = self.state.lock().unwrap();
        if state.files.iter().any(|f| f.bag_id == bag_id) {
            return ResponseTemplate::new(200).set_body_json(json!({ "message": "Already added" }));
        }
        match state.network.remove(&bag_id) {
            Some(file) => {
                state.files.push(file);
                ResponseTemplate::new(200).set_body_json(json!({ "message": "Bag added" }))
            }
            None => not_found(),
        }
    }

    fn user(&self) -> ResponseTemplate {
        let used: usize = self.files().iter().map(|f| f.data.len()).sum();
        ResponseTemplate::new(200).set_body_json(json!({
            "uid": "user-1",
            "space_left": CAPACITY - used as f64,
            "capacity": CAPACITY,
        }))
    }

    fn files_list(&self) -> ResponseTemplate {
        let files: Vec<_> = self
            .files()
            .into_iter()
            .map(|f| {
                let description = Some(f.description).filter(|d| !d.is_empty());
                json!({
                    "bag_id": f.bag_id,
                    "filename": f.filename,
                    "size": f.data.len(),
                    "description": description,
                    "uploaded_at": f.uploaded_at,
                })
            })
            .collect();
        ResponseTemplate::new(200).set_body_json(files)
    }
}

impl Respond for FakeStore {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        if header(request, "x-authorization").as_deref() != Some(TOKEN) {
            return ResponseTemplate::new(401).set_body_json(json!({ "detail": "Invalid API token" }));
        }

        let path = request.url.path().to_string();
        match (request.method.as_str(), path.as_str()) {
            ("GET", "/api/user") => self.user(),
            ("GET", "/api/user/files_list") => self.files_list(),
            ("POST", "/api/files/upload") | ("POST", "/api/folders/upload") => self.upload(request),
            ("DELETE", "/api/bag") => self.delete(request),
            ("POST", "/api/bag/add_by_id") => self.add_by_id(request),
            ("GET", p) if p.starts_with("/api/bag/download/") => {
                let bag_id = &p["/api/bag/download/".len()..];
                self.download(bag_id)
            }
            _ => ResponseTemplate::new(404).set_body_json(json!({ "detail": "Not Found" })),
        }
    }
}

// =============================================================================
// Misbehaving raw TCP peers
// =============================================================================

/// Accept connections, read each request, then reset the connection without answering.
pub async fn resetting_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let _ = read_request_head(&mut stream).await;
            // Zero linger makes the close an RST instead of a FIN.
            #[allow(deprecated)]
            let _ = stream.set_linger(Some(Duration::ZERO));
            drop(stream);
        }
    });
    format!("http://{}", addr)
}

/// Answer every request with a 200 whose body stops `sent` bytes into a
/// declared `declared`-byte body, then close the connection.
pub async fn truncating_server(declared: usize, sent: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let _ = read_request_head(&mut stream).await;
            let head = format!(
                "HTTP/1.1 200 OK\r\n\
                 Content-Type: application/octet-stream\r\n\
                 Content-Disposition: attachment; filename=\"cut.bin\"\r\n\
                 Content-Length: {}\r\n\r\n",
                declared
            );
            let _ = stream.write_all(head.as_bytes()).await;
            let _ = stream.write_all(&vec![5u8; sent]).await;
            let _ = stream.shutdown().await;
        }
    });
    format!("http://{}", addr)
}

async fn read_request_head(stream: &mut TcpStream) -> std::io::Result<()> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while find(&head, b"\r\n\r\n").is_none() {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    Ok(())
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({ "detail": "Bag not found" }))
}

fn validation_error(field: &str) -> ResponseTemplate {
    ResponseTemplate::new(422).set_body_json(json!({
        "detail": [{ "loc": ["body", field], "msg": "field required", "type": "value_error.missing" }]
    }))
}

pub fn header(request: &Request, name: &str) -> Option<String> {
    request
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub fn form_value(body: &[u8], key: &str) -> Option<String> {
    url::form_urlencoded::parse(body)
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Minimal `multipart/form-data` parser, enough for request bodies built by reqwest.
pub fn parse_multipart(content_type: &str, body: &[u8]) -> Vec<FormPart> {
    let Some(boundary) = content_type.split("boundary=").nth(1) else {
        return Vec::new();
    };
    let delimiter = format!("--{}", boundary.trim_matches('"'));
    let delimiter = delimiter.as_bytes();

    let mut positions = Vec::new();
    let mut offset = 0;
    while let Some(pos) = find(&body[offset..], delimiter) {
        positions.push(offset + pos);
        offset += pos + delimiter.len();
    }

    let mut parts = Vec::new();
    for window in positions.windows(2) {
        let segment = &body[window[0] + delimiter.len()..window[1]];
        let segment = segment.strip_prefix(b"\r\n").unwrap_or(segment);
        let segment = segment.strip_suffix(b"\r\n").unwrap_or(segment);
        let Some(split) = find(segment, b"\r\n\r\n") else {
            continue;
        };

        let headers = String::from_utf8_lossy(&segment[..split]).into_owned();
        let data = segment[split + 4..].to_vec();

        let mut name = String::new();
        let mut filename = None;
        let mut content_type = None;
        for line in headers.lines() {
            let lower = line.to_ascii_lowercase();
            if lower.starts_with("content-disposition:") {
                name = quoted_param(line, " name=").unwrap_or_default();
                filename = quoted_param(line, "filename=");
            } else if lower.starts_with("content-type:") {
                content_type = Some(line["content-type:".len()..].trim().to_string());
            }
        }

        parts.push(FormPart {
            name,
            filename,
            content_type,
            data,
        });
    }
    parts
}

fn quoted_param(line: &str, key: &str) -> Option<String> {
    let start = line.find(key)? + key.len();
    let rest = line[start..].strip_prefix('"')?;
    Some(rest[..rest.find('"')?].to_string())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
