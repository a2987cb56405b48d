//! Gist-backed document service over HTTP.
//!
//! Each backup is a private gist holding one JSON file. Create is
//! `POST /gists`, overwrite is `PATCH /gists/{id}` and fetch is
//! `GET /gists/{id}`, all authorized with `Authorization: token <t>`.
//!
//! The gist API inlines at most about a megabyte of a file. Larger files
//! come back `truncated` and are read in full from their `raw_url`.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::transport::DocumentService;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

const GIST_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

#[derive(Serialize)]
struct GistPayload<'a> {
    description: &'a str,
    public: bool,
    files: HashMap<&'a str, GistFileContent<'a>>,
}

#[derive(Serialize)]
struct GistFileContent<'a> {
    content: &'a str,
}

#[derive(Deserialize)]
struct Gist {
    id: String,
    #[serde(default)]
    files: HashMap<String, GistFile>,
}

#[derive(Deserialize)]
struct GistFile {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    truncated: bool,
    #[serde(default)]
    raw_url: Option<String>,
}

/// Where the full snapshot text of a fetched gist lives.
#[derive(Debug, PartialEq, Eq)]
enum SnapshotSource {
    Inline(String),
    Raw(String),
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

/// A [`DocumentService`] storing snapshots in private gists.
#[derive(Debug, Clone)]
pub struct GistService {
    client: Client,
    config: SyncConfig,
}

impl GistService {
    /// Creates a service with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `SyncFailed` if the HTTP client cannot be built.
    pub fn new(config: SyncConfig) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    fn request(&self, method: Method, url: String, token: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTHORIZATION, format!("token {token}"))
            .header(ACCEPT, GIST_MEDIA_TYPE)
    }

    fn payload<'a>(&'a self, content: &'a str) -> GistPayload<'a> {
        GistPayload {
            description: &self.config.description,
            public: false,
            files: HashMap::from([(self.config.file_name.as_str(), GistFileContent { content })]),
        }
    }

    fn snapshot_file(&self, mut gist: Gist) -> SyncResult<SnapshotSource> {
        let missing = || {
            SyncError::MalformedSnapshot(format!(
                "backup {} has no file `{}`",
                gist.id, self.config.file_name
            ))
        };
        let file = gist
            .files
            .remove(&self.config.file_name)
            .ok_or_else(missing)?;

        match file {
            GistFile {
                truncated: true,
                raw_url: Some(url),
                ..
            } => Ok(SnapshotSource::Raw(url)),
            GistFile {
                truncated: false,
                content: Some(content),
                ..
            } => Ok(SnapshotSource::Inline(content)),
            _ => Err(missing()),
        }
    }
}

#[async_trait]
impl DocumentService for GistService {
    async fn create_document(&self, token: &str, content: &str) -> SyncResult<String> {
        let response = self
            .request(Method::POST, self.config.documents_url(), token)
            .json(&self.payload(content))
            .send()
            .await?;
        let gist: Gist = check_response(response, None).await?.json().await?;
        debug!(id = %gist.id, "backup document created");
        Ok(gist.id)
    }

    async fn update_document(&self, token: &str, id: &str, content: &str) -> SyncResult<()> {
        let response = self
            .request(Method::PATCH, self.config.document_url(id), token)
            .json(&self.payload(content))
            .send()
            .await?;
        check_response(response, Some(id)).await?;
        debug!(id, "backup document updated");
        Ok(())
    }

    async fn fetch_document(&self, token: &str, id: &str) -> SyncResult<String> {
        let response = self
            .request(Method::GET, self.config.document_url(id), token)
            .send()
            .await?;
        let gist: Gist = check_response(response, Some(id)).await?.json().await?;

        match self.snapshot_file(gist)? {
            SnapshotSource::Inline(content) => Ok(content),
            SnapshotSource::Raw(url) => {
                debug!(id, "backup file truncated, reading raw content");
                let response = self.request(Method::GET, url, token).send().await?;
                Ok(check_response(response, Some(id)).await?.text().await?)
            }
        }
    }
}

/// Maps a non-success response to a [`SyncError`].
///
/// - **404** on a known id → `RemoteNotFound`
/// - **401 / 403** → `SyncFailed("authorization failed: ...")`
/// - any other non-success → `SyncFailed` with the API's `message` field,
///   or the status line when the body has none
async fn check_response(
    response: reqwest::Response,
    id: Option<&str>,
) -> SyncResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
        return Err(SyncError::RemoteNotFound { id: id.to_string() });
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiMessage>(&body)
        .map(|m| m.message)
        .unwrap_or_else(|_| status.to_string());

    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        Err(SyncError::failed(format!("authorization failed: {message}")))
    } else {
        Err(SyncError::failed(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn mock_response(status: u16, body: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body.to_string())
                .unwrap(),
        )
    }

    fn service() -> GistService {
        GistService::new(SyncConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn success_passes_through() {
        let response = mock_response(200, "{}");
        assert!(check_response(response, Some("g")).await.is_ok());
    }

    #[tokio::test]
    async fn not_found_on_known_id() {
        let err = check_response(mock_response(404, ""), Some("g1")).await.unwrap_err();
        assert_eq!(err, SyncError::RemoteNotFound { id: "g1".into() });

        let err = check_response(mock_response(404, ""), None).await.unwrap_err();
        assert!(matches!(err, SyncError::SyncFailed(_)));
    }

    #[tokio::test]
    async fn authorization_failures() {
        let body = r#"{"message":"Bad credentials"}"#;
        let err = check_response(mock_response(401, body), None).await.unwrap_err();
        assert_eq!(
            err,
            SyncError::failed("authorization failed: Bad credentials")
        );
    }

    #[tokio::test]
    async fn other_failures_use_message_or_status() {
        let body = r#"{"message":"Validation Failed"}"#;
        let err = check_response(mock_response(422, body), None).await.unwrap_err();
        assert_eq!(err, SyncError::failed("Validation Failed"));

        let err = check_response(mock_response(500, "oops"), None).await.unwrap_err();
        assert_eq!(err, SyncError::failed("500 Internal Server Error"));
    }

    #[test]
    fn payload_shape() {
        let service = service();
        let value = serde_json::to_value(service.payload("{\"staff\":[]}")).unwrap();
        assert_eq!(value["public"], false);
        assert_eq!(value["description"], "Focus Academy - School Management Backup");
        assert_eq!(
            value["files"]["focus_academy_data.json"]["content"],
            "{\"staff\":[]}"
        );
    }

    #[test]
    fn snapshot_file_extraction() {
        let service = service();
        let gist: Gist = serde_json::from_str(
            r#"{"id":"g1","files":{"focus_academy_data.json":{"content":"{}"}}}"#,
        )
        .unwrap();
        assert_eq!(
            service.snapshot_file(gist).unwrap(),
            SnapshotSource::Inline("{}".into())
        );

        let gist: Gist = serde_json::from_str(r#"{"id":"g1","files":{}}"#).unwrap();
        assert!(matches!(
            service.snapshot_file(gist),
            Err(SyncError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn truncated_file_points_at_raw_url() {
        let service = service();
        let gist: Gist = serde_json::from_str(
            r#"{"id":"g1","files":{"focus_academy_data.json":{
                "content":"{\"staff\":[",
                "truncated":true,
                "raw_url":"https://gist.example/raw/g1"
            }}}"#,
        )
        .unwrap();
        assert_eq!(
            service.snapshot_file(gist).unwrap(),
            SnapshotSource::Raw("https://gist.example/raw/g1".into())
        );

        let gist: Gist = serde_json::from_str(
            r#"{"id":"g1","files":{"focus_academy_data.json":{"content":"{","truncated":true}}}"#,
        )
        .unwrap();
        assert!(matches!(
            service.snapshot_file(gist),
            Err(SyncError::MalformedSnapshot(_))
        ));
    }

    /// Serves a gist whose file is truncated, plus its raw content, and
    /// records every request line.
    async fn serve_truncated_gist(full: &'static str) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let raw_url = format!("{base}/raw/g1");
        let log = Arc::clone(&seen);
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                let request = String::from_utf8_lossy(&request).to_string();
                let line = request.lines().next().unwrap_or_default().to_string();
                let authorized = request.to_ascii_lowercase().contains("authorization: token tok");
                log.lock().push(format!("{line} auth={authorized}"));

                let body = if line.starts_with("GET /raw/g1") {
                    full.to_string()
                } else {
                    serde_json::json!({
                        "id": "g1",
                        "files": {
                            "focus_academy_data.json": {
                                "content": &full[..full.len() / 2],
                                "truncated": true,
                                "raw_url": raw_url,
                            }
                        }
                    })
                    .to_string()
                };
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
        });
        (base, seen)
    }

    #[tokio::test]
    async fn fetch_reads_truncated_file_from_raw_url() {
        let full = r#"{"currentUser":null,"staff":[],"scheduleSlots":[],"lessons":[],"homework":[]}"#;
        let (base, seen) = serve_truncated_gist(full).await;
        let service = GistService::new(SyncConfig::new(base)).unwrap();

        let content = service.fetch_document("tok", "g1").await.unwrap();
        assert_eq!(content, full);

        let seen = seen.lock().clone();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].starts_with("GET /gists/g1 "));
        assert!(seen[1].starts_with("GET /raw/g1 "));
        assert!(seen.iter().all(|line| line.ends_with("auth=true")));
    }
}
