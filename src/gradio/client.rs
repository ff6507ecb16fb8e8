//! # Gradio HTTP Client
//!
//! Talks to one Gradio app: `GET /config`, `POST /upload`,
//! `POST /call/{api}` + `GET /call/{api}/{event_id}`, and file downloads.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

use super::sse;
use super::types::{AppConfig, CallRequest, CallResponse, FileData};
use crate::config::Config;
use crate::error::{Error, Result};

/// Root URL of a Hugging Face Space given as `owner/name`.
///
/// `levihsu/OOTDiffusion` becomes `https://levihsu-ootdiffusion.hf.space`.
pub fn space_url(space: &str) -> String {
    let host: String = space
        .trim()
        .trim_matches('/')
        .chars()
        .map(|c| match c {
            '/' | '_' | '.' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect();
    format!("https://{}.hf.space", host)
}

/// HTTP client for one Gradio app.
///
/// Cheaply cloneable; clones share the connection pool and the
/// discovered route prefix.
#[derive(Clone)]
pub struct GradioClient {
    root: String,
    token: Option<String>,
    http: Client,
    api_prefix: Arc<OnceCell<String>>,
}

impl std::fmt::Debug for GradioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradioClient")
            .field("root", &self.root)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl GradioClient {
    /// Creates a client for the app served at `root`.
    ///
    /// No request is made until the first call.
    pub fn new(
        root: impl Into<String>,
        token: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            root: root.into().trim_end_matches('/').to_string(),
            token,
            http: builder.build()?,
            api_prefix: Arc::new(OnceCell::new()),
        })
    }

    /// Creates a client from the application configuration.
    ///
    /// An explicit `service_url` wins over the Space id.
    pub fn from_config(config: &Config) -> Result<Self> {
        let root = match &config.service_url {
            Some(url) => url.clone(),
            None => space_url(&config.space),
        };
        Self::new(
            root,
            config.hf_token.clone(),
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    /// Returns the service root URL.
    pub fn root(&self) -> &str {
        &self.root
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Route prefix, fetched from `/config` once per client.
    async fn api_prefix(&self) -> Result<&str> {
        let prefix = self
            .api_prefix
            .get_or_try_init(|| async {
                let res = self
                    .authorized(self.http.get(format!("{}/config", self.root)))
                    .send()
                    .await?;
                let config: AppConfig = checked(res)
                    .await?
                    .json()
                    .await
                    .map_err(|e| Error::MalformedResponse(format!("app config: {}", e)))?;

                let prefix = config
                    .api_prefix
                    .unwrap_or_default()
                    .trim_end_matches('/')
                    .to_string();
                tracing::debug!(root = %self.root, prefix = %prefix, "Connected to Gradio app");
                Ok::<_, Error>(prefix)
            })
            .await?;
        Ok(prefix.as_str())
    }

    async fn url(&self, route: &str) -> Result<String> {
        Ok(format!("{}{}{}", self.root, self.api_prefix().await?, route))
    }

    /// Uploads a local file and returns its server-side reference.
    pub async fn upload(&self, path: &Path) -> Result<FileData> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let part = Part::bytes(bytes)
            .file_name(name.clone())
            .mime_str(mime_for(path))?;
        let form = Form::new().part("files", part);

        let url = self.url("/upload").await?;
        tracing::debug!(%url, file = %name, "Uploading file");

        let res = self.authorized(self.http.post(url).multipart(form)).send().await?;
        let paths: Vec<String> = checked(res)
            .await?
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(format!("upload response: {}", e)))?;

        let server_path = paths
            .into_iter()
            .next()
            .ok_or_else(|| Error::MalformedResponse("upload returned no paths".to_string()))?;

        Ok(FileData::uploaded(server_path, name))
    }

    /// Calls an endpoint with positional inputs and waits for its outputs.
    pub async fn predict(&self, api_name: &str, data: Vec<Value>) -> Result<Value> {
        let api = api_name.trim_start_matches('/');
        let call_url = self.url(&format!("/call/{}", api)).await?;

        let res = self
            .authorized(self.http.post(&call_url).json(&CallRequest { data }))
            .send()
            .await?;
        let call: CallResponse = checked(res)
            .await?
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(format!("call response: {}", e)))?;

        tracing::debug!(api, event_id = %call.event_id, "Waiting for result");

        let res = self
            .authorized(self.http.get(format!("{}/{}", call_url, call.event_id)))
            .send()
            .await?;
        let body = checked(res).await?.text().await?;

        sse::parse_outcome(&body)
    }

    /// Fetches the bytes of a file produced by the app.
    pub async fn download(&self, file: &FileData) -> Result<Vec<u8>> {
        let url = match (file.url.as_deref(), file.path.as_deref()) {
            (Some(url), _) if url.starts_with('/') => format!("{}{}", self.root, url),
            (Some(url), _) if !url.is_empty() => url.to_string(),
            (_, Some(path)) if !path.is_empty() => self.url(&format!("/file={}", path)).await?,
            _ => {
                return Err(Error::MalformedResponse(format!(
                    "file has neither url nor path: {:?}",
                    file
                )))
            }
        };

        tracing::debug!(%url, "Downloading result");
        let res = self.authorized(self.http.get(url)).send().await?;
        Ok(checked(res).await?.bytes().await?.to_vec())
    }
}

/// Turns non-success statuses into [`Error::Service`].
async fn checked(res: Response) -> Result<Response> {
    if res.status().is_success() {
        return Ok(res);
    }
    Err(Error::Service {
        status: res.status().as_u16(),
        message: res.text().await.unwrap_or_default(),
    })
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_config(server: &MockServer, config: Value) {
        Mock::given(method("GET"))
            .and(path("/config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(config))
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer) -> GradioClient {
        GradioClient::new(server.uri(), None, None).unwrap()
    }

    #[test]
    fn test_space_url() {
        assert_eq!(
            space_url("levihsu/OOTDiffusion"),
            "https://levihsu-ootdiffusion.hf.space"
        );
        assert_eq!(
            space_url("some_user/model.v2"),
            "https://some-user-model-v2.hf.space"
        );
    }

    #[test]
    fn test_service_url_wins_over_space() {
        let config = Config {
            service_url: Some("http://127.0.0.1:7860/".to_string()),
            ..Config::default()
        };
        let client = GradioClient::from_config(&config).unwrap();
        assert_eq!(client.root(), "http://127.0.0.1:7860");

        let client = GradioClient::from_config(&Config::default()).unwrap();
        assert_eq!(client.root(), "https://levihsu-ootdiffusion.hf.space");
    }

    #[tokio::test]
    async fn test_upload_returns_server_path() {
        let server = MockServer::start().await;
        mount_config(&server, json!({})).await;

        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!(["/tmp/gradio/abc/person.jpg"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let local = dir.path().join("person.jpg");
        std::fs::write(&local, b"jpeg bytes").unwrap();

        let file = client_for(&server).upload(&local).await.unwrap();
        assert_eq!(file.path.as_deref(), Some("/tmp/gradio/abc/person.jpg"));
        assert_eq!(file.orig_name.as_deref(), Some("person.jpg"));
    }

    #[tokio::test]
    async fn test_api_prefix_is_discovered() {
        let server = MockServer::start().await;
        mount_config(&server, json!({ "api_prefix": "/gradio_api" })).await;

        Mock::given(method("POST"))
            .and(path("/gradio_api/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["/tmp/x.png"])))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let local = dir.path().join("x.png");
        std::fs::write(&local, b"png bytes").unwrap();

        let file = client_for(&server).upload(&local).await.unwrap();
        assert_eq!(file.path.as_deref(), Some("/tmp/x.png"));
    }

    #[tokio::test]
    async fn test_upload_missing_local_file() {
        let server = MockServer::start().await;
        let result = client_for(&server)
            .upload(Path::new("/nonexistent/person.jpg"))
            .await;
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_predict_reads_complete_event() {
        let server = MockServer::start().await;
        mount_config(&server, json!({})).await;

        Mock::given(method("POST"))
            .and(path("/call/process_dc"))
            .and(body_partial_json(json!({ "data": ["Dress", 1] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "event_id": "evt-1" })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/call/process_dc/evt-1"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "event: heartbeat\ndata: null\n\nevent: complete\ndata: [\"done\"]\n\n",
                "text/event-stream",
            ))
            .mount(&server)
            .await;

        let outputs = client_for(&server)
            .predict("/process_dc", vec![json!("Dress"), json!(1)])
            .await
            .unwrap();
        assert_eq!(outputs, json!(["done"]));
    }

    #[tokio::test]
    async fn test_predict_surfaces_http_errors() {
        let server = MockServer::start().await;
        mount_config(&server, json!({})).await;

        Mock::given(method("POST"))
            .and(path("/call/process_dc"))
            .respond_with(ResponseTemplate::new(503).set_body_string("queue full"))
            .mount(&server)
            .await;

        let result = client_for(&server).predict("/process_dc", vec![]).await;
        match result {
            Err(Error::Service { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "queue full");
            }
            other => panic!("expected Service error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_token_is_sent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/config"))
            .and(header("authorization", "Bearer hf_secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/file=/tmp/out.png"))
            .and(header("authorization", "Bearer hf_secret"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png".to_vec()))
            .mount(&server)
            .await;

        let client =
            GradioClient::new(server.uri(), Some("hf_secret".to_string()), None).unwrap();
        let file = FileData {
            path: Some("/tmp/out.png".to_string()),
            ..FileData::default()
        };

        assert_eq!(client.download(&file).await.unwrap(), b"png".to_vec());
    }

    #[tokio::test]
    async fn test_download_prefers_url() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/files/result.webp"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"webp".to_vec()))
            .mount(&server)
            .await;

        let file = FileData {
            path: Some("/tmp/ignored.webp".to_string()),
            url: Some(format!("{}/files/result.webp", server.uri())),
            ..FileData::default()
        };

        let bytes = client_for(&server).download(&file).await.unwrap();
        assert_eq!(bytes, b"webp".to_vec());
    }

    #[tokio::test]
    async fn test_download_without_location() {
        let server = MockServer::start().await;
        let result = client_for(&server).download(&FileData::default()).await;
        assert!(matches!(result, Err(Error::MalformedResponse(_))));
    }
}
