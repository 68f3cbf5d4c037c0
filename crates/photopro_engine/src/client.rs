use std::time::Duration;

use futures_util::StreamExt;
use photopro_logging::{pp_debug, pp_info};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use url::Url;

use crate::wire::{CleanupResponse, FilesResponse, ProcessResponse, StatusResponse};
use crate::{
    ApiError, CleanupReport, CleanupRoute, FailureKind, ProcessOutcome, ProcessRequest,
    RemoteFile,
};

const PROCESS_PATH: &str = "/api/process";
const STATUS_PATH: &str = "/api/real_esrgan_status";
const FILES_PATH: &str = "/api/files";
const CLEANUP_PATH: &str = "/api/cleanup";
const DELETE_ALL_PATH: &str = "/api/delete_all";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Upscaling can take minutes server-side.
    pub request_timeout: Duration,
    pub max_download_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(600),
            max_download_bytes: 512 * 1024 * 1024,
        }
    }
}

/// Operations offered by the processing server.
#[async_trait::async_trait]
pub trait ProcessingApi: Send + Sync {
    async fn process(&self, request: &ProcessRequest) -> Result<ProcessOutcome, ApiError>;

    /// Whether the high-quality upscaling backend is installed.
    async fn upscaler_available(&self) -> Result<bool, ApiError>;

    async fn list_files(&self) -> Result<Vec<RemoteFile>, ApiError>;

    async fn cleanup(&self) -> Result<CleanupReport, ApiError>;

    async fn delete_all(&self) -> Result<CleanupReport, ApiError>;

    /// Fetches an artifact; `url` may be relative to the server.
    async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    base: Url,
    client: reqwest::Client,
    max_download_bytes: u64,
}

impl ReqwestApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            base,
            client,
            max_download_bytes: settings.max_download_bytes,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolves a server path or absolute URL against the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn build_form(&self, request: &ProcessRequest) -> Result<Form, ApiError> {
        let bytes = tokio::fs::read(&request.file.path).await.map_err(|err| {
            ApiError::new(
                FailureKind::Io,
                format!("Could not read {}: {err}", request.file.path.display()),
            )
        })?;
        let mut part = Part::bytes(bytes).file_name(request.file.name.clone());
        if let Some(media_type) = request.file.media_type.as_deref() {
            part = part
                .mime_str(media_type)
                .map_err(|err| ApiError::new(FailureKind::InvalidRequest, err.to_string()))?;
        }
        Ok(Form::new()
            .part("file", part)
            .text(request.kind.option_field(), request.option.clone())
            .text("action", request.kind.action()))
    }
}

#[async_trait::async_trait]
impl ProcessingApi for ReqwestApiClient {
    async fn process(&self, request: &ProcessRequest) -> Result<ProcessOutcome, ApiError> {
        let url = self.resolve(PROCESS_PATH)?;
        let form = self.build_form(request).await?;
        pp_info!(
            "POST {} action={} {}={} file={}",
            url,
            request.kind.action(),
            request.kind.option_field(),
            request.option,
            request.file.name
        );
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: ProcessResponse = read_json(response).await?;
        body.into_outcome()
    }

    async fn upscaler_available(&self) -> Result<bool, ApiError> {
        let url = self.resolve(STATUS_PATH)?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let body: StatusResponse = read_json(response).await?;
        Ok(body.available)
    }

    async fn list_files(&self) -> Result<Vec<RemoteFile>, ApiError> {
        let url = self.resolve(FILES_PATH)?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let body: FilesResponse = read_json(response).await?;
        body.into_files()
    }

    async fn cleanup(&self) -> Result<CleanupReport, ApiError> {
        let url = self.resolve(CLEANUP_PATH)?;
        let response = self.client.post(url).send().await.map_err(map_reqwest_error)?;
        let body: CleanupResponse = read_json(response).await?;
        body.into_report(CleanupRoute::Cleanup)
    }

    async fn delete_all(&self) -> Result<CleanupReport, ApiError> {
        let url = self.resolve(DELETE_ALL_PATH)?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: CleanupResponse = read_json(response).await?;
        body.into_report(CleanupRoute::DeleteAll)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.resolve(url)?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::http_status(status.as_u16()));
        }

        let max_bytes = self.max_download_bytes;
        if response.content_length().is_some_and(|len| len > max_bytes) {
            return Err(too_large(max_bytes));
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if bytes.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(too_large(max_bytes));
            }
            bytes.extend_from_slice(&chunk);
        }
        pp_debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes)
    }
}

/// Non-2xx is a hard failure; otherwise the body must parse as `T`.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::http_status(status.as_u16()));
    }
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|err| {
        pp_debug!("Unparseable response body: {}", err);
        ApiError::new(FailureKind::Malformed, "Unexpected response from server")
    })
}

fn too_large(max_bytes: u64) -> ApiError {
    ApiError::new(
        FailureKind::TooLarge { max_bytes },
        format!("Download exceeds {max_bytes} bytes"),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
