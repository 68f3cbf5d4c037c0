//! JSON shapes returned by the processing server.
//!
//! The server is loosely typed: every field may be missing. Responses are
//! deserialized leniently here and turned into `Result`s before they leave
//! the crate.

use serde::{Deserialize, Serialize};

use crate::{ApiError, CleanupReport, CleanupRoute, FailureKind, ProcessOutcome};

const GENERIC_FAILURE: &str = "Unknown error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteFileKind {
    Converted,
    Upscaled,
    #[default]
    #[serde(other)]
    Processed,
}

/// One entry of `GET /api/files`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type", default)]
    pub kind: RemoteFileKind,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProcessResponse {
    #[serde(default)]
    success: bool,
    error: Option<String>,
    download_url: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    file_size: Option<u64>,
    scale_factor: Option<u32>,
    method: Option<String>,
    format: Option<String>,
}

impl ProcessResponse {
    pub(crate) fn into_outcome(self) -> Result<ProcessOutcome, ApiError> {
        if !self.success {
            return Err(rejected(self.error));
        }
        match (self.download_url, self.width, self.height, self.file_size) {
            (Some(download_url), Some(width), Some(height), Some(file_size)) => {
                Ok(ProcessOutcome {
                    download_url,
                    width,
                    height,
                    file_size,
                    scale_factor: self.scale_factor,
                    method: self.method,
                    format: self.format,
                })
            }
            _ => Err(ApiError::new(
                FailureKind::Malformed,
                "Server reported success without result details",
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    #[serde(default)]
    pub(crate) available: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FilesResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    files: Vec<RemoteFile>,
    error: Option<String>,
}

impl FilesResponse {
    pub(crate) fn into_files(self) -> Result<Vec<RemoteFile>, ApiError> {
        if self.success {
            Ok(self.files)
        } else {
            Err(rejected(self.error))
        }
    }
}

/// Shared by `/api/cleanup` and `/api/delete_all`.
#[derive(Debug, Deserialize)]
pub(crate) struct CleanupResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    deleted_count: u64,
    #[serde(default)]
    errors: Vec<String>,
    error: Option<String>,
}

impl CleanupResponse {
    pub(crate) fn into_report(self, route: CleanupRoute) -> Result<CleanupReport, ApiError> {
        if self.success {
            Ok(CleanupReport {
                route,
                deleted_count: self.deleted_count,
                errors: self.errors,
            })
        } else {
            Err(rejected(self.error))
        }
    }
}

fn rejected(error: Option<String>) -> ApiError {
    let message = error
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string());
    ApiError::new(FailureKind::Rejected, message)
}
