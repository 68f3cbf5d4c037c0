use std::fmt;
use std::path::PathBuf;

use crate::preview::PreviewError;
use crate::wire::RemoteFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Convert,
    Upscale,
}

impl OperationKind {
    /// Value of the `action` form field.
    pub fn action(self) -> &'static str {
        match self {
            OperationKind::Convert => "convert",
            OperationKind::Upscale => "upscale",
        }
    }

    /// Name of the form field carrying the operation's option.
    pub fn option_field(self) -> &'static str {
        match self {
            OperationKind::Convert => "format",
            OperationKind::Upscale => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub path: PathBuf,
    pub name: String,
    pub media_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequest {
    pub kind: OperationKind,
    pub file: UploadFile,
    /// Output format for convert, model name for upscale.
    pub option: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub download_url: String,
    pub width: u32,
    pub height: u32,
    pub file_size: u64,
    pub scale_factor: Option<u32>,
    pub method: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupRoute {
    /// `POST /api/cleanup`
    Cleanup,
    /// `DELETE /api/delete_all`, used when the primary route fails.
    DeleteAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub route: CleanupRoute,
    pub deleted_count: u64,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PreviewReady {
        job: OperationKind,
        path: PathBuf,
        result: Result<ImageDimensions, PreviewError>,
    },
    CapabilityProbed {
        available: bool,
    },
    ProcessCompleted {
        job: OperationKind,
        result: Result<ProcessOutcome, ApiError>,
    },
    FilesListed(Result<Vec<RemoteFile>, ApiError>),
    CleanupCompleted(Result<CleanupReport, ApiError>),
    DownloadCompleted {
        dest: PathBuf,
        result: Result<u64, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn http_status(code: u16) -> Self {
        Self::new(FailureKind::HttpStatus(code), format!("Server error: {code}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// The request could not be built, e.g. an unparseable media type.
    InvalidRequest,
    HttpStatus(u16),
    Timeout,
    Network,
    /// Body was not the JSON shape the endpoint promises.
    Malformed,
    /// Server answered `success: false`.
    Rejected,
    TooLarge { max_bytes: u64 },
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Malformed => write!(f, "malformed response"),
            FailureKind::Rejected => write!(f, "rejected by server"),
            FailureKind::TooLarge { max_bytes } => {
                write!(f, "response larger than {max_bytes} bytes")
            }
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
