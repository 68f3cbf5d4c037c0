//! PhotoPro engine: HTTP client for the processing server and effect execution.
mod cleanup;
mod client;
mod engine;
mod persist;
mod preview;
mod types;
mod wire;

pub use cleanup::clear_all_with_fallback;
pub use client::{ClientSettings, ProcessingApi, ReqwestApiClient};
pub use engine::EngineHandle;
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use preview::{read_dimensions, PreviewError};
pub use types::{
    ApiError, CleanupReport, CleanupRoute, EngineEvent, FailureKind, ImageDimensions,
    OperationKind, ProcessOutcome, ProcessRequest, UploadFile,
};
pub use wire::{RemoteFile, RemoteFileKind};
