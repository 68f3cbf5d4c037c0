use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use photopro_logging::{pp_debug, pp_error, pp_warn};

use crate::client::{ClientSettings, ProcessingApi, ReqwestApiClient};
use crate::persist::AtomicFileWriter;
use crate::preview::{read_dimensions, PreviewError};
use crate::{
    clear_all_with_fallback, ApiError, EngineEvent, FailureKind, OperationKind, ProcessRequest,
};

enum EngineCommand {
    LoadPreview { job: OperationKind, path: PathBuf },
    Process(ProcessRequest),
    ProbeUpscaler,
    ListFiles,
    ClearAll,
    Download { url: String, dest: PathBuf },
}

/// Runs server calls on a background tokio runtime and reports back as
/// [`EngineEvent`]s, one per command.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let api = ReqwestApiClient::new(settings)?;
        Ok(Self::with_api(Arc::new(api)))
    }

    pub fn with_api(api: Arc<dyn ProcessingApi>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    // Dropping the event sender makes every `recv` return `None`.
                    pp_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(api.as_ref(), command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn load_preview(&self, job: OperationKind, path: PathBuf) {
        self.send(EngineCommand::LoadPreview { job, path });
    }

    pub fn process(&self, request: ProcessRequest) {
        self.send(EngineCommand::Process(request));
    }

    pub fn probe_upscaler(&self) {
        self.send(EngineCommand::ProbeUpscaler);
    }

    pub fn list_files(&self) {
        self.send(EngineCommand::ListFiles);
    }

    pub fn clear_all(&self) {
        self.send(EngineCommand::ClearAll);
    }

    pub fn download(&self, url: impl Into<String>, dest: PathBuf) {
        self.send(EngineCommand::Download {
            url: url.into(),
            dest,
        });
    }

    /// Blocks until the next event; `None` once the engine thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            pp_warn!("Engine thread is not running; command dropped");
        }
    }
}

async fn handle_command(
    api: &dyn ProcessingApi,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::LoadPreview { job, path } => {
            let blocking_path = path.clone();
            let result = tokio::task::spawn_blocking(move || read_dimensions(&blocking_path))
                .await
                .unwrap_or_else(|err| Err(PreviewError::Decode(err.to_string())));
            EngineEvent::PreviewReady { job, path, result }
        }
        EngineCommand::Process(request) => {
            if request.kind == OperationKind::Upscale {
                let available = probe_upscaler(api).await;
                let _ = event_tx.send(EngineEvent::CapabilityProbed { available });
            }
            let result = api.process(&request).await;
            EngineEvent::ProcessCompleted {
                job: request.kind,
                result,
            }
        }
        EngineCommand::ProbeUpscaler => EngineEvent::CapabilityProbed {
            available: probe_upscaler(api).await,
        },
        EngineCommand::ListFiles => EngineEvent::FilesListed(api.list_files().await),
        EngineCommand::ClearAll => EngineEvent::CleanupCompleted(clear_all_with_fallback(api).await),
        EngineCommand::Download { url, dest } => {
            let result = match api.download(&url).await {
                Ok(bytes) => write_download(&dest, &bytes).map(|()| bytes.len() as u64),
                Err(err) => Err(err),
            };
            EngineEvent::DownloadCompleted { dest, result }
        }
    };
    let _ = event_tx.send(event);
}

async fn probe_upscaler(api: &dyn ProcessingApi) -> bool {
    match api.upscaler_available().await {
        Ok(available) => available,
        Err(err) => {
            pp_debug!("Upscaler probe failed, assuming unavailable: {}", err);
            false
        }
    }
}

fn write_download(dest: &std::path::Path, bytes: &[u8]) -> Result<(), ApiError> {
    let filename = dest
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            ApiError::new(
                FailureKind::Io,
                format!("{} is not a file path", dest.display()),
            )
        })?;
    AtomicFileWriter::for_path(dest)
        .write(filename, bytes)
        .map(|_| ())
        .map_err(|err| ApiError::new(FailureKind::Io, err.to_string()))
}
