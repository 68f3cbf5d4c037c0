use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use photopro_core::{Effect, FileKind, JobKind, ManagedFile, Msg, ProcessSuccess};
use photopro_engine::{
    EngineEvent, EngineHandle, OperationKind, ProcessOutcome, ProcessRequest, RemoteFile,
    RemoteFileKind, UploadFile,
};
use photopro_logging::{pp_debug, pp_info, pp_warn};

use super::persistence;

/// How `Effect::Confirm` prompts are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Confirmation {
    AssumeYes,
    Interactive,
}

/// Turns core effects into engine commands and engine events back into
/// messages. Tracks how many engine answers are still outstanding.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
    state_dir: PathBuf,
    confirmation: Confirmation,
    in_flight: usize,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, state_dir: PathBuf, confirmation: Confirmation) -> Self {
        Self {
            engine,
            state_dir,
            confirmation,
            in_flight: 0,
        }
    }

    /// Executes `effects`; returns messages that follow synchronously.
    pub fn run(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_up = Vec::new();
        for effect in effects {
            match effect {
                Effect::LoadPreview { job, path } => {
                    pp_debug!("LoadPreview job={:?} path={:?}", job, path);
                    self.engine.load_preview(operation(job), path);
                    self.in_flight += 1;
                }
                Effect::Submit { job, file, option } => {
                    pp_info!(
                        "Submit job={:?} file={} bytes={} option={}",
                        job,
                        file.name,
                        file.size_bytes,
                        option
                    );
                    self.engine.process(ProcessRequest {
                        kind: operation(job),
                        file: UploadFile {
                            path: file.path,
                            name: file.name,
                            media_type: file.media_type,
                        },
                        option,
                    });
                    self.in_flight += 1;
                }
                Effect::RefreshFiles => {
                    self.engine.list_files();
                    self.in_flight += 1;
                }
                Effect::PersistRegistry { files } => {
                    persistence::save_registry(&self.state_dir, &files);
                }
                Effect::Confirm { prompt, on_confirm } => {
                    let confirmed = match self.confirmation {
                        Confirmation::AssumeYes => true,
                        Confirmation::Interactive => {
                            let stdin = io::stdin();
                            ask(&prompt, &mut stdin.lock(), &mut io::stdout())
                        }
                    };
                    if confirmed {
                        follow_up.push(on_confirm);
                    } else {
                        pp_info!("Declined: {}", prompt);
                    }
                }
                Effect::ClearAll => {
                    self.engine.clear_all();
                    self.in_flight += 1;
                }
                Effect::Download { url, dest } => {
                    pp_info!("Download {} -> {:?}", url, dest);
                    self.engine.download(url, dest);
                    self.in_flight += 1;
                }
            }
        }
        follow_up
    }

    pub fn has_pending(&self) -> bool {
        self.in_flight > 0
    }

    /// Blocks for the next engine answer. `None` when nothing is pending or
    /// the engine has stopped.
    pub fn next_msg(&mut self) -> Option<Msg> {
        if self.in_flight == 0 {
            return None;
        }
        let Some(event) = self.engine.recv() else {
            pp_warn!("Engine stopped with {} requests pending", self.in_flight);
            self.in_flight = 0;
            return None;
        };
        // The capability probe rides along with an upscale submission.
        if !matches!(event, EngineEvent::CapabilityProbed { .. }) {
            self.in_flight -= 1;
        }
        Some(event_to_msg(event))
    }
}

pub(crate) fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PreviewReady { job, path, result } => match result {
            Ok(dims) => Msg::PreviewLoaded {
                job: job_kind(job),
                path,
                width: dims.width,
                height: dims.height,
            },
            Err(err) => Msg::PreviewFailed {
                job: job_kind(job),
                path,
                message: err.to_string(),
            },
        },
        EngineEvent::CapabilityProbed { available } => Msg::CapabilityProbed { available },
        EngineEvent::ProcessCompleted { job, result } => match result {
            Ok(outcome) => Msg::JobSucceeded {
                job: job_kind(job),
                outcome: process_success(outcome),
            },
            Err(err) => {
                pp_warn!("{} failed ({}): {}", job.action(), err.kind, err.message);
                Msg::JobFailed {
                    job: job_kind(job),
                    message: err.message,
                }
            }
        },
        EngineEvent::FilesListed(result) => match result {
            Ok(files) => Msg::ServerFilesLoaded(files.into_iter().map(managed_file).collect()),
            Err(err) => {
                pp_warn!("Could not list server files: {}", err);
                Msg::ServerFilesUnavailable
            }
        },
        EngineEvent::CleanupCompleted(result) => match result {
            Ok(report) => {
                for error in &report.errors {
                    pp_warn!("Cleanup error: {}", error);
                }
                Msg::ClearAllFinished {
                    deleted_count: report.deleted_count,
                    error_count: report.errors.len(),
                }
            }
            Err(err) => {
                pp_warn!("Bulk delete failed: {}", err);
                Msg::ClearAllFailed
            }
        },
        EngineEvent::DownloadCompleted { dest, result } => match result {
            Ok(bytes) => {
                pp_info!("Saved {} bytes to {:?}", bytes, dest);
                Msg::DownloadFinished { dest }
            }
            Err(err) => Msg::DownloadFailed {
                message: err.message,
            },
        },
    }
}

/// Prints `prompt` and reads a yes/no answer. Anything but `y`/`yes` is no.
pub(crate) fn ask(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> bool {
    let _ = write!(output, "{prompt} [y/N] ");
    let _ = output.flush();
    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn operation(job: JobKind) -> OperationKind {
    match job {
        JobKind::Convert => OperationKind::Convert,
        JobKind::Upscale => OperationKind::Upscale,
    }
}

fn job_kind(operation: OperationKind) -> JobKind {
    match operation {
        OperationKind::Convert => JobKind::Convert,
        OperationKind::Upscale => JobKind::Upscale,
    }
}

fn process_success(outcome: ProcessOutcome) -> ProcessSuccess {
    ProcessSuccess {
        download_url: outcome.download_url,
        width: outcome.width,
        height: outcome.height,
        file_size: outcome.file_size,
        scale_factor: outcome.scale_factor,
        method: outcome.method,
    }
}

fn managed_file(file: RemoteFile) -> ManagedFile {
    ManagedFile {
        name: file.name,
        size: file.size,
        url: file.url,
        kind: match file.kind {
            RemoteFileKind::Converted => FileKind::Converted,
            RemoteFileKind::Upscaled => FileKind::Upscaled,
            RemoteFileKind::Processed => FileKind::Processed,
        },
        width: file.width.filter(|w| *w > 0),
        height: file.height.filter(|h| *h > 0),
    }
}
