use std::path::PathBuf;

use crate::{JobKind, ManagedFile, ProcessSuccess, SelectedFile, Section};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User switched to another section.
    Navigate(Section),
    /// User picked or dropped a file for a job.
    FileChosen { job: JobKind, file: SelectedFile },
    /// User picked an output format (convert) or model (upscale).
    OptionSelected { job: JobKind, option: String },
    /// Preview decode finished for the file at `path`.
    PreviewLoaded {
        job: JobKind,
        path: PathBuf,
        width: u32,
        height: u32,
    },
    /// Preview decode failed for the file at `path`.
    PreviewFailed {
        job: JobKind,
        path: PathBuf,
        message: String,
    },
    /// User pressed the convert/upscale button.
    SubmitClicked(JobKind),
    /// Result of the upscale backend probe; only affects wording.
    CapabilityProbed { available: bool },
    /// Processing endpoint reported success.
    JobSucceeded {
        job: JobKind,
        outcome: ProcessSuccess,
    },
    /// Transport, HTTP, or application-level failure.
    JobFailed { job: JobKind, message: String },
    /// Repeat the last successful submission with the same file and option.
    RunAgain(JobKind),
    /// Forget the file, option, and result of a job.
    Reset(JobKind),
    /// User asked to save the last result of a job to disk.
    DownloadRequested { job: JobKind, dest: PathBuf },
    DownloadFinished { dest: PathBuf },
    DownloadFailed { message: String },
    /// Persisted local registry loaded at startup.
    RegistryRestored(Vec<ManagedFile>),
    /// Server listing fetched successfully.
    ServerFilesLoaded(Vec<ManagedFile>),
    /// Server listing could not be fetched; show local entries only.
    ServerFilesUnavailable,
    /// User asked to delete one local entry; needs confirmation.
    DeleteRequested { index: usize },
    DeleteConfirmed { index: usize },
    /// User asked to delete everything; needs confirmation.
    ClearAllRequested,
    ClearAllConfirmed,
    /// One of the bulk-delete endpoints succeeded.
    ClearAllFinished {
        deleted_count: u64,
        error_count: usize,
    },
    /// Both bulk-delete endpoints failed.
    ClearAllFailed,
    /// User closed the alert modal.
    AlertsDismissed,
}
