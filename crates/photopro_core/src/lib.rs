//! PhotoPro core: pure state machine and view-model helpers.
mod effect;
mod job;
mod msg;
mod registry;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use job::{
    method_label, JobKind, JobPhase, JobSlot, PreviewInfo, ProcessSuccess, ResultRecord,
    SelectedFile, DEFAULT_SCALE_FACTOR, DEFAULT_UPSCALE_MODEL,
};
pub use msg::Msg;
pub use registry::{format_mb, FileKind, ManagedFile, Registry, BYTES_PER_MB};
pub use state::{Alert, AppState, Section, Severity};
pub use update::update;
pub use validate::{
    validate_upload, UploadCandidate, ValidationError, ALLOWED_MEDIA_TYPES, MAX_UPLOAD_BYTES,
};
pub use view_model::{AppViewModel, FileRowView, JobAction, JobView, PreviewView, ResultView};
