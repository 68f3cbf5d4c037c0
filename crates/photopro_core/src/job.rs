use std::path::PathBuf;

use crate::validate::UploadCandidate;

/// Model used for upscaling until the user picks another one.
pub const DEFAULT_UPSCALE_MODEL: &str = "realesrgan-x4plus";
/// Scale factor assumed when the server omits `scale_factor`.
pub const DEFAULT_SCALE_FACTOR: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    Convert,
    Upscale,
}

impl JobKind {
    pub fn action(self) -> &'static str {
        match self {
            JobKind::Convert => "convert",
            JobKind::Upscale => "upscale",
        }
    }
}

/// A local file picked for processing. The bytes are only read at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub media_type: Option<String>,
    pub size_bytes: u64,
}

impl SelectedFile {
    pub fn candidate(&self) -> UploadCandidate<'_> {
        UploadCandidate {
            name: &self.name,
            media_type: self.media_type.as_deref(),
            size_bytes: self.size_bytes,
        }
    }

    /// Declared media type, or the lower-cased extension when none was declared.
    pub fn format_label(&self) -> String {
        match &self.media_type {
            Some(media_type) => media_type.clone(),
            None => self
                .name
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_ascii_lowercase())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Empty,
    FileSelected,
    OptionSelected,
    Submitting,
    Succeeded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewInfo {
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
    pub format: String,
}

/// Successful `/api/process` payload, already validated by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSuccess {
    pub download_url: String,
    pub width: u32,
    pub height: u32,
    pub file_size: u64,
    pub scale_factor: Option<u32>,
    pub method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub download_url: String,
    pub width: u32,
    pub height: u32,
    pub file_size: u64,
    /// Upper-cased output format (convert) or the server's method identifier
    /// (upscale, empty when none was reported).
    pub label: String,
    pub scale_factor: Option<u32>,
}

/// Human-readable name of the upscaling method reported by the server.
pub fn method_label(method: Option<&str>) -> &'static str {
    match method {
        Some("real_esrgan") => "Real-ESRGAN AI",
        _ => "Enhanced algorithm",
    }
}

/// Everything one job kind remembers between messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSlot {
    kind: JobKind,
    pub(crate) file: Option<SelectedFile>,
    pub(crate) option: Option<String>,
    pub(crate) preview: Option<PreviewInfo>,
    pub(crate) last_result: Option<ResultRecord>,
    pub(crate) phase: JobPhase,
    pub(crate) progress_message: Option<String>,
}

impl JobSlot {
    pub fn new(kind: JobKind) -> Self {
        let option = match kind {
            JobKind::Convert => None,
            JobKind::Upscale => Some(DEFAULT_UPSCALE_MODEL.to_string()),
        };
        Self {
            kind,
            file: None,
            option,
            preview: None,
            last_result: None,
            phase: JobPhase::Empty,
            progress_message: None,
        }
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn option(&self) -> Option<&str> {
        self.option.as_deref()
    }

    pub fn preview(&self) -> Option<&PreviewInfo> {
        self.preview.as_ref()
    }

    pub fn last_result(&self) -> Option<&ResultRecord> {
        self.last_result.as_ref()
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn progress_message(&self) -> Option<&str> {
        self.progress_message.as_deref()
    }

    /// Phase implied by the current selection, ignoring in-flight work.
    pub(crate) fn ready_phase(&self) -> JobPhase {
        match (&self.file, &self.option) {
            (None, _) => JobPhase::Empty,
            (Some(_), None) => JobPhase::FileSelected,
            (Some(_), Some(_)) => JobPhase::OptionSelected,
        }
    }

    pub(crate) fn select_file(&mut self, file: SelectedFile) {
        self.file = Some(file);
        self.preview = None;
        self.phase = self.ready_phase();
    }

    pub(crate) fn select_option(&mut self, option: String) {
        self.option = Some(option);
        self.phase = self.ready_phase();
    }
}
