use crate::{
    format_mb, method_label, Alert, AppState, JobKind, JobPhase, JobSlot, Section,
    DEFAULT_SCALE_FACTOR,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub section: Section,
    pub convert: JobView,
    pub upscale: JobView,
    pub files: Vec<FileRowView>,
    pub file_count: usize,
    /// Sum of all listed sizes in MB, two decimals.
    pub total_size_mb: String,
    pub clearing: bool,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    Download,
    RunAgain,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobView {
    pub kind: JobKind,
    pub phase: JobPhase,
    pub file_name: Option<String>,
    pub option: Option<String>,
    pub preview: Option<PreviewView>,
    pub result: Option<ResultView>,
    pub progress_message: Option<String>,
    pub actions: Vec<JobAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewView {
    pub width: u32,
    pub height: u32,
    pub size_mb: String,
    pub format: String,
    /// Output dimensions after a 4x upscale; only for the upscale job.
    pub projected: Option<(u32, u32)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub width: u32,
    pub height: u32,
    pub size_mb: String,
    pub label: String,
    pub scale_factor: Option<u32>,
    pub download_url: String,
    /// Suggested local file name for the download action.
    pub download_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub index: usize,
    pub name: String,
    pub badge: Option<&'static str>,
    pub size_mb: String,
    pub dimensions: String,
    pub url: String,
    /// Only local rows can be deleted individually.
    pub local: bool,
}

pub(crate) fn build(state: &AppState) -> AppViewModel {
    let registry = state.registry();
    let local_len = registry.local().len();
    let files = registry
        .entries()
        .enumerate()
        .map(|(index, file)| FileRowView {
            index,
            name: file.name.clone(),
            badge: file.kind.badge(),
            size_mb: format_mb(file.size),
            dimensions: format!(
                "{}×{}",
                dimension(file.width),
                dimension(file.height)
            ),
            url: file.url.clone(),
            local: index < local_len,
        })
        .collect();

    AppViewModel {
        section: state.section(),
        convert: job_view(state.slot(JobKind::Convert)),
        upscale: job_view(state.slot(JobKind::Upscale)),
        files,
        file_count: registry.len(),
        total_size_mb: format_mb(registry.total_bytes()),
        clearing: state.is_clearing(),
        alerts: state.alerts().to_vec(),
    }
}

fn dimension(value: Option<u32>) -> String {
    match value {
        Some(v) if v > 0 => v.to_string(),
        _ => "?".to_string(),
    }
}

fn job_view(slot: &JobSlot) -> JobView {
    let kind = slot.kind();
    let preview = slot.preview().map(|preview| PreviewView {
        width: preview.width,
        height: preview.height,
        size_mb: format_mb(preview.size_bytes),
        format: preview.format.clone(),
        projected: match kind {
            JobKind::Convert => None,
            JobKind::Upscale => Some((
                preview.width.saturating_mul(DEFAULT_SCALE_FACTOR),
                preview.height.saturating_mul(DEFAULT_SCALE_FACTOR),
            )),
        },
    });

    let succeeded = slot.phase() == JobPhase::Succeeded;
    let result = slot.last_result().filter(|_| succeeded).map(|result| {
        let download_name = match kind {
            JobKind::Convert => format!("converted.{}", slot.option().unwrap_or_default()),
            JobKind::Upscale => format!(
                "upscaled_{}x.png",
                result.scale_factor.unwrap_or(DEFAULT_SCALE_FACTOR)
            ),
        };
        let label = match kind {
            JobKind::Convert => result.label.clone(),
            JobKind::Upscale => method_label(Some(result.label.as_str())).to_string(),
        };
        ResultView {
            width: result.width,
            height: result.height,
            size_mb: format_mb(result.file_size),
            label,
            scale_factor: result.scale_factor,
            download_url: result.download_url.clone(),
            download_name,
        }
    });

    let actions = if succeeded {
        vec![JobAction::Download, JobAction::RunAgain, JobAction::Reset]
    } else {
        Vec::new()
    };

    JobView {
        kind,
        phase: slot.phase(),
        file_name: slot.file().map(|file| file.name.clone()),
        option: slot.option().map(str::to_owned),
        preview,
        result,
        progress_message: slot.progress_message().map(str::to_owned),
        actions,
    }
}
