//! Plain-text rendering of the view model.

use photopro_core::{Alert, AppViewModel, JobAction, JobKind, JobView, Severity};

pub(crate) fn alert_line(alert: &Alert) -> String {
    match alert.severity {
        Severity::Error => format!("Error: {}: {}", alert.title, alert.message),
        Severity::Notice if alert.title.ends_with(['!', '.', '?']) => {
            format!("{} {}", alert.title, alert.message)
        }
        Severity::Notice => format!("{}: {}", alert.title, alert.message),
    }
}

pub(crate) fn job_lines(job: &JobView) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(name) = &job.file_name {
        lines.push(format!("File: {name}"));
    }
    if let Some(preview) = &job.preview {
        lines.push(format!(
            "Preview: {}×{} px • {} MB • {}",
            preview.width, preview.height, preview.size_mb, preview.format
        ));
        if let Some((width, height)) = preview.projected {
            lines.push(format!("After upscale: {width}×{height} px"));
        }
    }
    if let Some(result) = &job.result {
        let mut line = format!(
            "Result: {}×{} px • {} MB • {}",
            result.width, result.height, result.size_mb, result.label
        );
        if job.kind == JobKind::Upscale {
            if let Some(scale) = result.scale_factor {
                line.push_str(&format!(" • {scale}x"));
            }
        }
        lines.push(line);
        if job.actions.contains(&JobAction::Download) {
            lines.push(format!(
                "Download: {} (save as {})",
                result.download_url, result.download_name
            ));
        }
    }
    lines
}

pub(crate) fn file_lines(view: &AppViewModel) -> Vec<String> {
    if view.files.is_empty() {
        return vec!["No files yet.".to_string()];
    }

    let mut lines: Vec<String> = view
        .files
        .iter()
        .map(|row| {
            let badge = row.badge.map(|b| format!(" [{b}]")).unwrap_or_default();
            let origin = if row.local { "" } else { " (server)" };
            format!(
                "{:>3}. {}{} {} MB • {} px{}",
                row.index, row.name, badge, row.size_mb, row.dimensions, origin
            )
        })
        .collect();
    lines.push(format!(
        "{} files, {} MB total",
        view.file_count, view.total_size_mb
    ));
    lines
}
