use crate::job::method_label;
use crate::{
    validate_upload, Alert, AppState, Effect, FileKind, JobKind, JobPhase, ManagedFile, Msg,
    PreviewInfo, ProcessSuccess, ResultRecord, Section, DEFAULT_SCALE_FACTOR,
};

const DELETE_ONE_PROMPT: &str = "Delete this file?";
const DELETE_ALL_PROMPT: &str = "Delete all files? This cannot be undone.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Navigate(section) => {
            state.set_section(section);
            if section == Section::Manage {
                vec![Effect::RefreshFiles]
            } else {
                Vec::new()
            }
        }
        Msg::FileChosen { job, file } => {
            if state.slot(job).phase() == JobPhase::Submitting {
                return (state, Vec::new());
            }
            match validate_upload(&file.candidate()) {
                Ok(()) => {
                    let path = file.path.clone();
                    state.slot_mut(job).select_file(file);
                    vec![Effect::LoadPreview { job, path }]
                }
                Err(err) => {
                    state.push_alert(Alert::error(err.title(), err.to_string()));
                    Vec::new()
                }
            }
        }
        Msg::OptionSelected { job, option } => {
            let option = option.trim().to_string();
            if option.is_empty() || state.slot(job).phase() == JobPhase::Submitting {
                return (state, Vec::new());
            }
            state.slot_mut(job).select_option(option);
            Vec::new()
        }
        Msg::PreviewLoaded {
            job,
            path,
            width,
            height,
        } => {
            // A newer file may have replaced the one this decode was for.
            let Some(file) = state.slot(job).file().filter(|f| f.path == path) else {
                return (state, Vec::new());
            };
            let preview = PreviewInfo {
                width,
                height,
                size_bytes: file.size_bytes,
                format: file.format_label(),
            };
            state.slot_mut(job).preview = Some(preview);
            Vec::new()
        }
        Msg::PreviewFailed { job, path, message } => {
            if state.slot(job).file().is_some_and(|f| f.path == path) {
                state.push_alert(Alert::error(
                    "Failed to read file",
                    format!("Could not read the selected file: {message}"),
                ));
            }
            Vec::new()
        }
        Msg::SubmitClicked(job) => submit(&mut state, job),
        Msg::RunAgain(job) => {
            if state.slot(job).phase() == JobPhase::Succeeded {
                submit(&mut state, job)
            } else {
                Vec::new()
            }
        }
        Msg::CapabilityProbed { available } => {
            if state.slot(JobKind::Upscale).phase() == JobPhase::Submitting {
                state.slot_mut(JobKind::Upscale).progress_message =
                    Some(upscale_progress_message(available).to_string());
            }
            Vec::new()
        }
        Msg::JobSucceeded { job, outcome } => {
            if state.slot(job).phase() != JobPhase::Submitting {
                return (state, Vec::new());
            }
            apply_success(&mut state, job, outcome)
        }
        Msg::JobFailed { job, message } => {
            if state.slot(job).phase() != JobPhase::Submitting {
                return (state, Vec::new());
            }
            let slot = state.slot_mut(job);
            slot.phase = slot.ready_phase();
            slot.progress_message = None;
            let title = match job {
                JobKind::Convert => "Conversion failed",
                JobKind::Upscale => "Upscale failed",
            };
            state.push_alert(Alert::error(title, message));
            Vec::new()
        }
        Msg::Reset(job) => {
            state.reset_slot(job);
            Vec::new()
        }
        Msg::DownloadRequested { job, dest } => {
            let slot = state.slot(job);
            let url = slot
                .last_result()
                .filter(|_| slot.phase() == JobPhase::Succeeded)
                .map(|result| result.download_url.clone());
            match url {
                Some(url) => vec![Effect::Download { url, dest }],
                None => {
                    state.push_alert(Alert::error(
                        "Nothing to download",
                        "Run the operation successfully before saving its result.",
                    ));
                    Vec::new()
                }
            }
        }
        Msg::DownloadFinished { dest } => {
            state.push_alert(Alert::notice(
                "Download complete",
                format!("Saved to {}", dest.display()),
            ));
            Vec::new()
        }
        Msg::DownloadFailed { message } => {
            state.push_alert(Alert::error("Download failed", message));
            Vec::new()
        }
        Msg::RegistryRestored(files) => {
            state.registry_mut().restore_local(files);
            Vec::new()
        }
        Msg::ServerFilesLoaded(files) => {
            state.registry_mut().set_server(files);
            Vec::new()
        }
        Msg::ServerFilesUnavailable => {
            state.registry_mut().clear_server();
            Vec::new()
        }
        Msg::DeleteRequested { index } => {
            if index < state.registry().local().len() {
                vec![Effect::Confirm {
                    prompt: DELETE_ONE_PROMPT.to_string(),
                    on_confirm: Msg::DeleteConfirmed { index },
                }]
            } else {
                push_missing_entry(&mut state, index);
                Vec::new()
            }
        }
        Msg::DeleteConfirmed { index } => match state.registry_mut().remove_local(index) {
            Some(_) => {
                state.push_alert(Alert::notice("File deleted", "The file was deleted."));
                vec![
                    Effect::PersistRegistry {
                        files: state.local_files(),
                    },
                    Effect::RefreshFiles,
                ]
            }
            None => {
                push_missing_entry(&mut state, index);
                Vec::new()
            }
        },
        Msg::ClearAllRequested => vec![Effect::Confirm {
            prompt: DELETE_ALL_PROMPT.to_string(),
            on_confirm: Msg::ClearAllConfirmed,
        }],
        Msg::ClearAllConfirmed => {
            if state.is_clearing() {
                return (state, Vec::new());
            }
            state.set_clearing(true);
            vec![Effect::ClearAll]
        }
        Msg::ClearAllFinished {
            deleted_count,
            error_count,
        } => {
            state.set_clearing(false);
            state.registry_mut().clear_local();
            let mut message = format!("Deleted {deleted_count} files");
            if error_count > 0 {
                message.push_str(&format!(" (errors: {error_count})"));
            }
            state.push_alert(Alert::notice("Files cleared", message));
            vec![
                Effect::PersistRegistry { files: Vec::new() },
                Effect::RefreshFiles,
            ]
        }
        Msg::ClearAllFailed => {
            state.set_clearing(false);
            state.push_alert(Alert::error(
                "Cleanup failed",
                "Could not delete all files. Please try again.",
            ));
            Vec::new()
        }
        Msg::AlertsDismissed => {
            state.clear_alerts();
            Vec::new()
        }
    };

    (state, effects)
}

fn submit(state: &mut AppState, job: JobKind) -> Vec<Effect> {
    let slot = state.slot(job);
    if slot.phase() == JobPhase::Submitting {
        return Vec::new();
    }
    let (Some(file), Some(option)) = (slot.file().cloned(), slot.option().map(str::to_owned))
    else {
        let message = match job {
            JobKind::Convert => "Please choose a file and a format to convert.",
            JobKind::Upscale => "Please choose a file to upscale.",
        };
        state.push_alert(Alert::error("Error", message));
        return Vec::new();
    };

    let slot = state.slot_mut(job);
    slot.phase = JobPhase::Submitting;
    slot.progress_message = Some(match job {
        JobKind::Convert => "Converting your image...".to_string(),
        // Refined once the backend probe answers.
        JobKind::Upscale => upscale_progress_message(false).to_string(),
    });
    vec![Effect::Submit { job, file, option }]
}

fn upscale_progress_message(available: bool) -> &'static str {
    if available {
        "Using Real-ESRGAN for 4x upscaling..."
    } else {
        "Using the enhanced fallback algorithm for upscaling..."
    }
}

fn apply_success(state: &mut AppState, job: JobKind, outcome: ProcessSuccess) -> Vec<Effect> {
    let option = state.slot(job).option().unwrap_or_default().to_string();
    let (record, entry, notice) = match job {
        JobKind::Convert => {
            let record = ResultRecord {
                download_url: outcome.download_url.clone(),
                width: outcome.width,
                height: outcome.height,
                file_size: outcome.file_size,
                label: option.to_uppercase(),
                scale_factor: None,
            };
            let entry = ManagedFile {
                name: format!("converted.{option}"),
                size: outcome.file_size,
                url: outcome.download_url,
                kind: FileKind::Converted,
                width: Some(outcome.width),
                height: Some(outcome.height),
            };
            let notice = Alert::notice("Conversion complete!", "The file is ready to download.");
            (record, entry, notice)
        }
        JobKind::Upscale => {
            let scale = outcome.scale_factor.unwrap_or(DEFAULT_SCALE_FACTOR);
            let method = method_label(outcome.method.as_deref());
            let record = ResultRecord {
                download_url: outcome.download_url.clone(),
                width: outcome.width,
                height: outcome.height,
                file_size: outcome.file_size,
                label: outcome.method.clone().unwrap_or_default(),
                scale_factor: Some(scale),
            };
            let entry = ManagedFile {
                name: format!("upscaled_{scale}x.png"),
                size: outcome.file_size,
                url: outcome.download_url,
                kind: FileKind::Upscaled,
                width: Some(outcome.width),
                height: Some(outcome.height),
            };
            let notice = Alert::notice(
                "Upscale complete!",
                format!("Image quality improved {scale}x using {method}."),
            );
            (record, entry, notice)
        }
    };

    let slot = state.slot_mut(job);
    slot.last_result = Some(record);
    slot.phase = JobPhase::Succeeded;
    slot.progress_message = None;
    state.registry_mut().push_front(entry);
    state.push_alert(notice);

    vec![
        Effect::PersistRegistry {
            files: state.local_files(),
        },
        Effect::RefreshFiles,
    ]
}

fn push_missing_entry(state: &mut AppState, index: usize) {
    state.push_alert(Alert::error(
        "Error",
        format!("There is no local file at position {index}."),
    ));
}
