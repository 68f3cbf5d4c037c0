use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use photopro_core::{
    update, AppState, JobKind, JobPhase, Msg, Section, SelectedFile, Severity,
    DEFAULT_UPSCALE_MODEL,
};
use photopro_engine::{ensure_dir, EngineEvent, EngineHandle};
use photopro_logging::{level_for_verbosity, pp_info, pp_warn};

use super::effects::{Confirmation, EffectRunner};
use super::{logging, persistence, render, settings};
use crate::{Args, Command};

pub(crate) fn run_app(args: Args) -> anyhow::Result<ExitCode> {
    let state_dir = settings::resolve_state_dir(args.state_dir.as_deref());
    ensure_dir(&state_dir)
        .with_context(|| format!("preparing state dir {}", state_dir.display()))?;

    let (file_settings, settings_error) = match settings::load(&state_dir) {
        Ok(loaded) => (loaded.unwrap_or_default(), None),
        Err(err) => (settings::Settings::default(), Some(err)),
    };
    let env_server = std::env::var(settings::SERVER_ENV).ok();
    let settings =
        file_settings.with_server_overrides(args.server.as_deref(), env_server.as_deref());

    let log_file = state_dir.join(logging::LOG_FILENAME);
    logging::initialize(
        level_for_verbosity(args.verbose),
        settings.log_to_file.then_some(log_file.as_path()),
    );
    if let Some(err) = settings_error {
        pp_warn!("Ignoring settings file: {:#}", err);
    }
    pp_info!("Using server {} and state dir {:?}", settings.server, state_dir);

    let engine = EngineHandle::new(settings.client_settings())
        .with_context(|| format!("invalid server URL {}", settings.server))?;

    if let Command::Status = args.command {
        return Ok(report_status(&engine));
    }

    let confirmation = match args.command {
        Command::Delete { yes: true, .. } | Command::Clear { yes: true } => Confirmation::AssumeYes,
        _ => Confirmation::Interactive,
    };
    let mut app = App::new(EffectRunner::new(engine, state_dir.clone(), confirmation));
    app.dispatch(Msg::RegistryRestored(persistence::load_registry(&state_dir)));

    match args.command {
        Command::Convert {
            file,
            format,
            media_type,
            save,
            again,
        } => {
            let selected = select_file(&file, media_type)?;
            app.dispatch(Msg::Navigate(Section::Convert));
            app.dispatch(Msg::OptionSelected {
                job: JobKind::Convert,
                option: format.as_str().to_string(),
            });
            run_job(&mut app, JobKind::Convert, selected, save, again);
        }
        Command::Upscale {
            file,
            model,
            media_type,
            save,
            again,
        } => {
            let selected = select_file(&file, media_type)?;
            app.dispatch(Msg::Navigate(Section::Upscale));
            app.dispatch(Msg::OptionSelected {
                job: JobKind::Upscale,
                option: model.unwrap_or_else(|| DEFAULT_UPSCALE_MODEL.to_string()),
            });
            run_job(&mut app, JobKind::Upscale, selected, save, again);
        }
        Command::Preview {
            file,
            media_type,
            upscale,
        } => {
            let job = if upscale {
                JobKind::Upscale
            } else {
                JobKind::Convert
            };
            let selected = select_file(&file, media_type)?;
            app.dispatch(Msg::FileChosen {
                job,
                file: selected,
            });
            app.settle();
            app.print_job(job);
        }
        Command::Files => {
            app.dispatch(Msg::Navigate(Section::Manage));
            app.settle();
            app.print_files();
        }
        Command::Delete { index, .. } => {
            app.dispatch(Msg::Navigate(Section::Manage));
            app.settle();
            app.dispatch(Msg::DeleteRequested { index });
            app.settle();
            app.print_files();
        }
        Command::Clear { .. } => {
            app.dispatch(Msg::Navigate(Section::Manage));
            app.settle();
            app.dispatch(Msg::ClearAllRequested);
            app.settle();
            app.print_files();
        }
        Command::Status => {}
    }

    Ok(if app.saw_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Selects the file, submits, repeats `again` times, then saves the result.
fn run_job(app: &mut App, job: JobKind, file: SelectedFile, save: Option<PathBuf>, again: u32) {
    app.dispatch(Msg::FileChosen { job, file });
    app.settle();
    if app.state.slot(job).file().is_none() {
        return;
    }
    // A preview that cannot be decoded (HEIC, say) does not block the upload.
    app.saw_error = false;
    app.print_job(job);

    app.dispatch(Msg::SubmitClicked(job));
    app.settle();
    for _ in 0..again {
        if app.state.slot(job).phase() != JobPhase::Succeeded {
            break;
        }
        app.print_job(job);
        app.dispatch(Msg::RunAgain(job));
        app.settle();
    }
    if app.state.slot(job).phase() != JobPhase::Succeeded {
        return;
    }
    app.print_job(job);

    if let Some(dest) = save {
        app.dispatch(Msg::DownloadRequested { job, dest });
        app.settle();
    }
}

fn report_status(engine: &EngineHandle) -> ExitCode {
    engine.probe_upscaler();
    match engine.recv() {
        Some(EngineEvent::CapabilityProbed { available: true }) => {
            println!("Real-ESRGAN is available; upscales use AI models.");
            ExitCode::SUCCESS
        }
        Some(_) => {
            println!("Real-ESRGAN is not available; upscales use the enhanced fallback algorithm.");
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("Error: the engine stopped before answering.");
            ExitCode::FAILURE
        }
    }
}

/// Owns the state and feeds messages through `update` one at a time.
struct App {
    state: AppState,
    runner: EffectRunner,
    inbox: VecDeque<Msg>,
    last_progress: [Option<String>; 2],
    saw_error: bool,
}

impl App {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            inbox: VecDeque::new(),
            last_progress: [None, None],
            saw_error: false,
        }
    }

    /// Applies `msg` and everything it synchronously leads to.
    fn dispatch(&mut self, msg: Msg) {
        self.inbox.push_back(msg);
        while let Some(msg) = self.inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            if self.state.consume_dirty() {
                self.render_changes();
            }
            self.inbox.extend(self.runner.run(effects));
        }
    }

    /// Waits until every outstanding engine request has been answered.
    fn settle(&mut self) {
        while self.runner.has_pending() {
            match self.runner.next_msg() {
                Some(msg) => self.dispatch(msg),
                None => break,
            }
        }
    }

    fn render_changes(&mut self) {
        for alert in self.state.take_alerts() {
            let line = render::alert_line(&alert);
            match alert.severity {
                Severity::Error => {
                    self.saw_error = true;
                    eprintln!("{line}");
                }
                Severity::Notice => println!("{line}"),
            }
        }

        for (slot, job) in [JobKind::Convert, JobKind::Upscale].into_iter().enumerate() {
            let progress = self.state.slot(job).progress_message().map(str::to_owned);
            if progress.is_some() && progress != self.last_progress[slot] {
                if let Some(message) = &progress {
                    println!("{message}");
                }
            }
            self.last_progress[slot] = progress;
        }
    }

    fn print_job(&self, job: JobKind) {
        let view = self.state.view();
        let job_view = match job {
            JobKind::Convert => &view.convert,
            JobKind::Upscale => &view.upscale,
        };
        for line in render::job_lines(job_view) {
            println!("{line}");
        }
    }

    fn print_files(&self) {
        for line in render::file_lines(&self.state.view()) {
            println!("{line}");
        }
    }
}

fn select_file(path: &Path, media_type: Option<String>) -> anyhow::Result<SelectedFile> {
    let metadata =
        fs::metadata(path).with_context(|| format!("could not read {}", path.display()))?;
    anyhow::ensure!(metadata.is_file(), "{} is not a file", path.display());
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let media_type = media_type.or_else(|| guess_media_type(&name).map(str::to_owned));
    Ok(SelectedFile {
        path: path.to_path_buf(),
        name,
        media_type,
        size_bytes: metadata.len(),
    })
}

fn guess_media_type(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        "gif" => Some("image/gif"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}
