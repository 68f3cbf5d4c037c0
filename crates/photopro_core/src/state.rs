use crate::view_model::{self, AppViewModel};
use crate::{JobKind, JobSlot, ManagedFile, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Convert,
    Upscale,
    Manage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Notice,
}

/// A blocking message for the user: an error modal or a success notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn notice(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Notice,
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    section: Section,
    convert: JobSlot,
    upscale: JobSlot,
    registry: Registry,
    clearing: bool,
    alerts: Vec<Alert>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            section: Section::default(),
            convert: JobSlot::new(JobKind::Convert),
            upscale: JobSlot::new(JobKind::Upscale),
            registry: Registry::default(),
            clearing: false,
            alerts: Vec::new(),
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        view_model::build(self)
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn slot(&self, job: JobKind) -> &JobSlot {
        match job {
            JobKind::Convert => &self.convert,
            JobKind::Upscale => &self.upscale,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn is_clearing(&self) -> bool {
        self.clearing
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Drains pending alerts so each one is shown exactly once.
    pub fn take_alerts(&mut self) -> Vec<Alert> {
        std::mem::take(&mut self.alerts)
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn local_files(&self) -> Vec<ManagedFile> {
        self.registry.local().to_vec()
    }

    pub(crate) fn set_section(&mut self, section: Section) {
        self.section = section;
        self.mark_dirty();
    }

    pub(crate) fn slot_mut(&mut self, job: JobKind) -> &mut JobSlot {
        self.dirty = true;
        match job {
            JobKind::Convert => &mut self.convert,
            JobKind::Upscale => &mut self.upscale,
        }
    }

    pub(crate) fn reset_slot(&mut self, job: JobKind) {
        *self.slot_mut(job) = JobSlot::new(job);
    }

    pub(crate) fn registry_mut(&mut self) -> &mut Registry {
        self.dirty = true;
        &mut self.registry
    }

    pub(crate) fn set_clearing(&mut self, clearing: bool) {
        self.clearing = clearing;
        self.mark_dirty();
    }

    pub(crate) fn push_alert(&mut self, alert: Alert) {
        self.alerts.push(alert);
        self.mark_dirty();
    }

    pub(crate) fn clear_alerts(&mut self) {
        if !self.alerts.is_empty() {
            self.alerts.clear();
            self.mark_dirty();
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
