/// Bytes per displayed megabyte (binary, like the upload cap).
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Converted,
    Upscaled,
    /// Server-side files that match neither naming rule.
    Processed,
}

impl FileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Converted => "converted",
            FileKind::Upscaled => "upscaled",
            FileKind::Processed => "processed",
        }
    }

    pub fn badge(self) -> Option<&'static str> {
        match self {
            FileKind::Converted => Some("CONV"),
            FileKind::Upscaled => Some("AI"),
            FileKind::Processed => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedFile {
    pub name: String,
    pub size: u64,
    pub url: String,
    pub kind: FileKind,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Artifacts known to the client: the persisted local list plus the last
/// server listing. They are shown concatenated; nothing is deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Registry {
    local: Vec<ManagedFile>,
    server: Vec<ManagedFile>,
}

impl Registry {
    pub fn local(&self) -> &[ManagedFile] {
        &self.local
    }

    pub fn server(&self) -> &[ManagedFile] {
        &self.server
    }

    pub fn entries(&self) -> impl Iterator<Item = &ManagedFile> {
        self.local.iter().chain(self.server.iter())
    }

    pub fn len(&self) -> usize {
        self.local.len() + self.server.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_bytes(&self) -> u64 {
        self.entries().map(|file| file.size).sum()
    }

    pub(crate) fn restore_local(&mut self, files: Vec<ManagedFile>) {
        self.local = files;
    }

    pub(crate) fn push_front(&mut self, file: ManagedFile) {
        self.local.insert(0, file);
    }

    /// Removes `local[index]`, keeping the relative order of the rest.
    pub(crate) fn remove_local(&mut self, index: usize) -> Option<ManagedFile> {
        if index < self.local.len() {
            Some(self.local.remove(index))
        } else {
            None
        }
    }

    pub(crate) fn clear_local(&mut self) {
        self.local.clear();
    }

    pub(crate) fn set_server(&mut self, files: Vec<ManagedFile>) {
        self.server = files;
    }

    pub(crate) fn clear_server(&mut self) {
        self.server.clear();
    }
}

/// Byte count as megabytes with two decimals.
pub fn format_mb(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / BYTES_PER_MB)
}
