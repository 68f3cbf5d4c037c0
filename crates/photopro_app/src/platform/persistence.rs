use std::fs;
use std::path::{Path, PathBuf};

use photopro_core::{FileKind, ManagedFile};
use photopro_engine::{ensure_dir, AtomicFileWriter};
use photopro_logging::{pp_error, pp_info, pp_warn};
use serde::{Deserialize, Serialize};

const REGISTRY_FILENAME: &str = "photopro_files.ron";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PersistedKind {
    Converted,
    Upscaled,
    Processed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedFile {
    name: String,
    size: u64,
    url: String,
    #[serde(rename = "type")]
    kind: PersistedKind,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedRegistry {
    files: Vec<PersistedFile>,
}

impl From<&ManagedFile> for PersistedFile {
    fn from(file: &ManagedFile) -> Self {
        Self {
            name: file.name.clone(),
            size: file.size,
            url: file.url.clone(),
            kind: match file.kind {
                FileKind::Converted => PersistedKind::Converted,
                FileKind::Upscaled => PersistedKind::Upscaled,
                FileKind::Processed => PersistedKind::Processed,
            },
            width: file.width,
            height: file.height,
        }
    }
}

impl From<PersistedFile> for ManagedFile {
    fn from(file: PersistedFile) -> Self {
        Self {
            name: file.name,
            size: file.size,
            url: file.url,
            kind: match file.kind {
                PersistedKind::Converted => FileKind::Converted,
                PersistedKind::Upscaled => FileKind::Upscaled,
                PersistedKind::Processed => FileKind::Processed,
            },
            width: file.width,
            height: file.height,
        }
    }
}

/// Loads the local registry; a missing or corrupt file yields an empty list.
pub(crate) fn load_registry(state_dir: &Path) -> Vec<ManagedFile> {
    let path = state_dir.join(REGISTRY_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Vec::new();
        }
        Err(err) => {
            pp_warn!("Failed to read file registry from {:?}: {}", path, err);
            return Vec::new();
        }
    };

    let registry: PersistedRegistry = match ron::from_str(&content) {
        Ok(registry) => registry,
        Err(err) => {
            pp_warn!("Failed to parse file registry from {:?}: {}", path, err);
            return Vec::new();
        }
    };

    pp_info!(
        "Loaded {} local file entries from {:?}",
        registry.files.len(),
        path
    );
    registry.files.into_iter().map(ManagedFile::from).collect()
}

pub(crate) fn save_registry(state_dir: &Path, files: &[ManagedFile]) {
    if let Err(err) = ensure_dir(state_dir) {
        pp_error!("Failed to ensure state dir {:?}: {}", state_dir, err);
        return;
    }

    let registry = PersistedRegistry {
        files: files.iter().map(PersistedFile::from).collect(),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&registry, pretty) {
        Ok(text) => text,
        Err(err) => {
            pp_error!("Failed to serialize file registry: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(PathBuf::from(state_dir));
    if let Err(err) = writer.write(REGISTRY_FILENAME, content.as_bytes()) {
        pp_error!("Failed to write file registry to {:?}: {}", state_dir, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(name: &str, kind: FileKind, dims: Option<(u32, u32)>) -> ManagedFile {
        ManagedFile {
            name: name.to_string(),
            size: 1024,
            url: format!("/api/download/{name}"),
            kind,
            width: dims.map(|d| d.0),
            height: dims.map(|d| d.1),
        }
    }

    #[test]
    fn saved_registry_loads_back_in_order() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            entry("upscaled_4x.png", FileKind::Upscaled, Some((3200, 2400))),
            entry("converted.webp", FileKind::Converted, None),
        ];

        save_registry(dir.path(), &files);

        assert_eq!(load_registry(dir.path()), files);
    }

    #[test]
    fn registry_uses_server_field_names() {
        let dir = TempDir::new().unwrap();
        save_registry(
            dir.path(),
            &[entry("converted.jpg", FileKind::Converted, Some((10, 20)))],
        );

        let content = fs::read_to_string(dir.path().join(REGISTRY_FILENAME)).unwrap();
        assert!(content.contains("type: converted"), "{content}");
        assert!(!content.contains("kind:"), "{content}");
    }

    #[test]
    fn registry_reads_server_shaped_entries() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(REGISTRY_FILENAME),
            r#"(files: [(name: "upscaled_4x.png", size: 9, url: "/api/download/u.png", type: upscaled)])"#,
        )
        .unwrap();

        let files = load_registry(dir.path());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].kind, FileKind::Upscaled);
        assert_eq!((files[0].width, files[0].height), (None, None));
    }

    #[test]
    fn missing_registry_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(load_registry(dir.path()).is_empty());
    }

    #[test]
    fn corrupt_registry_is_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(REGISTRY_FILENAME), "{ not ron").unwrap();
        assert!(load_registry(dir.path()).is_empty());
    }

    #[test]
    fn save_creates_state_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");

        save_registry(&nested, &[entry("x.png", FileKind::Processed, None)]);

        assert!(nested.join(REGISTRY_FILENAME).exists());
        assert_eq!(load_registry(&nested).len(), 1);
    }
}
