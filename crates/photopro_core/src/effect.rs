use std::path::PathBuf;

use crate::{JobKind, ManagedFile, Msg, SelectedFile};

/// Side effects requested by [`crate::update`]; executed outside the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Decode the image at `path` and report its dimensions back.
    LoadPreview { job: JobKind, path: PathBuf },
    /// Submit the selected file to the processing endpoint. `option` is the
    /// output format for convert and the model name for upscale.
    Submit {
        job: JobKind,
        file: SelectedFile,
        option: String,
    },
    /// Fetch the server's file listing.
    RefreshFiles,
    /// Write the local registry to persistent storage.
    PersistRegistry { files: Vec<ManagedFile> },
    /// Ask the user a yes/no question; dispatch `on_confirm` on yes.
    Confirm { prompt: String, on_confirm: Msg },
    /// Bulk-delete every artifact on the server.
    ClearAll,
    /// Download a produced artifact to a local path.
    Download { url: String, dest: PathBuf },
}
