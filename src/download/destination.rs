//! Destination selection: the seam between the pipeline and whoever decides
//! where a download is saved.

use std::path::{Path, PathBuf};

/// What the pipeline proposes before asking for a save path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSuggestion {
    /// Suggested file name (may come straight from a response header).
    pub filename: String,
    /// Extension (with leading dot) appended to a chosen path that has none.
    /// Empty when nothing is known about the file type.
    pub default_extension: String,
}

/// Picks the path a download is written to.
///
/// Returning `None` cancels the download before anything is written or
/// recorded.
pub trait DestinationChooser {
    /// Chooses a save path for the suggested file.
    fn choose(&self, suggestion: &SaveSuggestion) -> Option<PathBuf>;
}

impl<F> DestinationChooser for F
where
    F: Fn(&SaveSuggestion) -> Option<PathBuf>,
{
    fn choose(&self, suggestion: &SaveSuggestion) -> Option<PathBuf> {
        self(suggestion)
    }
}

/// Always saves to one fixed path.
#[derive(Debug, Clone)]
pub struct FixedPathChooser {
    path: PathBuf,
}

impl FixedPathChooser {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DestinationChooser for FixedPathChooser {
    fn choose(&self, _suggestion: &SaveSuggestion) -> Option<PathBuf> {
        Some(self.path.clone())
    }
}

/// Name used when a suggestion has no usable final component (e.g. `..`).
pub const FALLBACK_SAVE_NAME: &str = "download";

/// Saves the suggested file name inside a directory.
///
/// Only the final component of the suggestion is used, so a header-supplied
/// name containing separators cannot escape the directory. A suggestion with
/// no final component is saved as [`FALLBACK_SAVE_NAME`]; this chooser never
/// cancels.
#[derive(Debug, Clone)]
pub struct DirectoryChooser {
    dir: PathBuf,
}

impl DirectoryChooser {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DestinationChooser for DirectoryChooser {
    fn choose(&self, suggestion: &SaveSuggestion) -> Option<PathBuf> {
        let name = suggestion.filename.replace('\\', "/");
        let name = Path::new(&name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(FALLBACK_SAVE_NAME);
        Some(self.dir.join(name))
    }
}

/// Appends `default_extension` to `path` when the path has no extension.
#[must_use]
pub fn apply_default_extension(path: PathBuf, default_extension: &str) -> PathBuf {
    let ext = default_extension.trim_start_matches('.');
    if ext.is_empty() || path.extension().is_some_and(|e| !e.is_empty()) {
        return path;
    }
    let mut raw = path.into_os_string();
    if !raw.to_string_lossy().ends_with('.') {
        raw.push(".");
    }
    raw.push(ext);
    PathBuf::from(raw)
}
