//! Output file selection.

use std::path::{Path, PathBuf};

use crate::error::DownloadError;

/// Where the downloaded body should be written.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// Target directory; the current directory when `None`.
    pub directory: Option<PathBuf>,
    /// File name to use instead of the one suggested by the URL.
    pub file_name: Option<PathBuf>,
    /// Overwrite an existing file instead of picking a free name.
    pub rewrite: bool,
}

impl OutputOptions {
    /// Resolves the output path, creating the directory if needed.
    pub fn resolve(&self, suggested: &str) -> Result<PathBuf, DownloadError> {
        let dir = self
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let name = self
            .file_name
            .as_deref()
            .and_then(Path::file_name)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(suggested));

        std::fs::create_dir_all(&dir).map_err(|source| DownloadError::Output {
            path: dir.clone(),
            source,
        })?;

        if self.rewrite {
            Ok(dir.join(name))
        } else {
            unique_file_path(&dir, &name)
        }
    }
}

/// Returns `dir/name`, or `dir/stem (N).ext` with the smallest free `N >= 1`
/// when that already exists.
pub fn unique_file_path(dir: &Path, name: &Path) -> Result<PathBuf, DownloadError> {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return Ok(candidate);
    }

    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    for i in 1..u32::MAX {
        let candidate = dir.join(format!("{stem} ({i}){ext}"));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(DownloadError::OutputPathExhausted {
        file_name: name.display().to_string(),
    })
}
