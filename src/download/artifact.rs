//! Per-request working directory for downloaded audio.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::core::error::AppResult;

/// Suffixes of files the backend leaves behind while still working.
const PARTIAL_SUFFIXES: [&str; 3] = [".part", ".ytdl", ".temp"];

/// Scratch directory owned by one fulfillment.
///
/// Created as `<root>/<uuid>` so concurrent requests for the same song never
/// see each other's files. Dropping the scope removes the directory and
/// everything in it, on every exit path.
#[derive(Debug)]
pub struct ArtifactScope {
    dir: PathBuf,
}

impl ArtifactScope {
    /// Creates a fresh directory under `root` (creating `root` if needed).
    pub fn create(root: &Path) -> AppResult<Self> {
        let dir = root.join(Uuid::new_v4().to_string());
        fs_err::create_dir_all(&dir)?;
        log::debug!("Created download directory {}", dir.display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Finds the file the backend produced for `base`.
    ///
    /// Matches `<base>.<ext>` for any non-empty extension, skipping
    /// partial downloads. If several match, the lexicographically first
    /// path wins.
    pub fn locate(&self, base: &str) -> AppResult<Option<PathBuf>> {
        let prefix = format!("{}.", base);
        let mut matches = Vec::new();

        for entry in fs_err::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let is_match = name
                .strip_prefix(&prefix)
                .is_some_and(|ext| !ext.is_empty() && !ext.contains('.'));
            if is_match && !PARTIAL_SUFFIXES.iter().any(|s| name.ends_with(s)) {
                matches.push(entry.path());
            }
        }

        matches.sort();
        Ok(matches.into_iter().next())
    }
}

impl Drop for ArtifactScope {
    fn drop(&mut self) {
        match fs_err::remove_dir_all(&self.dir) {
            Ok(()) => log::debug!("Removed download directory {}", self.dir.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to clean up download directory: {}", e),
        }
    }
}
