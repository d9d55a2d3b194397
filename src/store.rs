//! Local artifact store
//!
//! Every downloaded artifact is kept under a store root shared between
//! runs, filed by kind, game version and whether it was pulled in as a
//! dependency:
//!
//! ```text
//! downloads/
//! ├── mods/
//! │   └── 1.20.1/
//! │       ├── .cache.json
//! │       ├── sodium-0.5.3.jar
//! │       └── dependencies/
//! │           ├── .cache.json
//! │           └── fabric-api-0.92.0.jar
//! └── resourcepacks/
//!     └── 1.20.1/
//!         └── ...
//! ```
//!
//! Lookups search the whole kind subtree by filename, so an artifact stored
//! for one game version is still found when another modpack needs the same
//! file. Dotfiles hold cache metadata and are never treated as artifacts.

use crate::catalog::ArtifactKind;
use crate::{Error, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Filesystem layout of the artifact store
#[derive(Debug, Clone)]
pub struct StoreLayout {
    root: PathBuf,
}

impl StoreLayout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Search root for one artifact kind
    pub fn kind_root(&self, kind: ArtifactKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Bucket directory artifacts and cache entries are filed under
    pub fn bucket(&self, kind: ArtifactKind, game_version: &str, is_dependency: bool) -> PathBuf {
        let mut dir = self.kind_root(kind).join(game_version);
        if is_dependency {
            dir.push("dependencies");
        }
        dir
    }

    /// Find a stored artifact by filename, anywhere under the kind root
    pub fn find_artifact(&self, kind: ArtifactKind, filename: &str) -> Option<PathBuf> {
        let root = self.kind_root(kind);
        if !root.is_dir() {
            return None;
        }

        let target = OsStr::new(filename);
        WalkDir::new(&root)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
            .filter_map(|e| e.ok())
            .find(|e| e.file_type().is_file() && e.file_name() == target)
            .map(|e| e.into_path())
    }

    /// Copy an artifact into a bucket for future runs, creating the bucket
    /// directory as needed
    pub fn store(
        &self,
        src: &Path,
        kind: ArtifactKind,
        game_version: &str,
        is_dependency: bool,
    ) -> Result<PathBuf> {
        let bucket = self.bucket(kind, game_version, is_dependency);
        fs::create_dir_all(&bucket)?;

        let file_name = src.file_name().ok_or_else(|| {
            Error::Other(format!("Cannot store '{}': no file name", src.display()))
        })?;

        let dest = bucket.join(file_name);
        fs::copy(src, &dest)?;
        Ok(dest)
    }

    /// Count artifacts and measure disk usage
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            mods: count_artifacts(ArtifactKind::Mod, &self.kind_root(ArtifactKind::Mod)),
            resourcepacks: count_artifacts(
                ArtifactKind::Resourcepack,
                &self.kind_root(ArtifactKind::Resourcepack),
            ),
            total_size: dir_size(&self.root),
        }
    }

    /// Delete the whole store
    pub fn clean(&self) -> Result<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
        }
        Ok(())
    }
}

/// Store usage summary for `modtaur cache info`
#[derive(Debug, Clone, Copy)]
pub struct StoreStats {
    pub mods: usize,
    pub resourcepacks: usize,
    pub total_size: u64,
}

/// Copy an artifact into a destination directory (e.g. `.minecraft/mods`)
pub fn copy_into(src: &Path, dest_dir: &Path) -> Result<PathBuf> {
    if !dest_dir.is_dir() {
        return Err(Error::NotADirectory(dest_dir.to_path_buf()));
    }

    let file_name = src.file_name().ok_or_else(|| {
        Error::Other(format!("Cannot copy '{}': no file name", src.display()))
    })?;

    let dest = dest_dir.join(file_name);
    fs::copy(src, &dest)?;
    Ok(dest)
}

/// Delete every regular file under a directory, leaving subdirectories in
/// place. Returns how many files were removed.
pub fn clear_files(dir: &Path) -> Result<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file() {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn count_artifacts(kind: ArtifactKind, root: &Path) -> usize {
    if !root.is_dir() {
        return 0;
    }

    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_string_lossy().ends_with(kind.extension()))
        .count()
}

fn dir_size(path: &Path) -> u64 {
    if !path.is_dir() {
        return 0;
    }

    WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}
