//! Version and file selection
//!
//! Pure decision logic: which published version of a project fits the target
//! game version and loader, and which of that version's files to install.
//! Both functions are deterministic over their inputs and do no I/O.

use crate::catalog::{ArtifactKind, Version};
use crate::{Error, Result};

/// Pick the first version compatible with the target environment
///
/// Versions are scanned in the order the catalog delivered them (newest
/// first), so the first hit is the most recent compatible one. The loader
/// check only applies to mods; resourcepacks work under any loader. With
/// `release_only`, beta and alpha versions are skipped.
///
/// # Examples
///
/// ```no_run
/// use modtaur::{select_compatible, ArtifactKind, CatalogClient, Config};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let catalog = CatalogClient::from_config(&Config::load()?)?;
/// let versions = catalog.get_versions("sodium")?;
///
/// let version = select_compatible(&versions, "sodium", ArtifactKind::Mod, "1.20.1", "fabric", false)?;
/// println!("Matched version {}", version.id);
/// # Ok(())
/// # }
/// ```
pub fn select_compatible<'a>(
    versions: &'a [Version],
    slug: &str,
    kind: ArtifactKind,
    game_version: &str,
    loader: &str,
    release_only: bool,
) -> Result<&'a Version> {
    versions
        .iter()
        .find(|v| {
            if !v.game_versions.iter().any(|g| g == game_version) {
                return false;
            }
            if kind.requires_loader() && !v.loaders.iter().any(|l| l == loader) {
                return false;
            }
            if release_only && !v.channel.is_release() {
                return false;
            }
            true
        })
        .ok_or_else(|| Error::NoCompatibleVersion {
            slug: slug.to_string(),
            game_version: game_version.to_string(),
            loader: loader.to_string(),
        })
}

/// The file chosen out of a version's file list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryFile {
    pub url: String,
    pub filename: String,

    /// True when no file carried the primary flag and the first one was
    /// used instead
    pub fallback: bool,

    /// How many additional files ship alongside the chosen one
    pub extras: usize,
}

/// Pick the file to install from a version
///
/// Prefers the file flagged primary by the catalog; falls back to the first
/// file when none is flagged (callers should surface that as a warning). A
/// version with no files at all is an error.
pub fn select_primary(version: &Version, slug: &str) -> Result<PrimaryFile> {
    if version.files.is_empty() {
        return Err(Error::NoFiles(slug.to_string()));
    }

    let extras = version.files.len() - 1;

    match version.files.iter().find(|f| f.primary) {
        Some(file) => Ok(PrimaryFile {
            url: file.url.clone(),
            filename: file.filename.clone(),
            fallback: false,
            extras,
        }),
        None => {
            let file = &version.files[0];
            Ok(PrimaryFile {
                url: file.url.clone(),
                filename: file.filename.clone(),
                fallback: true,
                extras,
            })
        }
    }
}
