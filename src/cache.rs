//! Resolution metadata caches
//!
//! Two caches live inside the artifact store, one pair per bucket
//! (kind, game version, dependency or not):
//!
//! - `.cache.json` maps slugs to resolved entries (artifact filename plus
//!   the dependency edges of the matched version), letting warm runs skip
//!   the catalog entirely.
//! - `.versions/<project_id>.json` holds the raw version list of a project
//!   as the catalog delivered it.
//!
//! Both are optimizations only: every value is re-derivable from the
//! catalog, so any read problem (missing file, bad JSON, IO error) simply
//! degrades to a miss. Writes rewrite the whole document after re-reading
//! it, which keeps entries from other runs intact; concurrent runs may
//! clobber each other (last writer wins) and that is accepted.
//!
//! # Examples
//!
//! ```no_run
//! use modtaur::{ArtifactKind, MetadataCache, StoreLayout};
//!
//! let cache = MetadataCache::new(StoreLayout::new("downloads"));
//! if let Some(entry) = cache.get_resolved(ArtifactKind::Mod, "1.20.1", false, "sodium") {
//!     println!("sodium resolves to {}", entry.filename);
//! }
//! ```

use crate::catalog::{ArtifactKind, Dependency, Version};
use crate::store::StoreLayout;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the resolved-entry document inside each bucket
pub const CACHE_FILE_NAME: &str = ".cache.json";

/// Directory of cached version lists inside each bucket
const VERSIONS_DIR_NAME: &str = ".versions";

/// One resolved project recorded in a bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedEntry {
    /// Artifact filename to look up in the store
    pub filename: String,

    /// Dependency edges of the version that produced the artifact
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

/// On-disk shape of a bucket's `.cache.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFile {
    pub metadata: CacheMetadata,

    #[serde(default)]
    pub entries: HashMap<String, ResolvedEntry>,
}

/// Provenance header of a cache document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Version of modtaur that last wrote this file
    pub modtaur_version: String,

    /// Timestamp of the last write (RFC 3339)
    pub updated_at: String,
}

impl CacheFile {
    fn new() -> Self {
        Self {
            metadata: CacheMetadata {
                modtaur_version: env!("CARGO_PKG_VERSION").to_string(),
                updated_at: chrono::Utc::now().to_rfc3339(),
            },
            entries: HashMap::new(),
        }
    }
}

/// Access to the per-bucket metadata caches
#[derive(Debug, Clone)]
pub struct MetadataCache {
    store: StoreLayout,
}

impl MetadataCache {
    pub fn new(store: StoreLayout) -> Self {
        Self { store }
    }

    /// Look up a resolved entry for a slug
    pub fn get_resolved(
        &self,
        kind: ArtifactKind,
        game_version: &str,
        is_dependency: bool,
        slug: &str,
    ) -> Option<ResolvedEntry> {
        let path = self.cache_file_path(kind, game_version, is_dependency);
        let doc = read_cache_file(&path)?;
        doc.entries.get(slug).cloned()
    }

    /// Record a resolved entry, preserving everything else in the bucket
    pub fn put_resolved(
        &self,
        kind: ArtifactKind,
        game_version: &str,
        is_dependency: bool,
        slug: &str,
        entry: ResolvedEntry,
    ) -> Result<()> {
        let path = self.cache_file_path(kind, game_version, is_dependency);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // A corrupt document is abandoned and started over; losing cached
        // entries only costs re-resolution.
        let mut doc = read_cache_file(&path).unwrap_or_else(CacheFile::new);
        doc.entries.insert(slug.to_string(), entry);
        doc.metadata.modtaur_version = env!("CARGO_PKG_VERSION").to_string();
        doc.metadata.updated_at = chrono::Utc::now().to_rfc3339();

        let json = serde_json::to_string_pretty(&doc)?;
        fs::write(&path, json)?;
        Ok(())
    }

    /// Cached version list of a project, if present and readable
    pub fn get_version_list(
        &self,
        kind: ArtifactKind,
        game_version: &str,
        is_dependency: bool,
        project_id: &str,
    ) -> Option<Vec<Version>> {
        let path = self.version_list_path(kind, game_version, is_dependency, project_id);
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Cache a project's version list as fetched from the catalog
    pub fn put_version_list(
        &self,
        kind: ArtifactKind,
        game_version: &str,
        is_dependency: bool,
        project_id: &str,
        versions: &[Version],
    ) -> Result<()> {
        let path = self.version_list_path(kind, game_version, is_dependency, project_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(versions)?;
        fs::write(&path, json)?;
        Ok(())
    }

    fn cache_file_path(
        &self,
        kind: ArtifactKind,
        game_version: &str,
        is_dependency: bool,
    ) -> PathBuf {
        self.store
            .bucket(kind, game_version, is_dependency)
            .join(CACHE_FILE_NAME)
    }

    fn version_list_path(
        &self,
        kind: ArtifactKind,
        game_version: &str,
        is_dependency: bool,
        project_id: &str,
    ) -> PathBuf {
        self.store
            .bucket(kind, game_version, is_dependency)
            .join(VERSIONS_DIR_NAME)
            .join(format!("{}.json", project_id))
    }
}

fn read_cache_file(path: &Path) -> Option<CacheFile> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}
