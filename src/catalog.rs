//! Modrinth catalog API client and data model
//!
//! This module talks to a Modrinth-compatible v2 API. Responses are parsed
//! into typed records at this boundary; nothing downstream ever handles raw
//! JSON maps.
//!
//! # Examples
//!
//! ```no_run
//! use modtaur::{CatalogClient, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let catalog = CatalogClient::from_config(&config)?;
//!
//! let project = catalog.get_project("sodium")?;
//! println!("{} supports {:?}", project.slug, project.game_versions);
//! # Ok(())
//! # }
//! ```

use crate::notify::Notifier;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// A catalog project record (`GET /project/{id|slug}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Opaque catalog identifier (e.g. "AANobbMI")
    pub id: String,

    /// Human-readable identifier (e.g. "sodium")
    pub slug: String,

    /// What the project is, as declared upstream
    #[serde(rename = "project_type")]
    pub kind: ProjectKind,

    /// Every game version any published version supports
    #[serde(default)]
    pub game_versions: Vec<String>,

    /// Every loader any published version supports
    #[serde(default)]
    pub loaders: Vec<String>,
}

/// Project types the Modrinth API can return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Mod,
    Modpack,
    Resourcepack,
    Shader,
    Plugin,
    Datapack,
}

impl ProjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectKind::Mod => "mod",
            ProjectKind::Modpack => "modpack",
            ProjectKind::Resourcepack => "resourcepack",
            ProjectKind::Shader => "shader",
            ProjectKind::Plugin => "plugin",
            ProjectKind::Datapack => "datapack",
        }
    }
}

/// The two project types that can actually be installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Mod,
    Resourcepack,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Mod => "mod",
            ArtifactKind::Resourcepack => "resourcepack",
        }
    }

    /// Subdirectory name under both `.minecraft` and the artifact store
    pub fn dir_name(&self) -> &'static str {
        match self {
            ArtifactKind::Mod => "mods",
            ArtifactKind::Resourcepack => "resourcepacks",
        }
    }

    /// File extension artifacts of this kind carry
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Mod => ".jar",
            ArtifactKind::Resourcepack => ".zip",
        }
    }

    /// Whether compatibility depends on the mod loader. Resourcepacks are
    /// loader-agnostic.
    pub fn requires_loader(&self) -> bool {
        matches!(self, ArtifactKind::Mod)
    }
}

impl Project {
    /// Map the catalog project type to an installable artifact kind.
    ///
    /// Plugins go through the mod pipeline (Modrinth lists server plugins
    /// that double as mods); everything else has no installation target.
    pub fn artifact_kind(&self) -> Result<ArtifactKind> {
        match self.kind {
            ProjectKind::Mod | ProjectKind::Plugin => Ok(ArtifactKind::Mod),
            ProjectKind::Resourcepack => Ok(ArtifactKind::Resourcepack),
            other => Err(Error::UnsupportedProjectKind {
                slug: self.slug.clone(),
                kind: other.as_str().to_string(),
            }),
        }
    }
}

/// A published version of a project (`GET /project/{id|slug}/version`)
///
/// The API returns versions newest first; the compatibility scan relies on
/// that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub id: String,

    /// Identifier of the project this version belongs to
    pub project_id: String,

    #[serde(default)]
    pub game_versions: Vec<String>,

    #[serde(default)]
    pub loaders: Vec<String>,

    /// Release channel (release, beta or alpha)
    #[serde(rename = "version_type")]
    pub channel: VersionChannel,

    #[serde(default)]
    pub files: Vec<VersionFile>,

    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionChannel {
    Release,
    Beta,
    Alpha,
}

impl VersionChannel {
    pub fn is_release(&self) -> bool {
        matches!(self, VersionChannel::Release)
    }
}

/// One downloadable file attached to a version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionFile {
    pub url: String,
    pub filename: String,

    /// Whether upstream flags this as the file to install
    #[serde(default)]
    pub primary: bool,
}

/// A dependency edge declared by a version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    /// The referenced project. The API may omit it when the dependency is
    /// pinned to a version id only; such edges cannot be traversed.
    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(rename = "dependency_type")]
    pub kind: DependencyKind,

    /// Slug of the referenced project, learned when its record is fetched
    /// during resolution. Not part of the API response, but persisted into
    /// cache entries once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Required,
    Optional,
    Incompatible,
    Embedded,
}

impl DependencyKind {
    pub fn is_required(&self) -> bool {
        matches!(self, DependencyKind::Required)
    }
}

/// Blocking HTTP client for the catalog API
pub struct CatalogClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl CatalogClient {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent.to_string())
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Build a client from the user configuration
    pub fn from_config(config: &crate::Config) -> Result<Self> {
        Self::new(&config.catalog.url, &config.catalog.user_agent)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a project record by slug or id
    pub fn get_project(&self, id_or_slug: &str) -> Result<Project> {
        let url = format!("{}/project/{}", self.base_url, id_or_slug);

        let response = self.client.get(&url).send().map_err(|e| {
            if e.is_connect() {
                Error::Other(format!(
                    "Cannot connect to the catalog at {}\n\
                        Please check your network connection and the configured URL.",
                    self.base_url
                ))
            } else if e.is_timeout() {
                Error::Other("Catalog request timed out. Please try again.".to_string())
            } else {
                Error::Fetch {
                    slug: id_or_slug.to_string(),
                    source: e,
                }
            }
        })?;

        let status = response.status();

        if status == 404 {
            return Err(Error::ProjectNotFound(id_or_slug.to_string()));
        }

        if !status.is_success() {
            return Err(Error::Other(catalog_status_error(
                "project lookup",
                id_or_slug,
                status.as_u16(),
            )));
        }

        response.json().map_err(|e| Error::Fetch {
            slug: id_or_slug.to_string(),
            source: e,
        })
    }

    /// Fetch every published version of a project, newest first
    pub fn get_versions(&self, id_or_slug: &str) -> Result<Vec<Version>> {
        let url = format!("{}/project/{}/version", self.base_url, id_or_slug);

        let response = self.client.get(&url).send().map_err(|e| Error::Fetch {
            slug: id_or_slug.to_string(),
            source: e,
        })?;

        let status = response.status();

        if status == 404 {
            return Err(Error::ProjectNotFound(id_or_slug.to_string()));
        }

        if !status.is_success() {
            return Err(Error::Other(catalog_status_error(
                "version listing",
                id_or_slug,
                status.as_u16(),
            )));
        }

        response.json().map_err(|e| Error::Fetch {
            slug: id_or_slug.to_string(),
            source: e,
        })
    }

    /// Download an artifact into `dest_dir`, reporting progress
    ///
    /// The body is streamed into a `.part` file that is renamed into place
    /// only once fully written, so an interrupted download leaves nothing
    /// behind.
    pub fn download(
        &self,
        url: &str,
        dest_dir: &Path,
        filename: &str,
        slug: &str,
        notifier: &dyn Notifier,
    ) -> Result<PathBuf> {
        if !dest_dir.is_dir() {
            return Err(Error::NotADirectory(dest_dir.to_path_buf()));
        }

        let response = self.client.get(url).send().map_err(|e| Error::Fetch {
            slug: slug.to_string(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Other(catalog_status_error(
                "download",
                slug,
                status.as_u16(),
            )));
        }

        let total = response.content_length();
        notifier.download_started(slug, filename);

        let final_path = dest_dir.join(filename);
        let part_path = dest_dir.join(format!("{}.part", filename));

        match stream_to_file(response, &part_path, total, notifier) {
            Ok(_) => {
                fs::rename(&part_path, &final_path)?;
                Ok(final_path)
            }
            Err(e) => {
                let _ = fs::remove_file(&part_path);
                Err(e)
            }
        }
    }
}

/// Stream a response body into a file in 8 KiB chunks
fn stream_to_file(
    mut response: reqwest::blocking::Response,
    path: &Path,
    total: Option<u64>,
    notifier: &dyn Notifier,
) -> Result<u64> {
    let mut file = fs::File::create(path)?;
    let mut buffer = [0u8; 8192];
    let mut received: u64 = 0;

    loop {
        let n = response.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        file.write_all(&buffer[..n])?;
        received += n as u64;
        notifier.download_progress(received, total);
    }

    file.flush()?;
    Ok(received)
}

fn catalog_status_error(operation: &str, slug: &str, status: u16) -> String {
    match status {
        500 | 502 | 503 | 504 => format!(
            "Catalog server error during {} for '{}' (HTTP {}).\n\
            The catalog is experiencing issues. Please try again later.",
            operation, slug, status
        ),
        _ => format!("Catalog {} for '{}' failed: HTTP {}", operation, slug, status),
    }
}
