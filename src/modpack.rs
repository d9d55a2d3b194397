//! Modpack descriptor handling
//!
//! A modpack is a small JSON file declaring the target environment and the
//! projects to install:
//!
//! ```json
//! {
//!     "version": "1.20.1",
//!     "loader": "fabric",
//!     "mods": ["sodium", "lithium"],
//!     "resourcepacks": ["fresh-animations"]
//! }
//! ```
//!
//! Entries may be slugs or catalog ids. The descriptor is parsed eagerly
//! and completely before any resolution starts; a malformed file fails the
//! whole run rather than one branch.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A modpack descriptor file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Modpack {
    /// Target Minecraft version (e.g. "1.20.1")
    pub version: String,

    /// Target mod loader (e.g. "fabric", "forge", "quilt")
    pub loader: String,

    /// Mods to install, by slug or id
    #[serde(default)]
    pub mods: Vec<String>,

    /// Resourcepacks to install, by slug or id
    #[serde(default)]
    pub resourcepacks: Vec<String>,
}

impl Modpack {
    /// Load a modpack descriptor
    ///
    /// A missing `.json` extension on the path is appended automatically,
    /// so `modtaur load mypack` finds `mypack.json`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = Self::normalize_path(path.as_ref());

        if !path.exists() {
            return Err(Error::InvalidModpack(format!(
                "{} not found",
                path.display()
            )));
        }

        let content = fs::read_to_string(&path)?;
        let modpack: Modpack = serde_json::from_str(&content)
            .map_err(|e| Error::InvalidModpack(format!("{}: {}", path.display(), e)))?;
        modpack.validate()?;

        Ok(modpack)
    }

    /// Append the `.json` extension when the argument lacks it
    pub fn normalize_path(path: &Path) -> PathBuf {
        if path.extension().map_or(false, |e| e == "json") {
            path.to_path_buf()
        } else {
            let mut os = path.as_os_str().to_owned();
            os.push(".json");
            PathBuf::from(os)
        }
    }

    fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(Error::InvalidModpack(
                "missing target Minecraft version".to_string(),
            ));
        }
        if self.loader.trim().is_empty() {
            return Err(Error::InvalidModpack("missing mod loader".to_string()));
        }
        Ok(())
    }
}
