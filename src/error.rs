use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Failed to fetch '{slug}': {source}")]
    Fetch {
        slug: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("No version of '{slug}' is compatible with Minecraft {game_version} ({loader})")]
    NoCompatibleVersion {
        slug: String,
        game_version: String,
        loader: String,
    },

    #[error("Version of '{0}' ships no files")]
    NoFiles(String),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Project '{slug}' has unsupported type '{kind}' (only mods and resourcepacks can be installed)")]
    UnsupportedProjectKind { slug: String, kind: String },

    #[error("Invalid modpack: {0}")]
    InvalidModpack(String),

    #[error("{0}")]
    Other(String),
}
