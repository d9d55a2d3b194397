//! Modtaur - a Modrinth modpack downloader for Minecraft
//!
//! Modtaur reads a small JSON modpack description and fills a Minecraft
//! installation from the Modrinth catalog. It provides a simple CLI for
//! keeping a mods folder in sync with features like:
//!
//! - Transitive resolution of required dependencies with cycle detection
//! - Version matching against a Minecraft version and mod loader
//! - A local download store so repeat runs never re-download an artifact
//! - Per-environment metadata caches that cut catalog traffic to zero
//! - Resourcepack installs alongside mods
//!
//! # Examples
//!
//! ```no_run
//! use modtaur::{
//!     resolve_requested, ArtifactKind, CatalogClient, Config, Modpack, NullNotifier,
//!     ResolutionContext, StoreLayout,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load the modpack description
//! let modpack = Modpack::load("packs/survival")?;
//!
//! // Create a catalog client from the user configuration
//! let config = Config::load()?;
//! let catalog = CatalogClient::from_config(&config)?;
//!
//! // Resolve every requested mod into the Minecraft installation
//! let notifier = NullNotifier;
//! let mut ctx = ResolutionContext::new(
//!     &modpack.version,
//!     &modpack.loader,
//!     &config.minecraft_dir(),
//!     StoreLayout::new(config.downloads_dir()),
//!     &catalog,
//!     &notifier,
//! );
//! for slug in &modpack.mods {
//!     resolve_requested(slug, ArtifactKind::Mod, &mut ctx);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`modpack`] - Parse and validate modpack description files
//! - [`catalog`] - Talk to the Modrinth HTTP catalog
//! - [`matcher`] - Pick the version and file that fit an environment
//! - [`resolver`] - Drive projects and their dependencies to completion
//! - [`cache`] - Resolved-entry and version-list caches inside the store
//! - [`store`] - The on-disk download store layout
//! - [`notify`] - Progress and diagnostic event reporting
//! - [`config`] - User configuration management
//! - [`error`] - Error types and result handling

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod matcher;
pub mod modpack;
pub mod notify;
pub mod resolver;
pub mod store;

pub use cache::{MetadataCache, ResolvedEntry, CACHE_FILE_NAME};
pub use catalog::{
    ArtifactKind, CatalogClient, Dependency, DependencyKind, Project, ProjectKind, Version,
    VersionChannel, VersionFile,
};
pub use config::Config;
pub use error::{Error, Result};
pub use matcher::{select_compatible, select_primary, PrimaryFile};
pub use modpack::Modpack;
pub use notify::{Notifier, NullNotifier};
pub use resolver::{
    resolve_dependencies, resolve_project, resolve_requested, Outcome, ResolutionContext,
};
pub use store::{format_size, StoreLayout, StoreStats};
