//! Dependency resolution and artifact acquisition
//!
//! One [`ResolutionContext`] lives for the duration of a load run. It owns
//! the target environment, the destination directories, the store and cache
//! handles and the set of projects already claimed, and it borrows the
//! catalog client and the notifier.
//!
//! Resolution is depth first and single threaded: a project's required
//! dependencies are driven to completion before the project's own artifact
//! is placed, and every failure is contained to the branch it happened on.
//! A project whose cache entry and stored artifact both survive from an
//! earlier run is installed without a single catalog request.
//!
//! # Examples
//!
//! ```no_run
//! use modtaur::{
//!     resolve_requested, ArtifactKind, CatalogClient, Config, NullNotifier, ResolutionContext,
//!     StoreLayout,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let catalog = CatalogClient::from_config(&config)?;
//! let notifier = NullNotifier;
//!
//! let mut ctx = ResolutionContext::new(
//!     "1.20.1",
//!     "fabric",
//!     &config.minecraft_dir(),
//!     StoreLayout::new(config.downloads_dir()),
//!     &catalog,
//!     &notifier,
//! );
//!
//! resolve_requested("sodium", ArtifactKind::Mod, &mut ctx);
//! # Ok(())
//! # }
//! ```

use crate::cache::{MetadataCache, ResolvedEntry};
use crate::catalog::{ArtifactKind, CatalogClient, Dependency, Project, ProjectKind};
use crate::matcher::{select_compatible, select_primary};
use crate::notify::Notifier;
use crate::store::{self, StoreLayout};
use crate::{Error, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// State carried through one load run
pub struct ResolutionContext<'a> {
    /// Target Minecraft version
    pub game_version: String,

    /// Target mod loader
    pub loader: String,

    /// Only accept versions on the release channel
    pub release_only: bool,

    /// Destination for mods (`.minecraft/mods`)
    pub mods_dir: PathBuf,

    /// Destination for resourcepacks (`.minecraft/resourcepacks`)
    pub resourcepacks_dir: PathBuf,

    pub store: StoreLayout,
    pub cache: MetadataCache,
    pub catalog: &'a CatalogClient,
    pub notifier: &'a dyn Notifier,

    /// Identifiers already claimed in this run: catalog project ids, plus
    /// top-level identifiers exactly as the modpack wrote them
    visited: HashSet<String>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(
        game_version: &str,
        loader: &str,
        minecraft_dir: &Path,
        store: StoreLayout,
        catalog: &'a CatalogClient,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            game_version: game_version.to_string(),
            loader: loader.to_string(),
            release_only: false,
            mods_dir: minecraft_dir.join(ArtifactKind::Mod.dir_name()),
            resourcepacks_dir: minecraft_dir.join(ArtifactKind::Resourcepack.dir_name()),
            cache: MetadataCache::new(store.clone()),
            store,
            catalog,
            notifier,
            visited: HashSet::new(),
        }
    }

    /// Destination directory for one artifact kind
    pub fn destination(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::Mod => &self.mods_dir,
            ArtifactKind::Resourcepack => &self.resourcepacks_dir,
        }
    }

    /// Claim an identifier for this run. Returns true when it was not seen
    /// before; the check and the insert are one operation, so exactly one
    /// caller can win a given identifier.
    pub fn mark_visited(&mut self, identifier: &str) -> bool {
        self.visited.insert(identifier.to_string())
    }

    pub fn was_visited(&self, identifier: &str) -> bool {
        self.visited.contains(identifier)
    }
}

/// Terminal state of one successfully resolved project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Served from the local store, no download happened
    AlreadyPresent { filename: String },

    /// Downloaded from the catalog and filed in the store
    Fetched { filename: String },
}

/// Resolve one identifier from a modpack list
///
/// The local cache is probed before the catalog is asked anything, so an
/// identifier resolved in an earlier run costs no network traffic at all.
/// Every failure is reported through the notifier and contained here;
/// sibling entries continue regardless.
pub fn resolve_requested(identifier: &str, kind: ArtifactKind, ctx: &mut ResolutionContext) {
    if !ctx.mark_visited(identifier) {
        ctx.notifier
            .info(identifier, "already handled in this run, skipping");
        return;
    }

    let result = resolve_identifier(identifier, kind, ctx);
    report(identifier, None, result, ctx.notifier);
}

fn resolve_identifier(
    identifier: &str,
    kind: ArtifactKind,
    ctx: &mut ResolutionContext,
) -> Result<Outcome> {
    if let Some(outcome) = try_local(identifier, kind, ctx, None)? {
        return Ok(outcome);
    }

    let project = ctx.catalog.get_project(identifier)?;
    resolve_project(&project, ctx, None)
}

/// Drive one project record to a terminal state
///
/// The steps, in order:
///
/// 1. A cache entry under the project's canonical slug whose artifact is
///    still in the store short-circuits everything: cached dependencies are
///    walked, the file is copied into the destination, done.
/// 2. Otherwise the version list is loaded (version-list cache first,
///    catalog second) and the compatible version and its primary file are
///    selected.
/// 3. Required dependencies are resolved before the project's own file is
///    placed, so a failing download still leaves the subtree as complete
///    as possible.
/// 4. The store is searched once more (the dependency pass or an earlier
///    run may have filed the same filename); a hit installs from disk.
/// 5. Otherwise the file is downloaded into the destination, copied into
///    the store bucket and recorded in the cache.
pub fn resolve_project(
    project: &Project,
    ctx: &mut ResolutionContext,
    dependency_of: Option<&str>,
) -> Result<Outcome> {
    let kind = installable_kind(project, ctx)?;
    let is_dependency = dependency_of.is_some();
    let game_version = ctx.game_version.clone();

    // The record is in hand, so later dependency edges pointing at this
    // project can skip it.
    ctx.mark_visited(&project.id);

    let dest_dir = ctx.destination(kind).to_path_buf();
    if !dest_dir.is_dir() {
        return Err(Error::NotADirectory(dest_dir));
    }

    // The caller may have probed under a different identifier (an opaque
    // id, or a kind that turned out wrong); probe once more under the
    // canonical slug before going remote.
    if let Some(outcome) = try_local(&project.slug, kind, ctx, dependency_of)? {
        return Ok(outcome);
    }

    let versions = match ctx
        .cache
        .get_version_list(kind, &game_version, is_dependency, &project.id)
    {
        Some(cached) => cached,
        None => {
            let fetched = ctx.catalog.get_versions(&project.slug)?;
            if let Err(e) =
                ctx.cache
                    .put_version_list(kind, &game_version, is_dependency, &project.id, &fetched)
            {
                ctx.notifier
                    .warn(&project.slug, &format!("could not cache version list: {}", e));
            }
            fetched
        }
    };

    let version = select_compatible(
        &versions,
        &project.slug,
        kind,
        &game_version,
        &ctx.loader,
        ctx.release_only,
    )?;

    let file = select_primary(version, &project.slug)?;
    if file.extras > 0 {
        ctx.notifier.info(
            &project.slug,
            &format!(
                "version ships {} files, taking {}",
                file.extras + 1,
                file.filename
            ),
        );
    }
    if file.fallback {
        ctx.notifier.warn(
            &project.slug,
            &format!("no file is flagged primary, falling back to {}", file.filename),
        );
    }

    let mut deps = version.dependencies.clone();
    resolve_dependencies(&mut deps, &project.slug, ctx);

    // The dependency pass or a previous run may have filed this very
    // filename; check the store again before spending a download.
    if let Some(stored) = ctx.store.find_artifact(kind, &file.filename) {
        store::copy_into(&stored, &dest_dir)?;
        return Ok(Outcome::AlreadyPresent {
            filename: file.filename,
        });
    }

    let downloaded =
        ctx.catalog
            .download(&file.url, &dest_dir, &file.filename, &project.slug, ctx.notifier)?;

    ctx.store
        .store(&downloaded, kind, &game_version, is_dependency)?;

    let entry = ResolvedEntry {
        filename: file.filename.clone(),
        dependencies: deps,
    };
    if let Err(e) = ctx
        .cache
        .put_resolved(kind, &game_version, is_dependency, &project.slug, entry)
    {
        ctx.notifier
            .warn(&project.slug, &format!("could not record cache entry: {}", e));
    }

    Ok(Outcome::Fetched {
        filename: file.filename,
    })
}

/// Walk the required dependency edges of a version, depth first
///
/// Each dependency claims its spot in the visited set before anything is
/// fetched, so a project reachable through several parents is acquired
/// exactly once per run. Edges that already carry a slug (from a cache
/// snapshot) go straight to the local probe; slugs learned here are written
/// back into the edges so cache entries carry them next time. Failures are
/// reported per dependency and abort neither the parent nor the remaining
/// siblings.
pub fn resolve_dependencies(
    dependencies: &mut [Dependency],
    parent_slug: &str,
    ctx: &mut ResolutionContext,
) {
    for dep in dependencies.iter_mut() {
        if !dep.kind.is_required() {
            continue;
        }

        let project_id = match &dep.project_id {
            Some(id) => id.clone(),
            None => {
                ctx.notifier.warn(
                    parent_slug,
                    "dependency pinned to a version id only, cannot resolve it",
                );
                continue;
            }
        };

        // Claim before fetching; a second path to the same project skips.
        if !ctx.mark_visited(&project_id) {
            continue;
        }

        if let Some(slug) = dep.slug.clone() {
            match try_local(&slug, ArtifactKind::Mod, ctx, Some(parent_slug)) {
                Ok(Some(outcome)) => {
                    report(&slug, Some(parent_slug), Ok(outcome), ctx.notifier);
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    ctx.notifier.failed(&slug, &e);
                    continue;
                }
            }
        }

        let project = match ctx.catalog.get_project(&project_id) {
            Ok(p) => p,
            Err(e) => {
                ctx.notifier.failed(&project_id, &e);
                continue;
            }
        };

        dep.slug = Some(project.slug.clone());

        let result = resolve_project(&project, ctx, Some(parent_slug));
        report(&project.slug, Some(parent_slug), result, ctx.notifier);
    }
}

/// Probe the cache and the store for an artifact resolved in an earlier run
///
/// Returns `Ok(Some(..))` when the entry and the file both exist and the
/// copy succeeded. Metadata without its artifact proves nothing and reads
/// as a miss; the store is the source of truth for "already have it".
fn try_local(
    slug: &str,
    kind: ArtifactKind,
    ctx: &mut ResolutionContext,
    dependency_of: Option<&str>,
) -> Result<Option<Outcome>> {
    let is_dependency = dependency_of.is_some();
    let game_version = ctx.game_version.clone();

    let entry = match ctx
        .cache
        .get_resolved(kind, &game_version, is_dependency, slug)
    {
        Some(entry) => entry,
        None => return Ok(None),
    };

    let stored = match ctx.store.find_artifact(kind, &entry.filename) {
        Some(path) => path,
        None => return Ok(None),
    };

    let dest_dir = ctx.destination(kind).to_path_buf();
    if !dest_dir.is_dir() {
        return Err(Error::NotADirectory(dest_dir));
    }

    // Cached dependencies are walked before the parent is placed.
    let mut deps = entry.dependencies.clone();
    resolve_dependencies(&mut deps, slug, ctx);

    store::copy_into(&stored, &dest_dir)?;
    Ok(Some(Outcome::AlreadyPresent {
        filename: entry.filename,
    }))
}

/// Send the one terminal event a finished branch gets
fn report(
    slug: &str,
    dependency_of: Option<&str>,
    result: Result<Outcome>,
    notifier: &dyn Notifier,
) {
    match result {
        Ok(Outcome::AlreadyPresent { filename }) => {
            notifier.already_present(slug, &filename, dependency_of)
        }
        Ok(Outcome::Fetched { filename }) => notifier.fetched(slug, &filename, dependency_of),
        Err(e) => notifier.failed(slug, &e),
    }
}

fn installable_kind(project: &Project, ctx: &ResolutionContext) -> Result<ArtifactKind> {
    if project.kind == ProjectKind::Plugin {
        ctx.notifier.info(
            &project.slug,
            "catalog lists this as a plugin, installing as a mod",
        );
    }
    project.artifact_kind()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NullNotifier;
    use crate::Config;

    fn test_catalog() -> CatalogClient {
        CatalogClient::from_config(&Config::default()).unwrap()
    }

    // ============================================================
    // Context tests
    // ============================================================

    #[test]
    fn test_mark_visited_claims_once() {
        let catalog = test_catalog();
        let notifier = NullNotifier;
        let mut ctx = ResolutionContext::new(
            "1.20.1",
            "fabric",
            Path::new("/tmp/minecraft"),
            StoreLayout::new("/tmp/store"),
            &catalog,
            &notifier,
        );

        assert!(ctx.mark_visited("AANobbMI"));
        assert!(!ctx.mark_visited("AANobbMI"));
        assert!(ctx.was_visited("AANobbMI"));
        assert!(!ctx.was_visited("P7dR8mSH"));
    }

    #[test]
    fn test_destination_per_kind() {
        let catalog = test_catalog();
        let notifier = NullNotifier;
        let ctx = ResolutionContext::new(
            "1.20.1",
            "fabric",
            Path::new("/home/player/.minecraft"),
            StoreLayout::new("/tmp/store"),
            &catalog,
            &notifier,
        );

        assert_eq!(
            ctx.destination(ArtifactKind::Mod),
            Path::new("/home/player/.minecraft/mods")
        );
        assert_eq!(
            ctx.destination(ArtifactKind::Resourcepack),
            Path::new("/home/player/.minecraft/resourcepacks")
        );
    }
}
