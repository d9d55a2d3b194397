//! The load command: fill a Minecraft installation from a modpack file

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use modtaur::{
    format_size, resolve_requested, store, ArtifactKind, CatalogClient, Config, Error, Modpack,
    Notifier, ResolutionContext, StoreLayout,
};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// An in-flight download and its spinner
struct DownloadBar {
    bar: ProgressBar,
    filename: String,
}

/// Renders resolution events on the terminal, one line per event, with an
/// indicatif spinner while a download is in flight.
struct ConsoleNotifier {
    current: Mutex<Option<DownloadBar>>,
    fetched: AtomicUsize,
    present: AtomicUsize,
    failed: AtomicUsize,
}

impl ConsoleNotifier {
    fn new() -> Self {
        Self {
            current: Mutex::new(None),
            fetched: AtomicUsize::new(0),
            present: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    /// Drop the spinner before printing so lines don't interleave with it
    fn clear_bar(&self) {
        if let Some(d) = self.current.lock().unwrap().take() {
            d.bar.finish_and_clear();
        }
    }

    fn counts(&self) -> (usize, usize, usize) {
        (
            self.fetched.load(Ordering::Relaxed),
            self.present.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
        )
    }
}

impl Notifier for ConsoleNotifier {
    fn run_started(
        &self,
        name: &str,
        game_version: &str,
        loader: &str,
        mods: usize,
        resourcepacks: usize,
    ) {
        println!(
            "Loading modpack '{}' for Minecraft {} ({})",
            name, game_version, loader
        );
        if resourcepacks > 0 {
            println!("  {} mods, {} resourcepacks", mods, resourcepacks);
        } else {
            println!("  {} mods", mods);
        }
        println!();
    }

    fn info(&self, slug: &str, message: &str) {
        self.clear_bar();
        println!("  {}: {}", slug, message);
    }

    fn warn(&self, slug: &str, message: &str) {
        self.clear_bar();
        println!("  ⚠ {}: {}", slug, message);
    }

    fn already_present(&self, slug: &str, filename: &str, dependency_of: Option<&str>) {
        self.clear_bar();
        self.present.fetch_add(1, Ordering::Relaxed);
        match dependency_of {
            Some(parent) => println!(
                "  ✓ {} - {} (from store, needed by {})",
                slug, filename, parent
            ),
            None => println!("  ✓ {} - {} (from store)", slug, filename),
        }
    }

    fn fetched(&self, slug: &str, filename: &str, dependency_of: Option<&str>) {
        self.clear_bar();
        self.fetched.fetch_add(1, Ordering::Relaxed);
        match dependency_of {
            Some(parent) => println!("  ✓ {} - {} (needed by {})", slug, filename, parent),
            None => println!("  ✓ {} - {}", slug, filename),
        }
    }

    fn failed(&self, slug: &str, error: &Error) {
        self.clear_bar();
        self.failed.fetch_add(1, Ordering::Relaxed);
        match error {
            Error::NoCompatibleVersion { .. } => {
                println!("  ✗ {} - skipped (incompatible)", slug)
            }
            _ => println!("  ✗ {}: {}", slug, error),
        }
    }

    fn download_started(&self, _slug: &str, filename: &str) {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        bar.set_message(format!("Downloading {}...", filename));
        bar.enable_steady_tick(std::time::Duration::from_millis(80));

        *self.current.lock().unwrap() = Some(DownloadBar {
            bar,
            filename: filename.to_string(),
        });
    }

    fn download_progress(&self, received: u64, total: Option<u64>) {
        if let Some(d) = self.current.lock().unwrap().as_ref() {
            let progress = match total {
                Some(total) => format!("{} / {}", format_size(received), format_size(total)),
                None => format_size(received),
            };
            d.bar
                .set_message(format!("Downloading {} ({})", d.filename, progress));
        }
    }
}

pub fn run(
    modpack_path: String,
    resourcepacks: bool,
    skip_mods: bool,
    keep_previous: bool,
    release_only: bool,
) -> Result<()> {
    let modpack = Modpack::load(&modpack_path)?;

    let config = Config::load()?;
    let catalog = CatalogClient::from_config(&config)?;

    let minecraft_dir = config.minecraft_dir();
    if !minecraft_dir.is_dir() {
        anyhow::bail!(
            "Minecraft directory not found: {}\n\n\
            Set paths.minecraft_dir in {} to your installation.",
            minecraft_dir.display(),
            Config::default_path()?.display()
        );
    }

    // Prepare the destinations this run touches. Previous contents go
    // unless --keep-previous asked for them.
    let mut kinds = Vec::new();
    if !skip_mods {
        kinds.push(ArtifactKind::Mod);
    }
    if resourcepacks {
        kinds.push(ArtifactKind::Resourcepack);
    }

    for kind in &kinds {
        let dest = minecraft_dir.join(kind.dir_name());
        fs::create_dir_all(&dest)?;
        if !keep_previous {
            let removed = store::clear_files(&dest)?;
            if removed > 0 {
                println!("Cleared {} files from {}", removed, dest.display());
            }
        }
    }

    let notifier = ConsoleNotifier::new();
    notifier.run_started(
        &modpack_name(&modpack_path),
        &modpack.version,
        &modpack.loader,
        if skip_mods { 0 } else { modpack.mods.len() },
        if resourcepacks {
            modpack.resourcepacks.len()
        } else {
            0
        },
    );

    let mut ctx = ResolutionContext::new(
        &modpack.version,
        &modpack.loader,
        &minecraft_dir,
        StoreLayout::new(config.downloads_dir()),
        &catalog,
        &notifier,
    );
    ctx.release_only = release_only;

    if !skip_mods {
        for slug in &modpack.mods {
            resolve_requested(slug, ArtifactKind::Mod, &mut ctx);
        }
    }
    if resourcepacks {
        for slug in &modpack.resourcepacks {
            resolve_requested(slug, ArtifactKind::Resourcepack, &mut ctx);
        }
    }

    let (fetched, present, failed) = notifier.counts();
    println!();
    if failed > 0 {
        println!(
            "⚠ Finished with {} failures ({} downloaded, {} from store)",
            failed, fetched, present
        );
    } else {
        println!(
            "✓ Loaded {} projects ({} downloaded, {} from store)",
            fetched + present,
            fetched,
            present
        );
    }

    Ok(())
}

/// Display name for the run header, taken from the modpack file name
fn modpack_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}
