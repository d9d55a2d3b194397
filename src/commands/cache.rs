//! Store management commands
//!
//! Provides commands to manage the local download store:
//! - `cache info` - Show store contents and size
//! - `cache clean` - Delete every stored artifact and cache file
//! - `cache path` - Show store location

use anyhow::Result;
use modtaur::{format_size, Config, StoreLayout};

/// Show store statistics
pub fn run_info() -> Result<()> {
    let config = Config::load()?;
    let store = StoreLayout::new(config.downloads_dir());
    let stats = store.stats();

    println!("Store Information");
    println!("=================");
    println!();
    println!("Location: {}", store.root().display());
    println!("Mods stored: {}", stats.mods);
    println!("Resourcepacks stored: {}", stats.resourcepacks);
    println!("Total size: {}", format_size(stats.total_size));
    println!();

    // Show store structure
    println!("Store structure:");
    println!("  <store>/mods/<minecraft-version>/");
    println!("  <store>/mods/<minecraft-version>/dependencies/");
    println!("  <store>/resourcepacks/<minecraft-version>/");
    println!();

    if store.root().exists() {
        println!("Status: Active");
    } else {
        println!("Status: Not initialized (created on first load)");
    }

    Ok(())
}

/// Delete the whole store
pub fn run_clean(yes: bool) -> Result<()> {
    let config = Config::load()?;
    let store = StoreLayout::new(config.downloads_dir());

    if !store.root().exists() {
        println!("Store is already empty.");
        return Ok(());
    }

    let stats = store.stats();
    println!(
        "This removes {} mods and {} resourcepacks ({}) from:",
        stats.mods,
        stats.resourcepacks,
        format_size(stats.total_size)
    );
    println!("  {}", store.root().display());
    println!();

    if !yes {
        print!("Continue? (yes/no): ");
        std::io::Write::flush(&mut std::io::stdout())?;

        let mut confirmation = String::new();
        std::io::stdin().read_line(&mut confirmation)?;

        if confirmation.trim().to_lowercase() != "yes" {
            println!("Clean cancelled.");
            return Ok(());
        }
    }

    store.clean()?;
    println!("Removed store, freed {}", format_size(stats.total_size));

    Ok(())
}

/// Show store path
pub fn run_path() -> Result<()> {
    let config = Config::load()?;
    let store = StoreLayout::new(config.downloads_dir());
    println!("{}", store.root().display());
    Ok(())
}
