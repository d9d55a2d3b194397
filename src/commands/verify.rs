//! The verify command: check modpack entries against the catalog
//!
//! Looks up every entry's project record and reports whether the catalog
//! lists the target Minecraft version and loader for it. Nothing is
//! downloaded and nothing on disk changes.

use anyhow::Result;
use modtaur::{CatalogClient, Config, Modpack};

enum Check {
    Compatible,
    Failed(String),
}

fn check_project(
    catalog: &CatalogClient,
    slug: &str,
    game_version: &str,
    loader: Option<&str>,
) -> Check {
    let project = match catalog.get_project(slug) {
        Ok(p) => p,
        Err(e) => return Check::Failed(e.to_string()),
    };

    if !project.game_versions.iter().any(|v| v == game_version) {
        return Check::Failed(format!("no version for Minecraft {}", game_version));
    }

    if let Some(loader) = loader {
        if !project.loaders.iter().any(|l| l == loader) {
            return Check::Failed(format!("no {} build", loader));
        }
    }

    Check::Compatible
}

pub fn run(
    modpack_path: String,
    game_version: Option<String>,
    loader: Option<String>,
) -> Result<()> {
    let modpack = Modpack::load(&modpack_path)?;

    // Overrides let a pack be checked against an environment it was not
    // written for, e.g. before bumping its Minecraft version.
    let game_version = game_version.unwrap_or_else(|| modpack.version.clone());
    let loader = loader.unwrap_or_else(|| modpack.loader.clone());

    println!(
        "Verifying {} entries against Minecraft {} ({})",
        modpack.mods.len() + modpack.resourcepacks.len(),
        game_version,
        loader
    );
    println!();

    let config = Config::load()?;
    let catalog = CatalogClient::from_config(&config)?;

    let mut ok = 0;
    let mut bad = 0;

    for slug in &modpack.mods {
        match check_project(&catalog, slug, &game_version, Some(&loader)) {
            Check::Compatible => {
                ok += 1;
                println!("  ✓ {}", slug);
            }
            Check::Failed(reason) => {
                bad += 1;
                println!("  ✗ {} - {}", slug, reason);
            }
        }
    }

    // Resourcepacks are loader independent
    for slug in &modpack.resourcepacks {
        match check_project(&catalog, slug, &game_version, None) {
            Check::Compatible => {
                ok += 1;
                println!("  ✓ {}", slug);
            }
            Check::Failed(reason) => {
                bad += 1;
                println!("  ✗ {} - {}", slug, reason);
            }
        }
    }

    println!();
    if bad == 0 {
        println!("✓ All {} entries are compatible", ok);
    } else {
        println!("{}/{} entries compatible", ok, ok + bad);
        std::process::exit(1);
    }

    Ok(())
}
