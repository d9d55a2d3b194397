use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

mod commands;

/// Modtaur - a Modrinth modpack downloader for Minecraft
#[derive(Parser)]
#[command(name = "modtaur")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a modpack into the Minecraft installation
    Load {
        /// Path to the modpack file (.json extension optional)
        modpack: String,

        /// Also install the modpack's resourcepacks
        #[arg(short, long)]
        resourcepacks: bool,

        /// Skip the mod list, only install resourcepacks
        #[arg(long, requires = "resourcepacks")]
        skip_mods: bool,

        /// Keep files already in the destination folders
        #[arg(short, long)]
        keep_previous: bool,

        /// Only accept versions on the release channel
        #[arg(long)]
        release_only: bool,
    },

    /// Check modpack entries against the catalog without downloading
    Verify {
        /// Path to the modpack file (.json extension optional)
        modpack: String,

        /// Override the Minecraft version from the modpack
        #[arg(short, long)]
        game_version: Option<String>,

        /// Override the mod loader from the modpack
        #[arg(short, long)]
        loader: Option<String>,
    },

    /// Manage the local download store
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show store contents and size
    Info,

    /// Delete every stored artifact and cache file
    Clean {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the store path
    Path,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Load {
            modpack,
            resourcepacks,
            skip_mods,
            keep_previous,
            release_only,
        } => commands::load::run(modpack, resourcepacks, skip_mods, keep_previous, release_only),
        Commands::Verify {
            modpack,
            game_version,
            loader,
        } => commands::verify::run(modpack, game_version, loader),
        Commands::Cache { action } => match action {
            CacheAction::Info => commands::cache::run_info(),
            CacheAction::Clean { yes } => commands::cache::run_clean(yes),
            CacheAction::Path => commands::cache::run_path(),
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "modtaur", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
