use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use skinpack::config::{DEFAULT_CONFIG_FILE, SkinpackConfig};

mod format;
mod inspect;
mod merge_cmd;
mod telemetry;

/// Merge Minecraft skin packs into one
///
/// Each input folder holds one skin pack: a skins.json, optional geometry
/// files (any .json whose name contains "geometry" or "model"), textures
/// and other files. The packs are combined into a single pack whose skin
/// names and geometry identifiers are all unique.
///
/// COLLISIONS:
///   - Skin names and geometry identifiers that are already taken get a
///     numeric suffix: Hero, Hero_2, Hero_3, ...
///   - Textures and other files with the same name: the first folder wins
///   - Legacy geometry files ("geometry.xxx" keys) are upgraded to the
///     1.12.0 "minecraft:geometry" layout
///
/// QUICK START:
///
///   skinpack-merge inspect ./PackA ./PackB
///   skinpack-merge merge ./PackA ./PackB --package-name Combo
///
/// CONFIGURATION:
///
///   Defaults are read from ./skinpack.toml when present (see --config).
///   Logging is controlled by SKINPACK_LOG (e.g. SKINPACK_LOG=debug) and
///   SKINPACK_LOG_FORMAT=json.
#[derive(Parser)]
#[command(name = "skinpack-merge")]
#[command(version, about)]
#[command(propagate_version = true)]
#[command(
    after_help = "See 'skinpack-merge <command> --help' for more information on a specific command."
)]
struct Cli {
    /// Config file (default: ./skinpack.toml, ignored if missing)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Suppress progress output and warnings
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge skin pack folders into one pack
    ///
    /// Folders are processed in the order given. Folders that cannot be
    /// loaded are skipped with a warning; folders without a skins.json are
    /// counted but contribute nothing.
    Merge(merge_cmd::MergeArgs),

    /// Show what each skin pack folder contains
    Inspect(inspect::InspectArgs),

    /// Print shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.quiet);

    match cli.command {
        Commands::Merge(ref args) => merge_cmd::run(args, &load_config(cli.config)?, cli.quiet),
        Commands::Inspect(ref args) => inspect::run(args, &load_config(cli.config)?),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "skinpack-merge",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

fn load_config(explicit: Option<PathBuf>) -> Result<SkinpackConfig> {
    match explicit {
        Some(path) => {
            if !path.is_file() {
                bail!("config file not found: {}", path.display());
            }
            Ok(SkinpackConfig::load(&path)?)
        }
        None => Ok(SkinpackConfig::load(&PathBuf::from(DEFAULT_CONFIG_FILE))?),
    }
}
