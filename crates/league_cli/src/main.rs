//! League CLI
//!
//! Create, advance, simulate, export and inspect league files.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "league")]
#[command(about = "Run a simulated sports league from the command line", long_about = None)]
struct Cli {
    /// Directory holding league files
    #[arg(long, default_value = "leagues", global = true)]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Create a new league
    New {
        /// League name
        #[arg(long)]
        name: String,

        /// First season
        #[arg(long, default_value = "2025")]
        season: u16,

        /// The user's team id
        #[arg(long, default_value = "0")]
        team: u32,

        /// Random seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// YAML or JSON settings file
        #[arg(long)]
        settings: Option<PathBuf>,
    },

    /// Move a league to the next phase, or to --to
    Advance {
        lid: u32,

        /// Target phase code or name
        #[arg(long)]
        to: Option<String>,
    },

    /// Play days of the regular season or playoffs
    Sim {
        lid: u32,

        /// Days to play; the rest of the phase when omitted
        #[arg(long)]
        days: Option<u32>,
    },

    /// Export collections as JSON
    Export {
        lid: u32,

        /// Collections to export; all when omitted
        #[arg(long = "collection")]
        collections: Vec<String>,

        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Print a view model
    Show {
        lid: u32,

        /// View name, e.g. leaders or teamStats
        view: String,

        /// View parameters as key=value
        params: Vec<String>,
    },

    /// List league files
    List,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let saves = league_core::SaveManager::new(&cli.dir);

    match cli.command {
        Commands::New { name, season, team, seed, settings } => {
            let args = league_cli::NewLeagueArgs { name, season, user_tid: team, seed, settings };
            let lid = league_cli::new_league(&saves, &args)?;
            println!("Created league {} in {}", lid, saves.dir().display());
        }

        Commands::Advance { lid, to } => {
            let to = to.as_deref().map(league_cli::parse_phase).transpose()?;
            let phase = league_cli::advance(&saves, lid, to)?;
            println!("League {} is now in the {}", lid, phase);
        }

        Commands::Sim { lid, days } => {
            let played = league_cli::sim(&saves, lid, days)?;
            println!("Played {} day(s)", played);
        }

        Commands::Export { lid, collections, out } => {
            let path = league_cli::export(&saves, lid, &collections, &out)?;
            println!("Exported to {}", path.display());
        }

        Commands::Show { lid, view, params } => {
            let params = league_cli::parse_params(&params)?;
            let output = league_cli::show(&saves, lid, &view, &params)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Commands::List => {
            for info in league_cli::list(&saves) {
                println!("{:>4}  {:<24} {}  {}  {}", info.lid, info.name, info.season, info.phase, info.format_timestamp());
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("league CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
