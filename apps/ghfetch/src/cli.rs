//! Command line interface definition

use clap::{Parser, Subcommand, ValueEnum};
use ghfetch_strategy::StrategyKind;
use ghfetch_types::ColorChoice;
use std::path::PathBuf;

/// ghfetch - Download from private GitHub repositories
#[derive(Parser)]
#[command(name = "ghfetch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Download files and release assets from private GitHub repositories")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Write debug logs to the ghfetch log directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Download a file or release asset
    #[command(alias = "get")]
    Fetch {
        /// GitHub URL of the file or release asset
        url: String,

        /// Destination path (defaults to the URL's file name)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        #[command(flatten)]
        strategy: StrategyArgs,

        /// Package name reported in progress output
        #[arg(long)]
        name: Option<String>,

        /// Package version reported in progress output
        #[arg(long, requires = "name")]
        version: Option<String>,
    },

    /// Look up the asset id of a release download URL
    Resolve {
        /// GitHub release download URL
        url: String,
    },

    /// Print the authenticated download URL with the token redacted
    Url {
        /// GitHub URL of the file or release asset
        url: String,

        #[command(flatten)]
        strategy: StrategyArgs,
    },
}

#[derive(clap::Args)]
pub struct StrategyArgs {
    /// How the URL is interpreted
    #[arg(long, value_enum, default_value_t = StrategyChoice::Auto)]
    pub strategy: StrategyChoice,
}

/// `--strategy` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyChoice {
    /// Release asset if the URL contains `/releases/download/`, raw file otherwise
    Auto,
    /// File in the repository tree
    Raw,
    /// Release attachment
    Release,
}

impl StrategyChoice {
    pub fn resolve(self, url: &str) -> StrategyKind {
        match self {
            Self::Auto => StrategyKind::detect(url),
            Self::Raw => StrategyKind::RawFile,
            Self::Release => StrategyKind::ReleaseAsset,
        }
    }
}
