//! Command-line definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "ets2map")]
#[command(about = "Euro Truck Simulator 2 map decoder")]
#[command(version)]
pub struct Cli {
    /// Log decoder progress at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Decode a single sector file
    Sector {
        path: PathBuf,

        /// List decoded nodes
        #[arg(long)]
        nodes: bool,

        /// List decoded items
        #[arg(long)]
        items: bool,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Decode a prefab file and enumerate its routes
    Prefab {
        path: PathBuf,

        /// Only list routes entering through this prefab node
        #[arg(short, long)]
        entry: Option<usize>,

        /// Only list routes leaving through this prefab node
        #[arg(short = 'x', long)]
        exit: Option<usize>,

        /// Print each route projected into world space, entry node at the origin
        #[arg(long)]
        polygon: bool,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Load a whole map directory and resolve cross-sector links
    Map {
        /// TOML configuration file
        #[arg(short, long, env = "ETS2MAP_CONFIG", default_value = "ets2map.toml")]
        config: PathBuf,

        /// Override the configured sector directory
        #[arg(long)]
        sector_dir: Option<PathBuf>,

        /// Override the configured prefab directory
        #[arg(long)]
        prefab_dir: Option<PathBuf>,

        /// Decode on the current thread only
        #[arg(long)]
        serial: bool,

        /// Write the JSON summary to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Search a file for a uid, a name token or a byte pattern
    Search {
        path: PathBuf,

        /// Uid in hex (e.g., 0x4F2A00C1)
        #[arg(long, group = "needle")]
        uid: Option<String>,

        /// Name encoded as a token (e.g., "berlin")
        #[arg(long, group = "needle")]
        token: Option<String>,

        /// Byte pattern with wildcards (e.g., "02 00 00 00 ?? ??")
        #[arg(long, group = "needle")]
        pattern: Option<String>,

        /// Maximum number of matches to print
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
