use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "xmlpackdev: generate, archive, parse and tabulate XML records", long_about = None)]
pub struct Cli {
    /// Only log warnings and errors (RUST_LOG still wins when set)
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Pipeline settings. Flags override the JSON file, which overrides the defaults.
#[derive(Args, Clone, Debug, Default)]
pub struct ConfigArgs {
    /// JSON file with any subset of the pipeline settings
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// directory for archives and CSV output
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
    /// number of archives to build
    #[arg(long = "archives")]
    pub archive_count: Option<usize>,
    /// documents per archive
    #[arg(long = "records")]
    pub records_per_archive: Option<usize>,
    /// random bytes per record id
    #[arg(long)]
    pub token_bytes: Option<usize>,
    /// random bytes per object name
    #[arg(long)]
    pub name_length: Option<usize>,
    #[arg(long)]
    pub objects_max: Option<u32>,
    #[arg(long)]
    pub level_max: Option<u32>,
    /// worker threads (defaults to available cores)
    #[arg(long)]
    pub workers: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build archives, read them back and write levels.csv / objects.csv
    Run {
        #[command(flatten)]
        config: ConfigArgs,
        /// print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build archives only
    Build {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Read existing archives and write the two CSV tables
    Aggregate {
        #[arg(required = true)]
        archives: Vec<PathBuf>,
        #[command(flatten)]
        config: ConfigArgs,
        #[arg(long)]
        json: bool,
    },

    /// List archive members in directory order
    List { archive: PathBuf },

    /// Decode one archive member and print its fields
    Show { archive: PathBuf, member: String },
}
