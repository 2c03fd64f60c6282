use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ConflictPolicy;

#[derive(Parser)]
#[command(name = "merra-catalog")]
#[command(about = "Builds a catalog of MERRA physical quantities from OPeNDAP DAS/DDS text")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        help = "Only log warnings and hide progress"
    )]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a catalog from the files listed in a manifest
    Build {
        #[arg(short, long, help = "JSON manifest of DAS/DDS text files")]
        manifest: PathBuf,

        #[arg(
            short,
            long = "output",
            help = "Output catalog path [default: <output_dir>/merra-catalog-{YYMMDD}.ctg]"
        )]
        output_file: Option<PathBuf>,

        #[arg(long)]
        max_workers: Option<usize>,

        #[arg(long, value_enum)]
        on_conflict: Option<ConflictPolicy>,
    },

    /// Build the catalog and check it without writing anything
    Validate {
        #[arg(short, long, help = "JSON manifest of DAS/DDS text files")]
        manifest: PathBuf,

        #[arg(long)]
        max_workers: Option<usize>,

        #[arg(long, value_enum)]
        on_conflict: Option<ConflictPolicy>,
    },

    /// Print the inventory of a single file
    Inspect {
        #[arg(long, help = "Attribute (DAS) text file")]
        das: PathBuf,

        #[arg(long, help = "Descriptor (DDS) text file [default: DAS path with .dds]")]
        dds: Option<PathBuf>,

        #[arg(short, long, help = "Collection code, e.g. MAI3CPASM")]
        collection: String,

        #[arg(long, default_value = "")]
        base_url: String,

        #[arg(long, help = "URL the file was fetched from, used for the tag")]
        file_url: Option<String>,

        #[arg(long, help = "Print the inventory as JSON")]
        json: bool,
    },

    /// Display information about a catalog file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}
