use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "RMSD++ CLI - A command-line interface for pairwise RMSD computation and optimal superposition over conformation ensembles.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the RMSD between two conformations of an ensemble.
    Pair(PairArgs),
    /// Compute the RMSD of one conformation against the rest of the ensemble.
    Reference(ReferenceArgs),
    /// Compute the full pairwise RMSD matrix of an ensemble.
    Matrix(MatrixArgs),
}

/// Input and backend options shared by every computation subcommand.
#[derive(Args, Debug)]
pub struct ComputeArgs {
    /// Path to the input multi-model PDB trajectory.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Restrict the computation to atoms with this PDB atom name (e.g. CA).
    #[arg(short, long, value_name = "NAME")]
    pub atoms: Option<String>,

    /// Calculation backend identifier.
    #[arg(short, long, value_name = "ID", default_value = "KABSCH_SERIAL")]
    pub backend: String,

    /// Worker thread count for the CPU-parallel backend.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Threads per block for the CUDA backend.
    #[arg(long, value_name = "NUM")]
    pub threads_per_block: Option<u32>,

    /// Blocks per grid for the CUDA backend.
    #[arg(long, value_name = "NUM")]
    pub blocks_per_grid: Option<u32>,
}

/// Arguments for the `pair` subcommand.
#[derive(Args, Debug)]
pub struct PairArgs {
    #[command(flatten)]
    pub compute: ComputeArgs,

    /// Index of the first conformation.
    #[arg(value_name = "FIRST")]
    pub first: usize,

    /// Index of the second conformation.
    #[arg(value_name = "SECOND")]
    pub second: usize,
}

/// Arguments for the `reference` subcommand.
#[derive(Args, Debug)]
pub struct ReferenceArgs {
    #[command(flatten)]
    pub compute: ComputeArgs,

    /// Index of the reference conformation.
    #[arg(value_name = "REFERENCE")]
    pub reference: usize,

    /// Only compare against conformations after the reference,
    /// instead of against the whole ensemble.
    #[arg(long)]
    pub following: bool,
}

/// Arguments for the `matrix` subcommand.
#[derive(Args, Debug)]
pub struct MatrixArgs {
    #[command(flatten)]
    pub compute: ComputeArgs,

    /// Write the condensed matrix values to this file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print summary statistics (mean, standard deviation, min, max)
    /// instead of the raw values.
    #[arg(long)]
    pub stats: bool,
}
