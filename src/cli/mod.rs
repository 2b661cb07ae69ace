pub mod commands;
pub mod output;

use crate::core::config::{load_config, Config};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "kaidoku",
    version,
    about = "Progressive multiple sequence alignment",
    long_about = "Kaidoku aligns nucleotide or protein sequences: pairwise global alignment, \
                  an average-linkage guide tree, progressive profile alignment and iterative \
                  refinement, reported with per-column conservation and pairwise identities."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of threads to use (0 = configured value or all available)
    #[arg(short = 'j', long, default_value = "0", global = true)]
    pub threads: usize,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE", global = true, env = "KAIDOKU_CONFIG")]
    pub config: Option<PathBuf>,

    /// Hide progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Align a FASTA file of sequences
    Align(commands::align::AlignArgs),

    /// Globally align two sequences
    Pairwise(commands::pairwise::PairwiseArgs),

    /// Print or write the default configuration
    Config(commands::config::ConfigArgs),
}

/// Settings shared by every command
pub struct Context {
    pub config: Config,
    pub quiet: bool,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let config = match &cli.config {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };
        Ok(Self {
            config,
            quiet: cli.quiet,
        })
    }
}
