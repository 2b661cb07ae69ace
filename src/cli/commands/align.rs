use crate::bio::clustering::DistanceMethod;
use crate::bio::fasta::ParsePolicy;
use crate::bio::msa::RefinePolicy;
use crate::bio::sequence::MoleculeType;
use crate::cli::output::*;
use crate::cli::Context;
use crate::core::aligner::{MsaOutcome, MultipleAligner};
use crate::core::config::{Config, ProteinMatrix};
use crate::report::{Format, ReportGenerator};
use clap::Args;
use colored::*;
use std::path::PathBuf;

#[derive(Args)]
pub struct AlignArgs {
    /// Input FASTA file (plain or .gz)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Sequence type: nucleotide or protein
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub molecule: Option<MoleculeType>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Refinement iterations
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Seed for the refinement shuffles
    #[arg(long)]
    pub seed: Option<u64>,

    /// Only keep refinements that raise the sum-of-pairs score
    #[arg(long)]
    pub accept_improving: bool,

    /// Approximate distances with shared k-mers
    #[arg(long)]
    pub kmer: bool,

    /// Skip invalid records instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Score proteins with BLOSUM62
    #[arg(long)]
    pub blosum62: bool,

    /// Columns per Clustal block
    #[arg(long)]
    pub block_width: Option<usize>,
}

impl AlignArgs {
    /// Command line flags layered over the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        let alignment = &mut config.alignment;
        if let Some(molecule) = self.molecule {
            alignment.molecule = molecule;
        }
        if let Some(iterations) = self.iterations {
            alignment.refine_iterations = iterations;
        }
        if let Some(seed) = self.seed {
            alignment.seed = seed;
        }
        if self.accept_improving {
            alignment.refine_policy = RefinePolicy::AcceptImproving;
        }
        if self.kmer {
            alignment.distance = DistanceMethod::Kmer;
        }
        if self.lenient {
            alignment.parse_policy = ParsePolicy::Lenient;
        }
        if self.blosum62 {
            alignment.protein_matrix = ProteinMatrix::Blosum62;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(width) = self.block_width {
            config.output.block_width = width.max(1);
        }
    }
}

pub fn run(args: AlignArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut config = ctx.config.clone();
    args.apply(&mut config);
    let format = config.output.format;

    let aligner = MultipleAligner::new(config).with_silent(ctx.quiet);
    let outcome = aligner.run_file(&args.input)?;

    for record in &outcome.rejected {
        warning(&format!("Skipped {}: {}", record.header, record.reason));
    }

    match (&args.output, format) {
        (None, Format::Text) => print_summary(&outcome),
        (None, _) => print!("{}", ReportGenerator::new(format).generate(&outcome)?),
        (Some(path), _) => {
            let content = ReportGenerator::new(format).generate(&outcome)?;
            std::fs::write(path, content)?;
            if !ctx.quiet {
                success(&format!("Alignment written to {}", path.display()));
            }
        }
    }

    Ok(())
}

fn print_summary(outcome: &MsaOutcome) {
    let stats = &outcome.report.stats;

    section_header("Multiple Sequence Alignment");
    tree_item(false, "Sequences", Some(&stats.num_sequences.to_string()));
    tree_item(false, "Alignment length", Some(&stats.alignment_length.to_string()));
    tree_item(
        false,
        "Average conservation",
        Some(&conservation_colored(stats.avg_conservation).to_string()),
    );
    tree_item(true, "Sum-of-pairs score", Some(&stats.sum_of_pairs_score.to_string()));

    section_header("Pairwise Identity");
    let mut table = create_standard_table();
    table.set_header(vec![
        header_cell("Sequence 1"),
        header_cell("Sequence 2"),
        header_cell("Identity"),
    ]);
    for pair in &outcome.report.details {
        table.add_row(vec![
            pair.seq1.clone(),
            pair.seq2.clone(),
            format!("{:.2}%", pair.identity),
        ]);
    }
    println!("{}", table);

    section_header("Alignment");
    println!("{}", outcome.report.clustal.dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: AlignArgs,
    }

    #[test]
    fn test_flags_override_config() {
        let harness = Harness::parse_from([
            "kaidoku",
            "-i",
            "in.fa",
            "-t",
            "protein",
            "-f",
            "json",
            "--iterations",
            "7",
            "--accept-improving",
            "--kmer",
            "--lenient",
        ]);
        let mut config = Config::default();
        harness.args.apply(&mut config);

        assert_eq!(config.alignment.molecule, MoleculeType::Protein);
        assert_eq!(config.alignment.refine_iterations, 7);
        assert_eq!(config.alignment.refine_policy, RefinePolicy::AcceptImproving);
        assert_eq!(config.alignment.distance, DistanceMethod::Kmer);
        assert_eq!(config.alignment.parse_policy, ParsePolicy::Lenient);
        assert_eq!(config.output.format, Format::Json);
        assert_eq!(config.alignment.seed, 42);
    }

    #[test]
    fn test_unknown_molecule_is_rejected() {
        assert!(Harness::try_parse_from(["kaidoku", "-i", "in.fa", "-t", "rna"]).is_err());
    }
}
