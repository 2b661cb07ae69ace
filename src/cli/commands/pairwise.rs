use crate::bio::fasta::parse_fasta;
use crate::bio::sequence::{MoleculeType, Sequence};
use crate::cli::Context;
use crate::core::aligner::MultipleAligner;
use crate::report::json::generate_pairwise_json;
use crate::report::text::generate_pairwise_text;
use crate::report::PairwiseReport;
use crate::KaidokuError;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct PairwiseArgs {
    /// First sequence
    #[arg(required_unless_present = "input")]
    pub seq_a: Option<String>,

    /// Second sequence
    #[arg(required_unless_present = "input")]
    pub seq_b: Option<String>,

    /// FASTA file holding exactly two records
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["seq_a", "seq_b"])]
    pub input: Option<PathBuf>,

    /// Sequence type: nucleotide or protein
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub molecule: Option<MoleculeType>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

fn load_pair(args: &PairwiseArgs) -> Result<(Sequence, Sequence), KaidokuError> {
    if let Some(path) = &args.input {
        let mut records = parse_fasta(path)?;
        if records.len() != 2 {
            return Err(KaidokuError::InvalidInput(format!(
                "Pairwise alignment needs exactly two records, {} has {}",
                path.display(),
                records.len()
            )));
        }
        let b = records.remove(1);
        let a = records.remove(0);
        return Ok((a, b));
    }

    match (&args.seq_a, &args.seq_b) {
        (Some(a), Some(b)) => Ok((raw_sequence("seq1", a), raw_sequence("seq2", b))),
        _ => Err(KaidokuError::InvalidInput(
            "Two sequences or an input file are required".to_string(),
        )),
    }
}

fn raw_sequence(id: &str, residues: &str) -> Sequence {
    let residues = residues
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|b| b.to_ascii_uppercase())
        .collect();
    Sequence::new(id.to_string(), residues)
}

pub fn run(args: PairwiseArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut config = ctx.config.clone();
    if let Some(molecule) = args.molecule {
        config.alignment.molecule = molecule;
    }

    let (a, b) = load_pair(&args)?;
    let alignment = MultipleAligner::new(config).align_pairwise(&a, &b)?;
    let report = PairwiseReport::new(&a.label(), &b.label(), &alignment);

    if args.json {
        println!("{}", generate_pairwise_json(&report)?);
    } else {
        print!("{}", generate_pairwise_text(&report)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_sequence_is_normalised() {
        let seq = raw_sequence("seq1", "acg t\n");
        assert_eq!(seq.sequence, b"ACGT");
    }

    #[test]
    fn test_missing_sequences() {
        let args = PairwiseArgs {
            seq_a: Some("ACGT".to_string()),
            seq_b: None,
            input: None,
            molecule: None,
            json: false,
        };
        assert!(matches!(load_pair(&args), Err(KaidokuError::InvalidInput(_))));
    }
}
