use crate::bio::alignment::nw_aligner::PairwiseAlignment;
use crate::bio::clustering::DistanceMatrix;
use crate::bio::fasta::write_fasta_to_writer;
use crate::bio::msa::{Alignment, ConservationProfile};
use crate::core::aligner::MsaOutcome;
use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod clustal;
pub mod json;
pub mod text;

pub use clustal::ClustalFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Text,
    Json,
    Clustal,
    /// Pairwise identity table
    Csv,
    /// Aligned rows with gaps
    Fasta,
    /// Guide tree
    Newick,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConservation {
    /// 1-based column
    pub position: usize,
    pub conservation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentStats {
    pub num_sequences: usize,
    pub alignment_length: usize,
    pub avg_conservation: f64,
    pub sum_of_pairs_score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairIdentity {
    pub seq1: String,
    pub seq2: String,
    pub identity: f64,
}

/// Serialisable result of one multiple alignment job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsaReport {
    pub taxa: Vec<ColumnConservation>,
    pub stats: AlignmentStats,
    pub details: Vec<PairIdentity>,
    pub clustal: String,
}

impl MsaReport {
    pub fn new(
        alignment: &Alignment,
        distances: &DistanceMatrix,
        conservation: &ConservationProfile,
        sum_of_pairs_score: i64,
        formatter: &ClustalFormatter,
    ) -> Self {
        let taxa = conservation
            .scores()
            .iter()
            .enumerate()
            .map(|(i, &score)| ColumnConservation {
                position: i + 1,
                conservation: score,
            })
            .collect();

        let rows = alignment.rows();
        let mut details = Vec::new();
        for i in 0..rows.len() {
            for j in i + 1..rows.len() {
                details.push(PairIdentity {
                    seq1: rows[i].header.clone(),
                    seq2: rows[j].header.clone(),
                    identity: distances.identity(rows[i].index, rows[j].index),
                });
            }
        }

        Self {
            taxa,
            stats: AlignmentStats {
                num_sequences: alignment.num_sequences(),
                alignment_length: alignment.width(),
                avg_conservation: conservation.average(),
                sum_of_pairs_score,
            },
            details,
            clustal: formatter.format(alignment),
        }
    }

    /// Identity between the sequences labelled `a` and `b`, in either order
    pub fn identity(&self, a: &str, b: &str) -> Option<f64> {
        self.details
            .iter()
            .find(|d| (d.seq1 == a && d.seq2 == b) || (d.seq1 == b && d.seq2 == a))
            .map(|d| d.identity)
    }
}

/// Flattened view of a pairwise alignment for display and export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseReport {
    pub seq1: String,
    pub seq2: String,
    pub aligned_seq1: String,
    pub aligned_seq2: String,
    pub markers: String,
    pub matches: usize,
    pub mismatches: usize,
    pub gaps: usize,
    pub score: i32,
    pub identity: f64,
}

impl PairwiseReport {
    pub fn new(seq1: &str, seq2: &str, alignment: &PairwiseAlignment) -> Self {
        Self {
            seq1: seq1.to_string(),
            seq2: seq2.to_string(),
            aligned_seq1: String::from_utf8_lossy(&alignment.aligned_a).into_owned(),
            aligned_seq2: String::from_utf8_lossy(&alignment.aligned_b).into_owned(),
            markers: String::from_utf8_lossy(&alignment.alignment_string()).into_owned(),
            matches: alignment.matches,
            mismatches: alignment.mismatches,
            gaps: alignment.gaps,
            score: alignment.score,
            identity: alignment.percent_identity(),
        }
    }
}

pub struct ReportGenerator {
    format: Format,
}

impl ReportGenerator {
    pub fn new(format: Format) -> Self {
        Self { format }
    }

    pub fn generate(&self, outcome: &MsaOutcome) -> Result<String> {
        match self.format {
            Format::Text => text::generate_text_report(outcome),
            Format::Json => json::generate_json_report(&outcome.report),
            Format::Clustal => Ok(outcome.report.clustal.clone()),
            Format::Csv => generate_csv_report(&outcome.report),
            Format::Fasta => {
                let mut buffer = Vec::new();
                write_fasta_to_writer(&mut buffer, &outcome.alignment.to_sequences())?;
                Ok(String::from_utf8(buffer)?)
            }
            Format::Newick => {
                let labels: Vec<String> = outcome
                    .alignment
                    .rows()
                    .iter()
                    .map(|r| r.header.clone())
                    .collect();
                Ok(format!("{}\n", outcome.tree.to_newick(&labels)))
            }
        }
    }
}

/// Identity table with one `seq1,seq2,identity` line per pair
pub fn generate_csv_report(report: &MsaReport) -> Result<String> {
    use std::fmt::Write;

    let mut output = String::new();
    writeln!(&mut output, "seq1,seq2,identity")?;
    for pair in &report.details {
        writeln!(
            &mut output,
            "{},{},{}",
            csv_field(&pair.seq1),
            csv_field(&pair.seq2),
            pair.identity
        )?;
    }
    Ok(output)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
