pub mod conservation;
pub mod progressive;
pub mod refine;

pub use conservation::ConservationProfile;
pub use progressive::ProgressiveAligner;
pub use refine::{RefinePolicy, RefinementEngine};

use crate::bio::alignment::profile::Profile;
use crate::bio::alignment::scoring::ScoringMatrix;
use crate::bio::sequence::Sequence;
use crate::KaidokuError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignedRow {
    /// Position of the sequence in the original input
    pub index: usize,
    pub header: String,
    #[serde(serialize_with = "serialize_residues")]
    pub residues: Vec<u8>,
}

fn serialize_residues<S: serde::Serializer>(residues: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&String::from_utf8_lossy(residues))
}

/// Rows of equal length sharing one column coordinate system
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alignment {
    rows: Vec<AlignedRow>,
}

impl Alignment {
    pub fn new(rows: Vec<AlignedRow>) -> Result<Self, KaidokuError> {
        let width = match rows.first() {
            Some(first) => first.residues.len(),
            None => {
                return Err(KaidokuError::Computation(
                    "Alignment has no rows".to_string(),
                ))
            }
        };
        if let Some(row) = rows.iter().find(|r| r.residues.len() != width) {
            return Err(KaidokuError::Computation(format!(
                "Row '{}' has {} columns, expected {}",
                row.header,
                row.residues.len(),
                width
            )));
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[AlignedRow] {
        &self.rows
    }

    pub fn num_sequences(&self) -> usize {
        self.rows.len()
    }

    /// Column count
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |r| r.residues.len())
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = u8> + '_ {
        self.rows.iter().map(move |r| r.residues[col])
    }

    /// Restore original input order
    pub fn sort_by_index(&mut self) {
        self.rows.sort_by_key(|r| r.index);
    }

    pub fn to_profile(&self) -> Profile {
        Profile::from_uniform_rows(
            self.rows.iter().map(|r| r.residues.clone()).collect(),
            self.width(),
        )
    }

    pub fn sum_of_pairs<S: ScoringMatrix>(&self, scoring: &S) -> i64 {
        self.to_profile().sum_of_pairs(scoring)
    }

    /// Gapped rows as sequences, for FASTA export
    pub fn to_sequences(&self) -> Vec<Sequence> {
        self.rows
            .iter()
            .map(|r| Sequence::new(r.header.clone(), r.residues.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: usize, residues: &[u8]) -> AlignedRow {
        AlignedRow {
            index,
            header: format!("s{}", index),
            residues: residues.to_vec(),
        }
    }

    #[test]
    fn test_rows_must_share_width() {
        assert!(Alignment::new(vec![row(0, b"AC-T"), row(1, b"ACGT")]).is_ok());
        assert!(matches!(
            Alignment::new(vec![row(0, b"ACT"), row(1, b"ACGT")]),
            Err(KaidokuError::Computation(_))
        ));
        assert!(Alignment::new(Vec::new()).is_err());
    }

    #[test]
    fn test_sort_and_columns() {
        let mut alignment = Alignment::new(vec![row(2, b"GG"), row(0, b"AC"), row(1, b"A-")]).unwrap();
        alignment.sort_by_index();

        let order: Vec<usize> = alignment.rows().iter().map(|r| r.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(alignment.column(1).collect::<Vec<_>>(), b"C-G".to_vec());
        assert_eq!(alignment.width(), 2);
    }
}
