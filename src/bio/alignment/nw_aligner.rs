/// Needleman-Wunsch global alignment algorithm
use crate::bio::alignment::dp::{DpMatrix, Traceback};
use crate::bio::alignment::scoring::{ScoringMatrix, ScoringModel};
use crate::bio::sequence::{MoleculeType, Sequence, GAP};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseAlignment {
    #[serde(serialize_with = "serialize_residues")]
    pub aligned_a: Vec<u8>,
    #[serde(serialize_with = "serialize_residues")]
    pub aligned_b: Vec<u8>,
    pub matches: usize,
    pub mismatches: usize,
    /// Alignment columns containing a gap
    pub gaps: usize,
    pub score: i32,
    len_a: usize,
    len_b: usize,
}

fn serialize_residues<S: serde::Serializer>(residues: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&String::from_utf8_lossy(residues))
}

impl PairwiseAlignment {
    /// Matches over the longer ungapped input, as a percentage
    pub fn percent_identity(&self) -> f64 {
        let longest = self.len_a.max(self.len_b);
        if longest == 0 {
            return 0.0;
        }
        self.matches as f64 / longest as f64 * 100.0
    }

    /// Number of alignment columns
    pub fn len(&self) -> usize {
        self.aligned_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned_a.is_empty()
    }

    /// '|' for match, 'X' for mismatch, ' ' for gap
    pub fn alignment_string(&self) -> Vec<u8> {
        self.aligned_a
            .iter()
            .zip(self.aligned_b.iter())
            .map(|(&a, &b)| {
                if a == GAP || b == GAP {
                    b' '
                } else if a == b {
                    b'|'
                } else {
                    b'X'
                }
            })
            .collect()
    }
}

pub struct NeedlemanWunsch<S: ScoringMatrix> {
    scoring: S,
}

impl<S: ScoringMatrix> NeedlemanWunsch<S> {
    pub fn new(scoring: S) -> Self {
        Self { scoring }
    }

    pub fn scoring(&self) -> &S {
        &self.scoring
    }

    pub fn align(&self, seq_a: &[u8], seq_b: &[u8]) -> PairwiseAlignment {
        let matrix = DpMatrix::fill(
            seq_a.len(),
            seq_b.len(),
            self.scoring.gap_open() as f64,
            self.scoring.gap_extend() as f64,
            |i, j| self.scoring.score(seq_a[i], seq_b[j]) as f64,
        );

        let path = matrix.traceback();
        let mut aligned_a = Vec::with_capacity(path.len());
        let mut aligned_b = Vec::with_capacity(path.len());
        let (mut i, mut j) = (0, 0);

        for step in path {
            match step {
                Traceback::Diagonal => {
                    aligned_a.push(seq_a[i]);
                    aligned_b.push(seq_b[j]);
                    i += 1;
                    j += 1;
                }
                Traceback::Up => {
                    aligned_a.push(seq_a[i]);
                    aligned_b.push(GAP);
                    i += 1;
                }
                Traceback::Left => {
                    aligned_a.push(GAP);
                    aligned_b.push(seq_b[j]);
                    j += 1;
                }
                Traceback::None => break,
            }
        }

        let (mut matches, mut mismatches, mut gaps) = (0, 0, 0);
        for (&a, &b) in aligned_a.iter().zip(aligned_b.iter()) {
            if a == GAP || b == GAP {
                gaps += 1;
            } else if a == b {
                matches += 1;
            } else {
                mismatches += 1;
            }
        }

        PairwiseAlignment {
            aligned_a,
            aligned_b,
            matches,
            mismatches,
            gaps,
            // Integer substitution scores keep every cell integral
            score: matrix.final_score().round() as i32,
            len_a: seq_a.len(),
            len_b: seq_b.len(),
        }
    }
}

/// Align two sequences with the default scoring for their molecule type
pub fn global(a: &Sequence, b: &Sequence, molecule: MoleculeType) -> PairwiseAlignment {
    NeedlemanWunsch::new(ScoringModel::for_molecule(molecule)).align(&a.sequence, &b.sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::alignment::scoring::{NucleotideMatrix, ProteinMatrix};

    #[test]
    fn test_perfect_match() {
        let aligner = NeedlemanWunsch::new(NucleotideMatrix::new());
        let result = aligner.align(b"ACGT", b"ACGT");

        assert_eq!(result.aligned_a, b"ACGT");
        assert_eq!(result.aligned_b, b"ACGT");
        assert_eq!(result.matches, 4);
        assert_eq!(result.gaps, 0);
        assert_eq!(result.score, 20);
        assert_eq!(result.percent_identity(), 100.0);
    }

    #[test]
    fn test_simple_mismatch() {
        let aligner = NeedlemanWunsch::new(NucleotideMatrix::new());
        let result = aligner.align(b"ACGT", b"AGGT");

        assert_eq!(result.aligned_a, b"ACGT");
        assert_eq!(result.aligned_b, b"AGGT");
        assert_eq!(result.mismatches, 1);
        assert_eq!(result.alignment_string(), b"|X||");
        assert_eq!(result.percent_identity(), 75.0);
    }

    #[test]
    fn test_alignment_with_gap() {
        let aligner = NeedlemanWunsch::new(NucleotideMatrix::new());
        let result = aligner.align(b"ACGTACGT", b"ACGTCGT");

        assert_eq!(result.aligned_a.len(), result.aligned_b.len());
        assert_eq!(result.gaps, 1);
        assert_eq!(result.matches, 7);
        // 7 matches minus one flat gap
        assert_eq!(result.score, 25);
    }

    #[test]
    fn test_protein_affine_gap_run() {
        let aligner = NeedlemanWunsch::new(ProteinMatrix::new());
        let result = aligner.align(b"MKTAYIAKQR", b"MKTQR");

        assert_eq!(result.gaps, 5);
        assert_eq!(result.matches, 5);
        // 5 matches (+20), one opened gap (-11) and four extensions (-4)
        assert_eq!(result.score, 5);
    }

    #[test]
    fn test_percent_identity_uses_longer_input() {
        let aligner = NeedlemanWunsch::new(NucleotideMatrix::new());
        let result = aligner.align(b"ACGTACGT", b"ACGT");
        assert!(result.percent_identity() <= 50.0);
    }
}
