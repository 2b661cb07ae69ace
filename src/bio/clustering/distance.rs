use crate::bio::alignment::nw_aligner::NeedlemanWunsch;
use crate::bio::alignment::scoring::ScoringMatrix;
use crate::bio::sequence::Sequence;
use crate::KaidokuError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Percent identity (0-100) between two ungapped sequences
pub trait IdentityScorer: Send + Sync {
    fn percent_identity(&self, a: &[u8], b: &[u8]) -> f64;
}

impl<S: ScoringMatrix> IdentityScorer for NeedlemanWunsch<S> {
    fn percent_identity(&self, a: &[u8], b: &[u8]) -> f64 {
        self.align(a, b).percent_identity()
    }
}

/// How pairwise distances are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMethod {
    /// Full global alignment per pair
    #[default]
    Exact,
    /// Shared k-mer approximation
    Kmer,
}

/// Jaccard similarity of distinct k-mer sets, scaled to 0-100.
///
/// Much cheaper than alignment for large inputs, at the cost of only
/// approximating identity.
#[derive(Debug, Clone)]
pub struct KmerIdentity {
    k: usize,
}

impl KmerIdentity {
    /// k-mers are packed into a u64, so `k` is clamped to 1..=8
    pub fn new(k: usize) -> Self {
        Self { k: k.clamp(1, 8) }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    fn kmers(&self, seq: &[u8]) -> Vec<u64> {
        if seq.len() < self.k {
            return Vec::new();
        }

        let mut kmers: Vec<u64> = seq
            .windows(self.k)
            .map(|kmer| {
                kmer.iter()
                    .enumerate()
                    .fold(0u64, |hash, (j, &byte)| hash | (byte as u64) << (j * 8))
            })
            .collect();
        kmers.sort_unstable();
        kmers.dedup();
        kmers
    }
}

impl Default for KmerIdentity {
    fn default() -> Self {
        Self::new(4)
    }
}

impl IdentityScorer for KmerIdentity {
    fn percent_identity(&self, a: &[u8], b: &[u8]) -> f64 {
        let kmers1 = self.kmers(a);
        let kmers2 = self.kmers(b);
        if kmers1.is_empty() || kmers2.is_empty() {
            return if a == b { 100.0 } else { 0.0 };
        }

        let (mut i, mut j, mut intersection) = (0, 0, 0);
        while i < kmers1.len() && j < kmers2.len() {
            if kmers1[i] == kmers2[j] {
                intersection += 1;
                i += 1;
                j += 1;
            } else if kmers1[i] < kmers2[j] {
                i += 1;
            } else {
                j += 1;
            }
        }

        let union = kmers1.len() + kmers2.len() - intersection;
        intersection as f64 / union as f64 * 100.0
    }
}

/// Symmetric matrix of `100 - percent identity`, zero on the diagonal
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Compute all unordered pairs with `scorer`.
    ///
    /// With `parallel` set the pairs are spread over the rayon pool; each pair
    /// owns its two cells so the result is identical to the sequential path.
    pub fn build<I: IdentityScorer + ?Sized>(
        sequences: &[Sequence],
        scorer: &I,
        parallel: bool,
    ) -> Result<Self, KaidokuError> {
        let size = sequences.len();
        if size < 2 {
            return Err(KaidokuError::InvalidInput(format!(
                "At least two sequences required for a distance matrix, got {}",
                size
            )));
        }

        let pairs: Vec<(usize, usize)> = (0..size)
            .flat_map(|i| (i + 1..size).map(move |j| (i, j)))
            .collect();
        info!(
            "Computing {} pairwise distances for {} sequences",
            pairs.len(),
            size
        );

        let distance = |&(i, j): &(usize, usize)| {
            let identity = scorer.percent_identity(&sequences[i].sequence, &sequences[j].sequence);
            (i, j, 100.0 - identity)
        };

        let computed: Vec<(usize, usize, f64)> = if parallel {
            pairs.par_iter().map(distance).collect()
        } else {
            pairs.iter().map(distance).collect()
        };

        let mut values = vec![0.0; size * size];
        for (i, j, d) in computed {
            debug!("distance({}, {}) = {:.3}", i, j, d);
            values[i * size + j] = d;
            values[j * size + i] = d;
        }

        Ok(Self { size, values })
    }

    /// Wrap precomputed row-major values
    pub fn from_values(size: usize, values: Vec<f64>) -> Result<Self, KaidokuError> {
        if values.len() != size * size {
            return Err(KaidokuError::InvalidInput(format!(
                "Distance matrix of size {} needs {} values, got {}",
                size,
                size * size,
                values.len()
            )));
        }
        for i in 0..size {
            if values[i * size + i] != 0.0 {
                return Err(KaidokuError::InvalidInput(format!(
                    "Distance matrix diagonal must be zero at {}",
                    i
                )));
            }
            for j in i + 1..size {
                if values[i * size + j] != values[j * size + i] {
                    return Err(KaidokuError::InvalidInput(format!(
                        "Distance matrix is not symmetric at ({}, {})",
                        i, j
                    )));
                }
            }
        }
        Ok(Self { size, values })
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    pub fn identity(&self, i: usize, j: usize) -> f64 {
        100.0 - self.get(i, j)
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::alignment::scoring::NucleotideMatrix;

    fn seqs(data: &[&[u8]]) -> Vec<Sequence> {
        data.iter()
            .enumerate()
            .map(|(i, s)| Sequence::new(format!("s{}", i + 1), s.to_vec()))
            .collect()
    }

    #[test]
    fn test_identical_sequences_have_zero_distance() {
        let input = seqs(&[b"ACGTACGT", b"ACGTACGT", b"ACGTACGT"]);
        let scorer = NeedlemanWunsch::new(NucleotideMatrix::new());
        let matrix = DistanceMatrix::build(&input, &scorer, false).unwrap();

        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(matrix.get(i, j), 0.0);
            }
        }
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let input = seqs(&[b"ACGTACGT", b"ACGAACGT", b"TTTTACGT"]);
        let scorer = NeedlemanWunsch::new(NucleotideMatrix::new());
        let matrix = DistanceMatrix::build(&input, &scorer, false).unwrap();

        assert_eq!(matrix.get(0, 1), matrix.get(1, 0));
        assert_eq!(matrix.get(0, 1), 12.5);
        assert_eq!(matrix.identity(0, 1), 87.5);
        assert!(matrix.get(0, 2) > matrix.get(0, 1));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let input = seqs(&[b"ACGTACGTTA", b"ACGAACGT", b"TTGTACGT", b"ACGTTCGTAA"]);
        let scorer = NeedlemanWunsch::new(NucleotideMatrix::new());
        let sequential = DistanceMatrix::build(&input, &scorer, false).unwrap();
        let parallel = DistanceMatrix::build(&input, &scorer, true).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_requires_two_sequences() {
        let input = seqs(&[b"ACGT"]);
        let scorer = NeedlemanWunsch::new(NucleotideMatrix::new());
        assert!(matches!(
            DistanceMatrix::build(&input, &scorer, false),
            Err(KaidokuError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_kmer_identity() {
        let scorer = KmerIdentity::new(3);
        assert_eq!(scorer.percent_identity(b"ACGTACGT", b"ACGTACGT"), 100.0);
        assert_eq!(scorer.percent_identity(b"AAAAAA", b"CCCCCC"), 0.0);
        let partial = scorer.percent_identity(b"ACGTACGT", b"ACGTTTTT");
        assert!(partial > 0.0 && partial < 100.0);
        // Shorter than k
        assert_eq!(scorer.percent_identity(b"AC", b"AC"), 100.0);
        assert_eq!(KmerIdentity::new(32).k(), 8);
    }

    #[test]
    fn test_from_values_validates_shape() {
        assert!(DistanceMatrix::from_values(2, vec![0.0, 1.0, 1.0, 0.0]).is_ok());
        assert!(DistanceMatrix::from_values(2, vec![0.0, 1.0, 2.0, 0.0]).is_err());
        assert!(DistanceMatrix::from_values(2, vec![0.0, 1.0]).is_err());
    }
}
