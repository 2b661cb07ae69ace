//! Profile-profile alignment with sum-of-pairs column scoring.

use crate::bio::alignment::dp::{DpMatrix, Traceback};
use crate::bio::alignment::scoring::ScoringMatrix;
use crate::bio::sequence::GAP;
use crate::KaidokuError;

/// A block of equal-length aligned rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    rows: Vec<Vec<u8>>,
    width: usize,
}

/// Symbol frequencies of one profile column
type ColumnCounts = Vec<(u8, u32)>;

impl Profile {
    pub fn new(rows: Vec<Vec<u8>>) -> Result<Self, KaidokuError> {
        let width = match rows.first() {
            Some(first) => first.len(),
            None => {
                return Err(KaidokuError::Computation(
                    "Cannot build a profile from zero rows".to_string(),
                ))
            }
        };

        if let Some(ragged) = rows.iter().position(|r| r.len() != width) {
            return Err(KaidokuError::Computation(format!(
                "Profile row {} has {} columns, expected {}",
                ragged,
                rows[ragged].len(),
                width
            )));
        }

        Ok(Self { rows, width })
    }

    /// Caller guarantees every row is `width` long
    pub(crate) fn from_uniform_rows(rows: Vec<Vec<u8>>, width: usize) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == width));
        Self { rows, width }
    }

    pub fn from_sequence(residues: &[u8]) -> Self {
        Self {
            width: residues.len(),
            rows: vec![residues.to_vec()],
        }
    }

    /// Column count
    pub fn width(&self) -> usize {
        self.width
    }

    /// Row count
    pub fn depth(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<u8>> {
        self.rows
    }

    fn column_counts(&self) -> Vec<ColumnCounts> {
        (0..self.width)
            .map(|col| {
                let mut counts: ColumnCounts = Vec::new();
                for row in &self.rows {
                    let symbol = row[col];
                    match counts.iter_mut().find(|(s, _)| *s == symbol) {
                        Some((_, n)) => *n += 1,
                        None => counts.push((symbol, 1)),
                    }
                }
                counts
            })
            .collect()
    }

    /// Sum over every row pair and column of the pair's substitution score
    pub fn sum_of_pairs<S: ScoringMatrix>(&self, scoring: &S) -> i64 {
        let mut total = 0i64;
        for counts in self.column_counts() {
            for (x, &(a, ca)) in counts.iter().enumerate() {
                let ca = ca as i64;
                total += ca * (ca - 1) / 2 * scoring.score(a, a) as i64;
                for &(b, cb) in &counts[x + 1..] {
                    total += ca * cb as i64 * scoring.score(a, b) as i64;
                }
            }
        }
        total
    }
}

pub struct ProfileAligner<S: ScoringMatrix> {
    scoring: S,
}

impl<S: ScoringMatrix> ProfileAligner<S> {
    pub fn new(scoring: S) -> Self {
        Self { scoring }
    }

    pub fn scoring(&self) -> &S {
        &self.scoring
    }

    /// Mean substitution score between every symbol pair of two columns
    fn column_score(&self, a: &ColumnCounts, b: &ColumnCounts, pairs: f64) -> f64 {
        let mut sum = 0.0;
        for &(x, cx) in a {
            for &(y, cy) in b {
                sum += (cx * cy) as f64 * self.scoring.score(x, y) as f64;
            }
        }
        sum / pairs
    }

    /// Align two profiles, returning both extended to a common width
    pub fn align(&self, a: &Profile, b: &Profile) -> Result<(Profile, Profile), KaidokuError> {
        let counts_a = a.column_counts();
        let counts_b = b.column_counts();
        let pairs = (a.depth() * b.depth()) as f64;

        let matrix = DpMatrix::fill(
            a.width(),
            b.width(),
            self.scoring.gap_open() as f64,
            self.scoring.gap_extend() as f64,
            |i, j| self.column_score(&counts_a[i], &counts_b[j], pairs),
        );

        let path = matrix.traceback();
        let mut rows_a: Vec<Vec<u8>> = vec![Vec::with_capacity(path.len()); a.depth()];
        let mut rows_b: Vec<Vec<u8>> = vec![Vec::with_capacity(path.len()); b.depth()];
        let (mut i, mut j) = (0, 0);

        for step in path {
            let (take_a, take_b) = match step {
                Traceback::Diagonal => (true, true),
                Traceback::Up => (true, false),
                Traceback::Left => (false, true),
                Traceback::None => break,
            };
            for (out, row) in rows_a.iter_mut().zip(&a.rows) {
                out.push(if take_a { row[i] } else { GAP });
            }
            for (out, row) in rows_b.iter_mut().zip(&b.rows) {
                out.push(if take_b { row[j] } else { GAP });
            }
            i += take_a as usize;
            j += take_b as usize;
        }

        Ok((Profile::new(rows_a)?, Profile::new(rows_b)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::alignment::nw_aligner::NeedlemanWunsch;
    use crate::bio::alignment::scoring::NucleotideMatrix;

    fn profile(rows: &[&[u8]]) -> Profile {
        Profile::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_ragged_profile_is_rejected() {
        let result = Profile::new(vec![b"ACGT".to_vec(), b"ACG".to_vec()]);
        assert!(matches!(result, Err(KaidokuError::Computation(_))));
        assert!(Profile::new(Vec::new()).is_err());
    }

    #[test]
    fn test_single_row_profiles_match_pairwise() {
        let a = b"GATTACA";
        let b = b"GCATGCA";
        let pairwise = NeedlemanWunsch::new(NucleotideMatrix::new()).align(a, b);
        let (pa, pb) = ProfileAligner::new(NucleotideMatrix::new())
            .align(&Profile::from_sequence(a), &Profile::from_sequence(b))
            .unwrap();

        assert_eq!(pa.rows()[0], pairwise.aligned_a);
        assert_eq!(pb.rows()[0], pairwise.aligned_b);
    }

    #[test]
    fn test_gap_is_inserted_into_every_row() {
        let a = profile(&[b"ACGTACGT", b"ACGTACGA"]);
        let b = profile(&[b"ACGTCGT"]);
        let (pa, pb) = ProfileAligner::new(NucleotideMatrix::new()).align(&a, &b).unwrap();

        assert_eq!(pa.width(), 8);
        assert_eq!(pb.width(), 8);
        assert_eq!(pa.depth(), 2);
        assert_eq!(pb.rows()[0].iter().filter(|&&c| c == GAP).count(), 1);
        // Row content is preserved once gaps are stripped
        let stripped: Vec<u8> = pb.rows()[0].iter().copied().filter(|&c| c != GAP).collect();
        assert_eq!(stripped, b"ACGTCGT");
    }

    #[test]
    fn test_sum_of_pairs() {
        let scoring = NucleotideMatrix::new();
        // Three identical rows of length 2: 3 pairs x 2 columns x +5
        assert_eq!(profile(&[b"AC", b"AC", b"AC"]).sum_of_pairs(&scoring), 30);
        // One mismatch column and one gap column
        assert_eq!(profile(&[b"A-", b"CG"]).sum_of_pairs(&scoring), -14);
        assert_eq!(Profile::from_sequence(b"ACGT").sum_of_pairs(&scoring), 0);
    }
}
