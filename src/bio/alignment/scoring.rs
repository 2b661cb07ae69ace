/// Scoring matrices for sequence alignment
use crate::bio::sequence::{MoleculeType, GAP};

/// Substitution scores plus affine gap penalties.
///
/// Gap penalties are positive and are subtracted by the aligners. `score`
/// must also handle the gap symbol, since profile columns mix residues
/// and gaps.
pub trait ScoringMatrix: Send + Sync {
    fn score(&self, a: u8, b: u8) -> i32;
    fn gap_open(&self) -> i32;
    fn gap_extend(&self) -> i32;
    fn molecule(&self) -> MoleculeType;
}

/// Nucleotide scoring: +5 match, -4 mismatch, flat -10 gaps
#[derive(Debug, Clone)]
pub struct NucleotideMatrix {
    match_score: i32,
    mismatch_score: i32,
    gap_penalty: i32,
}

impl NucleotideMatrix {
    pub fn new() -> Self {
        Self {
            match_score: 5,
            mismatch_score: -4,
            gap_penalty: 10,
        }
    }
}

impl Default for NucleotideMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringMatrix for NucleotideMatrix {
    fn score(&self, a: u8, b: u8) -> i32 {
        let a = a.to_ascii_uppercase();
        let b = b.to_ascii_uppercase();

        match (a == GAP, b == GAP) {
            (true, true) => 0,
            (true, false) | (false, true) => -self.gap_penalty,
            // N is ambiguous and never counts as a match
            _ if a == b'N' || b == b'N' => self.mismatch_score,
            _ if a == b => self.match_score,
            _ => self.mismatch_score,
        }
    }

    fn gap_open(&self) -> i32 {
        self.gap_penalty
    }

    fn gap_extend(&self) -> i32 {
        self.gap_penalty
    }

    fn molecule(&self) -> MoleculeType {
        MoleculeType::Nucleotide
    }
}

/// Identity protein scoring: +4 match, -4 mismatch, gap open -11, extend -1
#[derive(Debug, Clone)]
pub struct ProteinMatrix {
    match_score: i32,
    mismatch_score: i32,
    gap_open: i32,
    gap_extend: i32,
}

impl ProteinMatrix {
    pub fn new() -> Self {
        Self {
            match_score: 4,
            mismatch_score: -4,
            gap_open: 11,
            gap_extend: 1,
        }
    }
}

impl Default for ProteinMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringMatrix for ProteinMatrix {
    fn score(&self, a: u8, b: u8) -> i32 {
        let a = a.to_ascii_uppercase();
        let b = b.to_ascii_uppercase();

        if a == GAP || b == GAP {
            -self.gap_open
        } else if a == b {
            self.match_score
        } else {
            self.mismatch_score
        }
    }

    fn gap_open(&self) -> i32 {
        self.gap_open
    }

    fn gap_extend(&self) -> i32 {
        self.gap_extend
    }

    fn molecule(&self) -> MoleculeType {
        MoleculeType::Protein
    }
}

const BLOSUM62_ORDER: &[u8; 20] = b"ARNDCQEGHILKMFPSTWYV";

#[rustfmt::skip]
const BLOSUM62_TABLE: [[i8; 20]; 20] = [
    [ 4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0],
    [-1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3],
    [-2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3],
    [-2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3],
    [ 0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1],
    [-1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2],
    [-1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2],
    [ 0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3],
    [-2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3],
    [-1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3],
    [-1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1],
    [-1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2],
    [-1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1],
    [-2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1],
    [-1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2],
    [ 1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2],
    [ 0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0],
    [-3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3],
    [-2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1],
    [ 0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4],
];

/// BLOSUM62 substitution scores with the protein gap model
#[derive(Debug, Clone)]
pub struct Blosum62 {
    index: [Option<u8>; 256],
    gap_open: i32,
    gap_extend: i32,
}

impl Blosum62 {
    pub fn new() -> Self {
        let mut index = [None; 256];
        for (i, &aa) in BLOSUM62_ORDER.iter().enumerate() {
            index[aa as usize] = Some(i as u8);
            index[aa.to_ascii_lowercase() as usize] = Some(i as u8);
        }

        Self {
            index,
            gap_open: 11,
            gap_extend: 1,
        }
    }
}

impl Default for Blosum62 {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringMatrix for Blosum62 {
    fn score(&self, a: u8, b: u8) -> i32 {
        if a == GAP || b == GAP {
            return -self.gap_open;
        }
        match (self.index[a as usize], self.index[b as usize]) {
            (Some(i), Some(j)) => BLOSUM62_TABLE[i as usize][j as usize] as i32,
            // Validated input never reaches this; score like the X row
            _ => -1,
        }
    }

    fn gap_open(&self) -> i32 {
        self.gap_open
    }

    fn gap_extend(&self) -> i32 {
        self.gap_extend
    }

    fn molecule(&self) -> MoleculeType {
        MoleculeType::Protein
    }
}

/// Runtime choice of scoring, selected once per alignment job
#[derive(Debug, Clone)]
pub enum ScoringModel {
    Nucleotide(NucleotideMatrix),
    Protein(ProteinMatrix),
    Blosum62(Blosum62),
}

impl ScoringModel {
    pub fn for_molecule(molecule: MoleculeType) -> Self {
        match molecule {
            MoleculeType::Nucleotide => ScoringModel::Nucleotide(NucleotideMatrix::new()),
            MoleculeType::Protein => ScoringModel::Protein(ProteinMatrix::new()),
        }
    }

    pub fn blosum62() -> Self {
        ScoringModel::Blosum62(Blosum62::new())
    }

    fn inner(&self) -> &dyn ScoringMatrix {
        match self {
            ScoringModel::Nucleotide(m) => m,
            ScoringModel::Protein(m) => m,
            ScoringModel::Blosum62(m) => m,
        }
    }
}

impl ScoringMatrix for ScoringModel {
    fn score(&self, a: u8, b: u8) -> i32 {
        self.inner().score(a, b)
    }

    fn gap_open(&self) -> i32 {
        self.inner().gap_open()
    }

    fn gap_extend(&self) -> i32 {
        self.inner().gap_extend()
    }

    fn molecule(&self) -> MoleculeType {
        self.inner().molecule()
    }
}

impl<S: ScoringMatrix + ?Sized> ScoringMatrix for &S {
    fn score(&self, a: u8, b: u8) -> i32 {
        (**self).score(a, b)
    }

    fn gap_open(&self) -> i32 {
        (**self).gap_open()
    }

    fn gap_extend(&self) -> i32 {
        (**self).gap_extend()
    }

    fn molecule(&self) -> MoleculeType {
        (**self).molecule()
    }
}
