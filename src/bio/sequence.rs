use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::KaidokuError;

/// Alignment gap symbol.
pub const GAP: u8 = b'-';

const NUCLEOTIDES: &[u8] = b"ACGTN";
const AMINO_ACIDS: &[u8] = b"ARNDCQEGHILKMFPSTWYV";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sequence {
    pub id: String,
    pub description: Option<String>,
    pub sequence: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoleculeType {
    Nucleotide,
    Protein,
}

impl MoleculeType {
    /// Residue symbols accepted for this molecule, excluding the gap.
    pub fn alphabet(&self) -> &'static [u8] {
        match self {
            MoleculeType::Nucleotide => NUCLEOTIDES,
            MoleculeType::Protein => AMINO_ACIDS,
        }
    }

    /// Gaps are accepted so that pre-aligned input can be re-aligned.
    pub fn is_valid_symbol(&self, symbol: u8) -> bool {
        symbol == GAP || self.alphabet().contains(&symbol)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoleculeType::Nucleotide => "nucleotide",
            MoleculeType::Protein => "protein",
        }
    }
}

impl fmt::Display for MoleculeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoleculeType {
    type Err = KaidokuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nucleotide" | "dna" => Ok(MoleculeType::Nucleotide),
            "protein" | "aa" => Ok(MoleculeType::Protein),
            other => Err(KaidokuError::InvalidInput(format!(
                "Sequence type must be 'nucleotide' or 'protein', got '{}'",
                other
            ))),
        }
    }
}

impl Sequence {
    pub fn new(id: String, sequence: Vec<u8>) -> Self {
        Self {
            id,
            description: None,
            sequence,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Header text without the leading `>`.
    pub fn label(&self) -> String {
        match &self.description {
            Some(desc) => format!("{} {}", self.id, desc),
            None => self.id.clone(),
        }
    }

    pub fn header(&self) -> String {
        format!(">{}", self.label())
    }

    /// First symbol that is not part of the molecule's alphabet, if any.
    pub fn first_invalid_symbol(&self, molecule: MoleculeType) -> Option<u8> {
        self.sequence
            .iter()
            .copied()
            .find(|&c| !molecule.is_valid_symbol(c))
    }

    pub fn validate(&self, molecule: MoleculeType) -> Result<(), KaidokuError> {
        if self.is_empty() {
            return Err(KaidokuError::InvalidInput(format!(
                "Empty sequence for header: {}",
                self.label()
            )));
        }
        if let Some(bad) = self.first_invalid_symbol(molecule) {
            return Err(KaidokuError::InvalidInput(format!(
                "Invalid {} sequence for {}: unexpected character '{}'",
                molecule,
                self.label(),
                bad as char
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.sequence))
    }
}
