use crate::bio::alignment::scoring::ScoringModel;
use crate::bio::clustering::DistanceMethod;
use crate::bio::fasta::ParsePolicy;
use crate::bio::msa::RefinePolicy;
use crate::bio::sequence::MoleculeType;
use crate::report::Format;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub alignment: AlignmentConfig,
    pub output: OutputConfig,
    pub performance: PerformanceConfig,
}

/// Substitution table used for protein input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProteinMatrix {
    /// Flat +4 / -4 scoring
    #[default]
    Simple,
    Blosum62,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    pub molecule: MoleculeType,
    pub protein_matrix: ProteinMatrix,
    pub refine_iterations: usize,
    pub refine_policy: RefinePolicy,
    /// Seed for the refinement shuffles
    pub seed: u64,
    pub distance: DistanceMethod,
    pub kmer_size: usize,
    pub parse_policy: ParsePolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: Format,
    /// Columns per Clustal block
    pub block_width: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Worker threads, 0 for all cores
    pub threads: usize,
    pub parallel_distance: bool,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            molecule: MoleculeType::Nucleotide,
            protein_matrix: ProteinMatrix::Simple,
            refine_iterations: 3,
            refine_policy: RefinePolicy::AcceptAll,
            seed: 42,
            distance: DistanceMethod::Exact,
            kmer_size: 4,
            parse_policy: ParsePolicy::Strict,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: Format::Text,
            block_width: 60,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            parallel_distance: true,
        }
    }
}

impl AlignmentConfig {
    /// Scoring for the configured molecule and protein table
    pub fn scoring(&self) -> ScoringModel {
        match (self.molecule, self.protein_matrix) {
            (MoleculeType::Protein, ProteinMatrix::Blosum62) => ScoringModel::blosum62(),
            (molecule, _) => ScoringModel::for_molecule(molecule),
        }
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, crate::KaidokuError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| crate::KaidokuError::Config(format!("Failed to parse config: {}", e)))?;
    if config.output.block_width == 0 {
        return Err(crate::KaidokuError::Config(
            "output.block_width must be at least 1".to_string(),
        ));
    }
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), crate::KaidokuError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| crate::KaidokuError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = default_config();
        assert_eq!(config.alignment.molecule, MoleculeType::Nucleotide);
        assert_eq!(config.alignment.refine_iterations, 3);
        assert_eq!(config.alignment.seed, 42);
        assert_eq!(config.output.block_width, 60);
        assert!(config.performance.parallel_distance);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [alignment]
            molecule = "protein"
            protein_matrix = "blosum62"
            refine_policy = "accept-improving"
            "#,
        )
        .unwrap();

        assert_eq!(config.alignment.molecule, MoleculeType::Protein);
        assert_eq!(config.alignment.refine_policy, RefinePolicy::AcceptImproving);
        assert_eq!(config.alignment.kmer_size, 4);
        assert_eq!(config.output, OutputConfig::default());
        assert!(matches!(config.alignment.scoring(), ScoringModel::Blosum62(_)));
    }

    #[test]
    fn test_blosum_ignored_for_nucleotides() {
        let mut config = AlignmentConfig::default();
        config.protein_matrix = ProteinMatrix::Blosum62;
        assert!(matches!(config.scoring(), ScoringModel::Nucleotide(_)));
    }
}
