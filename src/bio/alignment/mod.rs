pub mod dp;
pub mod nw_aligner;
pub mod profile;
pub mod scoring;

pub use nw_aligner::{global, NeedlemanWunsch, PairwiseAlignment};
pub use profile::{Profile, ProfileAligner};
pub use scoring::{Blosum62, NucleotideMatrix, ProteinMatrix, ScoringMatrix, ScoringModel};
