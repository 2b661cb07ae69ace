pub mod alignment;
pub mod clustering;
pub mod fasta;
pub mod msa;
pub mod sequence;

pub use sequence::{MoleculeType, Sequence};
