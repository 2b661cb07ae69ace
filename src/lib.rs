pub mod bio;
pub mod cli;
pub mod core;
pub mod report;
pub mod utils;

pub use crate::bio::sequence::{MoleculeType, Sequence};
pub use crate::core::aligner::MultipleAligner;
pub use crate::report::MsaReport;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KaidokuError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Alignment failed: {0}")]
    Computation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KaidokuError>;
