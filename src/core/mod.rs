pub mod aligner;
pub mod config;

pub use aligner::{MsaOutcome, MultipleAligner};
pub use config::Config;
