pub mod align;
pub mod config;
pub mod pairwise;
